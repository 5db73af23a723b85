//! Score-driven difficulty

/// Pipe speed and gap height in effect for a given score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    /// World units pipes move left per frame
    pub speed: f32,
    /// Gap height for pipes spawned from now on
    pub gap: f32,
}

pub const BASE: Tier = Tier {
    speed: 3.0,
    gap: 150.0,
};
pub const HARD: Tier = Tier {
    speed: 4.0,
    gap: 140.0,
};
pub const HARDER: Tier = Tier {
    speed: 5.0,
    gap: 130.0,
};

/// Largest gap any tier uses; configs are validated against it.
pub const WIDEST_GAP: f32 = BASE.gap;
/// Smallest gap any tier uses; the bird must fit through it.
pub const NARROWEST_GAP: f32 = HARDER.gap;

/// Step function of the score. Higher thresholds win.
pub fn tier_for(score: u32) -> Tier {
    if score > 20 {
        HARDER
    } else if score > 10 {
        HARD
    } else {
        BASE
    }
}
