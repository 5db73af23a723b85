//! Input capability
//!
//! Backends translate their own events into `InputEvent`s; the game loop
//! drains them once per frame.

use std::collections::VecDeque;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Jump,
    Pause,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    /// Terminal resized to `cols x rows` cells
    Resize { cols: u16, rows: u16 },
}

pub trait InputSource {
    /// Everything that arrived since the last call, oldest first. Never blocks.
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>>;
}

/// Canned input, one batch per frame. Runs dry into empty batches.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Queue a batch for the frame after all already queued ones.
    pub fn push(&mut self, batch: Vec<InputEvent>) {
        self.frames.push_back(batch);
    }

    /// Queue `n` frames with no input.
    pub fn idle(&mut self, n: usize) {
        for _ in 0..n {
            self.frames.push_back(Vec::new());
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}
