//! Per-stage frame cadences.
//!
//! The expensive stages (feature detection, mesh rebuild, anchor drift) do
//! not run every frame. Each owns a [`Cadence`] that is ticked exactly once
//! per frame instead of comparing against a shared global frame counter.

/// Frames-since-last-run scheduling state for one periodic stage.
#[derive(Clone, Copy, Debug)]
pub struct Cadence {
    every: u32,
    since: u32,
}

impl Cadence {
    /// A cadence that fires on its first tick and every `every` frames after.
    ///
    /// `every == 0` is treated as 1 (fire every frame).
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            since: 0,
        }
    }

    /// Tick one frame; returns whether the stage should run this frame.
    pub fn tick(&mut self) -> bool {
        if self.since == 0 {
            self.since = self.every;
        }
        self.since -= 1;
        self.since + 1 == self.every
    }

    /// Force the next tick to fire (used when a parameter change must
    /// retrigger the stage immediately).
    pub fn force(&mut self) {
        self.since = 0;
    }

    /// Change the period, firing on the next tick.
    pub fn reset(&mut self, every: u32) {
        *self = Cadence::new(every);
    }

    /// Configured period in frames.
    pub fn every(&self) -> u32 {
        self.every
    }
}
