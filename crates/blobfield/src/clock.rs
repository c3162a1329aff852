use std::time::Instant;

/// Snapshot of the clock supplied to one frame's shading pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or simulated time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where elapsed time originates from.
///
/// The production loop runs on the monotonic system clock; tests and still
/// frames pin time to a fixed value instead.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces the sample for the next frame. Samples never run backwards.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock, anchored at creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.origin.elapsed().as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Time source that always reports the same timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
}

impl FixedTimeSource {
    pub fn new(time: f32) -> Self {
        Self { time }
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

impl TimeSource for FixedTimeSource {
    fn reset(&mut self) {}

    fn sample(&mut self) -> TimeSample {
        TimeSample::new(self.time, 0)
    }
}

/// Convenient alias for owning a time source behind a trait object.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_source_never_runs_backwards() {
        let mut source = SystemTimeSource::new();
        let mut last = source.sample();
        for _ in 0..32 {
            let next = source.sample();
            assert!(next.seconds >= last.seconds);
            assert_eq!(next.frame_index, last.frame_index + 1);
            last = next;
        }
    }

    #[test]
    fn reset_rewinds_the_frame_counter() {
        let mut source = SystemTimeSource::new();
        source.sample();
        source.sample();
        source.reset();
        assert_eq!(source.sample().frame_index, 0);
    }

    #[test]
    fn fixed_source_reports_a_pinned_timestamp() {
        let mut source = FixedTimeSource::new(4.25);
        assert_eq!(source.sample(), TimeSample::new(4.25, 0));
        assert_eq!(source.sample(), TimeSample::new(4.25, 0));
    }
}
