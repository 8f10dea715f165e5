//! Fixed frame-rate pacing for the event loop

use std::time::{Duration, Instant};

/// Schedules redraws at a fixed rate.
///
/// Used with `ControlFlow::WaitUntil(pacer.next_frame())`: the loop sleeps
/// until the next frame is due instead of spinning.
#[derive(Debug, Clone)]
pub struct FramePacer {
    frame_time: Duration,
    next_frame: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self::starting_at(fps, Instant::now())
    }

    pub fn starting_at(fps: u32, start: Instant) -> Self {
        Self {
            frame_time: Duration::from_secs(1) / fps.max(1),
            next_frame: start,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    /// True if a frame is due at `now`; schedules the one after it.
    ///
    /// A loop that fell behind by several frames gets one frame, not a burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_frame {
            return false;
        }

        self.next_frame += self.frame_time;
        if self.next_frame <= now {
            self.next_frame = now + self.frame_time;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_due_immediately() {
        let start = Instant::now();
        let mut pacer = FramePacer::starting_at(60, start);

        assert!(pacer.poll(start));
        assert_eq!(pacer.next_frame(), start + pacer.frame_time());
    }

    #[test]
    fn waits_a_full_frame() {
        let start = Instant::now();
        let mut pacer = FramePacer::starting_at(50, start);
        assert_eq!(pacer.frame_time(), Duration::from_millis(20));

        assert!(pacer.poll(start));
        assert!(!pacer.poll(start + Duration::from_millis(19)));
        assert!(pacer.poll(start + Duration::from_millis(20)));
        assert!(!pacer.poll(start + Duration::from_millis(21)));
    }

    #[test]
    fn does_not_burst_after_a_stall() {
        let start = Instant::now();
        let mut pacer = FramePacer::starting_at(50, start);
        pacer.poll(start);

        let late = start + Duration::from_millis(500);
        assert!(pacer.poll(late));
        assert!(!pacer.poll(late + Duration::from_millis(1)));
        assert_eq!(pacer.next_frame(), late + Duration::from_millis(20));
    }

    #[test]
    fn zero_fps_is_clamped() {
        let pacer = FramePacer::new(0);
        assert_eq!(pacer.frame_time(), Duration::from_secs(1));
    }
}
