//! Scheduled tasks driven by window-system timers

use std::time::{Duration, Instant};

/// Timers the controller asks the host to deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// End of a temporary hide
    Hide,
    /// Periodic topmost re-assertion
    KeepOnTop,
}

impl TimerKind {
    /// Stable numeric id, usable as a Win32 timer id
    pub fn id(&self) -> usize {
        match self {
            TimerKind::Hide => 1,
            TimerKind::KeepOnTop => 2,
        }
    }

    pub fn from_id(id: usize) -> Option<Self> {
        match id {
            1 => Some(TimerKind::Hide),
            2 => Some(TimerKind::KeepOnTop),
            _ => None,
        }
    }
}

/// Result of checking a one-shot against the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPoll {
    /// Nothing armed
    Idle,
    /// Armed, this much time left
    Pending(Duration),
    /// Deadline reached; the timer is now disarmed
    Fired,
}

/// One-shot deadline with restart semantics.
///
/// There is at most one outstanding deadline: arming again replaces it.
#[derive(Debug, Default)]
pub struct OneShot {
    deadline: Option<Instant>,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `after` from `now`. Returns true if an earlier deadline was
    /// replaced.
    pub fn arm(&mut self, now: Instant, after: Duration) -> bool {
        self.deadline.replace(now + after).is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> TimerPoll {
        match self.deadline {
            None => TimerPoll::Idle,
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                TimerPoll::Fired
            }
            Some(deadline) => TimerPoll::Pending(deadline - now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_at_deadline() {
        let start = Instant::now();
        let mut timer = OneShot::new();
        assert!(!timer.arm(start, Duration::from_millis(2000)));

        assert_eq!(
            timer.poll(start + Duration::from_millis(500)),
            TimerPoll::Pending(Duration::from_millis(1500))
        );
        assert_eq!(timer.poll(start + Duration::from_millis(2000)), TimerPoll::Fired);
        assert_eq!(timer.poll(start + Duration::from_millis(2500)), TimerPoll::Idle);
    }

    #[test]
    fn rearming_restarts_countdown() {
        let start = Instant::now();
        let mut timer = OneShot::new();
        timer.arm(start, Duration::from_millis(2000));
        assert!(timer.arm(start + Duration::from_millis(1500), Duration::from_millis(2000)));

        assert!(matches!(
            timer.poll(start + Duration::from_millis(2000)),
            TimerPoll::Pending(_)
        ));
        assert_eq!(timer.poll(start + Duration::from_millis(3500)), TimerPoll::Fired);
    }

    #[test]
    fn cancel_disarms() {
        let start = Instant::now();
        let mut timer = OneShot::new();
        timer.arm(start, Duration::from_millis(10));
        timer.cancel();
        assert!(!timer.is_armed());
        assert_eq!(timer.poll(start + Duration::from_secs(1)), TimerPoll::Idle);
    }

    #[test]
    fn ids_round_trip() {
        for kind in [TimerKind::Hide, TimerKind::KeepOnTop] {
            assert_eq!(TimerKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(TimerKind::from_id(0), None);
    }
}
