use std::time::Duration;

/// How a [`SessionTimer`] counts.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum TimerMode {
    /// Counts up without limit; purely informational.
    Elapsed,
    /// Counts down from a limit; reaching zero fails the puzzle.
    Countdown {
        /// Time allowed, in seconds.
        limit: f64,
    },
}

/// Result of one [`SessionTimer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TimerTick {
    /// The timer is stopped; nothing changed.
    Idle,
    /// Time advanced.
    Running,
    /// A countdown reached zero on this tick. The timer is now stopped.
    Expired,
}

/// The puzzle clock.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use jigsaw_game::{SessionTimer, TimerTick};
///
/// let mut timer = SessionTimer::countdown(1.0);
/// assert_eq!(timer.tick(Duration::from_millis(600)), TimerTick::Running);
/// assert_eq!(timer.tick(Duration::from_millis(600)), TimerTick::Expired);
/// assert_eq!(timer.seconds(), 0.0);
/// assert_eq!(timer.tick(Duration::from_millis(600)), TimerTick::Idle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionTimer {
    mode: TimerMode,
    seconds: f64,
    running: bool,
}

impl SessionTimer {
    /// A running timer counting up from zero.
    #[must_use]
    pub fn elapsed() -> Self {
        Self {
            mode: TimerMode::Elapsed,
            seconds: 0.0,
            running: true,
        }
    }

    /// A running timer counting down from `limit` seconds.
    #[must_use]
    pub fn countdown(limit: f64) -> Self {
        let limit = limit.max(0.0);
        Self {
            mode: TimerMode::Countdown { limit },
            seconds: limit,
            running: true,
        }
    }

    /// Counting mode.
    #[must_use]
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Displayed value: elapsed seconds, or remaining seconds for a countdown.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Seconds spent on the puzzle so far, in either mode.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        match self.mode {
            TimerMode::Elapsed => self.seconds,
            TimerMode::Countdown { limit } => limit - self.seconds,
        }
    }

    /// Returns `true` while the clock advances on [`SessionTimer::tick`].
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances the clock by `delta`.
    pub fn tick(&mut self, delta: Duration) -> TimerTick {
        if !self.running {
            return TimerTick::Idle;
        }
        let dt = delta.as_secs_f64();
        match self.mode {
            TimerMode::Elapsed => {
                self.seconds += dt;
                TimerTick::Running
            }
            TimerMode::Countdown { .. } => {
                self.seconds = (self.seconds - dt).max(0.0);
                if self.seconds <= 0.0 {
                    self.running = false;
                    TimerTick::Expired
                } else {
                    TimerTick::Running
                }
            }
        }
    }

    /// Stops the clock.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Resets to the starting value and starts again.
    pub fn reset(&mut self) {
        *self = match self.mode {
            TimerMode::Elapsed => Self::elapsed(),
            TimerMode::Countdown { limit } => Self::countdown(limit),
        };
    }

    /// Resumes a saved session: an elapsed clock continues from `seconds`,
    /// a countdown starts over from its limit.
    pub fn resume_from(&mut self, seconds: f64) {
        self.reset();
        if self.mode.is_elapsed() && seconds.is_finite() {
            self.seconds = seconds.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_counts_up_until_stopped() {
        let mut timer = SessionTimer::elapsed();
        assert!(timer.tick(Duration::from_secs(2)).is_running());
        assert!(timer.tick(Duration::from_millis(500)).is_running());
        assert_eq!(timer.seconds(), 2.5);
        timer.stop();
        assert!(timer.tick(Duration::from_secs(1)).is_idle());
        assert_eq!(timer.elapsed_seconds(), 2.5);
    }

    #[test]
    fn test_countdown_reports_elapsed() {
        let mut timer = SessionTimer::countdown(40.0);
        timer.tick(Duration::from_secs(15));
        assert_eq!(timer.seconds(), 25.0);
        assert_eq!(timer.elapsed_seconds(), 15.0);
    }

    #[test]
    fn test_resume_restores_elapsed_but_not_countdown() {
        let mut elapsed = SessionTimer::elapsed();
        elapsed.resume_from(12.5);
        assert_eq!(elapsed.seconds(), 12.5);

        let mut countdown = SessionTimer::countdown(90.0);
        countdown.tick(Duration::from_secs(30));
        countdown.resume_from(12.5);
        assert_eq!(countdown.seconds(), 90.0);
        assert!(countdown.is_running());
    }
}
