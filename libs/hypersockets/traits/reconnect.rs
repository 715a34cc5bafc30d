use std::time::Duration;

/// Decides whether, and after how long, a dropped connection is retried.
///
/// `attempt` is the number of retries already scheduled since the last
/// successful connection, so the first retry after a drop asks for
/// `attempt == 0`.
pub trait ReconnectionStrategy: Send + Sync {
    /// Delay before retry number `attempt + 1`, or `None` once the budget is spent.
    fn next_delay(&self, attempt: usize) -> Option<Duration>;

    /// Called after a successful connection.
    fn reset(&mut self);

    /// Whether retry number `attempt + 1` is still within budget.
    fn should_reconnect(&self, attempt: usize) -> bool;
}

/// Doubling delay: `initial_delay * 2^attempt`, capped at `max_delay`.
///
/// With a 3s base and five attempts the schedule is 3s, 6s, 12s, 24s, 48s.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
    max_attempts: Option<usize>,
}

impl ExponentialBackoff {
    /// `max_attempts = None` retries forever.
    pub fn new(initial_delay: Duration, max_delay: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            initial_delay,
            max_delay,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> Option<usize> {
        self.max_attempts
    }
}

impl ReconnectionStrategy for ExponentialBackoff {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_reconnect(attempt) {
            return None;
        }

        // Saturate instead of overflowing for large attempt numbers
        let factor = u32::try_from(attempt)
            .ok()
            .and_then(|exp| 2u32.checked_pow(exp));
        let delay = match factor {
            Some(factor) => self
                .initial_delay
                .checked_mul(factor)
                .unwrap_or(self.max_delay),
            None => self.max_delay,
        };

        Some(delay.min(self.max_delay))
    }

    fn reset(&mut self) {}

    fn should_reconnect(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Same delay before every retry.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
    max_attempts: Option<usize>,
}

impl FixedDelay {
    pub fn new(delay: Duration, max_attempts: Option<usize>) -> Self {
        Self { delay, max_attempts }
    }
}

impl ReconnectionStrategy for FixedDelay {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        self.should_reconnect(attempt).then_some(self.delay)
    }

    fn reset(&mut self) {}

    fn should_reconnect(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// The first disconnection is final.
#[derive(Debug, Clone)]
pub struct NeverReconnect;

impl ReconnectionStrategy for NeverReconnect {
    fn next_delay(&self, _attempt: usize) -> Option<Duration> {
        None
    }

    fn reset(&mut self) {}

    fn should_reconnect(&self, _attempt: usize) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_schedule() {
        let strategy = ExponentialBackoff::new(
            Duration::from_millis(3000),
            Duration::from_millis(48_000),
            Some(5),
        );

        let delays: Vec<u128> = (0..5)
            .map(|attempt| strategy.next_delay(attempt).unwrap().as_millis())
            .collect();
        assert_eq!(delays, vec![3000, 6000, 12000, 24000, 48000]);
        assert_eq!(strategy.next_delay(5), None);
    }

    #[test]
    fn test_exponential_caps_and_never_overflows() {
        let strategy =
            ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(10), None);

        assert_eq!(strategy.next_delay(3), Some(Duration::from_secs(8)));
        assert_eq!(strategy.next_delay(4), Some(Duration::from_secs(10)));
        assert_eq!(strategy.next_delay(200), Some(Duration::from_secs(10)));
        assert_eq!(strategy.next_delay(usize::MAX - 1), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_fixed_and_never() {
        let fixed = FixedDelay::new(Duration::from_millis(50), Some(2));
        assert_eq!(fixed.next_delay(0), Some(Duration::from_millis(50)));
        assert_eq!(fixed.next_delay(1), Some(Duration::from_millis(50)));
        assert_eq!(fixed.next_delay(2), None);

        assert!(!NeverReconnect.should_reconnect(0));
        assert_eq!(NeverReconnect.next_delay(0), None);
    }
}
