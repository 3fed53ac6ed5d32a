//! Bounded random latency simulation for workers.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

/// A bounded uniform random delay driven by an injected random source.
///
/// Workers use this to model variable production and consumption latency. The
/// random source is always passed in by the caller, so runs are reproducible
/// under a fixed seed; there is no global random state anywhere in the crate.
#[derive(Debug, Clone, Copy)]
pub struct RandomDelay {
    bound: Duration,
}

impl RandomDelay {
    /// Creates a delay drawn uniformly from `[0, bound)`.
    pub fn up_to(bound: Duration) -> Self {
        Self { bound }
    }

    /// Creates a delay with the bound given in milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self::up_to(Duration::from_millis(millis))
    }

    /// Creates a delay that never sleeps.
    pub fn none() -> Self {
        Self::up_to(Duration::ZERO)
    }

    /// Draws one delay from the bound.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        let millis = self.bound.as_millis() as u64;
        if millis == 0 {
            return Duration::ZERO;
        }

        Duration::from_millis(rng.gen_range(0..millis))
    }

    /// Sleeps for one drawn delay. A zero bound returns without suspending.
    pub async fn pause<R: Rng>(&self, rng: &mut R) {
        let delay = self.sample(rng);
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sample_stays_below_the_bound() {
        let delay = RandomDelay::from_millis(100);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            assert!(delay.sample(&mut rng) < Duration::from_millis(100));
        }
    }

    #[test]
    fn test_zero_bound_never_sleeps() {
        let delay = RandomDelay::none();
        let mut rng = StdRng::seed_from_u64(11);

        assert_eq!(delay.sample(&mut rng), Duration::ZERO);
    }
}
