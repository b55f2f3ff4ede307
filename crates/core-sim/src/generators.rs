use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest relative move a single tick can apply, in either direction.
pub const MAX_STEP_PCT: f64 = 0.03;

#[derive(Debug, Clone)]
pub struct PriceGenerator<R = StdRng> {
    rng: R,
    max_step_pct: f64,
}

impl PriceGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> PriceGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            max_step_pct: MAX_STEP_PCT,
        }
    }

    /// Multiplicative random walk step: `previous * (1 + pct)` with `pct`
    /// uniform over `[-3%, +3%]`. No clamping is applied.
    pub fn next_price(&mut self, previous: f64) -> f64 {
        let pct = self.rng.gen_range(-self.max_step_pct..=self.max_step_pct);
        previous * (1.0 + pct)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::PriceGenerator;

    #[test]
    fn seeded_generators_are_deterministic() {
        let mut price_a = PriceGenerator::seeded(42);
        let mut price_b = PriceGenerator::seeded(42);

        let walk = |generator: &mut PriceGenerator| {
            let mut price = 100.0;
            (0..10)
                .map(|_| {
                    price = generator.next_price(price);
                    price
                })
                .collect::<Vec<f64>>()
        };

        assert_eq!(walk(&mut price_a), walk(&mut price_b));
    }

    #[test]
    fn next_price_stays_within_three_percent_band() {
        let mut generator = PriceGenerator::seeded(7);

        for previous in [0.5, 1.0, 42.0, 100.0, 12_345.6] {
            for _ in 0..1_000 {
                let next = generator.next_price(previous);
                assert!(next >= previous * 0.97 - 1e-9, "{next} below band of {previous}");
                assert!(next <= previous * 1.03 + 1e-9, "{next} above band of {previous}");
            }
        }
    }

    #[test]
    fn walk_is_unclamped_and_compounds() {
        let mut generator = PriceGenerator::seeded(3);
        let mut price = 100.0;

        for _ in 0..500 {
            price = generator.next_price(price);
        }

        assert!(price.is_finite());
        assert!(price > 0.0);
        assert_ne!(price, 100.0);
    }

    #[test]
    fn injected_rng_drives_the_draw() {
        let mut low = PriceGenerator::with_rng(StepRng::new(0, 0));
        let next = low.next_price(100.0);

        assert!((97.0 - 1e-9..=103.0 + 1e-9).contains(&next));
        assert_eq!(next, low.next_price(100.0));
    }
}
