//! Quality tier rolls for produced fish.
use rand::Rng;

use crate::roll::chance;

/// Rolls a quality in `[1, max_quality]` as a chain of level-up draws.
///
/// Each step from 1 towards `max_quality` succeeds with `level_up_chance`; the first
/// failure stops the chain, so tier `k` is reached with probability
/// `level_up_chance^(k-1)`. A `max_quality` of 0 is treated as 1.
pub fn roll_quality(max_quality: u32, level_up_chance: f32, rng: &mut dyn Rng) -> u32 {
    let mut quality = 1;
    while quality < max_quality {
        if !chance(rng, level_up_chance) {
            break;
        }
        quality += 1;
    }
    quality
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::roll::test_rng::SeqRng;

    #[test]
    fn zero_chance_always_returns_one() {
        let mut rng = SeqRng::new(vec![0]);
        for _ in 0..16 {
            assert_eq!(roll_quality(4, 0.0, &mut rng), 1);
        }
    }

    #[test]
    fn full_chance_always_returns_max() {
        let mut rng = SeqRng::new(vec![u32::MAX]);
        assert_eq!(roll_quality(4, 1.0, &mut rng), 4);
        assert_eq!(roll_quality(1, 1.0, &mut rng), 1);
    }

    #[test]
    fn failed_step_caps_the_result() {
        // pass, fail, then a pass that must never be consulted
        let mut rng = SeqRng::from_samples(&[0.05, 0.5, 0.05]);
        assert_eq!(roll_quality(4, 0.1, &mut rng), 2);
    }

    #[test]
    fn zero_max_quality_is_clamped_to_one() {
        let mut rng = SeqRng::constant(0.0);
        assert_eq!(roll_quality(0, 1.0, &mut rng), 1);
    }

    #[test]
    fn seeded_rolls_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let q = roll_quality(4, 0.5, &mut rng);
            assert!((1..=4).contains(&q));
        }
    }
}
