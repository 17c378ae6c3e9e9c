//! Uniform draws shared by every probabilistic step.
//!
//! All randomness flows through an injected [`Rng`], so a seeded generator
//! reproduces a run exactly.
use rand::Rng;

/// Generate a random float in the range [0, 1).
///
/// Uses the top 24 bits so the result is exactly representable and never rounds up to 1.0.
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Bernoulli draw. `chance <= 0` never succeeds and `chance >= 1` always does.
#[inline]
pub(crate) fn chance(rng: &mut dyn Rng, chance: f32) -> bool {
    rand01(rng) < chance
}

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn pick_index(len: usize, rng: &mut dyn Rng) -> usize {
    debug_assert!(len > 0, "pick_index on an empty range");
    let index = (rand01(rng) * len as f32) as usize;
    index.min(len.saturating_sub(1))
}

/// Picks one element uniformly. `None` for an empty slice.
pub(crate) fn pick_uniform<'a, T>(items: &'a [T], rng: &mut dyn Rng) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(pick_index(items.len(), rng))
}


#[cfg(test)]
mod tests {
    use super::test_rng::SeqRng;
    use super::*;

    #[test]
    fn rand01_values_in_range() {
        for value in [0, 1, 100, u32::MAX / 2, u32::MAX - 1, u32::MAX] {
            let mut rng = SeqRng::new(vec![value]);
            let result = rand01(&mut rng);
            assert!((0.0..1.0).contains(&result), "rand01({value}) = {result}");
        }
    }

    #[test]
    fn chance_edges_are_absolute() {
        let mut zero = SeqRng::new(vec![0]);
        assert!(!chance(&mut zero, 0.0));
        assert!(chance(&mut zero, 1.0));

        let mut top = SeqRng::new(vec![u32::MAX]);
        assert!(chance(&mut top, 1.0));
        assert!(!chance(&mut top, 0.99));
    }

    #[test]
    fn pick_uniform_covers_bounds() {
        let items = ["a", "b", "c"];
        let mut low = SeqRng::constant(0.0);
        assert_eq!(pick_uniform(&items, &mut low), Some(&"a"));
        let mut mid = SeqRng::constant(0.5);
        assert_eq!(pick_uniform(&items, &mut mid), Some(&"b"));
        let mut high = SeqRng::new(vec![u32::MAX]);
        assert_eq!(pick_uniform(&items, &mut high), Some(&"c"));

        let empty: [&str; 0] = [];
        assert_eq!(pick_uniform(&empty, &mut low), None);
    }
}
