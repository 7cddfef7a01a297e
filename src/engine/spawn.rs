//! Random helpers for placing new tiles. All randomness comes from the
//! caller's RNG so seeded runs are reproducible.

use rand::Rng;

use super::geometry::Cell;

/// Default probability that a spawned tile is a 4 rather than a 2.
pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Draw a starting tile value: 4 with probability `four_probability`, else 2.
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use slide_2048::engine::spawn::starting_value;
/// let mut rng = StdRng::seed_from_u64(7);
/// let v = starting_value(&mut rng, 0.1);
/// assert!(v == 2 || v == 4);
/// ```
#[inline]
pub fn starting_value<R: Rng + ?Sized>(rng: &mut R, four_probability: f64) -> u32 {
    if rng.gen::<f64>() < four_probability {
        4
    } else {
        2
    }
}

/// Pick one of `empty` uniformly. `None` only when there is nothing to pick.
#[inline]
pub fn pick_empty<R: Rng + ?Sized>(rng: &mut R, empty: &[Cell]) -> Option<Cell> {
    if empty.is_empty() {
        return None;
    }
    Some(empty[rng.gen_range(0..empty.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn it_converges_to_ninety_ten() {
        let mut rng = StdRng::seed_from_u64(2048);
        let trials = 20_000;
        let fours = (0..trials)
            .filter(|_| starting_value(&mut rng, DEFAULT_FOUR_PROBABILITY) == 4)
            .count();
        let ratio = fours as f64 / trials as f64;
        assert!((0.08..0.12).contains(&ratio), "four ratio {ratio}");
    }

    #[test]
    fn it_respects_extreme_probabilities() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..100).all(|_| starting_value(&mut rng, 0.0) == 2));
        assert!((0..100).all(|_| starting_value(&mut rng, 1.0) == 4));
    }

    #[test]
    fn it_picks_only_listed_cells() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(pick_empty(&mut rng, &[]), None);
        let only = [Cell::new(2, 1)];
        assert_eq!(pick_empty(&mut rng, &only), Some(Cell::new(2, 1)));
    }

    #[test]
    fn it_picks_uniformly() {
        let mut rng = StdRng::seed_from_u64(5);
        let cells: Vec<Cell> = Cell::all().collect();
        let mut counts = [0usize; 16];
        for _ in 0..16_000 {
            let c = pick_empty(&mut rng, &cells).unwrap();
            counts[c.index()] += 1;
        }
        assert!(counts.iter().all(|&n| (800..1200).contains(&n)), "{counts:?}");
    }
}
