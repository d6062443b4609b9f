//! One-rep maximum estimation (Brzycki)

const MAX_REPS: u32 = 36;

/// Estimated 1RM from a submaximal set, rounded to 2 decimals.
///
/// The formula is only meaningful for 1..=36 reps; anything else returns 0.
pub fn estimate_one_rep_max(load: f64, reps: u32) -> f64 {
    if !(1..=MAX_REPS).contains(&reps) {
        return 0.0;
    }
    let estimate = load / (1.0278 - 0.0278 * f64::from(reps));
    round2(estimate)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_reps() {
        assert_eq!(estimate_one_rep_max(100.0, 0), 0.0);
    }

    #[test]
    fn test_single_rep_is_load() {
        assert_eq!(estimate_one_rep_max(100.0, 1), 100.0);
    }

    #[test]
    fn test_eight_reps() {
        // 60 / (1.0278 - 0.2224) = 74.497...
        assert_eq!(estimate_one_rep_max(60.0, 8), 74.5);
    }

    #[test]
    fn test_more_reps_higher_estimate() {
        let mut previous = estimate_one_rep_max(80.0, 1);
        for reps in 2..=36 {
            let current = estimate_one_rep_max(80.0, reps);
            assert!(current > previous, "reps {}: {} <= {}", reps, current, previous);
            previous = current;
        }
    }

    #[test]
    fn test_two_decimals() {
        for (load, reps) in [(62.5, 7), (101.3, 11), (17.0, 3)] {
            let v = estimate_one_rep_max(load, reps);
            let scaled = v * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6, "{} not rounded", v);
        }
    }

    #[test]
    fn test_beyond_formula_range() {
        assert_eq!(estimate_one_rep_max(60.0, 37), 0.0);
        assert_eq!(estimate_one_rep_max(60.0, 40), 0.0);
    }

    #[test]
    fn test_zero_load() {
        assert_eq!(estimate_one_rep_max(0.0, 10), 0.0);
    }
}
