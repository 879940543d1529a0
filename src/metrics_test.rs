// src/metrics_test.rs

#[cfg(test)]
mod tests {
    use crate::metrics::*;
    use crate::position::Position;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn random_layout(rng: &mut StdRng, n: usize) -> Vec<Position> {
        (0..n)
            .map(|_| {
                Position::new(
                    rng.gen_range(-500.0..500.0),
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-500.0..500.0),
                )
            })
            .collect()
    }

    // --- distance_metrics ---

    #[test]
    fn test_right_triangle_layout() {
        let positions = [
            Position::new(0.0, 0.0, 0.0),
            Position::new(3.0, 4.0, 0.0),
            Position::new(0.0, 0.0, 5.0),
        ];
        let m = distance_metrics(&positions).unwrap();

        // Pairs: 5, 5, sqrt(50)
        let far = 50.0f32.sqrt();
        assert_eq!(m.nearest, 5.0);
        assert_eq!(m.furthest, far);
        assert!((m.average - (10.0 + far) / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_two_positions() {
        let positions = [Position::new(1.0, 1.0, 1.0), Position::new(1.0, 1.0, 3.0)];
        let m = distance_metrics(&positions).unwrap();
        assert_eq!(m.nearest, 2.0);
        assert_eq!(m.furthest, 2.0);
        assert_eq!(m.average, 2.0);
    }

    #[test]
    fn test_coincident_positions() {
        let p = Position::new(7.0, -2.0, 4.5);
        let m = distance_metrics(&[p, p, p]).unwrap();
        assert_eq!(m, DispersionMetrics { nearest: 0.0, furthest: 0.0, average: 0.0 });
    }

    #[test]
    fn test_insufficient_positions() {
        assert_eq!(
            distance_metrics(&[]),
            Err(MetricsError::InsufficientPositions { count: 0 })
        );
        assert_eq!(
            distance_metrics(&[Position::new(1.0, 2.0, 3.0)]),
            Err(MetricsError::InsufficientPositions { count: 1 })
        );
    }

    #[test]
    fn test_non_finite_distance() {
        let nan = [
            Position::new(f32::NAN, 0.0, 0.0),
            Position::new(1.0, 0.0, 0.0),
            Position::new(2.0, 0.0, 0.0),
        ];
        assert_eq!(
            distance_metrics(&nan),
            Err(MetricsError::NonFiniteDistance { first: 0, second: 1 })
        );

        let overflow = [
            Position::new(0.0, 0.0, 0.0),
            Position::new(1.0, 0.0, 0.0),
            Position::new(f32::MAX, f32::MAX, 0.0),
        ];
        assert_eq!(
            distance_metrics(&overflow),
            Err(MetricsError::NonFiniteDistance { first: 0, second: 2 })
        );
    }

    #[test]
    fn test_ordering_invariant_holds_for_random_layouts() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for n in 2..=20 {
            for _ in 0..25 {
                let positions = random_layout(&mut rng, n);
                let m = distance_metrics(&positions).unwrap();
                assert!(m.nearest >= 0.0);
                assert!(
                    m.nearest <= m.average && m.average <= m.furthest,
                    "n={} violated ordering: {:?}",
                    n,
                    m
                );
            }
        }
    }

    #[test]
    fn test_permutation_invariance() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let positions = random_layout(&mut rng, 15);
            let base = distance_metrics(&positions).unwrap();

            let mut shuffled = positions.clone();
            shuffled.shuffle(&mut rng);
            let permuted = distance_metrics(&shuffled).unwrap();

            assert_eq!(base.nearest, permuted.nearest);
            assert_eq!(base.furthest, permuted.furthest);
            // Summation order changes, so allow rounding in the last place
            assert!((base.average - permuted.average).abs() <= base.average * 1e-6);
        }
    }

    #[test]
    fn test_distance_metrics_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let positions = random_layout(&mut rng, 15);
        let a = distance_metrics(&positions).unwrap();
        let b = distance_metrics(&positions).unwrap();
        assert_eq!(a.nearest.to_bits(), b.nearest.to_bits());
        assert_eq!(a.furthest.to_bits(), b.furthest.to_bits());
        assert_eq!(a.average.to_bits(), b.average.to_bits());
    }

    // --- aggregate ---

    #[test]
    fn test_aggregate_uniform_input_is_unchanged() {
        let m = LevelMetrics { nearest: 12.345, furthest: 678.9, average: 301.25 };
        for k in 1..=9 {
            let per_level = vec![m; k];
            assert_eq!(aggregate(&per_level).unwrap(), m, "k={}", k);
        }
    }

    #[test]
    fn test_aggregate_field_wise_mean() {
        let per_level = [
            LevelMetrics { nearest: 1.0, furthest: 10.0, average: 4.0 },
            LevelMetrics { nearest: 3.0, furthest: 20.0, average: 8.0 },
        ];
        let overall = aggregate(&per_level).unwrap();
        assert_eq!(overall, SeedMetrics { nearest: 2.0, furthest: 15.0, average: 6.0 });
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(&[]), Err(MetricsError::NoLevelsEvaluated));
    }

    #[test]
    fn test_aggregate_deterministic() {
        let mut rng = StdRng::seed_from_u64(99);
        let per_level: Vec<LevelMetrics> = (0..9)
            .map(|_| distance_metrics(&random_layout(&mut rng, 15)).unwrap())
            .collect();
        let a = aggregate(&per_level).unwrap();
        let b = aggregate(&per_level).unwrap();
        assert_eq!(a.average.to_bits(), b.average.to_bits());
        assert_eq!(a.nearest.to_bits(), b.nearest.to_bits());
        assert_eq!(a.furthest.to_bits(), b.furthest.to_bits());
    }
}
