pub mod grid_optimizer;
pub mod interactor;
pub mod optimizer;
pub mod pairing;

pub use grid_optimizer::GridOptimizer;
pub use interactor::{Collider, ColliderFn, Interactor};
pub use optimizer::{NaiveOptimizer, Optimizer};
pub use pairing::Pairing;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::math::vec2::Vec2;
    use crate::objects::{BeingId, Body, Handle};
    use crate::shapes::{Circle, Rectangle};

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(BeingId, BeingId)>,
    }

    impl Collider<Body, Body> for Recorder {
        fn handle(&mut self, a: &mut Body, b: &mut Body) -> Result<()> {
            self.seen.push((a.id(), b.id()));
            Ok(())
        }
    }

    fn scatter(count: usize, seed: u64) -> Vec<Handle<Body>> {
        // Small LCG so the layout is reproducible without extra dependencies.
        let mut state = seed;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as f64) / ((1u64 << 31) as f64)
        };
        (0..count)
            .map(|i| {
                let position = Vec2::new(next() * 40.0 - 20.0, next() * 40.0 - 20.0);
                let body = if i % 2 == 0 {
                    Body::new(position, Circle::new(0.5 + next() * 1.5).unwrap())
                } else {
                    Body::new(
                        position,
                        Rectangle::from_half_extents(0.5 + next(), 0.5 + next()).unwrap(),
                    )
                };
                Handle::new(body)
            })
            .collect()
    }

    fn run_pass(
        optimizer: Option<&mut dyn Optimizer<Body, Body>>,
        group_a: &[Handle<Body>],
        group_b: &[Handle<Body>],
    ) -> Vec<(BeingId, BeingId)> {
        let mut recorder = Recorder::default();
        let mut deferred = Vec::new();
        {
            let mut pairing = Pairing::new(&mut recorder, group_b, true, &mut deferred);
            match optimizer {
                Some(optimizer) => {
                    optimizer.prepare(group_b).unwrap();
                    for a in group_a {
                        optimizer.detect(a, &mut pairing).unwrap();
                    }
                }
                None => {
                    for a in group_a {
                        for b in group_b {
                            pairing.interact(a, b).unwrap();
                        }
                    }
                }
            }
        }
        assert!(deferred.is_empty());
        recorder.seen
    }

    #[test]
    fn test_optimizers_match_exhaustive_dispatch() {
        let group_a = scatter(30, 7);
        let group_b = scatter(60, 11);

        let exhaustive = run_pass(None, &group_a, &group_b);
        let naive = run_pass(Some(&mut NaiveOptimizer), &group_a, &group_b);
        let mut grid_optimizer = GridOptimizer::new(3.0).unwrap();
        let grid = run_pass(Some(&mut grid_optimizer), &group_a, &group_b);

        assert!(!exhaustive.is_empty(), "layout should produce some overlaps");
        assert_eq!(naive, exhaustive);
        assert_eq!(grid, exhaustive);
    }

    #[test]
    fn test_grid_cell_size_does_not_change_result() {
        let group = scatter(40, 3);
        let reference = run_pass(None, &group, &group);
        for cell_size in [0.5, 2.0, 100.0] {
            let mut grid_optimizer = GridOptimizer::new(cell_size).unwrap();
            assert_eq!(run_pass(Some(&mut grid_optimizer), &group, &group), reference);
        }
    }

    #[test]
    fn test_self_pairs_are_skipped() {
        let group = scatter(5, 1);
        let pairs = run_pass(Some(&mut NaiveOptimizer), &group, &group);
        assert!(pairs.iter().all(|(a, b)| a != b));
    }

    #[test]
    fn test_deferred_handles_wait_for_the_caller() {
        let a = Handle::new(Body::new(Vec2::ZERO, Circle::new(1.0).unwrap()));
        let b = Handle::new(Body::new(Vec2::new(1.0, 0.0), Circle::new(1.0).unwrap()));
        let group_b = vec![b.clone()];
        let mut recorder = Recorder::default();
        let mut deferred = Vec::new();
        {
            let mut pairing = Pairing::new(&mut recorder, &group_b, false, &mut deferred);
            assert!(pairing.interact(&a, &b).unwrap());
            assert_eq!(pairing.counts(), (1, 1));
        }
        assert!(recorder.seen.is_empty());
        assert_eq!(deferred.len(), 1);
        assert_eq!(deferred[0].0.id(), a.id());
    }
}
