//! Monte-Carlo point sets inside a footprint ellipse
//!
//! Points are drawn uniformly in the ellipse's bounding box and rejected when
//! they fall outside the ellipse. The first round draws twice as many points
//! as requested, which is enough on average since the ellipse covers π/4 of
//! its box, but not guaranteed. Every failed round doubles the draw size until
//! the attempt budget is spent.

use log::debug;
use rand::seq::index;
use rand::Rng;

use crate::coordinate::{Ellipse, Point};
use crate::errors::{FootprintError, FootprintResult};

/// Default number of rejection rounds before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Oversampling factor of the first rejection round
const INITIAL_OVERSAMPLING: usize = 2;

/// Sample points produced for one footprint
pub type SampleSet = Vec<Point>;

/// Rejection sampler for points inside an ellipse
#[derive(Debug, Clone, Copy)]
pub struct EllipseSampler {
    max_attempts: u32,
}

impl EllipseSampler {
    /// Create a sampler with a custom retry budget
    pub fn new(max_attempts: u32) -> Self {
        EllipseSampler { max_attempts: max_attempts.max(1) }
    }

    /// Maximum number of rejection rounds
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draw exactly `n` points uniformly distributed inside `ellipse`
    ///
    /// # Arguments
    /// * `ellipse` - Footprint ellipse
    /// * `n` - Number of points to return
    /// * `rng` - Random source; pass a seeded generator for reproducible sets
    ///
    /// # Returns
    /// `n` points, all satisfying the ellipse membership test, or
    /// `InsufficientSamples` when the ellipse is degenerate or the retry budget
    /// runs out.
    pub fn sample<R: Rng + ?Sized>(&self, ellipse: &Ellipse, n: usize, rng: &mut R) -> FootprintResult<SampleSet> {
        if n == 0 {
            return Ok(Vec::new());
        }

        if ellipse.is_degenerate() {
            return Err(FootprintError::InsufficientSamples {
                requested: n,
                obtained: 0,
                attempts: 0,
            });
        }

        let bbox = ellipse.bounding_box();
        let (width, height) = (bbox.width(), bbox.height());

        let mut factor = INITIAL_OVERSAMPLING;
        let mut best = 0;

        for attempt in 1..=self.max_attempts {
            let draws = n.saturating_mul(factor);
            let mut inside = Vec::with_capacity(draws);

            for _ in 0..draws {
                let point = Point::new(
                    bbox.min_x + rng.gen::<f64>() * width,
                    bbox.min_y + rng.gen::<f64>() * height,
                );
                if ellipse.contains(&point) {
                    inside.push(point);
                }
            }

            if inside.len() >= n {
                if inside.len() == n {
                    return Ok(inside);
                }
                let chosen = index::sample(rng, inside.len(), n);
                return Ok(chosen.iter().map(|i| inside[i]).collect());
            }

            debug!("Sampling round {} kept {} of {} draws, {} needed",
                   attempt, inside.len(), draws, n);

            best = best.max(inside.len());
            factor = factor.saturating_mul(2);
        }

        Err(FootprintError::InsufficientSamples {
            requested: n,
            obtained: best,
            attempts: self.max_attempts,
        })
    }
}

impl Default for EllipseSampler {
    fn default() -> Self {
        EllipseSampler::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Always returns the largest value, which puts every draw in the box corner
    struct CornerRng;

    impl RngCore for CornerRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xFF);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_points_inside_random_ellipses() {
        let mut rng = StdRng::seed_from_u64(7);
        let sampler = EllipseSampler::default();

        for _ in 0..25 {
            let ellipse = Ellipse::new(
                Point::new(rng.gen_range(-180.0..180.0), rng.gen_range(-60.0..60.0)),
                rng.gen_range(1e-5..1.0),
                rng.gen_range(1e-5..1.0),
            );

            for n in [1, 10, 2000] {
                let points = sampler.sample(&ellipse, n, &mut rng).unwrap();
                assert_eq!(points.len(), n);
                for p in &points {
                    assert!(ellipse.normalized_distance_sq(p) <= 1.0,
                            "point {:?} outside {:?}", p, ellipse);
                }
            }
        }
    }

    #[test]
    fn test_high_eccentricity() {
        let mut rng = StdRng::seed_from_u64(11);
        let ellipse = Ellipse::new(Point::new(0.0, 0.0), 1000.0, 1e-6);
        let points = EllipseSampler::default().sample(&ellipse, 500, &mut rng).unwrap();
        assert_eq!(points.len(), 500);
        assert!(points.iter().all(|p| ellipse.contains(p)));
    }

    #[test]
    fn test_samples_are_centered() {
        let mut rng = StdRng::seed_from_u64(3);
        let ellipse = Ellipse::new(Point::new(5.0, -2.0), 2.0, 1.0);
        let points = EllipseSampler::default().sample(&ellipse, 2000, &mut rng).unwrap();

        let mean_x = points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64;
        let mean_y = points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64;
        assert!((mean_x - 5.0).abs() < 0.1);
        assert!((mean_y + 2.0).abs() < 0.05);
    }

    #[test]
    fn test_zero_points() {
        let mut rng = StdRng::seed_from_u64(0);
        let ellipse = Ellipse::new(Point::new(0.0, 0.0), 1.0, 1.0);
        assert!(EllipseSampler::default().sample(&ellipse, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_degenerate_ellipse() {
        let mut rng = StdRng::seed_from_u64(0);
        let ellipse = Ellipse::new(Point::new(0.0, 0.0), 0.0, 1.0);
        match EllipseSampler::default().sample(&ellipse, 10, &mut rng) {
            Err(FootprintError::InsufficientSamples { requested, attempts, .. }) => {
                assert_eq!(requested, 10);
                assert_eq!(attempts, 0);
            }
            other => panic!("expected InsufficientSamples, got {:?}", other),
        }
    }

    #[test]
    fn test_retry_budget_exhausted() {
        let ellipse = Ellipse::new(Point::new(0.0, 0.0), 1.0, 1.0);
        let sampler = EllipseSampler::new(3);
        match sampler.sample(&ellipse, 5, &mut CornerRng) {
            Err(FootprintError::InsufficientSamples { requested, obtained, attempts }) => {
                assert_eq!(requested, 5);
                assert_eq!(obtained, 0);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected InsufficientSamples, got {:?}", other),
        }
    }
}
