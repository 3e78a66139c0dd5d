// Monte-Carlo estimate of the Mandelbrot set's area inside a sampling rectangle

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fractal::Mandelbrot;
use crate::math::Complex;
use crate::random::{RngSource, UniformSource, uniform_in};

pub const AREA_ITERATION_LIMIT: u32 = 10_000;

/// Half-open rectangle `[real_low, real_high) x [imaginary_low, imaginary_high)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingRegion {
    pub real_low: f64,
    pub real_high: f64,
    pub imaginary_low: f64,
    pub imaginary_high: f64,
}

impl Default for SamplingRegion {
    fn default() -> Self {
        SamplingRegion {
            real_low: -2.0,
            real_high: 0.5,
            imaginary_low: 0.5,
            imaginary_high: 1.125,
        }
    }
}

impl SamplingRegion {
    pub fn validate(&self) -> Result<()> {
        let axes = [
            ("real", self.real_low, self.real_high),
            ("imaginary", self.imaginary_low, self.imaginary_high),
        ];
        for (axis, low, high) in axes {
            if !(low.is_finite() && high.is_finite() && low < high) {
                return Err(Error::InvalidConfiguration(format!(
                    "sampling {} interval [{}, {}) is empty or not finite",
                    axis, low, high
                )));
            }
        }
        Ok(())
    }

    pub fn area(&self) -> f64 {
        (self.real_high - self.real_low) * (self.imaginary_high - self.imaginary_low)
    }

    /// One uniformly drawn point, real part first.
    pub fn sample<S: UniformSource + ?Sized>(&self, source: &mut S) -> Complex {
        let re = uniform_in(source, self.real_low, self.real_high);
        let im = uniform_in(source, self.imaginary_low, self.imaginary_high);
        Complex::new(re, im)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaEstimate {
    pub area: f64,
    pub standard_error: f64,
}

pub fn generate_sample_batch<S: UniformSource + ?Sized>(
    region: &SamplingRegion,
    count: usize,
    source: &mut S,
) -> Vec<Complex> {
    (0..count).map(|_| region.sample(source)).collect()
}

pub fn count_inside(points: &[Complex], mandelbrot: &Mandelbrot) -> usize {
    points.iter().filter(|&&c| mandelbrot.converges(c)).count()
}

#[derive(Clone, Copy, Debug)]
pub struct AreaEstimator {
    region: SamplingRegion,
    mandelbrot: Mandelbrot,
}

impl Default for AreaEstimator {
    fn default() -> Self {
        AreaEstimator {
            region: SamplingRegion::default(),
            mandelbrot: Mandelbrot::new(AREA_ITERATION_LIMIT),
        }
    }
}

impl AreaEstimator {
    pub fn new(region: SamplingRegion, iteration_limit: u32) -> Result<Self> {
        region.validate()?;
        Ok(AreaEstimator {
            region,
            mandelbrot: Mandelbrot::new(iteration_limit),
        })
    }

    pub fn region(&self) -> &SamplingRegion {
        &self.region
    }

    pub fn iteration_limit(&self) -> u32 {
        self.mandelbrot.limit()
    }

    /// Estimate from `sample_count` unseeded draws.
    pub fn estimate(&self, sample_count: usize) -> Result<AreaEstimate> {
        self.estimate_with(sample_count, &mut RngSource::thread())
    }

    /// `area = region_area * inside / n`, `standard_error = area / sqrt(n)`.
    pub fn estimate_with<S: UniformSource + ?Sized>(
        &self,
        sample_count: usize,
        source: &mut S,
    ) -> Result<AreaEstimate> {
        if sample_count < 1 {
            return Err(Error::InvalidArgument(
                "sample count must be at least 1".to_string(),
            ));
        }

        info!(
            samples = sample_count,
            iteration_limit = self.mandelbrot.limit(),
            "estimating area"
        );

        let batch = generate_sample_batch(&self.region, sample_count, source);
        let inside = count_inside(&batch, &self.mandelbrot);
        debug!(inside, samples = sample_count, "classified sample batch");

        let n = sample_count as f64;
        let area = self.region.area() * inside as f64 / n;
        let standard_error = area / n.sqrt();

        info!(area, standard_error, "area estimate ready");
        Ok(AreaEstimate { area, standard_error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of unit draws, wrapping around.
    struct Script {
        values: Vec<f64>,
        next: usize,
    }

    impl Script {
        fn new(values: &[f64]) -> Self {
            Script { values: values.to_vec(), next: 0 }
        }
    }

    impl UniformSource for Script {
        fn next_unit(&mut self) -> f64 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }
    }

    // maps to -0.122561 + 0.744862i, centre of the period-3 bulb
    const INSIDE: [f64; 2] = [0.7509756, 0.3917792];
    // maps to -2 + 0.5i, escapes on the first step
    const OUTSIDE: [f64; 2] = [0.0, 0.0];

    #[test]
    fn reference_region_area() {
        assert_eq!(SamplingRegion::default().area(), 1.5625);
    }

    #[test]
    fn samples_real_then_imaginary() {
        let region = SamplingRegion::default();
        let c = region.sample(&mut Script::new(&[0.5, 0.5]));
        assert_eq!((c.real(), c.imaginary()), (-0.75, 0.8125));
    }

    #[test]
    fn batch_has_requested_length() {
        let batch = generate_sample_batch(&SamplingRegion::default(), 7, &mut Script::new(&[0.25]));
        assert_eq!(batch.len(), 7);
        assert!(batch.iter().all(|c| c.real() == -1.375 && c.imaginary() == 0.65625));
    }

    #[test]
    fn counts_inside_points() {
        let region = SamplingRegion::default();
        let mut script = Script::new(&[INSIDE[0], INSIDE[1], OUTSIDE[0], OUTSIDE[1]]);
        let batch = generate_sample_batch(&region, 6, &mut script);
        assert_eq!(count_inside(&batch, &Mandelbrot::new(AREA_ITERATION_LIMIT)), 3);
    }

    #[test]
    fn half_inside_gives_half_the_rectangle() {
        let mut script = Script::new(&[INSIDE[0], INSIDE[1], OUTSIDE[0], OUTSIDE[1]]);
        let estimate = AreaEstimator::default().estimate_with(4, &mut script).unwrap();
        assert_eq!(estimate, AreaEstimate { area: 0.78125, standard_error: 0.390625 });
    }

    #[test]
    fn all_outside_gives_zero() {
        let estimate = AreaEstimator::default()
            .estimate_with(10, &mut Script::new(&OUTSIDE))
            .unwrap();
        assert_eq!(estimate, AreaEstimate { area: 0.0, standard_error: 0.0 });
    }

    #[test]
    fn single_inside_sample_fills_rectangle() {
        let estimate = AreaEstimator::default()
            .estimate_with(1, &mut Script::new(&INSIDE))
            .unwrap();
        assert_eq!(estimate.area, 1.5625);
        assert_eq!(estimate.standard_error, 1.5625);
    }

    #[test]
    fn zero_samples_rejected() {
        let result = AreaEstimator::default().estimate(0);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn degenerate_region_rejected() {
        let region = SamplingRegion { real_high: -2.0, ..SamplingRegion::default() };
        assert!(matches!(
            AreaEstimator::new(region, 100),
            Err(Error::InvalidConfiguration(_))
        ));
        let region = SamplingRegion { imaginary_low: f64::NAN, ..SamplingRegion::default() };
        assert!(region.validate().is_err());
    }

    #[test]
    fn random_estimate_stays_in_rectangle() {
        let estimator = AreaEstimator::new(SamplingRegion::default(), 200).unwrap();
        let estimate = estimator.estimate(500).unwrap();
        assert!((0.0..=1.5625).contains(&estimate.area));
        assert!(estimate.standard_error >= 0.0);
    }

    #[test]
    fn seeded_estimates_repeat() {
        let estimator = AreaEstimator::new(SamplingRegion::default(), 200).unwrap();
        let a = estimator.estimate_with(300, &mut RngSource::seeded(7)).unwrap();
        let b = estimator.estimate_with(300, &mut RngSource::seeded(7)).unwrap();
        assert_eq!(a, b);
    }
}
