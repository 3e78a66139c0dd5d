use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::math::Complex;

pub const ESCAPE_RADIUS: f64 = 2.0;

const SQUARE: NonZeroU32 = NonZeroU32::new(2).unwrap();

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationResult {
    pub converges: bool,
    pub iterations: u32,
}

/// Escape-time iterator for `z -> z^2 + c`.
///
/// The orbit starts at `z = c` rather than at the origin, so every result
/// is one step ahead of the textbook iteration. The cap is fixed at
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mandelbrot {
    limit: u32,
}

impl Mandelbrot {
    pub fn new(limit: u32) -> Self {
        Mandelbrot { limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn iterate(&self, c: Complex) -> IterationResult {
        let mut z = c;
        let mut iterations = 0;
        let mut diverges = false;

        while !diverges && iterations < self.limit {
            z = z.power(SQUARE).sum(c);
            // NaN never compares <= so it counts as escaped
            if !(z.modulus() <= ESCAPE_RADIUS) {
                diverges = true;
            }
            iterations += 1;
        }

        IterationResult { converges: !diverges, iterations }
    }

    pub fn converges(&self, c: Complex) -> bool {
        self.iterate(c).converges
    }
}

impl TryFrom<i64> for Mandelbrot {
    type Error = Error;

    fn try_from(limit: i64) -> Result<Self, Self::Error> {
        u32::try_from(limit)
            .map(Mandelbrot::new)
            .map_err(|_| Error::InvalidConfiguration(format!(
                "iteration limit must be between 0 and {}, got {}",
                u32::MAX,
                limit
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_escapes_after_four_steps() {
        let result = Mandelbrot::new(1000).iterate(Complex::new(0.5, 0.0));
        assert_eq!(result, IterationResult { converges: false, iterations: 4 });
    }

    #[test]
    fn origin_never_escapes() {
        let result = Mandelbrot::new(250).iterate(Complex::ZERO);
        assert_eq!(result, IterationResult { converges: true, iterations: 250 });
    }

    #[test]
    fn zero_limit_reports_convergent_without_work() {
        let m = Mandelbrot::new(0);
        for c in [Complex::ZERO, Complex::new(10.0, -10.0), Complex::new(0.5, 0.0)] {
            assert_eq!(m.iterate(c), IterationResult { converges: true, iterations: 0 });
        }
    }

    #[test]
    fn far_point_escapes_on_first_step() {
        let result = Mandelbrot::new(100).iterate(Complex::new(3.0, 0.0));
        assert_eq!(result, IterationResult { converges: false, iterations: 1 });
    }

    #[test]
    fn minus_two_is_bounded() {
        // -2 -> 2 -> 2 -> ... stays exactly on the radius
        assert!(Mandelbrot::new(500).converges(Complex::new(-2.0, 0.0)));
    }

    #[test]
    fn non_finite_input_escapes() {
        let m = Mandelbrot::new(10);
        assert!(!m.converges(Complex::new(f64::INFINITY, 0.0)));
        assert!(!m.converges(Complex::new(f64::NAN, 0.0)));
    }

    #[test]
    fn repeated_calls_agree() {
        let m = Mandelbrot::new(100);
        let c = Complex::new(-0.75, 0.1);
        assert_eq!(m.iterate(c), m.iterate(c));
        assert_eq!(m.limit(), 100);
    }

    #[test]
    fn rejects_negative_limit() {
        assert!(matches!(Mandelbrot::try_from(-1), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(Mandelbrot::try_from(i64::MAX), Err(Error::InvalidConfiguration(_))));
        assert_eq!(Mandelbrot::try_from(10_000).unwrap().limit(), 10_000);
    }
}
