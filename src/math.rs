use std::num::NonZeroU32;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Immutable complex number. Every operation returns a new value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    re: f64,
    im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    pub fn real(&self) -> f64 {
        self.re
    }

    pub fn imaginary(&self) -> f64 {
        self.im
    }

    pub fn sum(&self, other: Complex) -> Complex {
        Complex::new(self.re + other.re, self.im + other.im)
    }

    pub fn difference(&self, other: Complex) -> Complex {
        Complex::new(self.re - other.re, self.im - other.im)
    }

    pub fn product(&self, other: Complex) -> Complex {
        Complex::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    /// `self^exponent` by repeated multiplication: `exponent - 1` products,
    /// left to right. Kept linear so rounding matches step-by-step squaring.
    pub fn power(&self, exponent: NonZeroU32) -> Complex {
        let mut result = *self;
        for _ in 1..exponent.get() {
            result = result.product(*self);
        }
        result
    }

    pub fn abs_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn modulus(&self) -> f64 {
        self.abs_sq().sqrt()
    }
}

impl Add for Complex {
    type Output = Complex;

    fn add(self, rhs: Complex) -> Complex {
        self.sum(rhs)
    }
}

impl Sub for Complex {
    type Output = Complex;

    fn sub(self, rhs: Complex) -> Complex {
        self.difference(rhs)
    }
}

impl Mul for Complex {
    type Output = Complex;

    fn mul(self, rhs: Complex) -> Complex {
        self.product(rhs)
    }
}
