//! Basic building blocks.

use std::{
    f64::consts::{FRAC_PI_2, PI, TAU},
    ops::{Add, Sub},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn distance(&self, position: Self) -> f64 {
        ((self.x - position.x).powi(2) + (self.y - position.y).powi(2)).sqrt()
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

/// Angle in radians, measured counter-clockwise from the positive x-axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub fn new(radians: f64) -> Self {
        Self(radians)
    }

    pub fn to_deg(self) -> f64 {
        (self.0 * (180.0 / PI) + 360.0) % 360.0
    }

    /// Representative of the angle in `[0, 2π)`, using floored modulo.
    pub fn wrapped(self) -> Self {
        let radians = self.0.rem_euclid(TAU);
        // rem_euclid yields exactly TAU for tiny negative inputs
        Self(if radians >= TAU { 0.0 } else { radians })
    }

    /// Quarter turn the wrapped angle falls into: 0 for `[0, π/2)` up to 3 for `[3π/2, 2π)`.
    pub fn quadrant(self) -> usize {
        (self.wrapped().0 / FRAC_PI_2).floor() as usize % 4
    }

    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    pub fn cos(self) -> f64 {
        self.0.cos()
    }

    pub fn tan(self) -> f64 {
        self.0.tan()
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl From<Angle> for f64 {
    fn from(value: Angle) -> Self {
        value.0
    }
}
