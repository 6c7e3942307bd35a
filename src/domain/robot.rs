//! Two-wheeled differential-drive robot with a front and a right-facing distance sensor and a
//! two-axis magnetometer.

use std::{
    f64::consts::{FRAC_PI_2, PI},
    fmt,
};

use nalgebra::{Matrix3x2, Vector2, Vector3};

use super::{error::ensure_positive, Angle, DomainError, Environment, Position};

/// Maps a dimensionless duty value to the wheel's angular speed in rad/s (100 rpm at full duty).
pub fn pwm_to_rotational_speed(duty: f64) -> f64 {
    duty * 100.0 * 2.0 * PI / 60.0
}

/// North-south and east-west components of the field seen by a robot heading at `heading`.
pub fn magnetic_field(heading: Angle) -> (f64, f64) {
    (heading.sin(), heading.cos())
}

/// Duty values applied to the left and right wheel for one integration step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Command {
    pub left: f64,
    pub right: f64,
}

impl Command {
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Command `step / steps` of the way from `self` to `target`.
    pub fn ramp(self, target: Command, step: usize, steps: usize) -> Command {
        let (step, steps) = (step as f64, steps as f64);
        Command {
            left: self.left + (target.left - self.left) * step / steps,
            right: self.right + (target.right - self.right) * step / steps,
        }
    }

    fn wheel_speeds(self) -> Vector2<f64> {
        Vector2::new(
            pwm_to_rotational_speed(self.left),
            pwm_to_rotational_speed(self.right),
        )
    }
}

/// Drive train geometry. Lengths share the unit of the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotConfig {
    /// Distance between the two wheels.
    pub track_width: f64,
    pub wheel_diameter: f64,
}

impl RobotConfig {
    pub const fn new(track_width: f64, wheel_diameter: f64) -> Self {
        RobotConfig {
            track_width,
            wheel_diameter,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        ensure_positive("track width", self.track_width)?;
        ensure_positive("wheel diameter", self.wheel_diameter)?;
        Ok(())
    }
}

/// Values derived from the pose and the last applied command.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SensorReadings {
    pub front_distance: f64,
    pub right_distance: f64,
    /// Angular velocity of the body in rad/s.
    pub rotational_speed: f64,
    pub ns_field: f64,
    pub ew_field: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RobotState {
    environment: Environment,
    config: RobotConfig,
    position: Position,
    heading: Angle,
    readings: SensorReadings,
}

impl RobotState {
    pub fn new(
        environment: Environment,
        config: RobotConfig,
        position: Position,
        heading: Angle,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        if !(position.x().is_finite() && position.y().is_finite() && f64::from(heading).is_finite())
        {
            return Err(DomainError::InvalidConfiguration(format!(
                "initial pose must be finite, got {position:?} {heading:?}"
            )));
        }

        let mut robot = Self {
            environment,
            config,
            position,
            heading: heading.wrapped(),
            readings: SensorReadings::default(),
        };
        robot.measure();
        Ok(robot)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Heading in `[0, 2π)`.
    pub fn heading(&self) -> Angle {
        self.heading
    }

    pub fn readings(&self) -> SensorReadings {
        self.readings
    }

    pub fn front_distance(&self) -> f64 {
        self.readings.front_distance
    }

    pub fn right_distance(&self) -> f64 {
        self.readings.right_distance
    }

    pub fn rotational_speed(&self) -> f64 {
        self.readings.rotational_speed
    }

    pub fn ns_field(&self) -> f64 {
        self.readings.ns_field
    }

    pub fn ew_field(&self) -> f64 {
        self.readings.ew_field
    }

    /// Advances the pose by one explicit Euler step of length `dt` and refreshes all readings.
    ///
    /// The robot is not stopped at the walls. Both commands and `dt` must be finite.
    pub fn integrate_step(&mut self, command: Command, dt: f64) {
        let q = self.velocity_vector(command.wheel_speeds());
        let linear_velocity_x = q[0];
        let linear_velocity_y = q[1];
        let angular_velocity = q[2];

        self.position = Position::new(
            self.position.x() + linear_velocity_x * dt,
            self.position.y() + linear_velocity_y * dt,
        );
        self.heading = Angle::new(f64::from(self.heading) + angular_velocity * dt).wrapped();
        self.readings.rotational_speed = angular_velocity;
        self.measure();
    }

    /// `(ẋ, ẏ, θ̇)` for the given wheel angular speeds `(left, right)` at the current heading.
    fn velocity_vector(&self, wheel_speeds: Vector2<f64>) -> Vector3<f64> {
        let radius = self.config.wheel_diameter / 2.0;
        let track_width = self.config.track_width;
        let b = Matrix3x2::new(
            radius * self.heading.cos() / 2.0,
            radius * self.heading.cos() / 2.0,
            radius * self.heading.sin() / 2.0,
            radius * self.heading.sin() / 2.0,
            -radius / track_width,
            radius / track_width,
        );
        b * wheel_speeds
    }

    fn measure(&mut self) {
        let (ns_field, ew_field) = magnetic_field(self.heading);
        self.readings = SensorReadings {
            front_distance: self
                .environment
                .distance_along_ray(self.position, self.heading),
            right_distance: self
                .environment
                .distance_along_ray(self.position, self.heading - Angle::new(FRAC_PI_2)),
            rotational_speed: self.readings.rotational_speed,
            ns_field,
            ew_field,
        };
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "x, y, theta                = {}, {}, {}",
            self.position.x(),
            self.position.y(),
            f64::from(self.heading)
        )?;
        writeln!(f, "front distance             = {}", self.front_distance())?;
        writeln!(f, "right distance             = {}", self.right_distance())?;
        writeln!(f, "rotational speed           = {}", self.rotational_speed())?;
        writeln!(f, "north-south magnetic field = {}", self.ns_field())?;
        write!(f, "east-west magnetic field   = {}", self.ew_field())
    }
}
