//! The domain module encapsulates the simulation core. It defines the `RobotState` and
//! `Environment` entities, the ray casting that derives the distance sensor readings, and the
//! fixed-step driver running a robot through a command sequence.
//!
//! Nothing in here performs I/O; command sources and result sinks live outside this module.

mod basis;
mod environment;
mod error;
mod robot;
pub mod simulation;

pub use basis::{Angle, Position};
pub use environment::Environment;
pub use error::DomainError;
pub use robot::{
    magnetic_field, pwm_to_rotational_speed, Command, RobotConfig, RobotState, SensorReadings,
};
pub use simulation::{run, KeyframeSchedule, Trajectory, TrajectorySample};
