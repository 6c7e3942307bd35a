//! Planar simulation of a two-wheeled differential-drive robot in a rectangular arena.
//!
//! The [`domain`] module holds the kinematic integrator, the ray casting behind the distance
//! sensors and the simulation driver. The remaining modules connect it to the outside world:
//! reading keyframe commands and recorded trajectories, comparing trajectories, charting them in
//! the terminal and loading the run configuration.


pub mod comparison;
pub mod domain;
pub mod io;
pub mod plot;
pub mod settings;
