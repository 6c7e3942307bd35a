//! Fixed-step simulation of a robot driven through a sequence of wheel commands.
//!
//! The state is sampled before a step is applied, every `sample_every` steps, so the first sample
//! is always the initial state at time zero.

use tracing::{debug, warn};

use super::{
    error::ensure_positive, Angle, Command, DomainError, Position, RobotState, SensorReadings,
};

/// State of the robot at `time`, recorded during a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    pub time: f64,
    pub position: Position,
    pub heading: Angle,
    pub readings: SensorReadings,
}

impl TrajectorySample {
    fn capture(time: f64, robot: &RobotState) -> Self {
        Self {
            time,
            position: robot.position(),
            heading: robot.heading(),
            readings: robot.readings(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
    steps: usize,
    elapsed: f64,
}

impl Trajectory {
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Number of integration steps applied.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Simulated time covered by the run.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Applies every command in order for `dt` each, sampling the state every `sample_every` steps.
pub fn run<I>(
    robot: &mut RobotState,
    commands: I,
    dt: f64,
    sample_every: usize,
) -> Result<Trajectory, DomainError>
where
    I: IntoIterator<Item = Command>,
{
    let dt = ensure_positive("time step", dt)?;
    if sample_every == 0 {
        return Err(DomainError::InvalidConfiguration(
            "sample interval must be at least one step".to_string(),
        ));
    }

    let mut trajectory = Trajectory::default();
    let mut inside = robot.environment().contains(robot.position());

    for (step, command) in commands.into_iter().enumerate() {
        let time = step as f64 * dt;
        if step % sample_every == 0 {
            trajectory.samples.push(TrajectorySample::capture(time, robot));
        }

        robot.integrate_step(command, dt);
        trajectory.steps = step + 1;

        let now_inside = robot.environment().contains(robot.position());
        if inside && !now_inside {
            warn!(
                time = time + dt,
                x = robot.position().x(),
                y = robot.position().y(),
                "robot left the arena"
            );
        } else if !inside && now_inside {
            debug!(time = time + dt, "robot entered the arena");
        }
        inside = now_inside;
    }

    trajectory.elapsed = trajectory.steps as f64 * dt;
    debug!(
        steps = trajectory.steps,
        samples = trajectory.samples.len(),
        elapsed = trajectory.elapsed,
        "simulation run finished"
    );
    Ok(trajectory)
}

/// Wheel commands given at evenly spaced keyframes, ramped linearly in between.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeSchedule {
    keyframes: Vec<Command>,
    interval: f64,
}

impl KeyframeSchedule {
    pub fn new(keyframes: Vec<Command>, interval: f64) -> Result<Self, DomainError> {
        if keyframes.len() < 2 {
            return Err(DomainError::InvalidConfiguration(format!(
                "at least two keyframes are required, got {}",
                keyframes.len()
            )));
        }
        Ok(Self {
            keyframes,
            interval: ensure_positive("keyframe interval", interval)?,
        })
    }

    pub fn keyframes(&self) -> &[Command] {
        &self.keyframes
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Integration steps of length `dt` between two keyframes.
    pub fn steps_per_interval(&self, dt: f64) -> Result<usize, DomainError> {
        let dt = ensure_positive("time step", dt)?;
        let steps = (self.interval / dt).round();
        if steps < 1.0 {
            return Err(DomainError::InvalidConfiguration(format!(
                "time step {dt} exceeds the keyframe interval {}",
                self.interval
            )));
        }
        Ok(steps as usize)
    }

    /// Per-step commands ramping from each keyframe towards the next. The last keyframe is only
    /// ever approached, never applied.
    pub fn commands(&self, dt: f64) -> Result<impl Iterator<Item = Command> + '_, DomainError> {
        let steps = self.steps_per_interval(dt)?;
        Ok(self.keyframes.windows(2).flat_map(move |pair| {
            let (start, end) = (pair[0], pair[1]);
            (0..steps).map(move |step| start.ramp(end, step, steps))
        }))
    }
}
