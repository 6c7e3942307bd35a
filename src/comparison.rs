//! Comparison of a simulated trajectory with a recorded one.
//!
//! Recorded trajectories come from external tools (e.g. a CAD motion study) and are sampled at
//! their own times, so the simulated trajectory is linearly interpolated at every recorded time.

use std::fmt;

use crate::domain::TrajectorySample;

/// Pose at `time` with the heading in degrees, the form trajectories are exchanged in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecordedSample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub theta_deg: f64,
}

impl RecordedSample {
    pub const fn new(time: f64, x: f64, y: f64, theta_deg: f64) -> Self {
        Self {
            time,
            x,
            y,
            theta_deg,
        }
    }
}

impl From<&TrajectorySample> for RecordedSample {
    fn from(sample: &TrajectorySample) -> Self {
        Self {
            time: sample.time,
            x: sample.position.x(),
            y: sample.position.y(),
            theta_deg: sample.heading.to_deg(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelError {
    pub rms: f64,
    pub max: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    pub x: ChannelError,
    pub y: ChannelError,
    /// Heading error in degrees, each difference taken the short way round.
    pub theta_deg: ChannelError,
    /// Number of recorded samples inside the simulated time span.
    pub matched: usize,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "matched samples = {}", self.matched)?;
        for (name, channel) in [("x", self.x), ("y", self.y), ("theta", self.theta_deg)] {
            writeln!(
                f,
                "{name:<5} rms = {:.4}, max = {:.4}",
                channel.rms, channel.max
            )?;
        }
        Ok(())
    }
}

/// Compares `simulated`, ordered by time, with every `recorded` sample inside its time span.
///
/// Returns `None` if no recorded sample overlaps the simulated span.
pub fn compare(simulated: &[RecordedSample], recorded: &[RecordedSample]) -> Option<Comparison> {
    let mut x = Accumulator::default();
    let mut y = Accumulator::default();
    let mut theta = Accumulator::default();

    for reference in recorded {
        let Some(estimate) = interpolate(simulated, reference.time) else {
            continue;
        };
        x.add(estimate.x - reference.x);
        y.add(estimate.y - reference.y);
        theta.add(wrap_deg(estimate.theta_deg - reference.theta_deg));
    }

    (x.count > 0).then(|| Comparison {
        x: x.finish(),
        y: y.finish(),
        theta_deg: theta.finish(),
        matched: x.count,
    })
}

/// Simulated pose at `time`, or `None` outside the simulated span.
pub fn interpolate(simulated: &[RecordedSample], time: f64) -> Option<RecordedSample> {
    let after = simulated.partition_point(|s| s.time <= time);
    if after == 0 {
        return None;
    }
    let lo = simulated[after - 1];
    if lo.time == time {
        return Some(lo);
    }
    let hi = simulated.get(after)?;

    let fraction = (time - lo.time) / (hi.time - lo.time);
    let theta_deg = lo.theta_deg + wrap_deg(hi.theta_deg - lo.theta_deg) * fraction;
    Some(RecordedSample {
        time,
        x: lo.x + (hi.x - lo.x) * fraction,
        y: lo.y + (hi.y - lo.y) * fraction,
        theta_deg: theta_deg.rem_euclid(360.0),
    })
}

/// Wraps an angle difference in degrees into `[-180, 180)`.
fn wrap_deg(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

#[derive(Default)]
struct Accumulator {
    sum_of_squares: f64,
    max: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, error: f64) {
        self.sum_of_squares += error.powi(2);
        self.max = self.max.max(error.abs());
        self.count += 1;
    }

    fn finish(&self) -> ChannelError {
        ChannelError {
            rms: (self.sum_of_squares / self.count as f64).sqrt(),
            max: self.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::{self, Command};
    use crate::tests::paperbot;

    const EPSILON: f64 = 1e-9;

    fn line(times: &[f64]) -> Vec<RecordedSample> {
        times
            .iter()
            .map(|&t| RecordedSample::new(t, 2.0 * t, -t, 10.0 * t))
            .collect()
    }

    #[test]
    fn test_compare_identical() {
        let samples = line(&[0.0, 1.0, 2.0]);
        let comparison = compare(&samples, &samples).unwrap();
        assert_eq!(comparison.matched, 3);
        assert_eq!(comparison.x, ChannelError::default());
        assert_eq!(comparison.y, ChannelError::default());
        assert_eq!(comparison.theta_deg, ChannelError::default());
    }

    #[test]
    fn test_compare_offset() {
        let simulated = line(&[0.0, 1.0, 2.0]);
        let recorded = vec![
            RecordedSample::new(0.5, 2.0, -0.5, 5.0),
            RecordedSample::new(1.5, 4.0, -1.5, 15.0),
        ];
        let comparison = compare(&simulated, &recorded).unwrap();
        assert_eq!(comparison.matched, 2);
        assert_abs_diff_eq!(comparison.x.rms, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(comparison.x.max, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(comparison.y.rms, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(comparison.theta_deg.max, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_compare_skips_samples_outside_span() {
        let simulated = line(&[1.0, 2.0]);
        let recorded = line(&[0.0, 1.5, 3.0]);
        assert_eq!(compare(&simulated, &recorded).unwrap().matched, 1);
        assert_eq!(compare(&simulated, &line(&[5.0])), None);
        assert_eq!(compare(&[], &recorded), None);
    }

    #[test]
    fn test_compare_heading_across_zero() {
        let simulated = vec![
            RecordedSample::new(0.0, 0.0, 0.0, 359.0),
            RecordedSample::new(1.0, 0.0, 0.0, 359.0),
        ];
        let recorded = vec![RecordedSample::new(0.5, 0.0, 0.0, 1.0)];
        let comparison = compare(&simulated, &recorded).unwrap();
        assert_abs_diff_eq!(comparison.theta_deg.rms, 2.0, epsilon = EPSILON);
    }

    #[rstest]
    #[case::first(0.0, Some(0.0))]
    #[case::last(2.0, Some(20.0))]
    #[case::between(0.25, Some(2.5))]
    #[case::before(-0.1, None)]
    #[case::after(2.1, None)]
    fn test_interpolate(#[case] time: f64, #[case] expected_theta: Option<f64>) {
        let result = interpolate(&line(&[0.0, 1.0, 2.0]), time).map(|s| s.theta_deg);
        match (result, expected_theta) {
            (Some(r), Some(e)) => assert_abs_diff_eq!(r, e, epsilon = EPSILON),
            _ => assert_eq!(result, expected_theta),
        }
    }

    #[test]
    fn test_interpolate_heading_wraps() {
        let simulated = vec![
            RecordedSample::new(0.0, 0.0, 0.0, 350.0),
            RecordedSample::new(1.0, 0.0, 0.0, 10.0),
        ];
        let theta = interpolate(&simulated, 0.75).unwrap().theta_deg;
        assert_abs_diff_eq!(theta, 5.0, epsilon = EPSILON);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(190.0, -170.0)]
    #[case(-190.0, 170.0)]
    #[case(180.0, -180.0)]
    #[case(358.0, -2.0)]
    fn test_wrap_deg(#[case] degrees: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(wrap_deg(degrees), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_recorded_sample_from_trajectory() {
        let mut robot = paperbot(5.0, 5.0, 0.5 * PI);
        let trajectory = domain::run(&mut robot, vec![Command::default()], 0.1, 1).unwrap();
        let sample = RecordedSample::from(&trajectory.samples()[0]);
        assert_eq!(sample.time, 0.0);
        assert_eq!((sample.x, sample.y), (5.0, 5.0));
        assert_abs_diff_eq!(sample.theta_deg, 90.0, epsilon = EPSILON);
    }

    #[test]
    fn test_comparison_report() {
        let samples = line(&[0.0, 1.0]);
        let report = compare(&samples, &samples).unwrap().to_string();
        insta::assert_snapshot!(report, @r"
        matched samples = 2
        x     rms = 0.0000, max = 0.0000
        y     rms = 0.0000, max = 0.0000
        theta rms = 0.0000, max = 0.0000
        ");
    }
}
