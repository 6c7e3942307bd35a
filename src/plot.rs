//! Terminal charts of trajectories.

use textplots::{Chart, Plot, Shape};

use crate::comparison::RecordedSample;

const WIDTH: u32 = 120;
const HEIGHT: u32 = 60;

/// Draws each series as a polyline on shared axes fitted to all points.
pub fn line_chart(series: &[Vec<(f32, f32)>]) -> String {
    let ((x_min, x_max), (y_min, y_max)) = bounds(series);
    let shapes = series.iter().map(|p| Shape::Lines(p)).collect::<Vec<_>>();
    let mut chart = Chart::new_with_y_range(WIDTH, HEIGHT, x_min, x_max, y_min, y_max);
    let chart = shapes.iter().fold(&mut chart, |c, shape| c.lineplot(shape));
    chart.figures();
    chart.to_string()
}

/// The `(x, y)` path of a trajectory.
pub fn path(samples: &[RecordedSample]) -> Vec<(f32, f32)> {
    samples.iter().map(|s| (s.x as f32, s.y as f32)).collect()
}

/// One channel of a trajectory against time.
pub fn over_time(
    samples: &[RecordedSample],
    channel: fn(&RecordedSample) -> f64,
) -> Vec<(f32, f32)> {
    samples
        .iter()
        .map(|s| (s.time as f32, channel(s) as f32))
        .collect()
}

/// Axis ranges covering every point. Empty or flat ranges are widened to one unit.
fn bounds(series: &[Vec<(f32, f32)>]) -> ((f32, f32), (f32, f32)) {
    let mut x_range = (f32::INFINITY, f32::NEG_INFINITY);
    let mut y_range = (f32::INFINITY, f32::NEG_INFINITY);
    for &(x, y) in series.iter().flatten() {
        x_range = (x_range.0.min(x), x_range.1.max(x));
        y_range = (y_range.0.min(y), y_range.1.max(y));
    }
    (widen(x_range), widen(y_range))
}

fn widen((min, max): (f32, f32)) -> (f32, f32) {
    if min > max {
        (0.0, 1.0)
    } else if max - min < f32::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}
