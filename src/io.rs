//! Plain-text formats at the edge of the simulation.
//!
//! Keyframe files hold one `left right` pair of raw PWM values per line, separated by whitespace
//! or a comma. `#` starts a comment.
//!
//! Trajectory files hold exactly four lines of space-separated values: times, x positions,
//! y positions and headings in degrees. The same layout is used for simulated and recorded
//! trajectories.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::{comparison::RecordedSample, domain::Command};

const TRAJECTORY_LINES: usize = 4;

#[derive(Error, Debug)]
pub enum InputError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line {line}: cannot parse {value:?} as a number")]
    Parse { line: usize, value: String },
    #[error("line {line}: expected {expected} values, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("expected 4 lines (time, x, y, heading), found {0}")]
    MissingLines(usize),
    #[error("trajectory lines differ in length: {0:?}")]
    RaggedTrajectory(Vec<usize>),
    #[error("PWM scale must be positive, got {0}")]
    InvalidScale(f64),
}

/// Reads keyframes and divides the raw values by `pwm_scale` to obtain duty values.
pub fn read_keyframes<R: BufRead>(reader: R, pwm_scale: f64) -> Result<Vec<Command>, InputError> {
    if !(pwm_scale.is_finite() && pwm_scale > 0.0) {
        return Err(InputError::InvalidScale(pwm_scale));
    }

    let mut keyframes = vec![];
    for (line, values) in numeric_lines(reader)? {
        match values[..] {
            [left, right] => keyframes.push(Command::new(left / pwm_scale, right / pwm_scale)),
            _ => {
                return Err(InputError::ColumnCount {
                    line,
                    expected: 2,
                    found: values.len(),
                })
            }
        }
    }
    Ok(keyframes)
}

pub fn read_trajectory<R: BufRead>(reader: R) -> Result<Vec<RecordedSample>, InputError> {
    let rows = numeric_lines(reader)?
        .into_iter()
        .map(|(_, values)| values)
        .collect::<Vec<_>>();
    let [times, xs, ys, thetas] = &rows[..] else {
        return Err(InputError::MissingLines(rows.len()));
    };
    if rows.iter().any(|row| row.len() != times.len()) {
        return Err(InputError::RaggedTrajectory(
            rows.iter().map(Vec::len).collect(),
        ));
    }

    Ok((0..times.len())
        .map(|i| RecordedSample::new(times[i], xs[i], ys[i], thetas[i]))
        .collect())
}

pub fn write_trajectory<W: Write>(mut writer: W, samples: &[RecordedSample]) -> io::Result<()> {
    let columns: [fn(&RecordedSample) -> f64; TRAJECTORY_LINES] =
        [|s| s.time, |s| s.x, |s| s.y, |s| s.theta_deg];
    for column in columns {
        let line = samples
            .iter()
            .map(|s| column(s).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}

/// Non-empty lines parsed into numbers, paired with their 1-based line number.
fn numeric_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, Vec<f64>)>, InputError> {
    let mut lines = vec![];
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let values = content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|value| !value.is_empty())
            .map(|value| {
                value.parse::<f64>().map_err(|_| InputError::Parse {
                    line: idx + 1,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        lines.push((idx + 1, values));
    }
    Ok(lines)
}
