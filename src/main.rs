use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use paperbot::{
    comparison::{self, RecordedSample},
    domain::{self, KeyframeSchedule},
    io, plot,
    settings::{Settings, DEFAULT_CONFIG_PATH},
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let settings = Settings::load(&config_path)
        .with_context(|| format!("failed to load settings from {config_path}"))?;

    let keyframes = io::read_keyframes(
        open(&settings.files.commands)?,
        settings.simulation.pwm_scale,
    )
    .with_context(|| format!("failed to read {}", settings.files.commands.display()))?;
    info!(keyframes = keyframes.len(), "Loaded command keyframes");

    let mut robot = settings.robot()?;
    let schedule = KeyframeSchedule::new(keyframes, settings.simulation.keyframe_interval)?;
    let dt = settings.simulation.dt;
    let trajectory = domain::run(
        &mut robot,
        schedule.commands(dt)?,
        dt,
        settings.simulation.sample_every,
    )?;
    info!(
        steps = trajectory.steps(),
        samples = trajectory.samples().len(),
        elapsed = trajectory.elapsed(),
        "Simulation finished"
    );
    println!("{robot}");

    let simulated = trajectory
        .samples()
        .iter()
        .map(RecordedSample::from)
        .collect::<Vec<_>>();

    if let Some(path) = &settings.files.output {
        write(path, &simulated)?;
        info!(path = %path.display(), "Wrote simulated trajectory");
    }

    let recorded = match &settings.files.ground_truth {
        Some(path) => io::read_trajectory(open(path)?)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => vec![],
    };
    if !recorded.is_empty() {
        match comparison::compare(&simulated, &recorded) {
            Some(result) => {
                info!(
                    matched = result.matched,
                    x_rms = result.x.rms,
                    y_rms = result.y.rms,
                    theta_rms = result.theta_deg.rms,
                    "Compared with recorded trajectory"
                );
                println!("\n{result}");
            }
            None => warn!("Recorded trajectory does not overlap the simulated time span"),
        }
    }

    if settings.plot {
        print_charts(&simulated, &recorded);
    }

    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn write(path: &Path, samples: &[RecordedSample]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    io::write_trajectory(BufWriter::new(file), samples)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// x, y and heading against time, then the x-y path. Recorded data, if any, is drawn second.
fn print_charts(simulated: &[RecordedSample], recorded: &[RecordedSample]) {
    let channels: [(&str, fn(&RecordedSample) -> f64); 3] = [
        ("x", |s| s.x),
        ("y", |s| s.y),
        ("theta [deg]", |s| s.theta_deg),
    ];
    for (name, channel) in channels {
        let mut series = vec![plot::over_time(simulated, channel)];
        if !recorded.is_empty() {
            series.push(plot::over_time(recorded, channel));
        }
        println!("\n{name} over time\n{}", plot::line_chart(&series));
    }

    let mut paths = vec![plot::path(simulated)];
    if !recorded.is_empty() {
        paths.push(plot::path(recorded));
    }
    println!("\nx-y path\n{}", plot::line_chart(&paths));
}
