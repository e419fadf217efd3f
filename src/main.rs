use color_eyre::{eyre::eyre, Result};
use dualshock3::{Config, GamePad};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const USAGE: &str = "Usage: ds3-monitor [DEVICE_PATH] [--write-config]";

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let mut device_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--write-config" => {
                let path = Config::default_path();
                Config::write_default(&path)?;
                return Ok(());
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            other if other.starts_with('-') => return Err(eyre!("Unknown option {other}\n{USAGE}")),
            other => device_path = Some(PathBuf::from(other)),
        }
    }

    let config = Config::load()?;

    let pad = match device_path {
        Some(path) => {
            info!("Opening controller at {}", path.display());
            GamePad::open(&path)?
        }
        None => match GamePad::open_first(&config.discovery)? {
            Some(pad) => pad,
            None => {
                warn!("No controller found");
                return Ok(());
            }
        },
    };

    info!("Primary: {}", pad.device_info());
    match pad.motion_info() {
        Some(motion) => info!("Motion: {}", motion),
        None => info!("Motion: none"),
    }
    info!("Transport: {:?}. Hold Start + Select to quit", pad.transport());

    let reader = pad.clone();
    let session = pad.spawn(move || {
        let state = reader.snapshot();
        info!("{}", state);
        if state.buttons.start && state.buttons.select {
            reader.quit();
        }
    });

    session.join().await?;
    info!("Controller session finished");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    let directives = std::env::var("RUST_LOG").unwrap_or_default();

    FmtSubscriber::builder()
        .with_env_filter(log_filter(&directives))
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

/// Accepts a bare level or `target=level` directives; falls back to `info`
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}
