pub(crate) mod color;
pub(crate) mod colorgen;
pub(crate) mod config;
pub(crate) mod framedriver;
pub(crate) mod grid;
pub(crate) mod intervaltimer;
pub(crate) mod olaoutput;
pub(crate) mod pipeline;
pub(crate) mod processors;
pub(crate) mod terminal;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use crate::config::{LightBarConfig, Preset};
use crate::framedriver::{FrameDriver, Renderer};
use crate::intervaltimer::IntervalTimer;
use crate::olaoutput::OlaOutput;
use crate::pipeline::Pipeline;
use crate::terminal::TerminalOutput;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    /// True-color blocks in this terminal
    Terminal,
    /// DMX universe 0 via OLA's OSC plugin
    Ola,
}

#[derive(Parser)]
#[command(about = "Animates an LED bar from a pipeline of light effects")]
struct Cli {
    /// Config file describing the grid and its processors
    #[arg(short, long, value_name = "FILE", conflicts_with = "preset")]
    config: Option<std::path::PathBuf>,

    /// Built-in effect to run when no config file is given
    #[arg(short, long, value_enum, default_value_t = Preset::Pulses)]
    preset: Preset,

    /// Frames per second, overriding the configured rate
    #[arg(long)]
    fps: Option<f32>,

    /// Stop after this many frames
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// Where to send the frames
    #[arg(short, long, value_enum, default_value_t = Output::Terminal)]
    output: Output,

    /// OLA's OSC listening address
    #[arg(long, value_name = "HOST:PORT", default_value = "127.0.0.1:7770")]
    ola_addr: SocketAddr,
}

fn load_config(args: &Cli) -> Result<LightBarConfig, config::ConfigError> {
    let mut config = match args.config.as_deref() {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            LightBarConfig::load(path)?
        }
        None => {
            log::info!("Using preset {:?}", args.preset);
            args.preset.config()
        }
    };

    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    config.validate()?;
    Ok(config)
}

fn drive<R: Renderer>(
    pipeline: Pipeline,
    renderer: R,
    fps: f32,
    running: &AtomicBool,
    frames: Option<u64>,
) -> u64 {
    let mut driver = FrameDriver::new(pipeline, renderer);
    let mut timer = IntervalTimer::new(fps, true);
    log::debug!("Frame interval {:?}", timer.interval());
    driver.run(&mut timer, running, frames);
    log::debug!(
        "{} light(s) active at shutdown",
        driver.pipeline().state().lights().len()
    );
    driver.frames()
}

fn run(args: Cli) -> Result<u64, String> {
    let config = load_config(&args).map_err(|err| err.to_string())?;
    let pipeline = config.build_pipeline().map_err(|err| err.to_string())?;
    log::info!(
        "Driving a {}x{} grid at {} FPS through {}",
        config.width,
        config.height,
        config.fps,
        pipeline.processor_names().join(" -> ")
    );

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .map_err(|err| format!("Cannot install Ctrl-C handler: {err}"))?;

    let frames = match args.output {
        Output::Terminal => {
            let output = TerminalOutput::stdout()
                .map_err(|err| format!("Cannot set up terminal output: {err}"))?;
            drive(pipeline, output, config.fps, &running, args.frames)
        }
        Output::Ola => {
            let output = OlaOutput::new(args.ola_addr)
                .map_err(|err| format!("Cannot set up OLA output: {err}"))?;
            drive(pipeline, output, config.fps, &running, args.frames)
        }
    };
    Ok(frames)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    match run(args) {
        Ok(frames) => {
            log::info!("Stopped after {frames} frames");
            ExitCode::SUCCESS
        }
        Err(msg) => {
            log::error!("{msg}");
            ExitCode::FAILURE
        }
    }
}
