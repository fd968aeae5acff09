//! Configuration model: grid geometry plus an ordered list of processors.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use config_file::{ConfigFileError, FromConfigFile};
use serde::{Deserialize, Serialize};

use crate::color::ColorValue;
use crate::colorgen::ColorScheme;
use crate::grid::{GridError, SimulationState};
use crate::pipeline::Pipeline;
use crate::processors::{
    Decay, DecayPolicy, PatternOverlay, PeriodicEmitter, Processor, Propagate, Scroller,
    StandingWaveField,
};

#[derive(Debug)]
pub enum ConfigError {
    Load(ConfigFileError),
    Grid(GridError),
    InvalidProcessor {
        /// Position in the processor list.
        index: usize,
        name: &'static str,
        reason: String,
    },
    InvalidFrameRate(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(err) => write!(f, "cannot load config: {err}"),
            Self::Grid(err) => write!(f, "invalid grid: {err}"),
            Self::InvalidProcessor {
                index,
                name,
                reason,
            } => write!(f, "processor #{index} ({name}): {reason}"),
            Self::InvalidFrameRate(fps) => {
                write!(f, "frame rate must be positive, got {fps}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(err: GridError) -> Self {
        ConfigError::Grid(err)
    }
}

fn default_fps() -> f32 {
    30.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightBarConfig {
    pub width: usize,
    pub height: usize,
    #[serde(default = "default_fps")]
    pub fps: f32,
    pub processors: Vec<ProcessorConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessorConfig {
    Decay {
        delay: f32,
        #[serde(default)]
        policy: DecayPolicy,
    },
    Propagate {
        transmission_delay: f32,
        #[serde(default)]
        diffuse: f32,
    },
    PeriodicEmitter {
        speed: f32,
        delay: f32,
        #[serde(default)]
        colors: ColorScheme,
    },
    StandingWave {
        harmonic: u32,
        speed: f32,
        color: ColorValue,
        #[serde(default)]
        offset: f32,
        #[serde(default)]
        scan_speed: f32,
    },
    Scroller {
        shift_delay: f32,
    },
    PatternOverlay {
        anchor: (i64, i64),
        #[serde(default)]
        offsets: Option<Vec<(i64, i64)>>,
        #[serde(default)]
        bitmap: Option<Vec<String>>,
        color: ColorValue,
    },
}

fn check_time(name: &'static str, field: &str, value: f32) -> Result<(), (&'static str, String)> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err((name, format!("{field} must be a non-negative number of ms, got {value}")))
    }
}

impl ProcessorConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessorConfig::Decay { .. } => "decay",
            ProcessorConfig::Propagate { .. } => "propagate",
            ProcessorConfig::PeriodicEmitter { .. } => "periodic_emitter",
            ProcessorConfig::StandingWave { .. } => "standing_wave",
            ProcessorConfig::Scroller { .. } => "scroller",
            ProcessorConfig::PatternOverlay { .. } => "pattern_overlay",
        }
    }

    fn validate(&self) -> Result<(), (&'static str, String)> {
        let name = self.name();
        match self {
            ProcessorConfig::Decay { delay, .. } => check_time(name, "delay", *delay),
            ProcessorConfig::Propagate {
                transmission_delay,
                diffuse,
            } => {
                check_time(name, "transmission_delay", *transmission_delay)?;
                if !(0.0..=1.0).contains(diffuse) {
                    return Err((name, format!("diffuse must be within [0, 1], got {diffuse}")));
                }
                Ok(())
            }
            ProcessorConfig::PeriodicEmitter { speed, delay, .. } => {
                if !speed.is_finite() {
                    return Err((name, format!("speed must be finite, got {speed}")));
                }
                check_time(name, "delay", *delay)
            }
            ProcessorConfig::StandingWave {
                harmonic,
                speed,
                offset,
                scan_speed,
                ..
            } => {
                if *harmonic == 0 {
                    return Err((name, "harmonic must be at least 1".to_string()));
                }
                if !offset.is_finite() {
                    return Err((name, format!("offset must be finite, got {offset}")));
                }
                check_time(name, "speed", *speed)?;
                check_time(name, "scan_speed", *scan_speed)
            }
            ProcessorConfig::Scroller { shift_delay } => {
                check_time(name, "shift_delay", *shift_delay)
            }
            ProcessorConfig::PatternOverlay {
                offsets, bitmap, ..
            } => match (offsets, bitmap) {
                (Some(_), None) | (None, Some(_)) => Ok(()),
                _ => Err((
                    name,
                    "exactly one of offsets or bitmap is required".to_string(),
                )),
            },
        }
    }

    /// Builds the processor. Expects a validated configuration.
    fn build(&self) -> Box<dyn Processor> {
        match self.clone() {
            ProcessorConfig::Decay { delay, policy } => Box::new(Decay::new(delay, policy)),
            ProcessorConfig::Propagate {
                transmission_delay,
                diffuse,
            } => Box::new(Propagate::new(transmission_delay, diffuse)),
            ProcessorConfig::PeriodicEmitter {
                speed,
                delay,
                colors,
            } => Box::new(PeriodicEmitter::new(speed, delay, colors.into_fn())),
            ProcessorConfig::StandingWave {
                harmonic,
                speed,
                color,
                offset,
                scan_speed,
            } => Box::new(StandingWaveField::new(
                harmonic, speed, color, offset, scan_speed,
            )),
            ProcessorConfig::Scroller { shift_delay } => Box::new(Scroller::new(shift_delay)),
            ProcessorConfig::PatternOverlay {
                anchor,
                offsets,
                bitmap,
                color,
            } => match (offsets, bitmap) {
                (Some(offsets), _) => Box::new(PatternOverlay::new(anchor, offsets, color)),
                (None, bitmap) => Box::new(PatternOverlay::from_bitmap(
                    anchor,
                    &bitmap.unwrap_or_default(),
                    color,
                )),
            },
        }
    }
}

impl LightBarConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<LightBarConfig, ConfigError> {
        LightBarConfig::from_config_file(path).map_err(ConfigError::Load)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::InvalidFrameRate(self.fps));
        }
        for (index, processor) in self.processors.iter().enumerate() {
            processor
                .validate()
                .map_err(|(name, reason)| ConfigError::InvalidProcessor {
                    index,
                    name,
                    reason,
                })?;
        }
        Ok(())
    }

    pub fn build_pipeline(&self) -> Result<Pipeline, ConfigError> {
        self.validate()?;
        let state = SimulationState::with_size(self.width, self.height)?;
        let mut pipeline = Pipeline::new(state);
        for processor in &self.processors {
            pipeline.push(processor.build());
        }
        Ok(pipeline)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Colored pulses sweeping in from the left edge
    Pulses,
    /// Two interfering standing waves
    Waves,
}

const WIDTH: usize = 20;
const HEIGHT: usize = 5;

impl Preset {
    pub fn config(self) -> LightBarConfig {
        let processors = match self {
            Preset::Pulses => vec![
                ProcessorConfig::Decay {
                    delay: 600.0,
                    policy: DecayPolicy::Multiplicative,
                },
                ProcessorConfig::Propagate {
                    transmission_delay: 200.0,
                    diffuse: 0.2,
                },
                ProcessorConfig::PeriodicEmitter {
                    speed: 2.5,
                    delay: 250.0,
                    colors: ColorScheme::RandomHue { seed: None },
                },
                ProcessorConfig::Scroller { shift_delay: 80.0 },
                ProcessorConfig::PatternOverlay {
                    anchor: (0, (WIDTH - 1) as i64),
                    offsets: None,
                    bitmap: Some(vec!["#".into(), "".into(), "".into(), "".into(), "#".into()]),
                    color: ColorValue::WHITE,
                },
            ],
            Preset::Waves => vec![
                ProcessorConfig::Decay {
                    delay: 150.0,
                    policy: DecayPolicy::LinearSubtract,
                },
                ProcessorConfig::Propagate {
                    transmission_delay: 100.0,
                    diffuse: 0.1,
                },
                ProcessorConfig::StandingWave {
                    harmonic: 1,
                    speed: 2000.0,
                    color: ColorValue::new(0, 80, 255),
                    offset: 0.0,
                    scan_speed: 0.0,
                },
                ProcessorConfig::StandingWave {
                    harmonic: 2,
                    speed: 3000.0,
                    color: ColorValue::new(255, 40, 0),
                    offset: 0.0,
                    scan_speed: 5000.0,
                },
            ],
        };

        LightBarConfig {
            width: WIDTH,
            height: HEIGHT,
            fps: default_fps(),
            processors,
        }
    }
}
