//! Configuration for the Strata voxel engine.
//!
//! Settings persist as `config.ron` and tolerate missing or unknown fields.
//! Command-line flags override what was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, ChannelConfig, Config, DebugConfig, NoiseConfig, PhysicsConfig, WorldConfig,
};
pub use error::ConfigError;
