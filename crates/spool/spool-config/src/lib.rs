pub mod args;
pub mod config;
pub mod options;
pub mod size;

pub use config::{ConfigError, SpoolConfig};
pub use options::{Command, FanoutOptions, SplitOptions};
pub use size::{SizeError, parse_size};
