//! Command lines of the two tools, resolved against an optional config file.

use crate::args::{OptSpec, ParsedArgs, getopt};
use crate::config::{ConfigError, SpoolConfig};
use crate::size::parse_size;
use std::path::PathBuf;

/// What a command line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<T> {
    Run(T),
    Help,
    Version,
}

/// Settings for the fan-out copier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanoutOptions {
    /// Input file; standard input when `None`.
    pub input: Option<PathBuf>,
    pub buffer_size: usize,
    /// Output files; standard output when empty.
    pub outputs: Vec<PathBuf>,
    pub log_level: String,
}

/// Settings for the stream splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    pub input: Option<PathBuf>,
    pub buffer_size: usize,
    pub chunk_size: usize,
    pub verbose: u8,
    /// Name of the first chunk; later names are derived from it.
    pub base: PathBuf,
    /// Extra names hard-linked to every chunk.
    pub links: Vec<PathBuf>,
    pub log_level: String,
}

const FANOUT_SPECS: &[OptSpec] = &[
    OptSpec::value('i', "input"),
    OptSpec::value('b', "buffer"),
    OptSpec::value('c', "config"),
    OptSpec::flag('h', "help"),
    OptSpec::flag('V', "version"),
];

const SPLIT_SPECS: &[OptSpec] = &[
    OptSpec::value('s', "size"),
    OptSpec::value('i', "input"),
    OptSpec::value('b', "buffer"),
    OptSpec::value('c', "config"),
    OptSpec::flag('v', "verbose"),
    OptSpec::flag('h', "help"),
    OptSpec::flag('V', "version"),
];

/// Values common to both tools, before defaults are applied.
#[derive(Default)]
struct Common {
    input: Option<PathBuf>,
    buffer: Option<String>,
    chunk: Option<String>,
    config: Option<String>,
    verbose: u8,
}

enum Scan {
    Done(Common, Vec<String>),
    Help,
    Version,
}

fn scan(parsed: ParsedArgs) -> Scan {
    let mut common = Common::default();
    for opt in parsed.opts {
        match (opt.short, opt.value) {
            ('h', _) => return Scan::Help,
            ('V', _) => return Scan::Version,
            ('v', _) => common.verbose = common.verbose.saturating_add(1),
            ('i', Some(v)) => common.input = Some(PathBuf::from(v)),
            ('b', v) => common.buffer = v,
            ('s', v) => common.chunk = v,
            ('c', v) => common.config = v,
            _ => {}
        }
    }
    Scan::Done(common, parsed.positionals)
}

impl Common {
    fn load_config(&self) -> Result<SpoolConfig, ConfigError> {
        match &self.config {
            Some(path) => SpoolConfig::load(path.as_str()),
            None => Ok(SpoolConfig::default()),
        }
    }
}

fn size_override(option: &str, value: Option<String>, fallback: usize) -> Result<usize, ConfigError> {
    match value {
        Some(value) => parse_size(&value).map_err(|source| ConfigError::BadSize {
            option: option.to_owned(),
            value,
            source,
        }),
        None => Ok(fallback),
    }
}

impl FanoutOptions {
    /// Parses a fatcat command line (without the program name).
    pub fn parse<I>(args: I) -> Result<Command<Self>, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let (common, positionals) = match scan(getopt(FANOUT_SPECS, args)?) {
            Scan::Done(common, positionals) => (common, positionals),
            Scan::Help => return Ok(Command::Help),
            Scan::Version => return Ok(Command::Version),
        };
        let config = common.load_config()?;

        Ok(Command::Run(Self {
            buffer_size: size_override("--buffer", common.buffer, config.buffer_size)?,
            input: common.input,
            outputs: positionals.into_iter().map(PathBuf::from).collect(),
            log_level: config.log_level,
        }))
    }
}

impl SplitOptions {
    /// Parses a spliff command line (without the program name).
    pub fn parse<I>(args: I) -> Result<Command<Self>, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let (common, positionals) = match scan(getopt(SPLIT_SPECS, args)?) {
            Scan::Done(common, positionals) => (common, positionals),
            Scan::Help => return Ok(Command::Help),
            Scan::Version => return Ok(Command::Version),
        };
        let config = common.load_config()?;

        let mut names = positionals.into_iter().map(PathBuf::from);
        let base = names.next().ok_or(ConfigError::MissingPath)?;

        let log_level = match common.verbose {
            0 => config.log_level,
            1 => "info".to_owned(),
            _ => "debug".to_owned(),
        };

        Ok(Command::Run(Self {
            buffer_size: size_override("--buffer", common.buffer, config.buffer_size)?,
            chunk_size: size_override("--size", common.chunk, config.chunk_size)?,
            input: common.input,
            verbose: common.verbose,
            base,
            links: names.collect(),
            log_level,
        }))
    }
}
