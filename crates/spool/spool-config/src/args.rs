//! A small getopt_long-style command-line scanner.
//!
//! Supports clustered short flags (`-vV`), attached or detached short values
//! (`-b4k`, `-b 4k`), long options with `=` or a detached value
//! (`--buffer=4k`, `--buffer 4k`), and `--` to end option processing.
//! Options and positional arguments may be interleaved.

use crate::config::ConfigError;

/// One recognised option.
#[derive(Debug, Clone, Copy)]
pub struct OptSpec {
    pub short: char,
    pub long: &'static str,
    pub takes_value: bool,
}

impl OptSpec {
    pub const fn flag(short: char, long: &'static str) -> Self {
        Self {
            short,
            long,
            takes_value: false,
        }
    }

    pub const fn value(short: char, long: &'static str) -> Self {
        Self {
            short,
            long,
            takes_value: true,
        }
    }
}

/// An option occurrence, identified by its short name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    pub short: char,
    pub value: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Options in command-line order.
    pub opts: Vec<Matched>,
    pub positionals: Vec<String>,
}

/// Scans `args` (without the program name) against `specs`.
pub fn getopt<I>(specs: &[OptSpec], args: I) -> Result<ParsedArgs, ConfigError>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut parsed = ParsedArgs::default();
    let mut args = args.into_iter().map(Into::<String>::into);

    while let Some(arg) = args.next() {
        if arg == "--" {
            parsed.positionals.extend(args.by_ref());
            break;
        }

        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value.to_owned())),
                None => (long, None),
            };
            let spec = specs
                .iter()
                .find(|s| s.long == name)
                .ok_or_else(|| ConfigError::UnknownOption(format!("--{name}")))?;
            let value = match (spec.takes_value, inline) {
                (true, Some(value)) => Some(value),
                (true, None) => Some(
                    args.next()
                        .ok_or_else(|| ConfigError::MissingValue(format!("--{name}")))?,
                ),
                (false, Some(_)) => return Err(ConfigError::UnexpectedValue(format!("--{name}"))),
                (false, None) => None,
            };
            parsed.opts.push(Matched {
                short: spec.short,
                value,
            });
            continue;
        }

        // A lone "-" conventionally names stdin/stdout and is positional.
        let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.is_empty()) else {
            parsed.positionals.push(arg);
            continue;
        };

        for (at, short) in cluster.char_indices() {
            let spec = specs
                .iter()
                .find(|s| s.short == short)
                .ok_or_else(|| ConfigError::UnknownOption(format!("-{short}")))?;
            if !spec.takes_value {
                parsed.opts.push(Matched { short, value: None });
                continue;
            }
            let rest = &cluster[at + short.len_utf8()..];
            let value = if rest.is_empty() {
                args.next()
                    .ok_or_else(|| ConfigError::MissingValue(format!("-{short}")))?
            } else {
                rest.to_owned()
            };
            parsed.opts.push(Matched {
                short,
                value: Some(value),
            });
            break;
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: &[OptSpec] = &[
        OptSpec::flag('v', "verbose"),
        OptSpec::flag('h', "help"),
        OptSpec::value('b', "buffer"),
    ];

    fn m(short: char, value: Option<&str>) -> Matched {
        Matched {
            short,
            value: value.map(str::to_owned),
        }
    }

    #[test]
    fn short_forms() {
        let p = getopt(SPECS, ["-vb4k", "out", "-b", "8k", "-hv"]).unwrap();
        assert_eq!(
            p.opts,
            vec![
                m('v', None),
                m('b', Some("4k")),
                m('b', Some("8k")),
                m('h', None),
                m('v', None)
            ]
        );
        assert_eq!(p.positionals, vec!["out"]);
    }

    #[test]
    fn long_forms() {
        let p = getopt(SPECS, ["--buffer=1m", "a", "--buffer", "2m", "--verbose"]).unwrap();
        assert_eq!(
            p.opts,
            vec![m('b', Some("1m")), m('b', Some("2m")), m('v', None)]
        );
        assert_eq!(p.positionals, vec!["a"]);
    }

    #[test]
    fn double_dash_ends_options() {
        let p = getopt(SPECS, ["-v", "--", "-h", "--buffer"]).unwrap();
        assert_eq!(p.opts, vec![m('v', None)]);
        assert_eq!(p.positionals, vec!["-h", "--buffer"]);
    }

    #[test]
    fn lone_dash_is_positional() {
        let p = getopt(SPECS, ["-"]).unwrap();
        assert_eq!(p.positionals, vec!["-"]);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            getopt(SPECS, ["-x"]),
            Err(ConfigError::UnknownOption(o)) if o == "-x"
        ));
        assert!(matches!(
            getopt(SPECS, ["--nope"]),
            Err(ConfigError::UnknownOption(o)) if o == "--nope"
        ));
        assert!(matches!(
            getopt(SPECS, ["-b"]),
            Err(ConfigError::MissingValue(_))
        ));
        assert!(matches!(
            getopt(SPECS, ["--buffer"]),
            Err(ConfigError::MissingValue(_))
        ));
        assert!(matches!(
            getopt(SPECS, ["--help=yes"]),
            Err(ConfigError::UnexpectedValue(_))
        ));
    }
}
