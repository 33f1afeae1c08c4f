use anyhow::Context;
use spool_config::{Command, SplitOptions};
use spool_engine::Splitter;
use std::process::ExitCode;
use tracing::{debug, info};

const PROG: &str = "spliff";

fn usage() -> String {
    format!(
        "Usage: {PROG} [options] <file> [<link>...]\n\n\
         Options:\n  \
         -s, --size <size>    Chunk size\n  \
         -i, --input  <file>  Input file\n  \
         -b, --buffer <size>  Buffer size\n  \
         -c, --config <file>  Config file (TOML)\n  \
         -v, --verbose        Verbose output\n  \
         -h, --help           See this text\n  \
         -V, --version        Show version\n\n\
         {PROG} {}\n",
        env!("CARGO_PKG_VERSION")
    )
}

fn main() -> ExitCode {
    let opts = match SplitOptions::parse(std::env::args().skip(1)) {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            print!("{}", usage());
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("{PROG} {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{PROG}: {:#}\n", anyhow::Error::from(err));
            eprint!("{}", usage());
            return ExitCode::FAILURE;
        }
    };

    spool_util::init_logging(&opts.log_level);

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{PROG}: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: SplitOptions) -> anyhow::Result<()> {
    debug!(verbose = opts.verbose, chunk = opts.chunk_size, "options parsed");
    let report = Splitter::new(opts.buffer_size, opts.chunk_size, opts.base)
        .input(opts.input)
        .links(opts.links)
        .run()
        .context("split failed")?;
    info!(bytes = report.bytes, chunks = report.files.len(), "done");
    Ok(())
}
