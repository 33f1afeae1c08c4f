use anyhow::Context;
use spool_config::{Command, FanoutOptions};
use spool_engine::Fanout;
use std::process::ExitCode;
use tracing::info;

const PROG: &str = "fatcat";

fn usage() -> String {
    format!(
        "Usage: {PROG} [options] <file>...\n\n\
         Options:\n  \
         -i, --input  <file>  Input file\n  \
         -b, --buffer <size>  Buffer size\n  \
         -c, --config <file>  Config file (TOML)\n  \
         -h, --help           See this text\n  \
         -V, --version        Show version\n\n\
         {PROG} {}\n",
        env!("CARGO_PKG_VERSION")
    )
}

fn main() -> ExitCode {
    let opts = match FanoutOptions::parse(std::env::args().skip(1)) {
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

fn run(opts: FanoutOptions) -> anyhow::Result<()> {
    let report = Fanout::new(opts.buffer_size)
        .input(opts.input)
        .files(opts.outputs)
        .run()
        .context("copy failed")?;
    info!(bytes = report.bytes, outputs = report.outputs, "done");
    Ok(())
}
