use clap::{Parser, Subcommand};
use env_logger::Env;
use hashfiles::{runner, Algorithm, Options, Tolerance, E};
use log::error;
use std::{env, path::PathBuf, process::ExitCode};

/// Exit status of `verify --fail-on-mismatch` when at least one file changed.
const MISMATCH_EXIT_CODE: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "hashfiles",
    version,
    about = "Recursively generate checksum of all files in a directory"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// The directory to be hashed [default: current directory]
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// The hash algorithm to use, multiple algorithms can be given comma separated
    #[arg(short, long, global = true, default_value = "md5")]
    algo: String,

    /// The number of parallel workers [default: number of logical cores]
    #[arg(short = 'n', long, global = true)]
    parallel: Option<usize>,

    /// Verbose output log
    #[arg(long, global = true)]
    verbose: bool,

    /// Report unreadable files at the end instead of stopping on the first one
    #[arg(long, global = true)]
    keep_going: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash files
    Hash,
    /// Verify files
    Verify {
        /// Exit with status 2 if any file doesn't match its recorded digest
        #[arg(long)]
        fail_on_mismatch: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, E> {
    let algorithms = Algorithm::parse_list(&cli.algo)?;
    let root = match cli.dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => env::current_dir()?.join(dir),
        None => env::current_dir()?,
    };
    let mut opt = Options::new();
    opt.verbose(cli.verbose).tolerance(if cli.keep_going {
        Tolerance::LogErrors
    } else {
        Tolerance::StopOnErrors
    });
    if let Some(parallel) = cli.parallel {
        opt.threads(parallel);
    }
    match cli.command {
        Command::Hash => {
            let summary = runner::hash(&root, &algorithms, &opt)?;
            if summary.failed() > 0 {
                error!("{} files couldn't be hashed", summary.failed());
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Verify { fail_on_mismatch } => {
            let summary = runner::verify(&root, &algorithms, &opt)?;
            if summary.failed() > 0 {
                error!("{} files couldn't be verified", summary.failed());
                return Ok(ExitCode::FAILURE);
            }
            if fail_on_mismatch && summary.mismatched() > 0 {
                return Ok(ExitCode::from(MISMATCH_EXIT_CODE));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
