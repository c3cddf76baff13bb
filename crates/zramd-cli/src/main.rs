//! zramd - compressed-RAM swap on zram devices.
//!
//! # Usage
//!
//! ```bash
//! # Use up to half the RAM (at most 8 GiB) as zstd-compressed swap
//! zramd start
//!
//! # Four lz4 devices, quarter of RAM, lower priority
//! zramd start -a lz4 -n 4 -r 0.25 -p 10
//!
//! # Tear everything down
//! zramd stop
//! ```

#![deny(missing_docs)]
#![deny(clippy::panic)]
#![warn(clippy::all, clippy::pedantic)]

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// zramd: set up and tear down zram swap devices
#[derive(Debug, Parser)]
#[command(name = "zramd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load zram module and set up swap devices
    Start(commands::StartArgs),

    /// Stop swap devices and unload zram module
    Stop,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Start(args) => commands::start(&args),
        Commands::Stop => commands::stop(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Print an error; aggregated device failures get one line each.
fn report(err: &anyhow::Error) {
    if let Some(zramd_core::Error::Failures(failures)) = err.downcast_ref() {
        for failure in failures {
            eprintln!("Error: {failure}");
        }
    } else {
        eprintln!("Error: {err:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start_flags() {
        let cli = Cli::try_parse_from([
            "zramd", "start", "-a", "lz4", "-m", "1024", "-r", "0.25", "-p", "-1", "-n", "4", "-s",
        ])
        .unwrap();
        let Commands::Start(args) = cli.command else {
            unreachable!("expected start");
        };
        assert_eq!(args.algorithm.as_deref(), Some("lz4"));
        assert_eq!(args.max_size, Some(1024));
        assert_eq!(args.max_ram, Some(0.25));
        assert_eq!(args.priority, Some(-1));
        assert_eq!(args.num_devices, Some(4));
        assert!(args.skip_vm);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let bad = [
            vec!["zramd", "start", "-r", "0.01"],
            vec!["zramd", "start", "-r", "1.1"],
            vec!["zramd", "start", "-p", "-2"],
            vec!["zramd", "start", "-p", "32768"],
            vec!["zramd", "start", "-n", "0"],
            vec!["zramd", "start", "-n", "256"],
            vec!["zramd", "start", "-m", "0"],
        ];
        for argv in bad {
            assert!(Cli::try_parse_from(argv.clone()).is_err(), "{argv:?}");
        }
    }

    #[test]
    fn test_skip_vm_env_accepts_boolish_values() {
        // Single test owns SKIP_VM so parallel tests never observe it.
        let cases = [
            ("1", true),
            ("yes", true),
            ("on", true),
            ("true", true),
            ("0", false),
            ("off", false),
        ];
        for (value, expected) in cases {
            std::env::set_var("SKIP_VM", value);
            let parsed = Cli::try_parse_from(["zramd", "start"]);
            std::env::remove_var("SKIP_VM");
            let Commands::Start(args) = parsed.unwrap().command else {
                unreachable!("expected start");
            };
            assert_eq!(args.skip_vm, expected, "SKIP_VM={value}");
        }
    }

    #[test]
    fn test_parse_stop() {
        let cli = Cli::try_parse_from(["zramd", "stop"]).unwrap();
        assert!(matches!(cli.command, Commands::Stop));
    }
}
