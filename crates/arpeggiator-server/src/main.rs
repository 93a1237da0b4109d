//! Arpeggiator CLI - HTTP service and offline generation
//!
//! This binary runs the arpeggio generation service and provides commands
//! for generating MIDI files and inspecting them without a server.

mod cli_args;

use std::process::ExitCode;

use arpeggiator_server::commands;
use arpeggiator_server::commands::generate::GenerateOptions;
use arpeggiator_server::{serve, Settings};
use clap::Parser;
use colored::Colorize;

use cli_args::{generation_request, Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            model,
            limits,
        } => serve::run(Settings {
            host,
            port,
            model: model.config(),
            limits: limits.limits(),
            debug: cli.debug,
        }),
        Commands::Generate {
            key,
            mood,
            bpm,
            bars,
            style,
            seed,
            output,
            json,
            model,
            limits,
        } => commands::generate::run(&GenerateOptions {
            request: generation_request(key, mood, bpm, bars, style, seed),
            output,
            model: model.config(),
            limits: limits.limits(),
            json,
        }),
        Commands::Inspect { path, json } => commands::inspect::run(&path, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}

/// `--debug` lowers the default filter to debug; `RUST_LOG` overrides both.
fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "arpeggiator",
            "generate",
            "--key",
            "F#",
            "--mood",
            "dark",
            "--bars",
            "4",
            "--style",
            "random",
            "--seed",
            "-7",
            "-o",
            "out.mid",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                key,
                mood,
                bpm,
                bars,
                style,
                seed,
                output,
                json,
                ..
            } => {
                assert_eq!(key, "F#");
                assert_eq!(mood, "dark");
                assert_eq!(bpm, 120);
                assert_eq!(bars, 4);
                assert_eq!(style, "random");
                assert_eq!(seed, Some(-7));
                assert_eq!(output.unwrap().to_str(), Some("out.mid"));
                assert!(!json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_serve_defaults() {
        let cli = Cli::try_parse_from(["arpeggiator", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Commands::Serve {
                port,
                model,
                limits,
                ..
            } => {
                assert_eq!(port, 9000);
                assert_eq!(limits.limits(), arpeggiator_spec::RequestLimits::default());
                if std::env::var_os("ARPEGGIATOR_MODEL").is_none() {
                    assert!(model.config().is_none());
                }
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_cli_parses_inspect() {
        let cli = Cli::try_parse_from(["arpeggiator", "inspect", "song.mid", "--json"]).unwrap();
        match cli.command {
            Commands::Inspect { path, json } => {
                assert_eq!(path.to_str(), Some("song.mid"));
                assert!(json);
            }
            _ => panic!("expected inspect command"),
        }
    }
}
