// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Z80 assembly checker command-line interface.
//!
//! This is the main entry point for the `z80asm` command.

use clap::{ArgAction, Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod diagnostic;

use commands::check::OutputFormat;

/// z80asm: syntax checker for Z80 assembly (ZX Spectrum Next dialect)
#[derive(Debug, Parser)]
#[command(name = "z80asm")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check source files for syntax errors
    Check {
        /// Source file or directory to check
        #[arg(default_value = ".")]
        path: String,

        /// Output format (overrides `z80asm.toml`)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the token stream of a source file
    Tokens {
        /// Source file to tokenize
        file: String,

        /// Include whitespace and comment tokens
        #[arg(long)]
        ws: bool,
    },
}

/// Default log directive for a `-v` count. `RUST_LOG` takes precedence.
fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "z80asm_cli=warn,z80asm_core=warn",
        1 => "z80asm_cli=debug,z80asm_core=debug",
        _ => "z80asm_cli=trace,z80asm_core=trace",
    }
}

fn init_tracing(verbose: u8) {
    // Logs go to stderr so `tokens` and `check --format json` stay pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check { path, format } => commands::check::check(&path, format),
        Command::Tokens { file, ws } => commands::tokens::tokens(&file, ws),
    };

    // Exit with appropriate code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}
