//! CLI for procdl.

mod bind;
mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use procdl_core::config;
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{run_completions, run_man, run_session, run_submit, run_types};

/// Top-level CLI for procdl.
#[derive(Debug, Parser)]
#[command(name = "procdl")]
#[command(
    about = "procdl: send files to a processing service and save the result",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Selection and destination shared by `submit` and `session`.
#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    /// Files to upload (uploaded in the order given).
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Process type to request (see `procdl types`).
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub process_type: Option<String>,

    /// Base URL of the processing service (overrides config).
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Directory to save results in (default: config `download_dir`, else current dir).
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload files once and save the processed result.
    Submit {
        #[command(flatten)]
        upload: UploadArgs,
    },

    /// Interactive session: each empty line on stdin submits the current selection.
    Session {
        #[command(flatten)]
        upload: UploadArgs,
    },

    /// List the configured process types.
    Types,

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Submit { upload } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_submit(&cfg, &upload).await
            }
            CliCommand::Session { upload } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_session(&cfg, &upload).await
            }
            CliCommand::Types => {
                let cfg = config::load_or_init()?;
                run_types(&cfg);
                Ok(ExitCode::SUCCESS)
            }
            CliCommand::Completions { shell } => {
                run_completions(shell);
                Ok(ExitCode::SUCCESS)
            }
            CliCommand::Man => {
                run_man()?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

#[cfg(test)]
mod tests;
