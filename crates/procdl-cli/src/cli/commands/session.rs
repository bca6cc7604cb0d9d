//! `procdl session`: keep a handler bound and submit on every empty stdin line.
//!
//! Lines:
//! - empty: submit the current selection
//! - `type <name>`: check another process type
//! - `files <path>...`: replace the selection (`files` alone clears it)
//! - `quit`: stop reading; in-flight submissions still finish

use anyhow::{Context, Result};
use procdl_core::config::ProcdlConfig;
use procdl_core::handler::{Click, ClickOutcome};
use procdl_core::selection::SelectedFile;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::bind::{bind, Bound};
use crate::cli::UploadArgs;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SessionInput {
    Click,
    Type(String),
    Files(Vec<PathBuf>),
    Quit,
    Unknown(String),
}

pub(crate) fn parse_session_line(line: &str) -> SessionInput {
    let line = line.trim();
    if line.is_empty() {
        return SessionInput::Click;
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };
    match command {
        "type" if !rest.is_empty() => SessionInput::Type(rest.to_string()),
        "files" => SessionInput::Files(rest.split_whitespace().map(PathBuf::from).collect()),
        "quit" | "exit" => SessionInput::Quit,
        _ => SessionInput::Unknown(line.to_string()),
    }
}

pub async fn run_session(cfg: &ProcdlConfig, args: &UploadArgs) -> Result<ExitCode> {
    let Bound {
        handler,
        trigger,
        files,
        process_types,
        download_dir,
    } = bind(cfg, args)?;

    println!(
        "saving to {}; empty line submits, `type <name>`, `files <path>...`, `quit`",
        download_dir.display()
    );

    let results = tokio::spawn(async move {
        let mut failed = 0usize;
        handler
            .run_with(|outcome| match outcome {
                ClickOutcome::Downloaded(download) => {
                    println!("saved {}", download.path.display());
                }
                ClickOutcome::Rejected(_) | ClickOutcome::Failed(_) => failed += 1,
            })
            .await;
        failed
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        match parse_session_line(&line) {
            SessionInput::Click => {
                trigger.send(Click).await.context("submit trigger closed")?;
            }
            SessionInput::Type(value) => match process_types.check(&value) {
                Ok(()) => println!("process type: {}", value),
                Err(e) => eprintln!("{}", e),
            },
            SessionInput::Files(paths) => {
                println!("{} file(s) selected", paths.len());
                files.select(paths.into_iter().map(SelectedFile::from_path).collect());
            }
            SessionInput::Quit => break,
            SessionInput::Unknown(line) => eprintln!("unrecognized input: {}", line),
        }
    }
    drop(trigger);

    let failed = results.await.context("session task")?;
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
