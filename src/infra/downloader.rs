use anyhow::{bail, Result};
use std::path::Path;
use std::process::Command;

pub trait Downloader {
    /// Runs one download to completion. `Ok(false)` means the tool ran and
    /// exited non-zero.
    fn download(&self, url: &str, output: Option<&Path>) -> Result<bool>;
}

/// youtube-dl compatible command line tool (`<bin> [args] [-o <path>] <url>`).
pub struct ExternalDownloader {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalDownloader {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, url: &str, output: Option<&Path>) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(output) = output {
            command.arg("-o").arg(output);
        }
        command.arg(url);
        command
    }
}

impl Downloader for ExternalDownloader {
    fn download(&self, url: &str, output: Option<&Path>) -> Result<bool> {
        tracing::debug!(program = %self.program, url, "spawning downloader");

        // stdio is inherited so the tool's own progress output reaches the terminal
        let status = match self.command(url, output).status() {
            Ok(status) => status,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!(
                    "{} not found. Please install it and ensure it's in your PATH.",
                    self.program
                );
            }
            Err(e) => {
                bail!("Failed to execute {}: {e}", self.program);
            }
        };

        tracing::debug!(url, code = ?status.code(), "downloader exited");
        Ok(status.success())
    }
}
