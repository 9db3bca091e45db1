use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::api::{PortalError, Result};

use super::Decryptor;

/// Prefix gpg puts in front of every machine-readable status line
const STATUS_PREFIX: &str = "[GNUPG:] ";

/// Failure keywords in the order they are reported, most specific first
const FAILURE_KEYWORDS: [(&str, &str); 4] = [
    ("NO_SECKEY", "no secret key"),
    ("BAD_PASSPHRASE", "bad passphrase"),
    ("NODATA", "no data was provided"),
    ("DECRYPTION_FAILED", "decryption failed"),
];

/// Decrypts with the local GnuPG keyring by running the `gpg` binary.
#[derive(Debug, Clone)]
pub struct GpgDecryptor {
    program: PathBuf,
    homedir: Option<PathBuf>,
}

impl Default for GpgDecryptor {
    fn default() -> Self {
        Self {
            program: PathBuf::from("gpg"),
            homedir: None,
        }
    }
}

impl GpgDecryptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a keyring other than the default `~/.gnupg`
    pub fn with_homedir(mut self, homedir: impl Into<PathBuf>) -> Self {
        self.homedir = Some(homedir.into());
        self
    }

    /// Run a different gpg executable (e.g. `gpg2`)
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(ref homedir) = self.homedir {
            command.arg("--homedir").arg(homedir);
        }
        command
            .args(["--batch", "--no-tty", "--status-fd", "2", "--decrypt"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl Decryptor for GpgDecryptor {
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut child = self.command().spawn().map_err(|e| {
            PortalError::Decryption(format!("failed to run {}: {}", self.program.display(), e))
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PortalError::Decryption("gpg stdin unavailable".to_string()))?;

        let feed = async move {
            let written = stdin.write_all(ciphertext).await;
            drop(stdin);
            written
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|e| PortalError::Decryption(format!("gpg failed: {}", e)))?;
        if let Err(e) = written {
            // gpg stops reading early when it rejects the input
            debug!(error = %e, "gpg closed stdin before all input was written");
        }

        let status_text = String::from_utf8_lossy(&output.stderr);
        let report = StatusReport::parse(&status_text);
        debug!(exit = %output.status, okay = report.decryption_okay, "gpg finished");

        if output.status.success() && report.decryption_okay {
            Ok(output.stdout)
        } else {
            Err(PortalError::Decryption(report.failure_reason(output.status)))
        }
    }
}

/// What gpg reported on its status file descriptor
#[derive(Debug, Default, PartialEq, Eq)]
struct StatusReport {
    decryption_okay: bool,
    keywords: Vec<String>,
}

impl StatusReport {
    fn parse(stderr: &str) -> Self {
        let mut report = Self::default();
        for line in stderr.lines() {
            let Some(rest) = line.strip_prefix(STATUS_PREFIX) else {
                continue;
            };
            let keyword = rest.split_whitespace().next().unwrap_or_default();
            if keyword == "DECRYPTION_OKAY" {
                report.decryption_okay = true;
            }
            report.keywords.push(keyword.to_string());
        }
        report
    }

    fn failure_reason(&self, exit: ExitStatus) -> String {
        FAILURE_KEYWORDS
            .iter()
            .find(|(keyword, _)| self.keywords.iter().any(|k| k == keyword))
            .map(|(_, reason)| reason.to_string())
            .unwrap_or_else(|| format!("gpg exited with {}", exit))
    }
}
