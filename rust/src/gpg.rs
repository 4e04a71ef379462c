//! Thin wrapper around the `gpg` command line program. Key export and
//! symmetric encryption are delegated entirely to gpg; this module only moves
//! bytes in and out of the subprocess and reports failures.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum GpgError {
    #[error("unable to run {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("`gpg {command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("`gpg {0}` produced no output")]
    EmptyOutput(String),
    #[error("could not find {0} in gpg output")]
    Parse(&'static str),
    #[error("gpg pipe failed: {0}")]
    Pipe(String),
}

/// Handle on a gpg executable.
#[derive(Debug, Clone)]
pub struct Gpg {
    program: String,
}

impl Gpg {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// True when the executable can be started at all.
    pub fn installed(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// First line of `gpg --version`.
    pub fn version(&self) -> Result<String, GpgError> {
        let out = self.run(&["--version"])?;
        parse_version(&String::from_utf8_lossy(&out))
    }

    /// Fingerprint of the primary key matching `key_id`.
    pub fn fingerprint(&self, key_id: &str) -> Result<String, GpgError> {
        let out = self.run(&["--with-colons", "--fingerprint", key_id])?;
        parse_fingerprint(&String::from_utf8_lossy(&out))
    }

    /// Exports the secret key in binary OpenPGP form. The buffer is wiped on drop.
    pub fn export_private_key(&self, key_id: &str) -> Result<Zeroizing<Vec<u8>>, GpgError> {
        let key = Zeroizing::new(self.run(&["--export-secret-keys", key_id])?);
        debug!(bytes = key.len(), "exported private key");
        Ok(key)
    }

    /// Encrypts `plaintext` with AES256 under a passphrase gpg prompts for.
    /// Stderr stays attached to the terminal so the prompt is visible.
    pub fn encrypt_aes256(&self, plaintext: &[u8]) -> Result<Vec<u8>, GpgError> {
        let args = ["--cipher-algo", "AES256", "--symmetric"];
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GpgError::Pipe("stdin unavailable".to_string()))?;

        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(plaintext));
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output.map_err(|e| GpgError::Pipe(format!("{e}")))?;
        let command = args.join(" ");
        if !output.status.success() {
            return Err(GpgError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::new(),
            });
        }
        written
            .map_err(|_| GpgError::Pipe("stdin writer panicked".to_string()))?
            .map_err(|e| GpgError::Pipe(format!("{e}")))?;
        if output.stdout.is_empty() {
            return Err(GpgError::EmptyOutput(command));
        }

        debug!(bytes = output.stdout.len(), "encrypted private key");
        Ok(output.stdout)
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>, GpgError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| self.spawn_error(e))?;
        let command = args.join(" ");
        if !output.status.success() {
            return Err(GpgError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(GpgError::EmptyOutput(command));
        }
        Ok(output.stdout)
    }

    fn spawn_error(&self, err: std::io::Error) -> GpgError {
        GpgError::Spawn {
            program: self.program.clone(),
            message: format!("{err}"),
        }
    }
}

fn parse_version(output: &str) -> Result<String, GpgError> {
    output
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .ok_or(GpgError::Parse("version"))
}

/// Reads the first `fpr` record of `--with-colons` output. The fingerprint is
/// the tenth colon-separated field.
fn parse_fingerprint(output: &str) -> Result<String, GpgError> {
    output
        .lines()
        .find(|line| line.starts_with("fpr:"))
        .and_then(|line| line.split(':').nth(9))
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .ok_or(GpgError::Parse("fingerprint"))
}
