use std::io::{self, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use log::{debug, warn};

pub const DEFAULT_PAGER: &str = "less";

/// Wraps the external pager process. The command comes from `$PAGER`
/// (whitespace-split into program and arguments) and defaults to `less`.
pub struct PagerProcess {
    program: String,
    args: Vec<String>,
}

impl Default for PagerProcess {
    fn default() -> Self {
        match std::env::var("PAGER") {
            Ok(value) if !value.trim().is_empty() => Self::from_command_line(&value),
            _ => Self::from_command_line(DEFAULT_PAGER),
        }
    }
}

impl PagerProcess {
    pub fn from_command_line(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| DEFAULT_PAGER.to_string());
        Self {
            program,
            args: parts.collect(),
        }
    }

    /// Page pre-formatted text, returning the pager's exit code as our
    /// own. Degrades without error: no tty or no pager binary means a
    /// plain write to stdout and exit code 0.
    pub fn page(&self, text: &str, display_name: Option<&str>) -> Result<i32> {
        if !io::stdout().is_tty() {
            return write_plain(text);
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if self.is_less() {
            // -R passes ANSI color escapes through to the terminal.
            cmd.arg("-R");
            if let Some(name) = display_name {
                cmd.arg(format!("-Ps{name}"));
            }
        }
        cmd.stdin(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!("failed to spawn pager {}: {err}", self.program);
                return write_plain(text);
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(text.as_bytes()) {
                // The user quitting less early closes the pipe; that is
                // not a failure.
                if err.kind() != io::ErrorKind::BrokenPipe {
                    warn!("failed to write to pager: {err}");
                }
            }
        }

        let status = child
            .wait()
            .with_context(|| format!("failed to wait for pager {}", self.program))?;
        let code = status.code().unwrap_or(0);
        debug!("pager exited with code {code}");
        Ok(code)
    }

    fn is_less(&self) -> bool {
        std::path::Path::new(&self.program)
            .file_name()
            .map(|name| name == std::ffi::OsStr::new("less"))
            .unwrap_or(false)
    }
}

/// Write formatted text straight to stdout. Broken pipes (downstream
/// `head` and friends) count as success.
pub fn write_plain(text: &str) -> Result<i32> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match handle.write_all(text.as_bytes()).and_then(|_| handle.flush()) {
        Ok(()) => Ok(0),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(0),
        Err(err) => Err(err).context("failed to write output"),
    }
}
