use anyhow::{anyhow, bail, Context, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Captured result of a successful tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
}

/// Runs one external tool invocation.
///
/// A missing binary, a timeout, and a non-zero exit status are all errors;
/// callers in the primitive layer fold every error into a failed operation.
pub trait CommandRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<ToolOutput>;
}

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Runs tools as child processes with an explicit display target and a
/// per-call timeout.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    display: String,
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(display: impl Into<String>, timeout: Duration) -> Self {
        Self {
            display: display.into(),
            timeout,
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<ToolOutput> {
        let mut child = Command::new(program)
            .args(args)
            .env("DISPLAY", &self.display)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to launch {program}"))?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                bail!("{program} timed out after {:?}", self.timeout);
            }
            std::thread::sleep(POLL_INTERVAL);
        };

        let mut stdout = String::new();
        if let Some(mut out) = child.stdout.take() {
            out.read_to_string(&mut stdout)
                .with_context(|| format!("failed to read {program} output"))?;
        }
        if !status.success() {
            return Err(anyhow!("{program} exited with {status}"));
        }
        Ok(ToolOutput { stdout })
    }
}

/// Split a shell-style command line into program and arguments.
pub fn parse_command_spec(spec: &str) -> Option<(String, Vec<String>)> {
    let parts = shlex::split(spec)
        .unwrap_or_else(|| spec.split_whitespace().map(|s| s.to_string()).collect());
    let mut iter = parts.into_iter();
    let program = iter.next()?;
    Some((program, iter.collect()))
}
