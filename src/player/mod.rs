//! Client for the player process's JSON IPC socket.
//!
//! Requests and replies are single-line JSON objects; replies are matched to
//! requests by `request_id`, and unsolicited event lines are skipped.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    Relative,
    Absolute,
}

impl SeekMode {
    fn as_str(self) -> &'static str {
        match self {
            SeekMode::Relative => "relative",
            SeekMode::Absolute => "absolute",
        }
    }
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    command: &'a [Value],
    request_id: u64,
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    request_id: Option<u64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    event: Option<String>,
}

pub struct PlayerClient {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
    next_id: u64,
}

impl PlayerClient {
    pub fn connect(path: &Path, timeout: Duration) -> Result<Self> {
        let stream = UnixStream::connect(path)
            .with_context(|| format!("failed to connect to player at {}", path.display()))?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            next_id: 1,
        })
    }

    /// Send one command and wait for its reply's `data`.
    pub fn command(&mut self, args: &[Value]) -> Result<Value> {
        let request_id = self.next_id;
        self.next_id += 1;
        let mut line = serde_json::to_string(&Request {
            command: args,
            request_id,
        })?;
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .context("failed to send player command")?;

        loop {
            let mut buf = String::new();
            let read = self
                .reader
                .read_line(&mut buf)
                .context("failed to read player reply")?;
            if read == 0 {
                bail!("player closed the connection");
            }
            let trimmed = buf.trim();
            if trimmed.is_empty() {
                continue;
            }
            let reply: Reply = match serde_json::from_str(trimmed) {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::debug!("ignoring malformed player line: {e}");
                    continue;
                }
            };
            if let Some(event) = reply.event {
                tracing::debug!(%event, "player event");
                continue;
            }
            if reply.request_id != Some(request_id) {
                continue;
            }
            return match reply.error.as_deref() {
                None | Some("success") => Ok(reply.data),
                Some(err) => Err(anyhow!("player rejected {:?}: {err}", args.first())),
            };
        }
    }

    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.command(&[json!("loadfile"), json!(path), json!("replace")])
            .map(|_| ())
    }

    pub fn seek(&mut self, seconds: f64, mode: SeekMode) -> Result<()> {
        self.command(&[json!("seek"), json!(seconds), json!(mode.as_str())])
            .map(|_| ())
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.set_property("pause", json!(paused))
    }

    pub fn get_property(&mut self, name: &str) -> Result<Value> {
        self.command(&[json!("get_property"), json!(name)])
    }

    pub fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        self.command(&[json!("set_property"), json!(name), value])
            .map(|_| ())
    }

    pub fn stop(&mut self) -> Result<()> {
        self.command(&[json!("stop")]).map(|_| ())
    }
}
