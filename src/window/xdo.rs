use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::window::control::WindowControl;
use crate::window::debounce::{DebounceKey, DebounceTarget, RateLimiter};
use crate::window::handle::{Geometry, WindowHandle, WindowQuery};
use crate::window::hints::{
    motif_value, parse_atom_list, StateFlag, MOTIF_NO_DECORATIONS, MOTIF_WM_HINTS, NET_WM_STATE,
    NET_WM_WINDOW_TYPE,
};
use crate::window::op::{OpKind, ToolKind, WindowOp};
use crate::window::runner::CommandRunner;

#[derive(Debug, Clone)]
pub struct XdoConfig {
    pub window_tool: String,
    pub property_tool: String,
    pub query_debounce: Duration,
    pub state_debounce: Duration,
    pub pointer_park: (i32, i32),
    /// Root-cursor tool and the blank bitmap handed to it as cursor and mask.
    pub root_cursor: Option<(String, PathBuf)>,
    pub cursor_blank: Option<(String, Vec<String>)>,
}

impl Default for XdoConfig {
    fn default() -> Self {
        Self {
            window_tool: "xdotool".into(),
            property_tool: "xprop".into(),
            query_debounce: Duration::from_millis(200),
            state_debounce: Duration::from_millis(50),
            pointer_park: (10000, 10000),
            root_cursor: None,
            cursor_blank: None,
        }
    }
}

/// Window control backed by the `xdotool` / `xprop` command-line tools.
pub struct XdoControl<R: CommandRunner> {
    config: XdoConfig,
    runner: R,
    limiter: RateLimiter,
}

impl<R: CommandRunner> XdoControl<R> {
    pub fn new(config: XdoConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            limiter: RateLimiter::new(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn window_tool(&mut self, args: Vec<String>) -> Result<String> {
        let program = self.config.window_tool.clone();
        Ok(self.runner.run(&program, &args)?.stdout)
    }

    fn property_tool(&mut self, args: Vec<String>) -> Result<String> {
        let program = self.config.property_tool.clone();
        Ok(self.runner.run(&program, &args)?.stdout)
    }

    fn debounced(&mut self, op: &WindowOp) -> bool {
        let interval = match op.kind() {
            OpKind::Map | OpKind::Raise | OpKind::Minimize => self.config.state_debounce,
            _ => return false,
        };
        let target = op
            .handle()
            .map(DebounceTarget::Window)
            .unwrap_or(DebounceTarget::Global);
        !self.limiter.allow((op.kind(), target), interval)
    }

    fn current_states(&mut self, handle: WindowHandle) -> Result<Vec<String>> {
        let out = self.property_tool(vec![
            "-id".into(),
            handle.to_string(),
            NET_WM_STATE.into(),
        ])?;
        Ok(parse_atom_list(&out))
    }

    fn write_states(&mut self, handle: WindowHandle, atoms: &[String]) -> Result<()> {
        let args = if atoms.is_empty() {
            vec![
                "-id".into(),
                handle.to_string(),
                "-remove".into(),
                NET_WM_STATE.into(),
            ]
        } else {
            vec![
                "-id".into(),
                handle.to_string(),
                "-f".into(),
                NET_WM_STATE.into(),
                "32a".into(),
                "-set".into(),
                NET_WM_STATE.into(),
                atoms.join(","),
            ]
        };
        self.property_tool(args).map(|_| ())
    }

    fn update_state(&mut self, handle: WindowHandle, flag: &StateFlag, present: bool) -> Result<()> {
        let atom = flag.atom();
        let mut atoms = self.current_states(handle)?;
        atoms.retain(|a| *a != atom);
        if present {
            atoms.push(atom);
        }
        self.write_states(handle, &atoms)
    }

    fn run_property_op(&mut self, op: &WindowOp) -> Result<()> {
        match op {
            WindowOp::SetState { handle, flag } => self.update_state(*handle, flag, true),
            WindowOp::ClearState { handle, flag } => self.update_state(*handle, flag, false),
            WindowOp::SetWindowType { handle, kind } => self
                .property_tool(vec![
                    "-id".into(),
                    handle.to_string(),
                    "-f".into(),
                    NET_WM_WINDOW_TYPE.into(),
                    "32a".into(),
                    "-set".into(),
                    NET_WM_WINDOW_TYPE.into(),
                    kind.atom().into(),
                ])
                .map(|_| ()),
            WindowOp::StripDecorations(handle) => self
                .property_tool(vec![
                    "-id".into(),
                    handle.to_string(),
                    "-f".into(),
                    MOTIF_WM_HINTS.into(),
                    "32c".into(),
                    "-set".into(),
                    MOTIF_WM_HINTS.into(),
                    motif_value(MOTIF_NO_DECORATIONS),
                ])
                .map(|_| ()),
            other => anyhow::bail!("{other:?} is not a property operation"),
        }
    }

    fn run_op(&mut self, op: &WindowOp) -> Result<()> {
        match op.window_tool_args() {
            Some(args) => self.window_tool(args).map(|_| ()),
            None => self.run_property_op(op),
        }
    }
}

impl<R: CommandRunner> WindowControl for XdoControl<R> {
    fn find(&mut self, query: &WindowQuery) -> Option<WindowHandle> {
        if !self.limiter.allow(query_key(query), self.config.query_debounce) {
            tracing::debug!(%query, "window search debounced");
            return None;
        }
        self.search(query)
    }

    fn find_fresh(&mut self, query: &WindowQuery) -> Option<WindowHandle> {
        self.limiter.forget(&query_key(query));
        self.find(query)
    }

    fn geometry(&mut self, handle: WindowHandle) -> Option<Geometry> {
        match self.window_tool(vec![
            "getwindowgeometry".into(),
            "--shell".into(),
            handle.to_string(),
        ]) {
            Ok(out) => parse_shell_geometry(&out),
            Err(e) => {
                tracing::debug!(%handle, "geometry query failed: {e:#}");
                None
            }
        }
    }

    fn apply(&mut self, op: &WindowOp) -> bool {
        if self.debounced(op) {
            tracing::debug!(?op, "window op debounced");
            return false;
        }
        match self.run_op(op) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(?op, "window op failed: {e:#}");
                false
            }
        }
    }

    fn apply_batch(&mut self, ops: &[WindowOp]) -> bool {
        let mut ok = true;
        let mut chain: Vec<String> = Vec::new();
        for op in ops {
            match (op.tool(), op.window_tool_args()) {
                (ToolKind::Window, Some(args)) => chain.extend(args),
                _ => {
                    if !chain.is_empty() {
                        ok &= self.flush_chain(std::mem::take(&mut chain));
                    }
                    if let Err(e) = self.run_property_op(op) {
                        tracing::debug!(?op, "batched property op failed: {e:#}");
                        ok = false;
                    }
                }
            }
        }
        if !chain.is_empty() {
            ok &= self.flush_chain(chain);
        }
        ok
    }

    fn hide_pointer(&mut self) -> bool {
        let (x, y) = self.config.pointer_park;
        let mut any = false;
        match self.window_tool(vec!["mousemove".into(), x.to_string(), y.to_string()]) {
            Ok(_) => any = true,
            Err(e) => tracing::debug!("pointer park failed: {e:#}"),
        }
        if let Some((program, bitmap)) = self.config.root_cursor.clone() {
            let bitmap = bitmap.to_string_lossy().into_owned();
            let args = vec!["-cursor".to_string(), bitmap.clone(), bitmap];
            match self.runner.run(&program, &args) {
                Ok(_) => any = true,
                Err(e) => tracing::debug!("root cursor blank failed: {e:#}"),
            }
        }
        if let Some((program, args)) = self.config.cursor_blank.clone() {
            match self.runner.run(&program, &args) {
                Ok(_) => any = true,
                Err(e) => tracing::debug!("cursor blank failed: {e:#}"),
            }
        }
        any
    }
}

impl<R: CommandRunner> XdoControl<R> {
    fn search(&mut self, query: &WindowQuery) -> Option<WindowHandle> {
        let (flag, name) = match query {
            WindowQuery::Class(name) => ("--class", name),
            WindowQuery::Title(name) => ("--name", name),
        };
        match self.window_tool(vec!["search".into(), flag.into(), name.clone()]) {
            Ok(out) => out.lines().find_map(|l| l.parse::<WindowHandle>().ok()),
            Err(e) => {
                tracing::debug!(%query, "window search failed: {e:#}");
                None
            }
        }
    }

    fn flush_chain(&mut self, chain: Vec<String>) -> bool {
        match self.window_tool(chain) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("batched window command failed: {e:#}");
                false
            }
        }
    }
}

/// A 1x1 X bitmap with no bits set; as both cursor and mask it draws nothing.
pub const BLANK_CURSOR_XBM: &str = "#define blank_width 1\n\
#define blank_height 1\n\
static unsigned char blank_bits[] = { 0x00 };\n";

/// Write [`BLANK_CURSOR_XBM`] into `dir` and return its path.
pub fn write_blank_cursor(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("kiosk_player_blank.xbm");
    std::fs::write(&path, BLANK_CURSOR_XBM)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn query_key(query: &WindowQuery) -> DebounceKey {
    let kind = match query {
        WindowQuery::Class(_) => OpKind::FindByClass,
        WindowQuery::Title(_) => OpKind::FindByTitle,
    };
    (kind, DebounceTarget::Query(query.clone()))
}

/// Parse `getwindowgeometry --shell` output (`X=`, `Y=`, `WIDTH=`, `HEIGHT=`
/// lines).
pub fn parse_shell_geometry(output: &str) -> Option<Geometry> {
    let mut x = None;
    let mut y = None;
    let mut width = None;
    let mut height = None;
    for line in output.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "X" => x = value.parse().ok(),
            "Y" => y = value.parse().ok(),
            "WIDTH" => width = value.parse().ok(),
            "HEIGHT" => height = value.parse().ok(),
            _ => {}
        }
    }
    Some(Geometry {
        x: x?,
        y: y?,
        width: width?,
        height: height?,
    })
}
