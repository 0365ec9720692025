//! Best-effort control over host windows owned by other processes.

pub mod control;
pub mod debounce;
pub mod handle;
pub mod hints;
pub mod op;
pub mod resolver;
pub mod runner;
pub mod xdo;

pub use control::{NullControl, WindowControl};
pub use handle::{Geometry, WindowHandle, WindowQuery, WindowRole};
pub use hints::{StateFlag, WindowType};
pub use op::WindowOp;
pub use resolver::{ResolveOptions, WindowResolver};
pub use xdo::{XdoConfig, XdoControl};

use crate::settings::Settings;
use runner::{parse_command_spec, SystemRunner};

/// Build the window control backend for the current host.
pub fn host_control(settings: &Settings) -> Box<dyn WindowControl> {
    if cfg!(all(unix, not(target_os = "macos"))) {
        let runner = SystemRunner::new(settings.display.clone(), settings.tool_timeout());
        Box::new(XdoControl::new(xdo_config(settings), runner))
    } else {
        tracing::info!("no supported window system; window control disabled");
        Box::new(NullControl)
    }
}

pub fn xdo_config(settings: &Settings) -> XdoConfig {
    XdoConfig {
        window_tool: settings.window_tool.clone(),
        property_tool: settings.property_tool.clone(),
        query_debounce: settings.query_debounce(),
        state_debounce: settings.state_debounce(),
        pointer_park: settings.pointer_park,
        root_cursor: root_cursor(settings),
        cursor_blank: settings
            .cursor_blank_command
            .as_deref()
            .and_then(parse_command_spec),
    }
}

/// The root-cursor blanking method, with its bitmap written to the temp dir.
/// A failed write disables the method; pointer parking still applies.
fn root_cursor(settings: &Settings) -> Option<(String, std::path::PathBuf)> {
    let tool = settings.root_cursor_tool.clone()?;
    match xdo::write_blank_cursor(&std::env::temp_dir()) {
        Ok(path) => Some((tool, path)),
        Err(e) => {
            tracing::warn!("root cursor blanking disabled: {e:#}");
            None
        }
    }
}
