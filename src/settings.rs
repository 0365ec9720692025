use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::display::layout::{DisplayLayout, DisplayMode, Resolution, CONTENT_RESOLUTION};
use crate::transition::tuning::ChoreographyTuning;
use crate::window::handle::{Geometry, WindowQuery};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Also write logs to this file.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Display target handed to every window tool invocation.
    #[serde(default = "default_display")]
    pub display: String,
    #[serde(default = "default_window_tool")]
    pub window_tool: String,
    #[serde(default = "default_property_tool")]
    pub property_tool: String,
    /// Tool that sets the root window cursor to a blank bitmap when the
    /// pointer is hidden. `null` disables it.
    #[serde(default = "default_root_cursor_tool")]
    pub root_cursor_tool: Option<String>,
    /// Extra command run to blank the pointer image, e.g.
    /// `xsetroot -cursor /usr/share/kiosk/blank.xbm /usr/share/kiosk/blank.xbm`.
    #[serde(default)]
    pub cursor_blank_command: Option<String>,
    /// Where the pointer is parked when hidden. Out-of-range values clamp to
    /// the screen corner.
    #[serde(default = "default_pointer_park")]
    pub pointer_park: (i32, i32),
    #[serde(default = "default_tool_timeout_ms")]
    pub tool_timeout_ms: u64,
    /// Minimum spacing between identical window searches.
    #[serde(default = "default_query_debounce_ms")]
    pub query_debounce_ms: u64,
    /// Minimum spacing between identical map/raise/minimize calls.
    #[serde(default = "default_state_debounce_ms")]
    pub state_debounce_ms: u64,
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
    #[serde(default = "default_ui_window")]
    pub ui_window: WindowQuery,
    #[serde(default = "default_player_window")]
    pub player_window: WindowQuery,
    #[serde(default = "default_display_mode")]
    pub display_mode: DisplayMode,
    #[serde(default = "default_target_resolution")]
    pub target_resolution: Resolution,
    /// Decorative bezel drawn in `letterboxed_with_frame` mode.
    #[serde(default)]
    pub frame_image: Option<PathBuf>,
    #[serde(default = "default_player_socket")]
    pub player_socket: PathBuf,
    #[serde(default)]
    pub choreography: ChoreographyTuning,
}

fn default_display() -> String {
    ":0".into()
}

fn default_window_tool() -> String {
    "xdotool".into()
}

fn default_property_tool() -> String {
    "xprop".into()
}

fn default_root_cursor_tool() -> Option<String> {
    Some("xsetroot".into())
}

fn default_pointer_park() -> (i32, i32) {
    (10000, 10000)
}

fn default_tool_timeout_ms() -> u64 {
    500
}

fn default_query_debounce_ms() -> u64 {
    200
}

fn default_state_debounce_ms() -> u64 {
    50
}

fn default_cache_ttl_ms() -> u64 {
    5000
}

fn default_ui_window() -> WindowQuery {
    WindowQuery::Title("KioskUI".into())
}

fn default_player_window() -> WindowQuery {
    WindowQuery::Class("mpv".into())
}

fn default_display_mode() -> DisplayMode {
    DisplayMode::NativeContentOnly
}

fn default_target_resolution() -> Resolution {
    CONTENT_RESOLUTION
}

fn default_player_socket() -> PathBuf {
    PathBuf::from("/tmp/kiosk-mpv.sock")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            display: default_display(),
            window_tool: default_window_tool(),
            property_tool: default_property_tool(),
            root_cursor_tool: default_root_cursor_tool(),
            cursor_blank_command: None,
            pointer_park: default_pointer_park(),
            tool_timeout_ms: default_tool_timeout_ms(),
            query_debounce_ms: default_query_debounce_ms(),
            state_debounce_ms: default_state_debounce_ms(),
            cache_ttl_ms: default_cache_ttl_ms(),
            ui_window: default_ui_window(),
            player_window: default_player_window(),
            display_mode: default_display_mode(),
            target_resolution: default_target_resolution(),
            frame_image: None,
            player_socket: default_player_socket(),
            choreography: ChoreographyTuning::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_millis(self.tool_timeout_ms)
    }

    pub fn query_debounce(&self) -> Duration {
        Duration::from_millis(self.query_debounce_ms)
    }

    pub fn state_debounce(&self) -> Duration {
        Duration::from_millis(self.state_debounce_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn layout(&self) -> DisplayLayout {
        DisplayLayout::new(self.display_mode, self.target_resolution)
    }

    /// The whole physical screen, which the player window fills.
    pub fn screen_geometry(&self) -> Geometry {
        Geometry {
            x: 0,
            y: 0,
            width: self.target_resolution.width,
            height: self.target_resolution.height,
        }
    }
}
