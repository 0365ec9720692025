use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::window::hints::WindowType;

/// Retry counts and settle delays used by the transition protocols.
///
/// The defaults were tuned against a single window manager. Other window
/// managers may need different values; none of them are universal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreographyTuning {
    /// Decoration strips while preparing the hidden UI window.
    #[serde(default = "default_ten")]
    pub prepare_decoration_attempts: u32,
    /// Decoration strips right after mapping the UI window.
    #[serde(default = "default_ten")]
    pub post_map_decoration_attempts: u32,
    /// Decoration strips on the player window before it is hidden.
    #[serde(default = "default_player_predecoration_attempts")]
    pub player_predecoration_attempts: u32,
    /// Decoration strips right after mapping the player window.
    #[serde(default = "default_player_post_map_decoration_attempts")]
    pub player_post_map_decoration_attempts: u32,
    #[serde(default = "default_pre_map_settle_ms")]
    pub pre_map_settle_ms: u64,
    #[serde(default = "default_brief_wait_ms")]
    pub brief_wait_ms: u64,
    #[serde(default = "default_raise_gap_ms")]
    pub raise_gap_ms: u64,
    #[serde(default = "default_player_resolve_attempts")]
    pub player_resolve_attempts: u32,
    #[serde(default = "default_player_resolve_delay_ms")]
    pub player_resolve_delay_ms: u64,
    #[serde(default = "default_validation_delay_ms")]
    pub validation_delay_ms: u64,
    /// Backoff before the driver retries a failed transition.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Where hidden windows are parked.
    #[serde(default = "default_offscreen")]
    pub offscreen: (i32, i32),
    #[serde(default = "default_ui_window_type")]
    pub ui_window_type: WindowType,
    /// Also require the shown window's geometry to match the target area
    /// when validating.
    #[serde(default)]
    pub verify_geometry: bool,
}

fn default_ten() -> u32 {
    10
}

fn default_player_predecoration_attempts() -> u32 {
    3
}

fn default_player_post_map_decoration_attempts() -> u32 {
    5
}

fn default_pre_map_settle_ms() -> u64 {
    50
}

fn default_brief_wait_ms() -> u64 {
    20
}

fn default_raise_gap_ms() -> u64 {
    100
}

fn default_player_resolve_attempts() -> u32 {
    5
}

fn default_player_resolve_delay_ms() -> u64 {
    200
}

fn default_validation_delay_ms() -> u64 {
    100
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_offscreen() -> (i32, i32) {
    (-10000, -10000)
}

fn default_ui_window_type() -> WindowType {
    WindowType::Dock
}

impl Default for ChoreographyTuning {
    fn default() -> Self {
        Self {
            prepare_decoration_attempts: default_ten(),
            post_map_decoration_attempts: default_ten(),
            player_predecoration_attempts: default_player_predecoration_attempts(),
            player_post_map_decoration_attempts: default_player_post_map_decoration_attempts(),
            pre_map_settle_ms: default_pre_map_settle_ms(),
            brief_wait_ms: default_brief_wait_ms(),
            raise_gap_ms: default_raise_gap_ms(),
            player_resolve_attempts: default_player_resolve_attempts(),
            player_resolve_delay_ms: default_player_resolve_delay_ms(),
            validation_delay_ms: default_validation_delay_ms(),
            retry_backoff_ms: default_retry_backoff_ms(),
            offscreen: default_offscreen(),
            ui_window_type: default_ui_window_type(),
            verify_geometry: false,
        }
    }
}

impl ChoreographyTuning {
    /// Default counts with every delay zeroed.
    pub fn immediate() -> Self {
        Self {
            pre_map_settle_ms: 0,
            brief_wait_ms: 0,
            raise_gap_ms: 0,
            player_resolve_delay_ms: 0,
            validation_delay_ms: 0,
            retry_backoff_ms: 0,
            ..Self::default()
        }
    }

    pub fn pre_map_settle(&self) -> Duration {
        Duration::from_millis(self.pre_map_settle_ms)
    }

    pub fn brief_wait(&self) -> Duration {
        Duration::from_millis(self.brief_wait_ms)
    }

    pub fn raise_gap(&self) -> Duration {
        Duration::from_millis(self.raise_gap_ms)
    }

    pub fn player_resolve_delay(&self) -> Duration {
        Duration::from_millis(self.player_resolve_delay_ms)
    }

    pub fn validation_delay(&self) -> Duration {
        Duration::from_millis(self.validation_delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
