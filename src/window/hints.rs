use serde::{Deserialize, Serialize};

pub const NET_WM_STATE: &str = "_NET_WM_STATE";
pub const NET_WM_WINDOW_TYPE: &str = "_NET_WM_WINDOW_TYPE";
pub const MOTIF_WM_HINTS: &str = "_MOTIF_WM_HINTS";

/// `flags = MWM_HINTS_DECORATIONS`, `decorations = 0`.
pub const MOTIF_NO_DECORATIONS: [u32; 5] = [2, 0, 0, 0, 0];

/// Window-manager state hint, named with the host protocol's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateFlag {
    Above,
    Below,
    Hidden,
    Iconic,
    MaximizedVert,
    MaximizedHorz,
    Fullscreen,
    /// Passed through verbatim as `_NET_WM_STATE_<name>`.
    Other(String),
}

impl StateFlag {
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().trim_start_matches("_NET_WM_STATE_").to_ascii_uppercase();
        match upper.as_str() {
            "ABOVE" => StateFlag::Above,
            "BELOW" => StateFlag::Below,
            "HIDDEN" => StateFlag::Hidden,
            "ICONIC" => StateFlag::Iconic,
            "MAXIMIZED_VERT" => StateFlag::MaximizedVert,
            "MAXIMIZED_HORZ" => StateFlag::MaximizedHorz,
            "FULLSCREEN" => StateFlag::Fullscreen,
            _ => StateFlag::Other(upper),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StateFlag::Above => "ABOVE",
            StateFlag::Below => "BELOW",
            StateFlag::Hidden => "HIDDEN",
            StateFlag::Iconic => "ICONIC",
            StateFlag::MaximizedVert => "MAXIMIZED_VERT",
            StateFlag::MaximizedHorz => "MAXIMIZED_HORZ",
            StateFlag::Fullscreen => "FULLSCREEN",
            StateFlag::Other(name) => name,
        }
    }

    pub fn atom(&self) -> String {
        format!("{NET_WM_STATE}_{}", self.name())
    }
}

impl std::fmt::Display for StateFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    Dock,
    Splash,
    Normal,
}

impl WindowType {
    pub fn atom(self) -> &'static str {
        match self {
            WindowType::Dock => "_NET_WM_WINDOW_TYPE_DOCK",
            WindowType::Splash => "_NET_WM_WINDOW_TYPE_SPLASH",
            WindowType::Normal => "_NET_WM_WINDOW_TYPE_NORMAL",
        }
    }
}

/// Parse the atom list out of a property tool line such as
/// `_NET_WM_STATE(ATOM) = _NET_WM_STATE_ABOVE, _NET_WM_STATE_HIDDEN`.
///
/// A property that is not set yields an empty list.
pub fn parse_atom_list(output: &str) -> Vec<String> {
    let Some(line) = output.lines().find(|l| l.contains('=')) else {
        return Vec::new();
    };
    let Some((_, values)) = line.split_once('=') else {
        return Vec::new();
    };
    values
        .split(',')
        .map(|v| v.trim())
        .filter(|v| v.starts_with('_'))
        .map(str::to_string)
        .collect()
}

pub fn motif_value(hints: [u32; 5]) -> String {
    hints
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
