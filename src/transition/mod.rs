//! Seamless handover of screen ownership between the UI and player windows.

pub mod manager;
pub mod plan;
pub mod state;
pub mod steps;
pub mod tuning;

pub use manager::{TransitionManager, TransitionOutcome};
pub use state::{TransitionDirection, TransitionState};
pub use steps::{run_steps, ChoreographyStep, FailurePolicy, StepAction, StepReport};
pub use tuning::ChoreographyTuning;

use crate::settings::Settings;
use crate::window::resolver::WindowResolver;

pub fn manager_from_settings(settings: &Settings) -> TransitionManager {
    let resolver = WindowResolver::new(
        settings.ui_window.clone(),
        settings.player_window.clone(),
        settings.cache_ttl(),
    );
    let mut tuning = settings.choreography.clone();
    // A second raise inside the raise debounce would be dropped.
    if tuning.raise_gap_ms < settings.state_debounce_ms {
        tracing::warn!(
            raise_gap_ms = tuning.raise_gap_ms,
            state_debounce_ms = settings.state_debounce_ms,
            "raise gap shorter than the raise debounce; widening it"
        );
        tuning.raise_gap_ms = settings.state_debounce_ms;
    }
    TransitionManager::new(resolver, tuning, settings.screen_geometry())
}

#[cfg(test)]
mod tests {
    use super::manager_from_settings;
    use crate::settings::Settings;

    #[test]
    fn raise_gap_never_undercuts_the_raise_debounce() {
        let mut settings = Settings::default();
        settings.choreography.raise_gap_ms = 10;
        settings.state_debounce_ms = 50;
        assert_eq!(manager_from_settings(&settings).tuning().raise_gap_ms, 50);

        settings.choreography.raise_gap_ms = 120;
        assert_eq!(manager_from_settings(&settings).tuning().raise_gap_ms, 120);
    }
}
