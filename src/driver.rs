use crate::display::composite::FrameRequest;
use crate::transition::manager::{TransitionManager, TransitionOutcome};
use crate::transition::state::TransitionDirection;
use crate::window::control::WindowControl;

/// Owns the playback/visibility flags and turns menu<->video intents into
/// transitions, one at a time.
#[derive(Debug)]
pub struct PlaybackDriver {
    transitions: TransitionManager,
    has_playback: bool,
    ui_hidden: bool,
    pending: Option<TransitionDirection>,
}

impl PlaybackDriver {
    pub fn new(transitions: TransitionManager) -> Self {
        Self {
            transitions,
            has_playback: false,
            ui_hidden: false,
            pending: None,
        }
    }

    pub fn has_playback(&self) -> bool {
        self.has_playback
    }

    pub fn ui_hidden(&self) -> bool {
        self.ui_hidden
    }

    pub fn transitions(&self) -> &TransitionManager {
        &self.transitions
    }

    pub fn transitions_mut(&mut self) -> &mut TransitionManager {
        &mut self.transitions
    }

    pub fn playback_started(&mut self) {
        self.has_playback = true;
    }

    /// Playback ended; the player window (if any) is about to go away.
    pub fn playback_stopped(&mut self) {
        self.has_playback = false;
        self.transitions.invalidate();
    }

    /// Queue a transition for the next [`pump`](Self::pump). A newer request
    /// replaces an older one that has not run yet.
    pub fn request(&mut self, direction: TransitionDirection) {
        if direction == TransitionDirection::None {
            return;
        }
        if let Some(prev) = self.pending.replace(direction) {
            tracing::debug!(%prev, next = %direction, "pending transition replaced");
        }
    }

    pub fn pending(&self) -> Option<TransitionDirection> {
        self.pending
    }

    /// Run the queued transition, if any. Returns whether it succeeded.
    pub fn pump(&mut self, control: &mut dyn WindowControl) -> Option<bool> {
        let direction = self.pending.take()?;
        Some(match direction {
            TransitionDirection::ToUi => self.switch_to_ui(control),
            TransitionDirection::ToVideo => self.switch_to_video(control),
            TransitionDirection::None => true,
        })
    }

    pub fn switch_to_video(&mut self, control: &mut dyn WindowControl) -> bool {
        if self.run_with_retry(control, TransitionDirection::ToVideo) {
            self.ui_hidden = true;
            return true;
        }
        tracing::warn!("falling back to the ui window");
        if self.transitions.ensure_ui_visible(control) {
            self.ui_hidden = false;
        }
        false
    }

    pub fn switch_to_ui(&mut self, control: &mut dyn WindowControl) -> bool {
        if self.run_with_retry(control, TransitionDirection::ToUi) {
            self.ui_hidden = false;
            return true;
        }
        tracing::warn!("forcing the ui window visible");
        if self.transitions.ensure_ui_visible(control) {
            self.ui_hidden = false;
        }
        false
    }

    fn run_once(
        &mut self,
        control: &mut dyn WindowControl,
        direction: TransitionDirection,
    ) -> TransitionOutcome {
        match direction {
            TransitionDirection::ToVideo => self.transitions.to_video(control),
            _ => self.transitions.to_ui(control),
        }
    }

    fn run_with_retry(
        &mut self,
        control: &mut dyn WindowControl,
        direction: TransitionDirection,
    ) -> bool {
        let outcome = self.run_once(control, direction);
        match outcome {
            TransitionOutcome::Completed => return true,
            TransitionOutcome::Busy => return false,
            TransitionOutcome::Unresolved(_) => self.transitions.invalidate(),
            _ => {}
        }
        let backoff = self.transitions.tuning().retry_backoff();
        if !backoff.is_zero() {
            std::thread::sleep(backoff);
        }
        tracing::info!(%direction, ?outcome, "retrying transition");
        self.run_once(control, direction).succeeded()
    }

    /// The player should show through the UI layer.
    pub fn preserve_player_region(&self) -> bool {
        self.has_playback && self.ui_hidden
    }

    pub fn frame_request(&self, overlay_visible: bool) -> FrameRequest {
        FrameRequest {
            preserve_player_region: self.preserve_player_region(),
            overlay_visible,
        }
    }
}
