#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    TransitioningToUi,
    TransitioningToVideo,
}

impl TransitionState {
    pub fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn for_direction(direction: TransitionDirection) -> Self {
        match direction {
            TransitionDirection::ToUi => Self::TransitioningToUi,
            TransitionDirection::ToVideo => Self::TransitioningToVideo,
            TransitionDirection::None => Self::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionDirection {
    ToUi,
    ToVideo,
    None,
}

impl std::fmt::Display for TransitionDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionDirection::ToUi => write!(f, "to-ui"),
            TransitionDirection::ToVideo => write!(f, "to-video"),
            TransitionDirection::None => write!(f, "none"),
        }
    }
}

/// Transitions run one at a time: only Idle may start one, and every
/// in-flight transition returns to Idle.
pub fn can_transition(from: TransitionState, to: TransitionState) -> bool {
    matches!(
        (from, to),
        (TransitionState::Idle, TransitionState::TransitioningToUi)
            | (TransitionState::Idle, TransitionState::TransitioningToVideo)
            | (TransitionState::TransitioningToUi, TransitionState::Idle)
            | (TransitionState::TransitioningToVideo, TransitionState::Idle)
    ) || from == to
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_cannot_interleave() {
        assert!(can_transition(
            TransitionState::Idle,
            TransitionState::TransitioningToVideo
        ));
        assert!(!can_transition(
            TransitionState::TransitioningToUi,
            TransitionState::TransitioningToVideo
        ));
        assert!(!can_transition(
            TransitionState::TransitioningToVideo,
            TransitionState::TransitioningToUi
        ));
        assert!(can_transition(
            TransitionState::TransitioningToUi,
            TransitionState::Idle
        ));
    }
}
