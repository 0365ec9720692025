use std::time::Duration;

use crate::window::control::WindowControl;
use crate::window::handle::{Geometry, WindowHandle};
use crate::window::op::WindowOp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    Op(WindowOp),
    /// Issued through the batched path.
    Batch(Vec<WindowOp>),
    /// Repeated back to back; succeeds if any attempt did.
    StripDecorations { handle: WindowHandle, attempts: u32 },
    HidePointer,
    /// Move and resize only when the current size differs from `target`.
    PlaceIfNeeded { handle: WindowHandle, target: Geometry },
    Wait,
}

impl StepAction {
    /// The mutating primitives this action may issue, in order.
    pub fn ops(&self) -> Vec<WindowOp> {
        match self {
            StepAction::Op(op) => vec![op.clone()],
            StepAction::Batch(ops) => ops.clone(),
            StepAction::StripDecorations { handle, attempts } => {
                vec![WindowOp::StripDecorations(*handle); *attempts as usize]
            }
            StepAction::HidePointer | StepAction::Wait => Vec::new(),
            StepAction::PlaceIfNeeded { handle, target } => place_ops(*handle, *target),
        }
    }
}

/// How a failing step affects the rest of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Failure is routine (window managers reject these intermittently).
    Expected,
    /// Log and carry on; the sequence still moves toward the goal state.
    Warn,
    /// Stop the sequence.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoreographyStep {
    pub label: &'static str,
    pub action: StepAction,
    pub policy: FailurePolicy,
    pub settle: Duration,
}

impl ChoreographyStep {
    pub fn new(label: &'static str, action: StepAction) -> Self {
        Self {
            label,
            action,
            policy: FailurePolicy::Warn,
            settle: Duration::ZERO,
        }
    }

    pub fn op(label: &'static str, op: WindowOp) -> Self {
        Self::new(label, StepAction::Op(op))
    }

    pub fn batch(label: &'static str, ops: Vec<WindowOp>) -> Self {
        Self::new(label, StepAction::Batch(ops))
    }

    pub fn strip_decorations(label: &'static str, handle: WindowHandle, attempts: u32) -> Self {
        Self::new(label, StepAction::StripDecorations { handle, attempts })
            .policy(FailurePolicy::Expected)
    }

    pub fn hide_pointer(label: &'static str) -> Self {
        Self::new(label, StepAction::HidePointer).policy(FailurePolicy::Expected)
    }

    /// A pure delay.
    pub fn settle_for(label: &'static str, delay: Duration) -> Self {
        Self::new(label, StepAction::Wait).settle(delay)
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn settle(mut self, delay: Duration) -> Self {
        self.settle = delay;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub executed: usize,
    pub failed: Vec<&'static str>,
    pub aborted_at: Option<&'static str>,
}

impl StepReport {
    pub fn completed(&self) -> bool {
        self.aborted_at.is_none()
    }
}

fn place_ops(handle: WindowHandle, target: Geometry) -> Vec<WindowOp> {
    vec![
        WindowOp::Move {
            handle,
            x: target.x,
            y: target.y,
        },
        WindowOp::Resize {
            handle,
            width: target.width,
            height: target.height,
        },
    ]
}

fn execute(control: &mut dyn WindowControl, action: &StepAction) -> bool {
    match action {
        StepAction::Op(op) => control.apply(op),
        StepAction::Batch(ops) => control.apply_batch(ops),
        StepAction::StripDecorations { handle, attempts } => {
            let mut any = false;
            for _ in 0..*attempts {
                any |= control.remove_decorations(*handle);
            }
            any
        }
        StepAction::HidePointer => control.hide_pointer(),
        StepAction::PlaceIfNeeded { handle, target } => match control.geometry(*handle) {
            Some(current) if current.same_size(target) => {
                tracing::debug!(%handle, "geometry already matches; skipping resize");
                true
            }
            _ => control.apply_batch(&place_ops(*handle, *target)),
        },
        StepAction::Wait => true,
    }
}

/// Execute `steps` in order, sleeping each step's settle delay after it.
pub fn run_steps(control: &mut dyn WindowControl, steps: &[ChoreographyStep]) -> StepReport {
    let mut report = StepReport::default();
    for step in steps {
        let ok = execute(control, &step.action);
        report.executed += 1;
        if !ok {
            report.failed.push(step.label);
            match step.policy {
                FailurePolicy::Expected => {
                    tracing::debug!(step = step.label, "choreography step failed");
                }
                FailurePolicy::Warn => {
                    tracing::warn!(step = step.label, "choreography step failed");
                }
                FailurePolicy::Abort => {
                    tracing::warn!(step = step.label, "choreography aborted");
                    report.aborted_at = Some(step.label);
                    return report;
                }
            }
        }
        if !step.settle.is_zero() {
            std::thread::sleep(step.settle);
        }
    }
    report
}
