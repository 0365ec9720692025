use crate::window::handle::WindowHandle;
use crate::window::hints::{StateFlag, WindowType};

/// A single window-control primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOp {
    Map(WindowHandle),
    Unmap(WindowHandle),
    Raise(WindowHandle),
    Minimize(WindowHandle),
    Activate(WindowHandle),
    Move { handle: WindowHandle, x: i32, y: i32 },
    Resize { handle: WindowHandle, width: u32, height: u32 },
    MovePointer { x: i32, y: i32 },
    SetState { handle: WindowHandle, flag: StateFlag },
    ClearState { handle: WindowHandle, flag: StateFlag },
    SetWindowType { handle: WindowHandle, kind: WindowType },
    StripDecorations(WindowHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    FindByClass,
    FindByTitle,
    Geometry,
    Map,
    Unmap,
    Raise,
    Minimize,
    Activate,
    Move,
    Resize,
    MovePointer,
    SetState,
    ClearState,
    SetWindowType,
    StripDecorations,
    HidePointer,
}

/// Which external tool carries an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Window,
    Property,
}

impl WindowOp {
    pub fn kind(&self) -> OpKind {
        match self {
            WindowOp::Map(_) => OpKind::Map,
            WindowOp::Unmap(_) => OpKind::Unmap,
            WindowOp::Raise(_) => OpKind::Raise,
            WindowOp::Minimize(_) => OpKind::Minimize,
            WindowOp::Activate(_) => OpKind::Activate,
            WindowOp::Move { .. } => OpKind::Move,
            WindowOp::Resize { .. } => OpKind::Resize,
            WindowOp::MovePointer { .. } => OpKind::MovePointer,
            WindowOp::SetState { .. } => OpKind::SetState,
            WindowOp::ClearState { .. } => OpKind::ClearState,
            WindowOp::SetWindowType { .. } => OpKind::SetWindowType,
            WindowOp::StripDecorations(_) => OpKind::StripDecorations,
        }
    }

    pub fn handle(&self) -> Option<WindowHandle> {
        match self {
            WindowOp::Map(h)
            | WindowOp::Unmap(h)
            | WindowOp::Raise(h)
            | WindowOp::Minimize(h)
            | WindowOp::Activate(h)
            | WindowOp::StripDecorations(h) => Some(*h),
            WindowOp::Move { handle, .. }
            | WindowOp::Resize { handle, .. }
            | WindowOp::SetState { handle, .. }
            | WindowOp::ClearState { handle, .. }
            | WindowOp::SetWindowType { handle, .. } => Some(*handle),
            WindowOp::MovePointer { .. } => None,
        }
    }

    pub fn tool(&self) -> ToolKind {
        match self {
            WindowOp::SetState { .. }
            | WindowOp::ClearState { .. }
            | WindowOp::SetWindowType { .. }
            | WindowOp::StripDecorations(_) => ToolKind::Property,
            _ => ToolKind::Window,
        }
    }

    /// True for geometry or decoration mutations, which must land before a
    /// window is mapped.
    pub fn is_presentation_change(&self) -> bool {
        matches!(
            self,
            WindowOp::Move { .. }
                | WindowOp::Resize { .. }
                | WindowOp::StripDecorations(_)
                | WindowOp::SetWindowType { .. }
        )
    }

    /// Sub-command words for the window tool. Property-tool operations have
    /// no window-tool form and return `None`.
    pub fn window_tool_args(&self) -> Option<Vec<String>> {
        let args = match self {
            WindowOp::Map(h) => vec!["windowmap".into(), h.to_string()],
            WindowOp::Unmap(h) => vec!["windowunmap".into(), h.to_string()],
            WindowOp::Raise(h) => vec!["windowraise".into(), h.to_string()],
            WindowOp::Minimize(h) => vec!["windowminimize".into(), h.to_string()],
            WindowOp::Activate(h) => vec!["windowactivate".into(), h.to_string()],
            WindowOp::Move { handle, x, y } => vec![
                "windowmove".into(),
                handle.to_string(),
                x.to_string(),
                y.to_string(),
            ],
            WindowOp::Resize {
                handle,
                width,
                height,
            } => vec![
                "windowsize".into(),
                handle.to_string(),
                width.to_string(),
                height.to_string(),
            ],
            WindowOp::MovePointer { x, y } => {
                vec!["mousemove".into(), x.to_string(), y.to_string()]
            }
            _ => return None,
        };
        Some(args)
    }
}
