use crate::window::handle::{Geometry, WindowHandle, WindowQuery};
use crate::window::hints::{StateFlag, WindowType};
use crate::window::op::WindowOp;

/// Best-effort control over host windows.
///
/// Every method reports failure through its return value and never panics.
/// Implementations do not retry; retry policy belongs to the caller.
pub trait WindowControl {
    fn find(&mut self, query: &WindowQuery) -> Option<WindowHandle>;

    /// A lookup that backend rate limiting never suppresses. Forced
    /// refreshes go through here, since a skipped search would read as a
    /// missing window.
    fn find_fresh(&mut self, query: &WindowQuery) -> Option<WindowHandle> {
        self.find(query)
    }

    fn geometry(&mut self, handle: WindowHandle) -> Option<Geometry>;

    fn apply(&mut self, op: &WindowOp) -> bool;

    /// Apply `ops` in order, as few tool invocations as the backend allows.
    /// Succeeds only if every part succeeded.
    fn apply_batch(&mut self, ops: &[WindowOp]) -> bool;

    /// Park the pointer off-screen and blank it.
    fn hide_pointer(&mut self) -> bool;

    fn find_by_class(&mut self, class: &str) -> Option<WindowHandle> {
        self.find(&WindowQuery::Class(class.to_string()))
    }

    fn find_by_title(&mut self, title: &str) -> Option<WindowHandle> {
        self.find(&WindowQuery::Title(title.to_string()))
    }

    fn show(&mut self, handle: WindowHandle) -> bool {
        self.apply(&WindowOp::Map(handle))
    }

    fn raise_to_top(&mut self, handle: WindowHandle) -> bool {
        self.apply(&WindowOp::Raise(handle))
    }

    fn minimize(&mut self, handle: WindowHandle) -> bool {
        self.apply(&WindowOp::Minimize(handle))
    }

    fn activate(&mut self, handle: WindowHandle) -> bool {
        self.apply(&WindowOp::Activate(handle))
    }

    fn move_to(&mut self, handle: WindowHandle, x: i32, y: i32) -> bool {
        self.apply(&WindowOp::Move { handle, x, y })
    }

    fn resize(&mut self, handle: WindowHandle, width: u32, height: u32) -> bool {
        self.apply(&WindowOp::Resize {
            handle,
            width,
            height,
        })
    }

    /// Move and resize in a single batched invocation.
    fn place(&mut self, handle: WindowHandle, geometry: Geometry) -> bool {
        self.apply_batch(&[
            WindowOp::Move {
                handle,
                x: geometry.x,
                y: geometry.y,
            },
            WindowOp::Resize {
                handle,
                width: geometry.width,
                height: geometry.height,
            },
        ])
    }

    fn set_state_flag(&mut self, handle: WindowHandle, flag: StateFlag) -> bool {
        self.apply(&WindowOp::SetState { handle, flag })
    }

    fn clear_state_flag(&mut self, handle: WindowHandle, flag: StateFlag) -> bool {
        self.apply(&WindowOp::ClearState { handle, flag })
    }

    fn set_window_type(&mut self, handle: WindowHandle, kind: WindowType) -> bool {
        self.apply(&WindowOp::SetWindowType { handle, kind })
    }

    fn remove_decorations(&mut self, handle: WindowHandle) -> bool {
        self.apply(&WindowOp::StripDecorations(handle))
    }
}

/// Backend for hosts without a supported windowing system: every operation
/// is a silent no-op failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullControl;

impl WindowControl for NullControl {
    fn find(&mut self, _query: &WindowQuery) -> Option<WindowHandle> {
        None
    }

    fn geometry(&mut self, _handle: WindowHandle) -> Option<Geometry> {
        None
    }

    fn apply(&mut self, _op: &WindowOp) -> bool {
        false
    }

    fn apply_batch(&mut self, _ops: &[WindowOp]) -> bool {
        false
    }

    fn hide_pointer(&mut self) -> bool {
        false
    }
}
