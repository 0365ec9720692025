//! Screen layout and per-frame compositing.

pub mod buffer;
pub mod composite;
pub mod layout;

pub use buffer::{Rgba, RgbaBuffer};
pub use composite::{load_frame, CompositeReport, Compositor, ContentDraw, FrameRequest};
pub use layout::{DisplayLayout, DisplayMode, Rect, Resolution, CONTENT_RESOLUTION};
