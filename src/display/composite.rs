use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;

use crate::display::buffer::{Rgba, RgbaBuffer};
use crate::display::layout::{DisplayLayout, DisplayMode, Rect};

/// Per-frame inputs decided by the playback driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameRequest {
    /// The player window is showing through the content region and must not
    /// be painted over.
    pub preserve_player_region: bool,
    /// UI elements (e.g. a track caption) still need drawing over the
    /// player region.
    pub overlay_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentDraw {
    Copied,
    Blended,
}

/// What a call to [`Compositor::compose`] painted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeReport {
    pub filled: Vec<Rect>,
    pub content: Option<ContentDraw>,
    pub frame_drawn: bool,
}

/// Paints the screen buffer from the UI's own content buffer, leaving the
/// player's screen area alone when it should show through.
pub struct Compositor {
    layout: DisplayLayout,
    frame_source: Option<RgbaBuffer>,
    frame: Option<RgbaBuffer>,
    filter: FilterType,
}

impl Compositor {
    pub fn new(layout: DisplayLayout) -> Self {
        Self {
            layout,
            frame_source: None,
            frame: None,
            filter: FilterType::Nearest,
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn layout(&self) -> &DisplayLayout {
        &self.layout
    }

    /// Swap in a layout after a mode or resolution change.
    pub fn set_layout(&mut self, layout: DisplayLayout) {
        self.layout = layout;
        self.frame = self.frame_source.as_ref().map(|src| self.fit_frame(src));
    }

    pub fn set_frame(&mut self, frame: Option<RgbaBuffer>) {
        self.frame = frame.as_ref().map(|src| self.fit_frame(src));
        self.frame_source = frame;
    }

    pub fn has_frame(&self) -> bool {
        self.layout.mode == DisplayMode::LetterboxedWithFrame && self.frame.is_some()
    }

    fn fit_frame(&self, src: &RgbaBuffer) -> RgbaBuffer {
        src.scaled(
            self.layout.target.width,
            self.layout.target.height,
            FilterType::Triangle,
        )
    }

    pub fn compose(
        &self,
        screen: &mut RgbaBuffer,
        ui: &RgbaBuffer,
        request: FrameRequest,
    ) -> CompositeReport {
        let mut report = CompositeReport::default();
        let region = self.layout.content_region;

        if !self.layout.mode.is_letterboxed() {
            screen.fill(Rgba::BLACK);
            report.filled.push(screen.bounds());
            screen.blit_scaled(ui, screen.bounds(), self.filter);
            report.content = Some(ContentDraw::Copied);
            return report;
        }

        if request.preserve_player_region {
            for rect in self.layout.border_rects() {
                screen.fill_rect(rect, Rgba::BLACK);
                report.filled.push(rect);
            }
            if request.overlay_visible {
                screen.blend_scaled(ui, region, self.filter);
                report.content = Some(ContentDraw::Blended);
            }
        } else {
            screen.fill(Rgba::BLACK);
            report.filled.push(screen.bounds());
            screen.blit_scaled(ui, region, self.filter);
            report.content = Some(ContentDraw::Copied);
        }

        report.frame_drawn = self.draw_frame(screen);
        report
    }

    /// Paint the frame again after presentation; the player's own repaint
    /// can cover the border area while it is visible.
    pub fn reassert_frame(&self, screen: &mut RgbaBuffer, player_visible: bool) -> bool {
        player_visible && self.draw_frame(screen)
    }

    fn draw_frame(&self, screen: &mut RgbaBuffer) -> bool {
        if !self.has_frame() {
            return false;
        }
        match &self.frame {
            Some(frame) => {
                screen.blend_scaled(frame, screen.bounds(), FilterType::Nearest);
                true
            }
            None => false,
        }
    }
}

/// Load a decorative frame image (PNG with alpha).
pub fn load_frame(path: &Path) -> Result<RgbaBuffer> {
    let img = image::open(path)
        .with_context(|| format!("failed to load frame image {}", path.display()))?;
    Ok(RgbaBuffer::from_image(img.to_rgba8()))
}
