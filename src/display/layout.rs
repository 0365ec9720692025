use serde::{Deserialize, Serialize};

/// Resolution of the 4:3 source material.
pub const CONTENT_RESOLUTION: Resolution = Resolution {
    width: 720,
    height: 480,
};

/// NTSC pixel-aspect correction applied to content width.
pub const NTSC_PIXEL_ASPECT: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    NativeContentOnly,
    Letterboxed,
    LetterboxedWithFrame,
}

impl DisplayMode {
    pub fn is_letterboxed(self) -> bool {
        !matches!(self, DisplayMode::NativeContentOnly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Where 4:3 content sits on the physical screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLayout {
    pub mode: DisplayMode,
    pub target: Resolution,
    pub content_region: Rect,
}

impl DisplayLayout {
    pub fn new(mode: DisplayMode, target: Resolution) -> Self {
        Self::with_content(mode, target, CONTENT_RESOLUTION, NTSC_PIXEL_ASPECT)
    }

    pub fn with_content(
        mode: DisplayMode,
        target: Resolution,
        content: Resolution,
        pixel_aspect: f64,
    ) -> Self {
        let content_region = if mode.is_letterboxed() {
            fit_content(target, content_aspect(content, pixel_aspect))
        } else {
            Rect::new(0, 0, target.width, target.height)
        };
        Self {
            mode,
            target,
            content_region,
        }
    }

    /// Screen areas outside the content region, which never overlap it.
    pub fn border_rects(&self) -> Vec<Rect> {
        let c = self.content_region;
        let (w, h) = (self.target.width, self.target.height);
        [
            Rect::new(0, 0, w, c.y),
            Rect::new(0, c.bottom(), w, h.saturating_sub(c.bottom())),
            Rect::new(0, c.y, c.x, c.height),
            Rect::new(c.right(), c.y, w.saturating_sub(c.right()), c.height),
        ]
        .into_iter()
        .filter(|r| !r.is_empty())
        .collect()
    }
}

pub fn content_aspect(content: Resolution, pixel_aspect: f64) -> f64 {
    content.width as f64 * pixel_aspect / content.height as f64
}

/// Largest centred rectangle of `aspect` inside `target`: fit by height
/// first, by width when that overflows.
pub fn fit_content(target: Resolution, aspect: f64) -> Rect {
    let (tw, th) = (target.width, target.height);
    if tw == 0 || th == 0 || !aspect.is_finite() || aspect <= 0.0 {
        return Rect::new(0, 0, tw, th);
    }
    let mut height = th;
    let mut width = (th as f64 * aspect).round() as u32;
    if width > tw {
        width = tw;
        height = ((tw as f64 / aspect).round() as u32).min(th);
    }
    Rect::new((tw - width) / 2, (th - height) / 2, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_centered(layout: &DisplayLayout) {
        let c = layout.content_region;
        let t = layout.target;
        assert!((t.width as i64 - (c.x as i64 * 2 + c.width as i64)).abs() <= 1);
        assert!((t.height as i64 - (c.y as i64 * 2 + c.height as i64)).abs() <= 1);
        assert!(c.right() <= t.width && c.bottom() <= t.height);
    }

    #[test]
    fn full_hd_fits_by_height() {
        let layout = DisplayLayout::new(DisplayMode::Letterboxed, Resolution::new(1920, 1080));
        assert_eq!(layout.content_region, Rect::new(231, 0, 1458, 1080));
        assert_centered(&layout);
    }

    #[test]
    fn wide_short_target_still_fits_by_height() {
        let layout = DisplayLayout::new(DisplayMode::Letterboxed, Resolution::new(800, 480));
        assert_eq!(layout.content_region, Rect::new(76, 0, 648, 480));
        assert_centered(&layout);
    }

    #[test]
    fn narrow_target_falls_back_to_width() {
        let layout = DisplayLayout::new(DisplayMode::Letterboxed, Resolution::new(640, 1080));
        assert_eq!(layout.content_region, Rect::new(0, 303, 640, 474));
        assert_centered(&layout);
    }

    #[test]
    fn region_is_centred_and_bounded_for_many_targets() {
        for w in (16..=3840).step_by(97) {
            for h in (16..=2160).step_by(89) {
                for mode in [DisplayMode::Letterboxed, DisplayMode::LetterboxedWithFrame] {
                    assert_centered(&DisplayLayout::new(mode, Resolution::new(w, h)));
                }
            }
        }
    }

    #[test]
    fn native_mode_uses_whole_screen() {
        let layout = DisplayLayout::new(DisplayMode::NativeContentOnly, CONTENT_RESOLUTION);
        assert_eq!(layout.content_region, Rect::new(0, 0, 720, 480));
        assert!(layout.border_rects().is_empty());
    }

    #[test]
    fn borders_cover_the_rest_of_the_screen_without_touching_content() {
        for target in [
            Resolution::new(1920, 1080),
            Resolution::new(640, 1080),
            Resolution::new(1025, 769),
        ] {
            let layout = DisplayLayout::new(DisplayMode::LetterboxedWithFrame, target);
            let borders = layout.border_rects();
            for r in &borders {
                assert!(!r.intersects(&layout.content_region), "{r:?}");
            }
            let covered: u64 = borders.iter().map(Rect::area).sum();
            let total = target.width as u64 * target.height as u64;
            assert_eq!(covered + layout.content_region.area(), total);
        }
    }
}
