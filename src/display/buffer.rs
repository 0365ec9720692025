use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::display::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Tightly packed RGBA8 pixels, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaBuffer {
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        let mut pixels = vec![0u8; byte_len(width, height)];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[fill.r, fill.g, fill.b, fill.a]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = self.index(x, y);
        Rgba {
            r: self.pixels[idx],
            g: self.pixels[idx + 1],
            b: self.pixels[idx + 2],
            a: self.pixels[idx + 3],
        }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = self.index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn clip(&self, rect: Rect) -> Rect {
        let x = rect.x.min(self.width);
        let y = rect.y.min(self.height);
        Rect::new(
            x,
            y,
            rect.right().min(self.width) - x,
            rect.bottom().min(self.height) - y,
        )
    }

    pub fn fill(&mut self, color: Rgba) {
        self.fill_rect(self.bounds(), color);
    }

    /// Fill `rect`, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let rect = self.clip(rect);
        let px = [color.r, color.g, color.b, color.a];
        for y in rect.y..rect.bottom() {
            let start = self.index(rect.x, y);
            let end = start + rect.width as usize * 4;
            for chunk in self.pixels[start..end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
    }

    /// `self` scaled to `width` x `height`; a same-size request is a clone.
    pub fn scaled(&self, width: u32, height: u32, filter: FilterType) -> RgbaBuffer {
        if self.width == width && self.height == height {
            return self.clone();
        }
        match RgbaImage::from_raw(self.width, self.height, self.pixels.clone()) {
            Some(img) => RgbaBuffer::from_image(imageops::resize(&img, width, height, filter)),
            None => RgbaBuffer::new(width, height, Rgba::TRANSPARENT),
        }
    }

    /// Copy `src` into `dest`, scaling it to fit exactly.
    pub fn blit_scaled(&mut self, src: &RgbaBuffer, dest: Rect, filter: FilterType) {
        self.draw_scaled(src, dest, filter, false);
    }

    /// Alpha-blend `src` over `dest`, scaling it to fit exactly.
    pub fn blend_scaled(&mut self, src: &RgbaBuffer, dest: Rect, filter: FilterType) {
        self.draw_scaled(src, dest, filter, true);
    }

    fn draw_scaled(&mut self, src: &RgbaBuffer, dest: Rect, filter: FilterType, blend: bool) {
        if dest.is_empty() {
            return;
        }
        let scaled = src.scaled(dest.width, dest.height, filter);
        let clipped = self.clip(dest);
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                let top = scaled.pixel(x - dest.x, y - dest.y);
                let out = if blend {
                    blend_pixel(self.pixel(x, y), top)
                } else {
                    top
                };
                self.set_pixel(x, y, out);
            }
        }
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

fn blend_pixel(bottom: Rgba, top: Rgba) -> Rgba {
    if top.a == 255 {
        return top;
    }
    if top.a == 0 {
        return bottom;
    }
    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Rgba::TRANSPARENT;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Rgba {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn sizes_past_u32_range_do_not_overflow() {
        assert_eq!(byte_len(40_000, 30_000), 4_800_000_000);
        let huge = RgbaBuffer {
            width: 40_000,
            height: 30_000,
            pixels: Vec::new(),
        };
        assert_eq!(huge.index(39_999, 29_999), 4_799_999_996);
    }

    #[test]
    fn blend_matches_source_over() {
        let out = blend_pixel(Rgba::new(100, 100, 100, 255), Rgba::new(200, 0, 0, 128));
        assert_eq!(out, Rgba::new(150, 50, 50, 255));
        assert_eq!(
            blend_pixel(Rgba::new(1, 2, 3, 255), Rgba::TRANSPARENT),
            Rgba::new(1, 2, 3, 255)
        );
    }

    #[test]
    fn fill_rect_is_clipped_and_exact() {
        let mut buf = RgbaBuffer::new(4, 4, Rgba::TRANSPARENT);
        buf.fill_rect(Rect::new(2, 2, 10, 10), Rgba::BLACK);
        assert_eq!(buf.pixel(1, 1), Rgba::TRANSPARENT);
        assert_eq!(buf.pixel(2, 2), Rgba::BLACK);
        assert_eq!(buf.pixel(3, 3), Rgba::BLACK);
        assert_eq!(buf.pixel(3, 1), Rgba::TRANSPARENT);
    }

    #[test]
    fn blit_scales_into_destination_only() {
        let src = RgbaBuffer::new(2, 2, Rgba::new(255, 0, 0, 255));
        let mut dst = RgbaBuffer::new(8, 4, Rgba::BLACK);
        dst.blit_scaled(&src, Rect::new(2, 0, 4, 4), FilterType::Nearest);
        assert_eq!(dst.pixel(1, 0), Rgba::BLACK);
        assert_eq!(dst.pixel(2, 0), Rgba::new(255, 0, 0, 255));
        assert_eq!(dst.pixel(5, 3), Rgba::new(255, 0, 0, 255));
        assert_eq!(dst.pixel(6, 3), Rgba::BLACK);
    }

    #[test]
    fn blend_scaled_keeps_pixels_under_transparent_source() {
        let mut src = RgbaBuffer::new(2, 1, Rgba::TRANSPARENT);
        src.set_pixel(1, 0, Rgba::new(0, 255, 0, 255));
        let mut dst = RgbaBuffer::new(2, 1, Rgba::new(9, 9, 9, 255));
        dst.blend_scaled(&src, dst.bounds(), FilterType::Nearest);
        assert_eq!(dst.pixel(0, 0), Rgba::new(9, 9, 9, 255));
        assert_eq!(dst.pixel(1, 0), Rgba::new(0, 255, 0, 255));
    }
}
