//! Scene compositor: rasterizes a prepared scene into one opaque frame.
//!
//! Work happens on an RGBA canvas of display size. Each element draws in order;
//! a failing element is logged and left out, it never aborts the frame. The
//! canvas is flattened onto black at the end, so leftover transparency shows
//! as black on the device.

use image::{Rgba, RgbaImage};
use log::debug;

use super::glyph::GlyphCache;
#[cfg(feature = "icons")]
use super::icons::IconSet;
use super::layout;
use super::{scale_channel, FontId, Frame};
use crate::scene::{Bitmap, Color, CyclingText, Direction, Element, Icon, Pixel, Scene, ScrollingText, TextRun};
use crate::{Error, Result};

/// Point in animation time. Everything time-dependent is a pure function of this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationPhase {
    pub now: f64,
}

impl AnimationPhase {
    pub fn at(seconds: f64) -> Self {
        Self { now: seconds }
    }
}

/// Where a multi-line cycle is at a given time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePosition {
    pub line: usize,
    pub next: usize,
    /// `None` while holding the current line, otherwise linear slide progress in `0..=1`.
    pub progress: Option<f64>,
}

/// Compute the cycle position for `line_count` lines, each held for `hold`
/// seconds and then slid out over `slide` seconds.
pub fn cycle_position(line_count: usize, hold: f64, slide: f64, now: f64) -> Result<CyclePosition> {
    let cycle = hold + slide;
    if line_count == 0 || !cycle.is_finite() || cycle <= 0.0 || hold < 0.0 || slide < 0.0 {
        return Err(Error::RenderError(format!(
            "invalid line cycle: {} lines, hold {}s, slide {}s",
            line_count, hold, slide
        )));
    }
    let total = cycle * line_count as f64;
    let t = now.rem_euclid(total);
    let line = ((t / cycle).floor() as usize).min(line_count - 1);
    let t_phase = t - line as f64 * cycle;
    let next = (line + 1) % line_count;
    let progress = if t_phase < hold {
        None
    } else if slide > 0.0 {
        Some(((t_phase - hold) / slide).clamp(0.0, 1.0))
    } else {
        Some(1.0)
    };
    Ok(CyclePosition {
        line,
        next,
        progress,
    })
}

/// Pixels a scrolling string has moved at `now`, wrapped to its travel distance.
pub fn scroll_offset(run: &TextRun, speed: f64, canvas_width: u32, now: f64) -> Result<i32> {
    if !speed.is_finite() || speed < 0.0 {
        return Err(Error::RenderError(format!("invalid scroll speed {}", speed)));
    }
    let travel = layout::scroll_travel(&run.content, run.font, run.spacing, canvas_width as i32);
    if travel <= 0 {
        return Ok(0);
    }
    Ok((now * speed).rem_euclid(travel as f64).floor() as i32)
}

/// Source-over compositing of one RGBA pixel onto another.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src.0[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }
    let da = dst.0[3] as u32;
    let inv = 255 - sa;
    let out_a = sa * 255 + da * inv;
    if out_a == 0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let num = src.0[c] as u32 * sa * 255 + dst.0[c] as u32 * da * inv;
        dst.0[c] = ((num + out_a / 2) / out_a) as u8;
    }
    dst.0[3] = ((out_a + 127) / 255) as u8;
}

/// Composite `layer` onto `canvas` with its top-left corner at `(x, y)`, clipping.
pub fn composite(canvas: &mut RgbaImage, layer: &RgbaImage, x: i32, y: i32) {
    let (cw, ch) = canvas.dimensions();
    for (lx, ly, px) in layer.enumerate_pixels() {
        let (cx, cy) = (x as i64 + lx as i64, y as i64 + ly as i64);
        if cx < 0 || cy < 0 || cx >= cw as i64 || cy >= ch as i64 {
            continue;
        }
        blend_over(canvas.get_pixel_mut(cx as u32, cy as u32), *px);
    }
}

/// Renders scenes for one display. Owns the glyph cache and icon assets.
pub struct Compositor {
    width: u32,
    height: u32,
    glyphs: GlyphCache,
    #[cfg(feature = "icons")]
    icons: Option<IconSet>,
}

impl Compositor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            glyphs: GlyphCache::new(),
            #[cfg(feature = "icons")]
            icons: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn glyph_cache(&self) -> &GlyphCache {
        &self.glyphs
    }

    #[cfg(feature = "icons")]
    pub fn install_icons(&mut self, icons: IconSet) {
        self.icons = Some(icons);
    }

    pub fn icons_ready(&self) -> bool {
        #[cfg(feature = "icons")]
        {
            self.icons.is_some()
        }
        #[cfg(not(feature = "icons"))]
        {
            false
        }
    }

    /// Render `scene` at `phase` with every color scaled by `brightness`.
    pub fn render(&mut self, scene: &Scene, phase: AnimationPhase, brightness: u8) -> Frame {
        let bg = scene.background.scaled(brightness);
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, bg.to_rgba());

        for element in &scene.elements {
            if let Err(e) = self.draw_element(&mut canvas, element, phase, brightness) {
                debug!("skipping {} element: {}", element.kind(), e);
            }
        }

        flatten(&canvas)
    }

    fn draw_element(
        &mut self,
        canvas: &mut RgbaImage,
        element: &Element,
        phase: AnimationPhase,
        brightness: u8,
    ) -> Result<()> {
        match element {
            Element::Text(run) => {
                self.draw_text(canvas, run, run.x, run.y, brightness);
                Ok(())
            }
            Element::ScrollText(s) => self.draw_scrolling(canvas, s, phase, brightness),
            Element::WrappedText(c) => self.draw_cycling(canvas, c, phase, brightness),
            Element::Pixels(px) => {
                self.draw_pixels(canvas, px, brightness);
                Ok(())
            }
            Element::Icon(icon) => self.draw_icon(canvas, icon, brightness),
            Element::Image(bitmap) => {
                draw_bitmap(canvas, bitmap, brightness);
                Ok(())
            }
        }
    }

    /// Draw a text run with its origin at `(x, y)`. Off-canvas pixels are clipped.
    pub fn draw_text(&mut self, canvas: &mut RgbaImage, run: &TextRun, x: i32, y: i32, brightness: u8) {
        self.draw_string(canvas, &run.content, x, y, run.color, run.font, run.spacing, brightness);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_string(
        &mut self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
        font: FontId,
        spacing: i32,
        brightness: u8,
    ) {
        let color = color.scaled(brightness).to_rgba();
        let gap = font.gap(spacing);
        let (w, h) = canvas.dimensions();
        let mut cursor = x;
        for ch in text.chars() {
            let glyph = self.glyphs.mask_for(font, ch);
            if let Some(mask) = &glyph.mask {
                let ox = cursor + mask.x_offset;
                let oy = y + mask.y_offset;
                for (mx, my) in mask.covered() {
                    let (px, py) = (ox + mx as i32, oy + my as i32);
                    if px >= 0 && py >= 0 && (px as u32) < w && (py as u32) < h {
                        canvas.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
            cursor += glyph.advance as i32 + gap;
        }
    }

    fn draw_scrolling(
        &mut self,
        canvas: &mut RgbaImage,
        s: &ScrollingText,
        phase: AnimationPhase,
        brightness: u8,
    ) -> Result<()> {
        let offset = scroll_offset(&s.run, s.speed, self.width, phase.now)?;
        let x = self.width as i32 - offset;
        self.draw_text(canvas, &s.run, x, s.run.y, brightness);
        Ok(())
    }

    fn draw_cycling(
        &mut self,
        canvas: &mut RgbaImage,
        c: &CyclingText,
        phase: AnimationPhase,
        brightness: u8,
    ) -> Result<()> {
        let pos = cycle_position(c.lines.len(), c.hold, c.slide, phase.now)?;
        let Some(progress) = pos.progress else {
            self.draw_string(canvas, &c.lines[pos.line], c.x, c.y, c.color, c.font, c.spacing, brightness);
            return Ok(());
        };

        let step = match c.direction {
            Direction::Up | Direction::Down => c.font.cell_height(),
            Direction::Left | Direction::Right => self.width as i32,
        };
        let off = (progress * step as f64) as i32;
        let (current, incoming) = match c.direction {
            Direction::Up => ((c.x, c.y - off), (c.x, c.y + step - off)),
            Direction::Down => ((c.x, c.y + off), (c.x, c.y - step + off)),
            Direction::Left => ((c.x - off, c.y), (c.x + step - off, c.y)),
            Direction::Right => ((c.x + off, c.y), (c.x - step + off, c.y)),
        };
        self.draw_string(canvas, &c.lines[pos.line], current.0, current.1, c.color, c.font, c.spacing, brightness);
        self.draw_string(canvas, &c.lines[pos.next], incoming.0, incoming.1, c.color, c.font, c.spacing, brightness);
        Ok(())
    }

    fn draw_pixels(&self, canvas: &mut RgbaImage, pixels: &[Pixel], brightness: u8) {
        let mut layer = RgbaImage::new(self.width, self.height);
        for p in pixels {
            if p.x < 0 || p.y < 0 || p.x as u32 >= self.width || p.y as u32 >= self.height {
                continue;
            }
            layer.put_pixel(p.x as u32, p.y as u32, p.color.scaled(brightness).to_rgba());
        }
        composite(canvas, &layer, 0, 0);
    }

    #[cfg(feature = "icons")]
    fn draw_icon(&mut self, canvas: &mut RgbaImage, icon: &Icon, brightness: u8) -> Result<()> {
        // Icons render empty until the icon assets have loaded.
        let Some(icons) = self.icons.as_mut() else {
            return Ok(());
        };
        let mut layer = RgbaImage::new(self.width, self.height);
        let color = Color {
            a: 255,
            ..icon.color.scaled(brightness)
        };
        if icons.draw(&mut layer, &icon.name, icon.x, icon.y, icon.size, color) {
            composite(canvas, &layer, 0, 0);
        } else {
            debug!("unknown icon {}", icon.name);
        }
        Ok(())
    }

    #[cfg(not(feature = "icons"))]
    fn draw_icon(&mut self, _canvas: &mut RgbaImage, _icon: &Icon, _brightness: u8) -> Result<()> {
        Ok(())
    }
}

fn draw_bitmap(canvas: &mut RgbaImage, bitmap: &Bitmap, brightness: u8) {
    if brightness == u8::MAX {
        composite(canvas, &bitmap.image, bitmap.x, bitmap.y);
        return;
    }
    let mut scaled = bitmap.image.clone();
    for px in scaled.pixels_mut() {
        for c in 0..3 {
            px.0[c] = scale_channel(px.0[c], brightness);
        }
    }
    composite(canvas, &scaled, bitmap.x, bitmap.y);
}

/// Resolve the RGBA canvas against an opaque black backing.
fn flatten(canvas: &RgbaImage) -> Frame {
    let img = image::RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let p = canvas.get_pixel(x, y).0;
        let a = p[3] as u32;
        let over_black = |c: u8| ((c as u32 * a + 127) / 255) as u8;
        image::Rgb([over_black(p[0]), over_black(p[1]), over_black(p[2])])
    });
    Frame::from_image(img)
}
