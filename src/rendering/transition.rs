//! Whole-frame transition effects between two rendered frames

use image::{imageops, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use super::Frame;

/// Transition effect. Unrecognized names are kept and render as a hard cut.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransitionKind {
    #[default]
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    Dissolve,
    Cut(String),
}

impl TransitionKind {
    pub fn name(&self) -> &str {
        match self {
            TransitionKind::SlideUp => "slide_up",
            TransitionKind::SlideDown => "slide_down",
            TransitionKind::SlideLeft => "slide_left",
            TransitionKind::SlideRight => "slide_right",
            TransitionKind::Dissolve => "dissolve",
            TransitionKind::Cut(name) => name,
        }
    }

    pub fn is_hard_cut(&self) -> bool {
        matches!(self, TransitionKind::Cut(_))
    }
}

impl From<String> for TransitionKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "slide_up" => TransitionKind::SlideUp,
            "slide_down" => TransitionKind::SlideDown,
            "slide_left" => TransitionKind::SlideLeft,
            "slide_right" => TransitionKind::SlideRight,
            "dissolve" => TransitionKind::Dissolve,
            _ => TransitionKind::Cut(s),
        }
    }
}

impl From<&str> for TransitionKind {
    fn from(s: &str) -> Self {
        TransitionKind::from(s.to_string())
    }
}

impl From<TransitionKind> for String {
    fn from(k: TransitionKind) -> Self {
        k.name().to_string()
    }
}

/// Number of steps after the first frame: `max(1, round(duration * fps))`.
pub fn step_count(duration: f64, fps: u32) -> u32 {
    let steps = (duration.max(0.0) * fps as f64).round();
    if steps.is_finite() && steps >= 1.0 {
        steps as u32
    } else {
        1
    }
}

/// Quadratic ease-out: `1 - (1 - t)^2`.
pub fn ease_out_quad(linear: f64) -> f64 {
    let t = linear.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Eased progress for every frame of a transition, `0.0` through `1.0` inclusive.
pub fn eased_steps(steps: u32) -> impl Iterator<Item = f64> {
    let steps = steps.max(1);
    (0..=steps).map(move |i| ease_out_quad(i as f64 / steps as f64))
}

/// Synthesize one transition frame at eased progress `eased`.
///
/// At `0.0` the result equals `from`, at `1.0` it equals `to`.
pub fn blend_frame(
    from: &Frame,
    to: &Frame,
    eased: f64,
    kind: &TransitionKind,
    background: [u8; 3],
) -> Frame {
    let (w, h) = (to.width(), to.height());
    let e = eased.clamp(0.0, 1.0);
    match kind {
        TransitionKind::SlideUp => {
            let off = (h as f64 * e) as i64;
            slide(from, to, (0, -off), (0, h as i64 - off), background)
        }
        TransitionKind::SlideDown => {
            let off = (h as f64 * e) as i64;
            slide(from, to, (0, off), (0, off - h as i64), background)
        }
        TransitionKind::SlideLeft => {
            let off = (w as f64 * e) as i64;
            slide(from, to, (-off, 0), (w as i64 - off, 0), background)
        }
        TransitionKind::SlideRight => {
            let off = (w as f64 * e) as i64;
            slide(from, to, (off, 0), (off - w as i64, 0), background)
        }
        TransitionKind::Dissolve => dissolve(from, to, e),
        TransitionKind::Cut(_) => {
            if e <= 0.5 {
                from.clone()
            } else {
                to.clone()
            }
        }
    }
}

fn slide(
    from: &Frame,
    to: &Frame,
    from_at: (i64, i64),
    to_at: (i64, i64),
    background: [u8; 3],
) -> Frame {
    let mut canvas = RgbImage::from_pixel(to.width(), to.height(), Rgb(background));
    imageops::replace(&mut canvas, from.image(), from_at.0, from_at.1);
    imageops::replace(&mut canvas, to.image(), to_at.0, to_at.1);
    Frame::from_image(canvas)
}

fn dissolve(from: &Frame, to: &Frame, e: f64) -> Frame {
    let mut out = to.image().clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        if x >= from.width() || y >= from.height() {
            continue;
        }
        let f = from.pixel(x, y);
        for c in 0..3 {
            let v = f[c] as f64 * (1.0 - e) + px.0[c] as f64 * e;
            px.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    Frame::from_image(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(w: u32, h: u32, seed: u8) -> Frame {
        let img = RgbImage::from_fn(w, h, |x, y| {
            Rgb([seed.wrapping_add(x as u8), seed ^ y as u8, (x * y) as u8])
        });
        Frame::from_image(img)
    }

    #[test]
    fn step_count_rounds_and_floors_at_one() {
        assert_eq!(step_count(1.0, 20), 20);
        assert_eq!(step_count(0.0, 20), 1);
        assert_eq!(step_count(0.26, 10), 3);
    }

    #[test]
    fn easing_hits_both_ends() {
        let values: Vec<f64> = eased_steps(20).collect();
        assert_eq!(values.len(), 21);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[20], 1.0);
        assert_eq!(ease_out_quad(0.5), 0.75);
    }

    #[test]
    fn every_effect_starts_at_from_and_ends_at_to() {
        let from = striped(16, 8, 3);
        let to = striped(16, 8, 99);
        for name in ["slide_up", "slide_down", "slide_left", "slide_right", "dissolve", "zoom"] {
            let kind = TransitionKind::from(name);
            assert_eq!(blend_frame(&from, &to, 0.0, &kind, [9, 9, 9]), from, "{}", name);
            assert_eq!(blend_frame(&from, &to, 1.0, &kind, [9, 9, 9]), to, "{}", name);
        }
    }

    #[test]
    fn slide_left_moves_halfway() {
        let from = Frame::filled(8, 2, [255, 0, 0]);
        let to = Frame::filled(8, 2, [0, 0, 255]);
        let mid = blend_frame(&from, &to, 0.5, &TransitionKind::SlideLeft, [0, 0, 0]);
        assert_eq!(mid.pixel(3, 0), [255, 0, 0]);
        assert_eq!(mid.pixel(4, 0), [0, 0, 255]);
    }

    #[test]
    fn unknown_names_become_hard_cuts() {
        let kind = TransitionKind::from("wipe");
        assert!(kind.is_hard_cut());
        assert_eq!(kind.name(), "wipe");
        let from = Frame::filled(2, 2, [1, 1, 1]);
        let to = Frame::filled(2, 2, [2, 2, 2]);
        assert_eq!(blend_frame(&from, &to, 0.5, &kind, [0, 0, 0]), from);
        assert_eq!(blend_frame(&from, &to, 0.51, &kind, [0, 0, 0]), to);
    }
}
