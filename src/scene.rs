//! Scene description: the background plus an ordered list of drawing elements.
//!
//! A scene arrives as a [`SceneSpec`] (typically deserialized from the JSON of a
//! `draw_matrix` call) and is turned into a display-ready [`Scene`] by
//! [`prepare`]: text is sanitized, multi-line text is wrapped, pixel entries are
//! validated and images are fetched and decoded. Rendering never does any of that
//! work again.

use std::path::PathBuf;

use image::RgbaImage;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::images::{self, ImageRef, ImageSource};
use crate::rendering::layout;
use crate::rendering::transition::TransitionKind;
use crate::rendering::{scale_channel, FontId};
use crate::{Error, Result};

/// RGBA color. Deserializes from `[r, g, b]` or `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<u8>")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Brightness-scaled copy; alpha is never scaled.
    pub fn scaled(self, brightness: u8) -> Self {
        Self {
            r: scale_channel(self.r, brightness),
            g: scale_channel(self.g, brightness),
            b: scale_channel(self.b, brightness),
            a: self.a,
        }
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl TryFrom<Vec<i64>> for Color {
    type Error = Error;

    fn try_from(v: Vec<i64>) -> Result<Self> {
        let ch = |i: usize| v[i].clamp(0, 255) as u8;
        match v.len() {
            3 => Ok(Color::rgb(ch(0), ch(1), ch(2))),
            4 => Ok(Color::rgba(ch(0), ch(1), ch(2), ch(3))),
            n => Err(Error::SceneError(format!(
                "color needs 3 or 4 channels, got {}",
                n
            ))),
        }
    }
}

impl From<Color> for Vec<u8> {
    fn from(c: Color) -> Self {
        if c.a == 255 {
            vec![c.r, c.g, c.b]
        } else {
            vec![c.r, c.g, c.b, c.a]
        }
    }
}

/// Slide direction for multi-line cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

/// Fold Polish diacritics to their base Latin letters.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ą' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            'Ą' => 'A',
            'Ć' => 'C',
            'Ę' => 'E',
            'Ł' => 'L',
            'Ń' => 'N',
            'Ó' => 'O',
            'Ś' => 'S',
            'Ź' | 'Ż' => 'Z',
            other => other,
        })
        .collect()
}

// Element content may be sent as a string or a bare number (e.g. a sensor value).
fn content_string<'de, D>(de: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

// Elements parse one by one; a malformed entry is dropped instead of the scene.
fn lenient_elements<'de, D>(de: D) -> std::result::Result<Vec<ElementSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(de)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(spec) => Some(spec),
            Err(e) => {
                debug!("dropping element {}: {}", i, e);
                None
            }
        })
        .collect())
}

fn default_spacing() -> i32 {
    1
}

fn default_scroll_speed() -> f64 {
    20.0
}

fn default_hold() -> f64 {
    3.0
}

fn default_scroll_duration() -> f64 {
    0.5
}

fn default_icon_name() -> String {
    "mdi:help".to_string()
}

fn default_icon_size() -> u32 {
    16
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpec {
    #[serde(deserialize_with = "content_string")]
    pub content: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub font: FontId,
    #[serde(default = "default_spacing")]
    pub spacing: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollTextSpec {
    #[serde(deserialize_with = "content_string")]
    pub content: String,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub font: FontId,
    #[serde(default = "default_spacing")]
    pub spacing: i32,
    /// Pixels per second.
    #[serde(default = "default_scroll_speed")]
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedTextSpec {
    #[serde(deserialize_with = "content_string")]
    pub content: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub font: FontId,
    #[serde(default = "default_spacing")]
    pub spacing: i32,
    /// Seconds each line is held before sliding to the next.
    #[serde(default = "default_hold")]
    pub speed: f64,
    /// Seconds the slide between two lines takes.
    #[serde(default = "default_scroll_duration")]
    pub scroll_duration: f64,
    #[serde(default)]
    pub direction: Direction,
    /// Wrap width; defaults to the canvas width minus `x`.
    #[serde(default)]
    pub max_width: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelsSpec {
    /// Entries of `[x, y, r, g, b]` or `[x, y, r, g, b, a]`.
    #[serde(default)]
    pub pixels: Vec<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSpec {
    #[serde(default = "default_icon_name")]
    pub name: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default = "default_icon_size")]
    pub size: u32,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpec {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub url: Option<String>,
    /// Already-encoded image bytes supplied in-process.
    #[serde(skip)]
    pub data: Option<Vec<u8>>,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl ImageSpec {
    pub fn from_bytes(data: Vec<u8>, x: i32, y: i32) -> Self {
        Self {
            path: None,
            url: None,
            data: Some(data),
            x,
            y,
            width: None,
            height: None,
        }
    }

    fn reference(&self) -> Option<ImageRef> {
        if let Some(p) = &self.path {
            Some(ImageRef::Path(p.clone()))
        } else {
            self.url.as_ref().map(|u| ImageRef::Url(u.clone()))
        }
    }
}

/// One drawing instruction as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementSpec {
    Text(TextSpec),
    ScrollText(ScrollTextSpec),
    #[serde(alias = "multiline")]
    WrappedText(WrappedTextSpec),
    Pixels(PixelsSpec),
    #[serde(alias = "mdi")]
    Icon(IconSpec),
    Image(ImageSpec),
}

fn default_transition_duration() -> f64 {
    1.0
}

fn default_transition_fps() -> u32 {
    20
}

/// Optional frame-morph requested alongside a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    #[serde(rename = "type", default)]
    pub kind: TransitionKind,
    #[serde(default = "default_transition_duration")]
    pub duration: f64,
    #[serde(default = "default_transition_fps")]
    pub fps: u32,
}

/// A scene as submitted: background, elements and optional timing hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    #[serde(default = "black")]
    pub background: Color,
    #[serde(deserialize_with = "lenient_elements")]
    pub elements: Vec<ElementSpec>,
    #[serde(default)]
    pub fps: Option<u32>,
    #[serde(default)]
    pub transition: Option<TransitionSpec>,
}

fn black() -> Color {
    Color::BLACK
}

impl SceneSpec {
    pub fn new(background: Color, elements: Vec<ElementSpec>) -> Self {
        Self {
            background,
            elements,
            fps: None,
            transition: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A sanitized run of text at a fixed origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub content: String,
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub font: FontId,
    pub spacing: i32,
}

/// Text that scrolls right-to-left forever.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollingText {
    pub run: TextRun,
    pub speed: f64,
}

/// Pre-wrapped lines that cycle one at a time with a directional slide.
#[derive(Debug, Clone, PartialEq)]
pub struct CyclingText {
    pub lines: Vec<String>,
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub font: FontId,
    pub spacing: i32,
    pub hold: f64,
    pub slide: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub image: RgbaImage,
    pub x: i32,
    pub y: i32,
}

/// A display-ready element. Rendering reads these without further I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextRun),
    ScrollText(ScrollingText),
    WrappedText(CyclingText),
    Pixels(Vec<Pixel>),
    Icon(Icon),
    Image(Bitmap),
}

impl Element {
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Text(_) => "text",
            Element::ScrollText(_) => "scroll_text",
            Element::WrappedText(_) => "wrapped_text",
            Element::Pixels(_) => "pixels",
            Element::Icon(_) => "icon",
            Element::Image(_) => "image",
        }
    }

    /// Whether this element changes over time.
    pub fn is_animated(&self) -> bool {
        match self {
            Element::ScrollText(_) => true,
            Element::WrappedText(c) => c.lines.len() > 1,
            _ => false,
        }
    }
}

/// A prepared scene. Element order is z-order: later elements draw on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Color,
    pub elements: Vec<Element>,
}

impl Scene {
    pub fn new(background: Color, elements: Vec<Element>) -> Self {
        Self {
            background,
            elements,
        }
    }

    pub fn is_animated(&self) -> bool {
        self.elements.iter().any(Element::is_animated)
    }
}

/// Turn a submitted scene into display-ready data for a canvas of `canvas_width`.
///
/// Elements whose data cannot be made ready (an image that fails to load) are
/// dropped; everything else is kept in order.
pub async fn prepare(
    background: Color,
    specs: &[ElementSpec],
    canvas_width: u32,
    source: &dyn ImageSource,
) -> Scene {
    let mut elements = Vec::with_capacity(specs.len());
    for spec in specs {
        if let Some(el) = prepare_element(spec, canvas_width, source).await {
            elements.push(el);
        }
    }
    Scene::new(background, elements)
}

async fn prepare_element(
    spec: &ElementSpec,
    canvas_width: u32,
    source: &dyn ImageSource,
) -> Option<Element> {
    match spec {
        ElementSpec::Text(t) => Some(Element::Text(TextRun {
            content: sanitize_text(&t.content),
            x: t.x,
            y: t.y,
            color: t.color,
            font: t.font,
            spacing: t.spacing,
        })),
        ElementSpec::ScrollText(s) => Some(Element::ScrollText(ScrollingText {
            run: TextRun {
                content: sanitize_text(&s.content),
                x: 0,
                y: s.y,
                color: s.color,
                font: s.font,
                spacing: s.spacing,
            },
            speed: s.speed,
        })),
        ElementSpec::WrappedText(w) => Some(prepare_wrapped(w, canvas_width)),
        ElementSpec::Pixels(p) => Some(Element::Pixels(prepare_pixels(&p.pixels))),
        ElementSpec::Icon(i) => Some(Element::Icon(Icon {
            name: i.name.clone(),
            x: i.x,
            y: i.y,
            size: i.size,
            color: i.color,
        })),
        ElementSpec::Image(spec) => prepare_image(spec, source).await.map(Element::Image),
    }
}

fn prepare_wrapped(w: &WrappedTextSpec, canvas_width: u32) -> Element {
    let content = sanitize_text(&w.content);
    let max_width = w.max_width.unwrap_or(canvas_width as i32 - w.x);
    let lines = layout::wrap(&content, w.font, w.spacing, max_width);
    if lines.len() <= 1 {
        return Element::Text(TextRun {
            content: lines.into_iter().next().unwrap_or_default(),
            x: w.x,
            y: w.y,
            color: w.color,
            font: w.font,
            spacing: w.spacing,
        });
    }
    Element::WrappedText(CyclingText {
        lines,
        x: w.x,
        y: w.y,
        color: w.color,
        font: w.font,
        spacing: w.spacing,
        hold: w.speed,
        slide: w.scroll_duration,
        direction: w.direction,
    })
}

fn prepare_pixels(raw: &[Vec<i64>]) -> Vec<Pixel> {
    raw.iter()
        .filter_map(|p| {
            if p.len() < 5 {
                debug!("dropping pixel entry with {} values", p.len());
                return None;
            }
            let ch = |i: usize| p[i].clamp(0, 255) as u8;
            let alpha = if p.len() > 5 { ch(5) } else { 255 };
            let (Ok(x), Ok(y)) = (i32::try_from(p[0]), i32::try_from(p[1])) else {
                debug!("dropping pixel at out-of-range position ({}, {})", p[0], p[1]);
                return None;
            };
            Some(Pixel {
                x,
                y,
                color: Color::rgba(ch(2), ch(3), ch(4), alpha),
            })
        })
        .collect()
}

async fn prepare_image(spec: &ImageSpec, source: &dyn ImageSource) -> Option<Bitmap> {
    let bytes = match (&spec.data, spec.reference()) {
        (Some(data), _) => data.clone(),
        (None, Some(reference)) => source.fetch(&reference).await?,
        (None, None) => {
            debug!("image element has neither path, url nor data");
            return None;
        }
    };
    let size = match (spec.width, spec.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    };
    match images::decode(&bytes, size) {
        Ok(image) => Some(Bitmap {
            image,
            x: spec.x,
            y: spec.y,
        }),
        Err(e) => {
            debug!("skipping image element: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::NoImages;

    #[test]
    fn sanitize_folds_polish_letters() {
        assert_eq!(sanitize_text("Zażółć gęślą jaźń"), "Zazolc gesla jazn");
        assert_eq!(sanitize_text("ŁÓDŹ"), "LODZ");
    }

    #[test]
    fn colors_parse_three_or_four_channels() {
        let c: Color = serde_json::from_str("[10, 20, 300]").unwrap();
        assert_eq!(c, Color::rgb(10, 20, 255));
        let c: Color = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(c.a, 4);
        assert!(serde_json::from_str::<Color>("[1, 2]").is_err());
    }

    #[test]
    fn color_scaling_leaves_alpha() {
        let c = Color::rgba(200, 100, 50, 77).scaled(128);
        assert_eq!(c, Color::rgba(100, 50, 25, 77));
    }

    #[test]
    fn scene_json_uses_defaults() {
        let spec = SceneSpec::from_json(
            r#"{"elements":[
                {"type":"text","content":21.5},
                {"type":"mdi","name":"mdi:home"},
                {"type":"scroll_text","content":"hi","font":"3x5"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(spec.background, Color::BLACK);
        match &spec.elements[0] {
            ElementSpec::Text(t) => {
                assert_eq!(t.content, "21.5");
                assert_eq!(t.font, FontId::Medium5x7);
                assert_eq!(t.spacing, 1);
                assert_eq!(t.color, Color::WHITE);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&spec.elements[1], ElementSpec::Icon(i) if i.size == 16));
        assert!(matches!(&spec.elements[2], ElementSpec::ScrollText(s) if s.speed == 20.0));
    }

    #[tokio::test]
    async fn single_line_wrapped_text_becomes_static() {
        let specs = vec![ElementSpec::WrappedText(WrappedTextSpec {
            content: "Hi".into(),
            x: 0,
            y: 0,
            color: Color::WHITE,
            font: FontId::Medium5x7,
            spacing: 1,
            speed: 2.0,
            scroll_duration: 0.5,
            direction: Direction::Up,
            max_width: None,
        })];
        let scene = prepare(Color::BLACK, &specs, 32, &NoImages).await;
        assert!(matches!(&scene.elements[0], Element::Text(t) if t.content == "Hi"));
        assert!(!scene.is_animated());
    }

    #[tokio::test]
    async fn multi_line_wrapped_text_is_animated() {
        let specs = vec![ElementSpec::WrappedText(WrappedTextSpec {
            content: "Hello there world".into(),
            x: 0,
            y: 0,
            color: Color::WHITE,
            font: FontId::Medium5x7,
            spacing: 1,
            speed: 2.0,
            scroll_duration: 0.5,
            direction: Direction::Up,
            max_width: None,
        })];
        let scene = prepare(Color::BLACK, &specs, 32, &NoImages).await;
        match &scene.elements[0] {
            Element::WrappedText(c) => assert_eq!(c.lines, vec!["Hello", "there", "world"]),
            other => panic!("unexpected {:?}", other),
        }
        assert!(scene.is_animated());
    }

    #[test]
    fn malformed_elements_are_dropped_individually() {
        let spec = SceneSpec::from_json(
            r#"{"elements":[
                {"type":"text","content":"Hi"},
                {"type":"text","content":"x","color":[1,2]},
                {"type":"sparkles"},
                "not an element",
                {"type":"pixels","pixels":[[0,0,255,0,0]]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(spec.elements.len(), 2);
        assert!(matches!(&spec.elements[0], ElementSpec::Text(t) if t.content == "Hi"));
        assert!(matches!(&spec.elements[1], ElementSpec::Pixels(_)));
    }

    #[test]
    fn elements_must_still_be_a_list() {
        assert!(SceneSpec::from_json(r#"{"elements":{"type":"text"}}"#).is_err());
        assert!(SceneSpec::from_json(r#"{"background":[0,0,0]}"#).is_err());
    }

    #[tokio::test]
    async fn out_of_range_pixel_positions_are_dropped() {
        let specs = vec![ElementSpec::Pixels(PixelsSpec {
            pixels: vec![
                vec![4294967296, 0, 255, 0, 0],
                vec![0, -4294967296, 255, 0, 0],
                vec![-1, 2, 0, 255, 0],
            ],
        })];
        let scene = prepare(Color::BLACK, &specs, 32, &NoImages).await;
        match &scene.elements[0] {
            Element::Pixels(px) => {
                assert_eq!(px.len(), 1);
                assert_eq!((px[0].x, px[0].y), (-1, 2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn short_pixel_entries_are_dropped() {
        let specs = vec![ElementSpec::Pixels(PixelsSpec {
            pixels: vec![vec![1, 2, 255, 0, 0], vec![3, 4], vec![5, 6, 0, 0, 255, 128]],
        })];
        let scene = prepare(Color::BLACK, &specs, 32, &NoImages).await;
        match &scene.elements[0] {
            Element::Pixels(px) => {
                assert_eq!(px.len(), 2);
                assert_eq!(px[1].color.a, 128);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn unresolvable_images_are_dropped() {
        let specs = vec![ElementSpec::Image(ImageSpec {
            path: Some("/nowhere.png".into()),
            url: None,
            data: None,
            x: 0,
            y: 0,
            width: None,
            height: None,
        })];
        let scene = prepare(Color::BLACK, &specs, 32, &NoImages).await;
        assert!(scene.elements.is_empty());
    }
}
