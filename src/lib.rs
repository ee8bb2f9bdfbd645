//! Pixmatrix
//!
//! Rendering, layout and animation engine for small addressable pixel-matrix
//! displays driven over a low-bandwidth link.
//!
//! # Features
//!
//! - **Bitmap fonts**: two fixed-width fonts (`3x5`, `5x7`) and a variable-width
//!   glyph atlas (`awtrix`), with a session-lifetime glyph cache
//! - **Scenes**: text, scrolling text, cycling multi-line text, raw pixels, vector
//!   icons (`icons` feature) and bitmap images, composited with alpha and brightness
//! - **Animation**: a cooperative frame pump and frame-to-frame transitions that
//!   are cancelled as soon as a newer scene arrives
//! - **Dispatch**: frames are PNG encoded and only transmitted when they differ
//!   from the last one sent
//!
//! # Example
//!
//! ```no_run
//! use pixmatrix::{DisplayConfig, DisplaySession, SceneSpec};
//! use pixmatrix::transport::MemoryTransport;
//!
//! # async fn run() -> pixmatrix::Result<()> {
//! let config = DisplayConfig {
//!     width: 32,
//!     height: 8,
//!     ..Default::default()
//! };
//! let session = DisplaySession::open(config, MemoryTransport::new()).await?;
//! let scene = SceneSpec::from_json(
//!     r#"{"elements":[{"type":"scroll_text","content":"Hello","speed":15}]}"#,
//! )?;
//! session.draw(&scene).await?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod animation;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod images;
pub mod rendering;
pub mod scene;
pub mod transport;

pub use display::DisplaySession;
pub use error::{Error, Result};
pub use rendering::{AnimationPhase, Compositor, FontId, Frame};
pub use scene::{Color, Element, ElementSpec, Scene, SceneSpec};

/// Configuration for one display session
///
/// The defaults describe a 32x8 matrix at full brightness animating at 20 fps.
///
/// # Examples
///
/// ```
/// let cfg = pixmatrix::DisplayConfig::default();
/// assert_eq!((cfg.width, cfg.height), (32, 8));
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Matrix width in pixels
    pub width: u32,
    /// Matrix height in pixels
    pub height: u32,
    /// Initial brightness (0-255)
    pub brightness: u8,
    /// Frame rate for animated scenes that don't request one
    pub default_fps: u32,
    /// Upper bound for reading one image reference, in milliseconds
    pub fetch_timeout_ms: u64,
    /// Canvases with more pixels than this render on the blocking pool
    pub offload_pixels: u32,
    /// Material Design icon font (`.ttf`)
    pub icon_font_path: Option<PathBuf>,
    /// Material Design icon metadata (`_meta.json`)
    pub icon_meta_path: Option<PathBuf>,
    /// Directories image paths may resolve under
    pub allowed_image_dirs: Vec<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 8,
            brightness: 255,
            default_fps: 20,
            fetch_timeout_ms: 10000,
            offload_pixels: 4096,
            icon_font_path: None,
            icon_meta_path: None,
            allowed_image_dirs: Vec::new(),
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::ConfigError(format!(
                "display size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > 1024 || self.height > 1024 {
            return Err(Error::ConfigError(format!(
                "display size {}x{} exceeds 1024x1024",
                self.width, self.height
            )));
        }
        if self.default_fps == 0 {
            return Err(Error::ConfigError("default_fps must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.width, 32);
        assert_eq!(config.height, 8);
        assert_eq!(config.brightness, 255);
        assert!(config.icon_font_path.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let zero = DisplayConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(Error::ConfigError(_))));

        let huge = DisplayConfig {
            height: 4096,
            ..Default::default()
        };
        assert!(huge.validate().is_err());

        let no_fps = DisplayConfig {
            default_fps: 0,
            ..Default::default()
        };
        assert!(no_fps.validate().is_err());
    }
}
