//! Frame dispatch: deterministic encoding, duplicate suppression and the
//! single exclusive lock around the transport.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::Mutex;

use crate::rendering::Frame;
use crate::transport::Transport;
use crate::Result;

/// Device mode in which the display shows pushed frames.
pub const DRAW_MODE: u8 = 0;

/// Encode a frame as an 8-bit RGB PNG with fixed settings.
///
/// Identical pixels always produce identical bytes.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, frame.width(), frame.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(frame.as_raw())?;
        writer.finish()?;
    }
    Ok(out)
}

/// The transport plus everything known about the device behind it.
///
/// `power` and `mode` are `None` when unknown; a failed call resets them so the
/// next operation asserts them again instead of assuming success.
pub struct DeviceLink {
    transport: Box<dyn Transport>,
    last_sent: Option<Vec<u8>>,
    power: Option<bool>,
    mode: Option<u8>,
}

impl DeviceLink {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            last_sent: None,
            power: None,
            mode: None,
        }
    }

    pub fn power(&self) -> Option<bool> {
        self.power
    }

    pub fn mode(&self) -> Option<u8> {
        self.mode
    }

    pub fn last_sent(&self) -> Option<&[u8]> {
        self.last_sent.as_deref()
    }

    pub async fn set_power(&mut self, on: bool) -> Result<()> {
        self.transport.set_power(on).await.inspect_err(|_| self.forget_state())?;
        self.power = Some(on);
        Ok(())
    }

    pub async fn set_mode(&mut self, mode: u8) -> Result<()> {
        self.transport.set_mode(mode).await.inspect_err(|_| self.forget_state())?;
        self.mode = Some(mode);
        Ok(())
    }

    /// Power the device on and switch it to drawing mode, skipping what is already known.
    pub async fn ensure_drawing(&mut self) -> Result<()> {
        if self.power != Some(true) {
            self.set_power(true).await?;
        }
        if self.mode != Some(DRAW_MODE) {
            self.set_mode(DRAW_MODE).await?;
        }
        Ok(())
    }

    /// Blank the device and forget the last transmitted frame.
    pub async fn clear(&mut self) -> Result<()> {
        if self.mode != Some(DRAW_MODE) {
            self.set_mode(DRAW_MODE).await?;
        }
        self.transport.clear().await.inspect_err(|_| self.forget_state())?;
        self.last_sent = None;
        Ok(())
    }

    pub async fn sync_time(&mut self) -> Result<()> {
        self.transport.sync_time().await.inspect_err(|_| self.forget_state())
    }

    /// Transmit `png` unless it equals the last transmitted buffer.
    ///
    /// Returns whether the transport was called and succeeded. A failed send
    /// leaves the previous buffer in place so an identical frame retries.
    pub async fn send_if_changed(&mut self, png: Vec<u8>) -> bool {
        if self.last_sent.as_deref() == Some(png.as_slice()) {
            debug!("frame unchanged, not sending");
            return false;
        }
        match self.transport.send_frame(&png).await {
            Ok(()) => {
                self.last_sent = Some(png);
                true
            }
            Err(e) => {
                warn!("frame send failed: {}", e);
                self.forget_state();
                false
            }
        }
    }

    // After any failed call the device may have reset; assert power and mode again.
    fn forget_state(&mut self) {
        self.power = None;
        self.mode = None;
    }
}

/// Shared handle to the device link; the mutex is the transport lock.
pub type SharedLink = Arc<Mutex<DeviceLink>>;

/// Encode-compare-send boundary between rendering and the transport.
#[derive(Clone)]
pub struct FrameGate {
    link: SharedLink,
}

impl FrameGate {
    pub fn new(link: SharedLink) -> Self {
        Self { link }
    }

    /// Submit a frame; returns `true` only when it reached the transport.
    pub async fn submit(&self, frame: &Frame) -> bool {
        let png = match encode_frame(frame) {
            Ok(png) => png,
            Err(e) => {
                warn!("dropping frame: {}", e);
                return false;
            }
        };
        // Guard is scoped to this call, released on every exit path.
        let mut link = self.link.lock().await;
        link.send_if_changed(png).await
    }
}
