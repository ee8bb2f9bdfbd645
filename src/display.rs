//! Display session: the public surface a host platform drives.
//!
//! A session owns the device link (behind the transport lock), the compositor
//! and the single animation slot. Every drawing call first cancels whatever
//! animation is running and waits for it to stop, so the newest submission
//! always wins.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use tokio::sync::Mutex as AsyncMutex;

use crate::animation::{
    self, lock, AnimationContext, AnimationHandle, Clock, Mode, Renderer, TokioClock, Transition,
};
use crate::dispatch::{DeviceLink, FrameGate, SharedLink};
use crate::images::{FileImageSource, ImageSource};
use crate::rendering::transition::TransitionKind;
use crate::rendering::{Compositor, Frame};
use crate::scene::{self, Color, ElementSpec, Scene, SceneSpec};
use crate::transport::Transport;
use crate::{DisplayConfig, Result};

/// One physical display and everything needed to draw on it.
pub struct DisplaySession {
    config: DisplayConfig,
    link: SharedLink,
    ctx: AnimationContext,
    images: Arc<dyn ImageSource>,
    animation: AsyncMutex<Option<AnimationHandle>>,
    brightness: Arc<AtomicU8>,
    is_on: AtomicBool,
}

impl DisplaySession {
    /// Open a session over `transport`. Icon assets named in the config load in
    /// the background; until they arrive icons render empty.
    pub async fn open(config: DisplayConfig, transport: impl Transport + 'static) -> Result<Self> {
        config.validate()?;
        let images: Arc<dyn ImageSource> = Arc::new(FileImageSource::new(
            config.allowed_image_dirs.clone(),
            config.fetch_timeout_ms,
        ));
        let session = Self::with_parts(config, Box::new(transport), images, Arc::new(TokioClock::new()));
        session.spawn_icon_loader();
        Ok(session)
    }

    /// Build a session from explicit collaborators, e.g. a fake clock in tests.
    pub fn with_parts(
        config: DisplayConfig,
        transport: Box<dyn Transport>,
        images: Arc<dyn ImageSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let brightness = Arc::new(AtomicU8::new(config.brightness));
        let link: SharedLink = Arc::new(AsyncMutex::new(DeviceLink::new(transport)));
        let renderer = Renderer::new(
            Compositor::new(config.width, config.height),
            brightness.clone(),
            config.offload_pixels,
        );
        let ctx = AnimationContext {
            renderer,
            gate: FrameGate::new(link.clone()),
            clock,
            last_frame: Arc::new(Mutex::new(None)),
        };
        Self {
            config,
            link,
            ctx,
            images,
            animation: AsyncMutex::new(None),
            brightness,
            is_on: AtomicBool::new(true),
        }
    }

    #[cfg(feature = "icons")]
    fn spawn_icon_loader(&self) {
        let (Some(font), Some(meta)) = (
            self.config.icon_font_path.clone(),
            self.config.icon_meta_path.clone(),
        ) else {
            debug!("no icon assets configured");
            return;
        };
        let compositor = self.ctx.renderer.compositor();
        tokio::spawn(async move {
            match crate::rendering::icons::IconSet::load(&font, &meta).await {
                Ok(icons) => {
                    debug!("loaded {} icons", icons.table().len());
                    lock(&compositor).install_icons(icons);
                }
                Err(e) => warn!("icon assets unavailable, icons disabled: {}", e),
            }
        });
    }

    #[cfg(not(feature = "icons"))]
    fn spawn_icon_loader(&self) {}

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn is_on(&self) -> bool {
        self.is_on.load(Ordering::Relaxed)
    }

    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::Relaxed)
    }

    /// Brightness used from the next rendered frame on.
    pub fn set_brightness(&self, brightness: u8) {
        self.brightness.store(brightness, Ordering::Relaxed);
    }

    /// Most recently rendered or transitioned-to frame.
    pub fn last_frame(&self) -> Option<Frame> {
        lock(&self.ctx.last_frame).clone()
    }

    pub fn icons_ready(&self) -> bool {
        lock(&self.ctx.renderer.compositor()).icons_ready()
    }

    pub async fn is_animating(&self) -> bool {
        self.animation
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Handle a full `draw_matrix` request, with or without a transition.
    pub async fn draw(&self, spec: &SceneSpec) -> Result<()> {
        match &spec.transition {
            Some(t) => {
                self.submit_transition(&spec.elements, spec.background, t.kind.clone(), t.duration, t.fps)
                    .await
            }
            None => {
                self.submit_scene(spec.background, &spec.elements, spec.fps)
                    .await
            }
        }
    }

    /// Draw a scene, rendering once when static or starting the frame pump when animated.
    pub async fn submit_scene(
        &self,
        background: Color,
        elements: &[ElementSpec],
        fps: Option<u32>,
    ) -> Result<()> {
        let mut slot = self.animation.lock().await;
        cancel(&mut slot).await;
        self.ensure_ready().await;

        let scene = Arc::new(self.prepare(background, elements).await);
        match animation::classify(&scene) {
            Mode::Static => {
                let frame = self.ctx.renderer.render(&scene, self.ctx.now()).await?;
                self.ctx.gate.submit(&frame).await;
                self.ctx.record(frame);
            }
            Mode::Running => {
                let fps = fps.unwrap_or(self.config.default_fps);
                *slot = Some(animation::spawn_running(self.ctx.clone(), scene, fps));
            }
        }
        Ok(())
    }

    /// Morph from the current frame to a new scene.
    ///
    /// When the target scene is animated, the frame pump takes over once the
    /// transition finishes.
    pub async fn submit_transition(
        &self,
        elements: &[ElementSpec],
        background: Color,
        kind: TransitionKind,
        duration: f64,
        fps: u32,
    ) -> Result<()> {
        let mut slot = self.animation.lock().await;
        cancel(&mut slot).await;
        self.ensure_ready().await;

        let scene = Arc::new(self.prepare(background, elements).await);
        let to = self.ctx.renderer.render(&scene, self.ctx.now()).await?;
        let bg = background.scaled(self.brightness()).to_rgb();
        let from = self
            .last_frame()
            .unwrap_or_else(|| Frame::filled(self.config.width, self.config.height, bg));

        let then = match animation::classify(&scene) {
            Mode::Running => Some((scene, self.config.default_fps)),
            Mode::Static => None,
        };
        let transition = Transition {
            from,
            to,
            kind,
            duration,
            fps,
            background: bg,
        };
        *slot = Some(animation::spawn_transition(self.ctx.clone(), transition, then));
        Ok(())
    }

    /// Stop any animation, blank the device and reset the dispatch baseline.
    pub async fn clear(&self) {
        let mut slot = self.animation.lock().await;
        cancel(&mut slot).await;
        if let Err(e) = self.link.lock().await.clear().await {
            warn!("device unreachable during clear: {}", e);
        }
        self.ctx
            .record(Frame::new(self.config.width, self.config.height));
    }

    /// Power the display on, optionally updating brightness.
    pub async fn turn_on(&self, brightness: Option<u8>) {
        if let Some(b) = brightness {
            self.set_brightness(b);
        }
        self.is_on.store(true, Ordering::Relaxed);
        let mut link = self.link.lock().await;
        let res = match link.set_power(true).await {
            Ok(()) => link.set_mode(crate::dispatch::DRAW_MODE).await,
            Err(e) => Err(e),
        };
        if let Err(e) = res {
            warn!("device unreachable during turn_on: {}", e);
        }
    }

    /// Stop any animation and power the display off.
    pub async fn turn_off(&self) {
        let mut slot = self.animation.lock().await;
        cancel(&mut slot).await;
        self.is_on.store(false, Ordering::Relaxed);
        if let Err(e) = self.link.lock().await.set_power(false).await {
            warn!("device unreachable during turn_off: {}", e);
        }
    }

    /// Push the host clock to the device.
    pub async fn sync_time(&self) {
        if let Err(e) = self.link.lock().await.sync_time().await {
            warn!("time sync failed: {}", e);
        }
    }

    /// Cancel the running animation, if any.
    pub async fn shutdown(&self) {
        let mut slot = self.animation.lock().await;
        cancel(&mut slot).await;
    }

    async fn ensure_ready(&self) {
        match self.link.lock().await.ensure_drawing().await {
            Ok(()) => self.is_on.store(true, Ordering::Relaxed),
            Err(e) => warn!("device not ready for drawing: {}", e),
        }
    }

    async fn prepare(&self, background: Color, elements: &[ElementSpec]) -> Scene {
        scene::prepare(background, elements, self.config.width, self.images.as_ref()).await
    }
}

async fn cancel(slot: &mut Option<AnimationHandle>) {
    if let Some(handle) = slot.take() {
        debug!("cancelling running animation");
        handle.cancel().await;
    }
}
