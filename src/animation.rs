//! Animation scheduling: the cooperative frame pump and transition runner.
//!
//! At most one animation task runs per display. It owns a cancellation
//! receiver and checks it between frames, so a frame is either fully handed to
//! the dispatch gate or not at all. All time-dependent rendering is derived
//! from [`Clock::now`], which makes the loop testable with paused tokio time.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, error, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::dispatch::FrameGate;
use crate::rendering::transition::{self, TransitionKind};
use crate::rendering::{AnimationPhase, Compositor, Frame};
use crate::scene::Scene;
use crate::{Error, Result};

/// Shortest idle between two frames, even when rendering overruns the interval.
pub const MIN_IDLE: Duration = Duration::from_millis(10);

/// Frame rate bounds for the running loop.
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 30;

/// Source of animation time in seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Seconds since construction on tokio's clock, so paused test time applies.
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// How a submitted scene is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Render once and dispatch.
    Static,
    /// Re-render periodically until superseded.
    Running,
}

pub fn classify(scene: &Scene) -> Mode {
    if scene.is_animated() {
        Mode::Running
    } else {
        Mode::Static
    }
}

/// Target interval between frames for a requested frame rate.
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.clamp(MIN_FPS, MAX_FPS) as f64)
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Renders scenes for a session, moving large canvases onto the blocking pool.
#[derive(Clone)]
pub struct Renderer {
    compositor: Arc<Mutex<Compositor>>,
    brightness: Arc<AtomicU8>,
    offload_pixels: u32,
    pixels: u32,
}

impl Renderer {
    pub fn new(compositor: Compositor, brightness: Arc<AtomicU8>, offload_pixels: u32) -> Self {
        let pixels = compositor.width() * compositor.height();
        Self {
            compositor: Arc::new(Mutex::new(compositor)),
            brightness,
            offload_pixels,
            pixels,
        }
    }

    pub fn compositor(&self) -> Arc<Mutex<Compositor>> {
        self.compositor.clone()
    }

    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::Relaxed)
    }

    pub async fn render(&self, scene: &Arc<Scene>, phase: AnimationPhase) -> Result<Frame> {
        let brightness = self.brightness();
        if self.pixels <= self.offload_pixels {
            return Ok(lock(&self.compositor).render(scene, phase, brightness));
        }
        let compositor = self.compositor.clone();
        let scene = scene.clone();
        tokio::task::spawn_blocking(move || lock(&compositor).render(&scene, phase, brightness))
            .await
            .map_err(|e| Error::AnimationError(format!("render worker: {}", e)))
    }
}

/// Shared pieces every animation task needs.
#[derive(Clone)]
pub struct AnimationContext {
    pub renderer: Renderer,
    pub gate: FrameGate,
    pub clock: Arc<dyn Clock>,
    pub last_frame: Arc<Mutex<Option<Frame>>>,
}

impl AnimationContext {
    pub fn now(&self) -> AnimationPhase {
        AnimationPhase::at(self.clock.now())
    }

    pub fn record(&self, frame: Frame) {
        *lock(&self.last_frame) = Some(frame);
    }
}

/// Handle to the running animation task.
pub struct AnimationHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl AnimationHandle {
    fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let (cancel, rx) = watch::channel(false);
        let task = tokio::spawn(f(rx));
        Self { cancel, task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal cancellation and wait until the task has stopped.
    pub async fn cancel(self) {
        let _ = self.cancel.send(true);
        if let Err(e) = self.task.await {
            error!("animation task ended abnormally: {}", e);
        }
    }
}

/// Sleep for `d` unless cancelled first; returns whether cancellation was signalled.
async fn idle(cancel: &mut watch::Receiver<bool>, d: Duration) -> bool {
    if *cancel.borrow() {
        return true;
    }
    let dropped = tokio::select! {
        _ = tokio::time::sleep(d) => false,
        changed = cancel.changed() => changed.is_err(),
    };
    dropped || *cancel.borrow()
}

/// Start the periodic frame pump for an animated scene.
pub fn spawn_running(ctx: AnimationContext, scene: Arc<Scene>, fps: u32) -> AnimationHandle {
    AnimationHandle::spawn(move |mut cancel| async move {
        if let Err(e) = run_frames(&ctx, &scene, fps, &mut cancel).await {
            error!("animation loop stopped: {}", e);
        }
    })
}

async fn run_frames(
    ctx: &AnimationContext,
    scene: &Arc<Scene>,
    fps: u32,
    cancel: &mut watch::Receiver<bool>,
) -> Result<()> {
    let interval = frame_interval(fps);
    debug!("frame pump started at {:?} per frame", interval);
    loop {
        if *cancel.borrow() {
            break;
        }
        let started = Instant::now();
        let frame = ctx.renderer.render(scene, ctx.now()).await?;
        if *cancel.borrow() {
            break;
        }
        ctx.gate.submit(&frame).await;
        ctx.record(frame);

        let wait = interval.saturating_sub(started.elapsed()).max(MIN_IDLE);
        if idle(cancel, wait).await {
            break;
        }
    }
    debug!("frame pump cancelled");
    Ok(())
}

/// A frame-to-frame morph.
#[derive(Debug, Clone)]
pub struct Transition {
    pub from: Frame,
    pub to: Frame,
    pub kind: TransitionKind,
    pub duration: f64,
    pub fps: u32,
    pub background: [u8; 3],
}

impl Transition {
    /// Every frame of the transition in order, first equal to `from`, last to `to`.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        let steps = transition::step_count(self.duration, self.fps.max(1));
        transition::eased_steps(steps).map(move |e| {
            transition::blend_frame(&self.from, &self.to, e, &self.kind, self.background)
        })
    }
}

/// Run a transition, then optionally hand over to the frame pump for `then`.
pub fn spawn_transition(
    ctx: AnimationContext,
    transition: Transition,
    then: Option<(Arc<Scene>, u32)>,
) -> AnimationHandle {
    if transition.kind.is_hard_cut() {
        warn!(
            "unknown transition '{}', using a hard cut",
            transition.kind.name()
        );
    }
    AnimationHandle::spawn(move |mut cancel| async move {
        let completed = run_transition(&ctx, &transition, &mut cancel).await;
        if !completed {
            return;
        }
        if let Some((scene, fps)) = then {
            if let Err(e) = run_frames(&ctx, &scene, fps, &mut cancel).await {
                error!("animation loop stopped: {}", e);
            }
        }
    })
}

async fn run_transition(
    ctx: &AnimationContext,
    transition: &Transition,
    cancel: &mut watch::Receiver<bool>,
) -> bool {
    let delay = Duration::from_secs_f64(1.0 / transition.fps.max(1) as f64);
    let mut completed = true;
    for frame in transition.frames() {
        if *cancel.borrow() {
            completed = false;
            break;
        }
        ctx.gate.submit(&frame).await;
        if idle(cancel, delay).await {
            completed = false;
            break;
        }
    }
    // The target becomes the new baseline whether or not the morph finished.
    ctx.record(transition.to.clone());
    completed
}
