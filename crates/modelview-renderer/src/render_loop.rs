//! Fixed-rate frame loop.
//!
//! Each iteration schedules the next frame deadline, advances orbit damping,
//! counts the frame for the FPS readout and issues one draw call. Host events
//! run in a `pump` hook between iterations, never during one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use modelview_core::ViewerContext;

use crate::render_data::RenderFrame;
use crate::Viewport;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A draw back-end.
pub trait Renderer {
    /// The draw surface changed size.
    fn resize(&mut self, viewport: Viewport) -> Result<(), RenderError>;

    /// Draw one frame.
    fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError>;
}

/// Shared stop flag for a running [`RenderLoop`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No frame scheduled yet.
    Idle,
    Running,
    /// Cancelled, frame limit reached, or a draw failed.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub target_fps: u32,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_frames: None,
        }
    }
}

pub struct RenderLoop {
    config: LoopConfig,
    state: LoopState,
    frame_index: u64,
    viewport: Option<Viewport>,
    cancel: CancelToken,
    epoch: Instant,
}

impl RenderLoop {
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            state: LoopState::Idle,
            frame_index: 0,
            viewport: None,
            cancel: CancelToken::new(),
            epoch: Instant::now(),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Milliseconds since the loop was created; the clock the FPS counter
    /// runs on.
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.config.target_fps.max(1) as f64)
    }

    /// Run one iteration at time `now_ms`: damping, FPS, draw.
    pub fn tick<R: Renderer + ?Sized>(
        &mut self,
        ctx: &mut ViewerContext,
        renderer: &mut R,
        now_ms: f64,
    ) -> Result<(), RenderError> {
        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
            log::debug!("Render loop running");
        }

        let surface = ctx.surface();
        let viewport = Viewport::new(surface.width, surface.height);
        if self.viewport != Some(viewport) {
            renderer.resize(viewport)?;
            self.viewport = Some(viewport);
        }

        ctx.step(now_ms);
        let frame = RenderFrame::capture(ctx, viewport, self.frame_index);
        renderer.render(&frame)?;
        self.frame_index += 1;
        Ok(())
    }

    /// Run until cancelled or the frame limit is reached. `pump` runs before
    /// every frame and is where host events get applied. Returns the number
    /// of frames drawn.
    pub fn run<R, F>(
        &mut self,
        ctx: &mut ViewerContext,
        renderer: &mut R,
        mut pump: F,
    ) -> Result<u64, RenderError>
    where
        R: Renderer + ?Sized,
        F: FnMut(&mut ViewerContext),
    {
        let interval = self.frame_interval();
        let mut deadline = Instant::now();
        log::info!(
            "Starting render loop at {} fps (frame limit: {:?})",
            self.config.target_fps,
            self.config.max_frames
        );

        while !self.should_stop() {
            pump(ctx);
            if self.cancel.is_cancelled() {
                break;
            }

            deadline += interval;
            let now = Instant::now();
            if deadline < now {
                // Running behind: drop the missed slots instead of bursting.
                deadline = now;
            }

            if let Err(err) = self.tick(ctx, renderer, self.now_ms()) {
                self.state = LoopState::Stopped;
                log::error!("Render loop stopped: {}", err);
                return Err(err);
            }

            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
        }

        self.state = LoopState::Stopped;
        log::info!("Render loop stopped after {} frames", self.frame_index);
        Ok(self.frame_index)
    }

    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled()
            || self
                .config
                .max_frames
                .is_some_and(|max| self.frame_index >= max)
    }
}
