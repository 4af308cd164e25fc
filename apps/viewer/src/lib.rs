use std::fs::File;
use std::io::{self, BufRead, BufWriter};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context;
use serde::Serialize;
use thiserror::Error;

use modelview_core::page::PageView;
use modelview_core::state::ViewerState;
use modelview_core::{AssetSource, Control, LoadPhase, ViewerContext};
use modelview_io::{AssetRequest, ViewerConfig};
use modelview_nav::{NavMenu, Section};
use modelview_renderer::{
    CancelToken, JsonFrameWriter, LoopConfig, NullRenderer, RenderLoop, Renderer, Viewport,
};

// ── Host events ──────────────────────────────────────────────────────

/// One line of host input, already parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Control(Control),
    /// Pointer drag in pixels, turned into an orbit.
    Drag { dx: f32, dy: f32 },
    ToggleMenu,
    NavClick(String),
    Scroll(f64),
    Status,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseEventError {
    #[error("Empty input")]
    Empty,

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' needs a {name} argument")]
    MissingArgument {
        command: &'static str,
        name: &'static str,
    },

    #[error("'{command}': '{value}' is not a number")]
    InvalidNumber { command: &'static str, value: String },
}

struct Args<'a> {
    command: &'static str,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn text(&mut self, name: &'static str) -> Result<&'a str, ParseEventError> {
        self.words.next().ok_or(ParseEventError::MissingArgument {
            command: self.command,
            name,
        })
    }

    fn number<T: FromStr>(&mut self, name: &'static str) -> Result<T, ParseEventError> {
        let value = self.text(name)?;
        value.parse().map_err(|_| ParseEventError::InvalidNumber {
            command: self.command,
            value: value.to_string(),
        })
    }
}

impl FromStr for HostEvent {
    type Err = ParseEventError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(ParseEventError::Empty)?;
        let command: &'static str = match head.to_ascii_lowercase().as_str() {
            "speed" => "speed",
            "lights" => "lights",
            "reset" => "reset",
            "rotate" => "rotate",
            "theme" => "theme",
            "resize" => "resize",
            "orbit" => "orbit",
            "drag" => "drag",
            "zoom" => "zoom",
            "pan" => "pan",
            "menu" => "menu",
            "nav" => "nav",
            "scroll" => "scroll",
            "status" => "status",
            "quit" | "exit" => "quit",
            _ => return Err(ParseEventError::UnknownCommand(head.to_string())),
        };
        let mut args = Args { command, words };

        let event = match command {
            "speed" => HostEvent::Control(Control::SetRotationSpeed(args.number("multiplier")?)),
            "lights" => HostEvent::Control(Control::ToggleLighting),
            "reset" => HostEvent::Control(Control::ResetCamera),
            "rotate" => HostEvent::Control(Control::ToggleAutoRotate),
            "theme" => HostEvent::Control(Control::ToggleTheme),
            "resize" => HostEvent::Control(Control::Resize {
                width: args.number("width")?,
                height: args.number("height")?,
            }),
            "orbit" => HostEvent::Control(Control::Orbit {
                yaw_deg: args.number("yaw")?,
                pitch_deg: args.number("pitch")?,
            }),
            "zoom" => HostEvent::Control(Control::Zoom(args.number("factor")?)),
            "pan" => HostEvent::Control(Control::Pan {
                right: args.number("right")?,
                up: args.number("up")?,
            }),
            "drag" => HostEvent::Drag {
                dx: args.number("dx")?,
                dy: args.number("dy")?,
            },
            "menu" => HostEvent::ToggleMenu,
            "nav" => HostEvent::NavClick(args.text("section")?.trim_start_matches('#').to_string()),
            "scroll" => HostEvent::Scroll(args.number("y")?),
            "status" => HostEvent::Status,
            _ => HostEvent::Quit,
        };
        Ok(event)
    }
}

// ── Host state ───────────────────────────────────────────────────────

/// Host-side state living next to the [`ViewerContext`]: page navigation, the
/// pending asset request and the input channel.
pub struct AppState {
    pub nav: NavMenu,
    sections: Vec<Section>,
    loader: Option<Box<dyn AssetSource>>,
    input: Option<Receiver<String>>,
    cancel: CancelToken,
}

#[derive(Debug, Serialize)]
pub struct AppStatus<'a> {
    pub page: &'a PageView,
    pub state: &'a ViewerState,
    pub model_loaded: bool,
    pub camera_position: [f32; 3],
    pub menu_open: bool,
    pub active_section: Option<&'a str>,
}

impl AppState {
    pub fn new(sections: Vec<Section>, cancel: CancelToken) -> Self {
        Self {
            nav: NavMenu::for_sections(&sections),
            sections,
            loader: None,
            input: None,
            cancel,
        }
    }

    pub fn set_loader(&mut self, loader: Box<dyn AssetSource>) {
        self.loader = Some(loader);
    }

    pub fn set_input(&mut self, input: Receiver<String>) {
        self.input = Some(input);
    }

    /// Apply everything that arrived since the last frame: asset updates,
    /// then queued input lines. Status reports go to stdout.
    pub fn pump(&mut self, ctx: &mut ViewerContext) {
        if let Some(loader) = self.loader.as_mut() {
            ctx.pump_loader(loader.as_mut());
            if ctx.load_phase() != LoadPhase::Pending {
                self.loader = None;
            }
        }

        let Some(input) = self.input.as_ref() else {
            return;
        };
        let mut lines = Vec::new();
        loop {
            match input.try_recv() {
                Ok(line) => lines.push(line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::info!("Input closed");
                    self.input = None;
                    break;
                }
            }
        }
        for line in lines {
            if let Some(report) = self.handle_line(ctx, &line) {
                println!("{}", report);
            }
        }
    }

    /// Parse and apply one input line. Blank lines are ignored; malformed
    /// ones are logged.
    pub fn handle_line(&mut self, ctx: &mut ViewerContext, line: &str) -> Option<String> {
        match line.parse::<HostEvent>() {
            Ok(event) => self.handle_event(ctx, event),
            Err(ParseEventError::Empty) => None,
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        }
    }

    pub fn handle_event(&mut self, ctx: &mut ViewerContext, event: HostEvent) -> Option<String> {
        match event {
            HostEvent::Control(control) => ctx.apply(control),
            HostEvent::Drag { dx, dy } => {
                let surface = ctx.surface();
                let (yaw_deg, pitch_deg) =
                    Viewport::new(surface.width, surface.height).drag_to_orbit(dx, dy);
                ctx.apply(Control::Orbit { yaw_deg, pitch_deg });
            }
            HostEvent::ToggleMenu => self.nav.toggle(),
            HostEvent::NavClick(target) => self.nav.click_link(&target),
            HostEvent::Scroll(y) => {
                if let Some(current) = self.nav.scroll_spy(&self.sections, y) {
                    log::debug!("Scrolled into '{}'", current);
                }
            }
            HostEvent::Status => {
                return match serde_json::to_string(&self.status(ctx)) {
                    Ok(json) => Some(json),
                    Err(err) => {
                        log::error!("Failed to encode status: {}", err);
                        None
                    }
                };
            }
            HostEvent::Quit => {
                log::info!("Quit requested");
                self.cancel.cancel();
            }
        }
        None
    }

    pub fn status<'a>(&'a self, ctx: &'a ViewerContext) -> AppStatus<'a> {
        AppStatus {
            page: &ctx.page,
            state: &ctx.state,
            model_loaded: ctx.scene.model().is_some(),
            camera_position: ctx.camera.position().to_array(),
            menu_open: self.nav.open,
            active_section: self.nav.active_link().map(|l| l.target.as_str()),
        }
    }
}

// ── App setup ────────────────────────────────────────────────────────

/// Read stdin line by line on a background thread.
pub fn spawn_input_reader() -> io::Result<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        log::warn!("Failed to read input: {}", err);
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

/// Run-time switches that are not part of the viewer config.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub max_frames: Option<u64>,
    /// Write every frame as a JSON line to this file.
    pub frames_out: Option<PathBuf>,
}

pub fn run(config: ViewerConfig, options: RunOptions) -> anyhow::Result<()> {
    let mut render_loop = RenderLoop::new(LoopConfig {
        target_fps: config.target_fps,
        max_frames: options.max_frames,
    });
    let mut ctx = ViewerContext::new(config.viewer_options(), render_loop.now_ms());
    let mut app = AppState::new(config.sections.clone(), render_loop.cancel_token());

    match &config.asset {
        Some(asset) => app.set_loader(Box::new(AssetRequest::open(asset))),
        None => log::warn!("No asset configured, showing an empty scene"),
    }
    app.set_input(spawn_input_reader().context("failed to start input reader")?);

    let mut renderer: Box<dyn Renderer> = match &options.frames_out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(JsonFrameWriter::new(BufWriter::new(file)))
        }
        None => Box::new(NullRenderer::default()),
    };

    let frames = render_loop.run(&mut ctx, renderer.as_mut(), |ctx| app.pump(ctx))?;
    log::info!("Viewer closed after {} frames", frames);
    Ok(())
}
