//! # Modelview Renderer
//!
//! The seam between the viewer and its draw back-end. The viewer state is
//! flattened into a serializable [`RenderFrame`] once per frame and handed to
//! a [`Renderer`]; the rasterizer itself lives behind that trait.
//!
//! The [`RenderLoop`] drives frames at a fixed rate and can be stopped
//! through a [`CancelToken`].

pub mod viewport;
pub mod render_data;
pub mod render_loop;
pub mod headless;

pub use headless::{JsonFrameWriter, NullRenderer};
pub use render_data::RenderFrame;
pub use render_loop::{CancelToken, LoopConfig, LoopState, RenderError, RenderLoop, Renderer};
pub use viewport::Viewport;
