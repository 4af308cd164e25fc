//! # Modelview Core
//!
//! Scene graph bootstrap, lights, perspective camera, orbit controls and the
//! viewer state record, tied together by [`ViewerContext`]: the one object
//! every UI control handler and the render loop operate on.
//!
//! Drawing is not done here. The draw back-end reads the context through
//! `modelview-renderer`.

pub mod geometry;
pub mod light;
pub mod node;
pub mod scene;
pub mod camera;
pub mod controls;
pub mod state;
pub mod page;
pub mod loader;
pub mod commands;
pub mod context;

pub use camera::{CameraHandle, CameraPose};
pub use commands::Control;
pub use context::{SurfaceSize, ViewerContext, ViewerOptions};
pub use controls::OrbitControls;
pub use geometry::{Aabb, Color, Transform};
pub use light::{Light, LightKind, LightRig};
pub use loader::{AssetSource, LoadError, LoadPhase, LoadStatus};
pub use node::{MeshInfo, SceneNode};
pub use page::PageView;
pub use scene::{Fog, SceneHandle, Theme};
pub use state::ViewerState;
