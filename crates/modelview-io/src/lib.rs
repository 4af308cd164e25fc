//! # Modelview I/O
//!
//! Asset loading for the viewer: GLTF/GLB decoding with the `gltf` crate and a
//! background request that reports progress and a single final result. Also
//! reads the JSON viewer configuration.

pub mod asset;
pub mod config;
pub mod request;

pub use asset::{decode_model, AssetError};
pub use config::{ConfigError, ViewerConfig};
pub use request::AssetRequest;
