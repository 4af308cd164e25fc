//! # Modelview Nav
//!
//! Page navigation for the viewer: the hamburger menu, link activation and
//! scroll-spy. Independent of the 3D scene.

pub mod menu;

pub use menu::{current_section, NavLink, NavMenu, Section};
