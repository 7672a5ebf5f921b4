//! # Scrawl
//!
//! Everything between the [document model](scrawl_core) and the screen: a per-page render cache
//! that mirrors the model into raster surfaces and reports what needs repainting, the fit-to-view
//! transform, live stroke drawing, and the [`Session`] that ties a document, its history, and the
//! cache together.
#![warn(clippy::pedantic)]

pub mod logging;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod view_transform;

pub use scrawl_core;
pub use session::Session;
