//! # Scrawl core
//!
//! The editable model of a note document (pages, layers, strokes), the reversible commands that
//! edit it, and the history that orders those commands. Nothing in here knows about pixels - see the
//! `scrawl` crate for the render cache that mirrors this model.

pub mod color;
pub mod commands;
pub mod geom;
pub mod history;
pub mod id;
pub mod observer;
pub mod state;
pub mod stroke;

pub use id::Id;
