//! Core types, collaborator traits, and errors for the coil layout engine.
//!
//! This crate provides the vocabulary shared by the engine and its hosts:
//! - Geometry and axis types
//! - The `Component` / `Container` traits a host implements
//! - The `GapStyle` trait supplying platform gap suggestions
//! - Error types

pub mod component;
pub mod errors;
pub mod style;
pub mod types;

pub use component::*;
pub use errors::*;
pub use style::*;
pub use types::*;
