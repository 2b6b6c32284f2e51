//! Application layer for Parley.
//!
//! This crate drives a conversation session: it owns the session state,
//! applies user intents through the core transition function, runs the
//! remote generation calls and publishes snapshots for the renderer.

pub mod session_controller;

pub use session_controller::{
    ActionReport, RenderEffect, SessionClosed, SessionController, SessionHandle, SessionSnapshot,
};
