//! Terminal weather client for wttr.in
//!
//! The binary wires these modules into a tui-dispatch app; the library is
//! exposed for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod icons;
pub mod logging;
pub mod reducer;
pub mod sprites;
pub mod state;
