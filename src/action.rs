//! Actions - everything that can happen to the app

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::WeatherReport;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Weather category =====
    /// Intent: look up current conditions for a city (triggers async task)
    WeatherSearch(String),

    /// Intent: repeat the last accepted search
    WeatherRefresh,

    /// Result: provider returned usable data
    WeatherDidLoad {
        request_id: u64,
        report: WeatherReport,
    },

    /// Result: fetch failed; `message` is user-facing
    WeatherDidError { request_id: u64, message: String },

    // ===== Search category =====
    /// Open the search box
    SearchOpen,

    /// Close the search box (cancel)
    SearchClose,

    /// Search box text changed
    SearchQueryChange(String),

    /// Submit the search box
    SearchSubmit(String),

    // ===== Uncategorized (global) =====
    /// Force a re-render (for cursor movement, etc.)
    Render,

    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
