//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::icons::IconKey;

/// Current conditions for one place, as reported by wttr.in.
///
/// Values are kept exactly as the provider sent them (strings, no unit
/// conversion or rounding).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherReport {
    pub area_name: String,
    pub country: String,
    /// Temperature in °C
    pub temp_c: String,
    /// Perceived temperature in °C
    pub feels_like_c: String,
    pub windspeed_kmph: String,
    /// Relative humidity in %
    pub humidity: String,
    pub description: String,
    /// Provider weather code (WWO), string-encoded
    pub weather_code: String,
}

impl WeatherReport {
    pub fn icon(&self) -> IconKey {
        IconKey::from_code_str(&self.weather_code)
    }
}

/// View state lifecycle: Empty (idle) → Loading → Loaded (result) / Failed (error)
pub type UiState = DataResource<WeatherReport>;

/// City searched on startup when none is given
pub const DEFAULT_CITY: &str = "Guntur";

/// Animation timing for the spinner and header gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Last accepted (trimmed) search
    #[debug(section = "Search", label = "City")]
    pub city: String,

    #[debug(section = "Weather", label = "State", debug_fmt)]
    pub weather: UiState,

    /// Generation of the most recent search; older completions are dropped
    #[debug(section = "Weather", label = "Request")]
    pub request_id: u64,

    // --- Animation internals (skipped) ---
    /// Animation frame counter (spinner + gradient seam)
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,

    // --- Search box (skipped) ---
    /// Whether the search box is open
    #[debug(skip)]
    pub search_mode: bool,

    /// Text typed into the search box
    #[debug(skip)]
    pub search_query: String,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            city: String::new(),
            weather: DataResource::Empty,
            request_id: 0,
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
            search_mode: false,
            search_query: String::new(),
        }
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.weather.data()
    }

    pub fn loading_anim_active(&self) -> bool {
        self.weather.is_loading() || self.loading_anim_ticks_remaining > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
