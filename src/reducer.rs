//! Reducer - pure function: (state, action) -> DispatchResult

use tracing::debug;
use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, LOADING_ANIM_CYCLE_TICKS};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Weather actions =====
        Action::WeatherSearch(query) => begin_search(state, &query),

        Action::WeatherRefresh => {
            let city = state.city.clone();
            begin_search(state, &city)
        }

        Action::WeatherDidLoad { request_id, report } => {
            if request_id != state.request_id {
                debug!(request_id, current = state.request_id, "dropping stale result");
                return DispatchResult::unchanged();
            }
            state.weather = DataResource::Loaded(report);
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            DispatchResult::changed()
        }

        Action::WeatherDidError {
            request_id,
            message,
        } => {
            if request_id != state.request_id {
                debug!(request_id, current = state.request_id, "dropping stale error");
                return DispatchResult::unchanged();
            }
            state.weather = DataResource::Failed(message);
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchOpen => {
            state.search_mode = true;
            state.search_query.clear();
            DispatchResult::changed()
        }

        Action::SearchClose => {
            state.search_mode = false;
            state.search_query.clear();
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            state.search_query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(query) => {
            if query.trim().is_empty() {
                return DispatchResult::unchanged();
            }
            state.search_mode = false;
            state.search_query.clear();
            begin_search(state, &query)
        }

        // ===== Global actions =====
        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if state.loading_anim_active() {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Start a search: blank queries are ignored, anything else replaces the
/// current view with `Loading` and schedules the fetch.
fn begin_search(state: &mut AppState, query: &str) -> DispatchResult<Effect> {
    let city = query.trim();
    if city.is_empty() {
        return DispatchResult::unchanged();
    }

    state.city = city.to_string();
    state.request_id = state.request_id.wrapping_add(1);
    state.weather = DataResource::Loading;
    state.tick_count = 0;
    state.loading_anim_ticks_remaining = 0;
    DispatchResult::changed_with(Effect::FetchWeather {
        request_id: state.request_id,
        city: state.city.clone(),
    })
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 { 0 } else { cycle - remainder }
}
