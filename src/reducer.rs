//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::route::Route;
use crate::state::{AppState, DetailModal, SearchState};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Route / nav =====
        Action::RouteNavigate(route) => navigate(state, route),

        Action::NavToggle => {
            state.nav_collapsed = !state.nav_collapsed;
            DispatchResult::changed()
        }

        // ===== Collection =====
        Action::PokemonsFetch => {
            let settled = state.pokemons.is_loaded() || state.pokemons.is_failed();
            if !state.route.shows_list() || !settled {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(start_collection_fetch(state))
        }

        Action::PokemonsDidLoad { ticket, pokemons } => {
            if state.collection_ticket != Some(ticket) {
                tracing::debug!(ticket, "dropping stale pokemons response");
                return DispatchResult::unchanged();
            }
            state.collection_ticket = None;
            state.pokemons = DataResource::Loaded(pokemons);
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::PokemonsDidError { ticket, error } => {
            if state.collection_ticket != Some(ticket) {
                tracing::debug!(ticket, "dropping stale pokemons error");
                return DispatchResult::unchanged();
            }
            state.collection_ticket = None;
            state.pokemons = DataResource::Failed(error);
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchFocus => {
            if state.search.active || !state.route.shows_list() || state.modal.is_visible() {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchBlur => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            if state.search.query == query {
                return DispatchResult::unchanged();
            }
            state.search.query = query;
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        // ===== List =====
        Action::ListSelect(index) => {
            if index >= state.filtered_indices.len() || index == state.selected_index {
                return DispatchResult::unchanged();
            }
            state.selected_index = index;
            DispatchResult::changed()
        }

        Action::ListOpenSelected => {
            let Some(id) = state.selected_pokemon().map(|p| p.id.clone()) else {
                return DispatchResult::unchanged();
            };
            navigate(state, Route::Detail(id))
        }

        // ===== Detail =====
        Action::DetailClose => {
            if !state.modal.is_open() {
                return DispatchResult::unchanged();
            }
            navigate(state, Route::List)
        }

        Action::DetailDidLoad { ticket, id, detail } => {
            if !state.modal.accepts(&id, ticket) {
                tracing::debug!(ticket, id = %id, "dropping stale pokemon response");
                return DispatchResult::unchanged();
            }
            if let DetailModal::Open { detail: slot, .. } = &mut state.modal {
                *slot = DataResource::Loaded(detail);
            }
            DispatchResult::changed()
        }

        Action::DetailDidError { ticket, id, error } => {
            if !state.modal.accepts(&id, ticket) {
                tracing::debug!(ticket, id = %id, "dropping stale pokemon error");
                return DispatchResult::unchanged();
            }
            if let DetailModal::Open { detail: slot, .. } = &mut state.modal {
                *slot = DataResource::Failed(error);
            }
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if !state.loading_anim_active() {
                return DispatchResult::unchanged();
            }
            state.tick_count = state.tick_count.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Single transition for every route change: list mount/unmount first,
/// then the detail modal follows the route's id.
fn navigate(state: &mut AppState, route: Route) -> DispatchResult<Effect> {
    if state.route == route {
        return DispatchResult::unchanged();
    }
    tracing::debug!(from = %state.route, to = %route, "navigate");

    let was_listing = state.route.shows_list();
    state.route = route;
    let mut effects = Vec::new();

    match (was_listing, state.route.shows_list()) {
        (false, true) => effects.extend(mount_list(state)),
        (true, false) => effects.extend(unmount_list(state)),
        _ => {}
    }

    match state.route.detail_id().map(str::to_owned) {
        Some(id) if state.modal.id() != Some(id.as_str()) => {
            let ticket = state.issue_ticket();
            state.modal = DetailModal::opening(id.clone(), ticket);
            effects.push(Effect::FetchPokemon { id, ticket });
        }
        Some(_) => {}
        None => {
            if state.modal.is_open() {
                state.modal = DetailModal::Closed;
                effects.push(Effect::CancelPokemonFetch);
            }
        }
    }

    DispatchResult::changed_with_many(effects)
}

fn mount_list(state: &mut AppState) -> Option<Effect> {
    state.search = SearchState::default();
    state.selected_index = 0;
    if state.pokemons.is_loaded() {
        state.rebuild_filtered();
        return None;
    }
    Some(start_collection_fetch(state))
}

fn unmount_list(state: &mut AppState) -> Option<Effect> {
    state.search.active = false;
    state.collection_ticket.take()?;
    // Abandoned mid-flight: the next mount starts over
    state.pokemons = DataResource::Empty;
    state.rebuild_filtered();
    Some(Effect::CancelCollectionFetch)
}

fn start_collection_fetch(state: &mut AppState) -> Effect {
    let ticket = state.issue_ticket();
    state.collection_ticket = Some(ticket);
    state.pokemons = DataResource::Loading;
    state.tick_count = 0;
    state.rebuild_filtered();
    Effect::FetchCollection { ticket }
}
