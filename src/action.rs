//! Actions - every state transition the app knows about

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::route::Route;
use crate::state::{FetchTicket, PokemonDetail, PokemonSummary};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Route category =====
    /// Intent: show a route (mounts/unmounts the list, opens/closes the modal)
    RouteNavigate(Route),

    // ===== Nav category =====
    /// Collapse or expand the sidebar
    NavToggle,

    // ===== Pokemons category =====
    /// Intent: manual refetch of the collection
    PokemonsFetch,

    /// Result: collection fetched
    PokemonsDidLoad {
        ticket: FetchTicket,
        pokemons: Vec<PokemonSummary>,
    },

    /// Result: collection fetch failed
    PokemonsDidError {
        ticket: FetchTicket,
        error: String,
    },

    // ===== Search category =====
    /// Focus the search input
    SearchFocus,

    /// Leave the search input (query is kept)
    SearchBlur,

    /// Search text changed
    SearchQueryChange(String),

    // ===== List category =====
    /// Move the selection (index into the filtered list)
    ListSelect(usize),

    /// Open the selected Pokémon in the detail modal
    ListOpenSelected,

    // ===== Detail category =====
    /// Close the detail modal (back to the list route)
    DetailClose,

    /// Result: single Pokémon fetched, `None` when the id is unknown
    DetailDidLoad {
        ticket: FetchTicket,
        id: String,
        detail: Option<PokemonDetail>,
    },

    /// Result: single Pokémon fetch failed
    DetailDidError {
        ticket: FetchTicket,
        id: String,
        error: String,
    },

    // ===== UI =====
    /// Force a re-render (cursor movement)
    Render,

    // ===== Uncategorized (global) =====
    /// Spinner tick
    Tick,

    Quit,
}
