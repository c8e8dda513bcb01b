//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::route::Route;

/// Collection entry, as returned by the `pokemons` query
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonSummary {
    pub id: String,
    pub name: String,
    pub number: String,
    pub image: String,
    pub types: Vec<String>,
}

/// Min/max pair, kept as the API's display strings ("6.04kg")
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Dimension {
    pub minimum: String,
    pub maximum: String,
}

impl Dimension {
    pub fn range(&self) -> String {
        format!("{} - {}", self.minimum, self.maximum)
    }
}

/// Full record, as returned by the `pokemon` query
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: String,
    pub name: String,
    pub number: String,
    pub image: String,
    pub types: Vec<String>,
    pub classification: String,
    pub weight: Dimension,
    pub height: Dimension,
    pub resistant: Vec<String>,
    pub weaknesses: Vec<String>,
    pub flee_rate: f64,
    pub max_cp: u32,
    pub max_hp: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    /// Search input has focus
    pub active: bool,
    pub query: String,
}

/// Stamp carried by a fetch and echoed back by its completion action
pub type FetchTicket = u64;

/// Detail dialog lifecycle. `Loaded(None)` means the id was not found.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub enum DetailModal {
    #[default]
    Closed,
    Open {
        id: String,
        ticket: FetchTicket,
        detail: DataResource<Option<PokemonDetail>>,
    },
}

impl DetailModal {
    pub fn opening(id: String, ticket: FetchTicket) -> Self {
        DetailModal::Open {
            id,
            ticket,
            detail: DataResource::Loading,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DetailModal::Open { .. })
    }

    /// Open and with something to draw (a not-found result draws nothing)
    pub fn is_visible(&self) -> bool {
        match self {
            DetailModal::Open { detail, .. } => !matches!(detail, DataResource::Loaded(None)),
            DetailModal::Closed => false,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            DetailModal::Open { id, .. } => Some(id),
            DetailModal::Closed => None,
        }
    }

    pub fn detail(&self) -> Option<&DataResource<Option<PokemonDetail>>> {
        match self {
            DetailModal::Open { detail, .. } => Some(detail),
            DetailModal::Closed => None,
        }
    }

    /// Whether a response for `(id, ticket)` belongs to the open dialog
    pub fn accepts(&self, response_id: &str, response_ticket: FetchTicket) -> bool {
        matches!(
            self,
            DetailModal::Open { id, ticket, .. } if id == response_id && *ticket == response_ticket
        )
    }
}

/// Spinner tick interval
pub const LOADING_TICK_MS: u64 = 80;
pub const SPINNER_FRAMES: [&str; 10] = [
    "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
];

pub fn spinner_frame(tick_count: u32) -> &'static str {
    SPINNER_FRAMES[tick_count as usize % SPINNER_FRAMES.len()]
}

/// Indices of the entries whose name contains `query`, ignoring case.
/// Relative order is preserved and an empty query keeps everything.
pub fn filter_by_name(pokemons: &[PokemonSummary], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    pokemons
        .iter()
        .enumerate()
        .filter(|(_, entry)| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
        .map(|(idx, _)| idx)
        .collect()
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "Route", label = "Path", debug_fmt)]
    pub route: Route,

    #[debug(section = "Route", label = "Nav collapsed")]
    pub nav_collapsed: bool,

    /// Collection lifecycle: Empty → Loading → Loaded/Failed
    #[debug(skip)]
    pub pokemons: DataResource<Vec<PokemonSummary>>,

    /// Indices into the loaded collection that match the search
    #[debug(skip)]
    pub filtered_indices: Vec<usize>,

    /// Selection within `filtered_indices`
    #[debug(section = "List", label = "Selected")]
    pub selected_index: usize,

    #[debug(section = "List", label = "Search", debug_fmt)]
    pub search: SearchState,

    #[debug(section = "Detail", label = "Modal", debug_fmt)]
    pub modal: DetailModal,

    // --- Fetch bookkeeping (skipped) ---
    /// Ticket of the collection fetch in flight, if any
    #[debug(skip)]
    pub collection_ticket: Option<FetchTicket>,

    #[debug(skip)]
    pub last_ticket: FetchTicket,

    /// Spinner frame counter
    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            nav_collapsed: false,
            pokemons: DataResource::Empty,
            filtered_indices: Vec::new(),
            selected_index: 0,
            search: SearchState::default(),
            modal: DetailModal::Closed,
            collection_ticket: None,
            last_ticket: 0,
            tick_count: 0,
        }
    }

    /// State with the collection already fetched
    pub fn with_pokemons(route: Route, pokemons: Vec<PokemonSummary>) -> Self {
        let mut state = Self::new(route);
        state.pokemons = DataResource::Loaded(pokemons);
        state.rebuild_filtered();
        state
    }

    pub fn issue_ticket(&mut self) -> FetchTicket {
        self.last_ticket += 1;
        self.last_ticket
    }

    pub fn rebuild_filtered(&mut self) {
        self.filtered_indices = match self.pokemons.data() {
            Some(pokemons) => filter_by_name(pokemons, &self.search.query),
            None => Vec::new(),
        };

        if self.selected_index >= self.filtered_indices.len() {
            self.selected_index = 0;
        }
    }

    pub fn visible_pokemons(&self) -> Vec<&PokemonSummary> {
        let Some(pokemons) = self.pokemons.data() else {
            return Vec::new();
        };
        self.filtered_indices
            .iter()
            .filter_map(|idx| pokemons.get(*idx))
            .collect()
    }

    pub fn selected_pokemon(&self) -> Option<&PokemonSummary> {
        let idx = *self.filtered_indices.get(self.selected_index)?;
        self.pokemons.data()?.get(idx)
    }

    pub fn loading_anim_active(&self) -> bool {
        self.pokemons.is_loading()
            || self
                .modal
                .detail()
                .is_some_and(|detail| detail.is_loading())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}
