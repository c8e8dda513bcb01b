//! Effects - side effects declared by the reducer

use crate::action::Action;
use crate::api::PokemonSource;
use crate::state::FetchTicket;

/// Task key for the collection fetch
pub const COLLECTION_TASK: &str = "pokemons";
/// Task key for the single-Pokémon fetch
pub const POKEMON_TASK: &str = "pokemon";

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the whole collection
    FetchCollection { ticket: FetchTicket },
    /// Drop the in-flight collection fetch (list unmounted)
    CancelCollectionFetch,
    /// Fetch one Pokémon for the detail modal
    FetchPokemon { id: String, ticket: FetchTicket },
    /// Drop the in-flight detail fetch (modal closed)
    CancelPokemonFetch,
}

impl Effect {
    pub fn task_key(&self) -> &'static str {
        match self {
            Effect::FetchCollection { .. } | Effect::CancelCollectionFetch => COLLECTION_TASK,
            Effect::FetchPokemon { .. } | Effect::CancelPokemonFetch => POKEMON_TASK,
        }
    }
}

/// Run a fetch effect and map its outcome to the completion action.
/// Cancellations have nothing to run and yield `None`.
pub async fn perform(source: &dyn PokemonSource, effect: Effect) -> Option<Action> {
    match effect {
        Effect::FetchCollection { ticket } => Some(match source.fetch_collection().await {
            Ok(pokemons) => {
                tracing::info!(ticket, count = pokemons.len(), "pokemons loaded");
                Action::PokemonsDidLoad { ticket, pokemons }
            }
            Err(error) => {
                tracing::warn!(ticket, %error, "pokemons fetch failed");
                Action::PokemonsDidError {
                    ticket,
                    error: error.to_string(),
                }
            }
        }),
        Effect::FetchPokemon { id, ticket } => Some(match source.fetch_by_id(&id).await {
            Ok(detail) => {
                tracing::info!(ticket, id = %id, found = detail.is_some(), "pokemon loaded");
                Action::DetailDidLoad { ticket, id, detail }
            }
            Err(error) => {
                tracing::warn!(ticket, id = %id, %error, "pokemon fetch failed");
                Action::DetailDidError {
                    ticket,
                    id,
                    error: error.to_string(),
                }
            }
        }),
        Effect::CancelCollectionFetch | Effect::CancelPokemonFetch => None,
    }
}
