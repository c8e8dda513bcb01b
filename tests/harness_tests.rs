//! End-to-end flows through the store: actions in, state and effects out

use pokegraph::{
    action::Action,
    components::{Component, PokemonList, PokemonListProps},
    effect::Effect,
    reducer::reducer,
    route::Route,
    state::{AppState, Dimension, PokemonDetail, PokemonSummary},
};
use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;

fn mock_pokemons() -> Vec<PokemonSummary> {
    ["Bulbasaur", "Ivysaur", "Venusaur"]
        .iter()
        .enumerate()
        .map(|(i, name)| PokemonSummary {
            id: format!("00{}", i + 1),
            name: (*name).into(),
            number: format!("00{}", i + 1),
            image: format!("https://img.pokemondb.net/artwork/{}.jpg", name.to_lowercase()),
            types: vec!["Grass".into(), "Poison".into()],
        })
        .collect()
}

fn mock_detail() -> PokemonDetail {
    PokemonDetail {
        id: "001".into(),
        name: "Bulbasaur".into(),
        number: "001".into(),
        image: "https://img.pokemondb.net/artwork/bulbasaur.jpg".into(),
        types: vec!["Grass".into(), "Poison".into()],
        classification: "Seed Pokémon".into(),
        weight: Dimension {
            minimum: "6.04 kg".into(),
            maximum: "7.07 kg".into(),
        },
        height: Dimension {
            minimum: "0.61 m".into(),
            maximum: "0.71 m".into(),
        },
        resistant: vec!["Water".into(), "Electric".into()],
        weaknesses: vec!["Fire".into(), "Ice".into(), "Flying".into(), "Psychic".into()],
        flee_rate: 0.1,
        max_cp: 951,
        max_hp: 1071,
    }
}

/// Tickets are issued from 1, so the first fetch of a fresh state carries 1
const FIRST_TICKET: u64 = 1;

// ============================================================================
// Collection fetch + filter
// ============================================================================

#[test]
fn test_list_mount_fetch_and_filter() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::RouteNavigate(Route::List));
    harness.assert_state(|s| s.pokemons.is_loading());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::FetchCollection { .. }));

    let ticket = FIRST_TICKET;
    harness.complete_action(Action::PokemonsDidLoad {
        ticket,
        pokemons: mock_pokemons(),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 1));

    harness.assert_state(|s| s.filtered_indices == vec![0, 1, 2]);

    harness.dispatch_collect(Action::SearchQueryChange("Ivy".into()));
    harness.assert_state(|s| {
        s.visible_pokemons()
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            == vec!["Ivysaur"]
    });

    harness.dispatch_collect(Action::SearchQueryChange(String::new()));
    harness.assert_state(|s| s.filtered_indices.len() == 3);
}

#[test]
fn test_fetch_error_then_manual_refetch() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::RouteNavigate(Route::List));
    harness.drain_effects();

    let ticket = FIRST_TICKET;
    harness.complete_action(Action::PokemonsDidError {
        ticket,
        error: "request failed: connection refused".into(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.pokemons.is_failed());

    // No automatic retry
    harness.drain_effects().effects_empty();

    harness.dispatch_collect(Action::PokemonsFetch);
    harness.assert_state(|s| s.pokemons.is_loading());
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::FetchCollection { .. }));
}

#[test]
fn test_remount_keeps_collection_and_resets_search() {
    let state = AppState::with_pokemons(Route::List, mock_pokemons());
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    let results = harness.dispatch_all([
        Action::SearchQueryChange("saur".into()),
        Action::RouteNavigate(Route::Home),
        Action::RouteNavigate(Route::List),
    ]);
    assert_eq!(results, vec![true, true, true]);

    harness.assert_state(|s| s.search.query.is_empty());
    harness.assert_state(|s| s.pokemons.is_loaded());
    harness.drain_effects().effects_empty();
}

// ============================================================================
// Detail modal
// ============================================================================

#[test]
fn test_open_detail_load_and_close() {
    let state = AppState::with_pokemons(Route::List, mock_pokemons());
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    harness.dispatch_collect(Action::ListOpenSelected);
    harness.assert_state(|s| s.route == Route::Detail("001".into()));
    harness.assert_state(|s| s.modal.detail().is_some_and(|d| d.is_loading()));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::FetchPokemon { id, .. } if id == "001"));

    let ticket = FIRST_TICKET;
    harness.complete_action(Action::DetailDidLoad {
        ticket,
        id: "001".into(),
        detail: Some(mock_detail()),
    });
    harness.process_emitted();
    harness.assert_state(|s| {
        s.modal
            .detail()
            .and_then(|d| d.data())
            .is_some_and(|d| d.as_ref().is_some_and(|p| p.max_hp == 1071))
    });

    harness.dispatch_collect(Action::DetailClose);
    harness.assert_state(|s| s.route == Route::List && !s.modal.is_open());
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::CancelPokemonFetch));
}

#[test]
fn test_late_detail_response_after_close_is_ignored() {
    let state = AppState::with_pokemons(Route::List, mock_pokemons());
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    harness.dispatch_collect(Action::RouteNavigate(Route::Detail("001".into())));
    let ticket = FIRST_TICKET;
    harness.dispatch_collect(Action::DetailClose);

    harness.complete_action(Action::DetailDidLoad {
        ticket,
        id: "001".into(),
        detail: Some(mock_detail()),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (0, 1));
    harness.assert_state(|s| !s.modal.is_open());
}

#[test]
fn test_deep_link_issues_both_fetches() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::RouteNavigate(Route::parse("/pokemon/001").unwrap()));

    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(|e| matches!(e, Effect::FetchCollection { .. }));
    effects.effects_none_match(|e| matches!(e, Effect::CancelPokemonFetch));
}

// ============================================================================
// Component + Store Integration
// ============================================================================

#[test]
fn test_keyboard_search_flow() {
    let state = AppState::with_pokemons(Route::List, mock_pokemons());
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    let mut component = PokemonList::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("/", |state, event| {
        component
            .handle_event(
                &event.kind,
                PokemonListProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect::<Vec<_>>()
    });
    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.search.active);

    harness.dispatch_collect(Action::SearchQueryChange("venu".into()));
    harness.dispatch_collect(Action::SearchBlur);

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter", |state, event| {
        component
            .handle_event(
                &event.kind,
                PokemonListProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect::<Vec<_>>()
    });
    for action in actions {
        harness.dispatch_collect(action);
    }

    harness.assert_state(|s| s.route == Route::Detail("003".into()));
}

#[test]
fn test_render_list_through_harness() {
    let state = AppState::with_pokemons(Route::List, mock_pokemons());
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    let mut component = PokemonList::new();

    harness.dispatch_collect(Action::SearchQueryChange("ivy".into()));

    let output = harness.render_plain(60, 12, |frame, area, state| {
        component.render(
            frame,
            area,
            PokemonListProps {
                state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("Ivysaur"), "filtered row missing:\n{output}");
    assert!(!output.contains("Venusaur"));
}
