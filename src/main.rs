//! pokegraph - GraphQL Pokédex TUI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokegraph::action::Action;
use pokegraph::api::{GraphQlClient, PokemonSource};
use pokegraph::components::{
    Component, HomePage, HomePageProps, NavBar, NavBarProps, PokemonDetailModal,
    PokemonDetailModalProps, PokemonList, PokemonListProps,
};
use pokegraph::config::{self, ClientConfig};
use pokegraph::effect::{perform, Effect};
use pokegraph::reducer::reducer;
use pokegraph::route::Route;
use pokegraph::state::{AppState, LOADING_TICK_MS};
use pokegraph::telemetry;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Span,
    Frame, Terminal,
};
use tui_dispatch::{
    DataResource, EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus,
    EventContext, EventKind, EventRoutingState, HandlerResponse, Keybindings, RenderContext,
    TaskKey,
};
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

/// GraphQL Pokédex TUI
#[derive(Parser, Debug)]
#[command(name = "pokegraph")]
#[command(about = "Browse, filter and inspect Pokémon from a GraphQL API")]
struct Args {
    /// GraphQL endpoint serving the Pokémon schema
    #[arg(long, env = "POKEGRAPH_ENDPOINT", default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// How many Pokémon the list query asks for
    #[arg(
        long,
        env = "POKEGRAPH_FIRST",
        default_value_t = config::DEFAULT_FIRST,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    first: u32,

    /// Route to open on start: /, /pokemon or /pokemon/<id>
    #[arg(long, default_value = "/pokemon")]
    route: Route,

    /// Append logs to this file (filter with RUST_LOG)
    #[arg(long, env = "POKEGRAPH_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokeComponentId {
    Home,
    List,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokeContext {
    Main,
    Search,
    Detail,
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        if self.modal.is_visible() {
            Some(PokeComponentId::Detail)
        } else if self.route.shows_list() {
            Some(PokeComponentId::List)
        } else {
            Some(PokeComponentId::Home)
        }
    }

    fn modal(&self) -> Option<PokeComponentId> {
        if self.modal.is_visible() {
            Some(PokeComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::Detail => PokeContext::Detail,
            PokeComponentId::List if self.search.active => PokeContext::Search,
            PokeComponentId::Home | PokeComponentId::List => PokeContext::Main,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        endpoint,
        first,
        route,
        log_file,
        debug: debug_args,
    } = Args::parse();

    telemetry::init_tracing(log_file.as_deref())?;

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let source: Arc<dyn PokemonSource> =
        Arc::new(GraphQlClient::new(ClientConfig::new(endpoint, first)));
    tracing::info!(route = %route, first, "starting");

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, route, source, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct PokeUi {
    nav: NavBar,
    home: HomePage,
    list: PokemonList,
    detail: PokemonDetailModal,
}

impl PokeUi {
    fn new() -> Self {
        Self {
            nav: NavBar,
            home: HomePage,
            list: PokemonList::new(),
            detail: PokemonDetailModal::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        let [main, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let [nav_area, page] = Layout::horizontal([
            Constraint::Length(NavBar::width(state.nav_collapsed)),
            Constraint::Min(1),
        ])
        .areas(main);

        self.nav.render(
            frame,
            nav_area,
            NavBarProps {
                route: &state.route,
                collapsed: state.nav_collapsed,
            },
        );

        let page_focused = render_ctx.is_focused() && !state.modal.is_visible();
        if state.route.shows_list() {
            event_ctx.component_areas.remove(&PokeComponentId::Home);
            event_ctx.set_component_area(PokeComponentId::List, page);
            self.list.render(
                frame,
                page,
                PokemonListProps {
                    state,
                    is_focused: page_focused,
                },
            );
        } else {
            event_ctx.component_areas.remove(&PokeComponentId::List);
            event_ctx.set_component_area(PokeComponentId::Home, page);
            self.home.render(
                frame,
                page,
                HomePageProps {
                    is_focused: page_focused,
                },
            );
        }

        if state.modal.is_visible() {
            event_ctx.set_component_area(PokeComponentId::Detail, area);
            self.detail.render(
                frame,
                area,
                PokemonDetailModalProps {
                    modal: &state.modal,
                    tick_count: state.tick_count,
                    is_focused: render_ctx.is_focused(),
                },
            );
        } else {
            event_ctx.component_areas.remove(&PokeComponentId::Detail);
        }

        render_status_bar(frame, footer, state);
    }

    fn handle_home_event(&mut self, event: &EventKind) -> HandlerResponse<Action> {
        let actions: Vec<_> = self
            .home
            .handle_event(event, HomePageProps { is_focused: true })
            .into_iter()
            .collect();
        consumed_if_any(actions)
    }

    fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = PokemonListProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.list.handle_event(event, props).into_iter().collect();
        if state.search.active {
            // Typing must not reach the global shortcuts
            return HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            };
        }
        consumed_if_any(actions)
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = PokemonDetailModalProps {
            modal: &state.modal,
            tick_count: state.tick_count,
            is_focused: true,
        };
        let actions: Vec<_> = self.detail.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn consumed_if_any(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = if state.modal.is_visible() {
        vec![StatusBarHint::new("esc", "close")]
    } else if state.search.active {
        vec![
            StatusBarHint::new("enter", "done"),
            StatusBarHint::new("esc", "back"),
        ]
    } else if state.route.shows_list() {
        vec![
            StatusBarHint::new("/", "search"),
            StatusBarHint::new("enter", "details"),
            StatusBarHint::new("r", "refetch"),
            StatusBarHint::new("1", "home"),
            StatusBarHint::new("n", "nav"),
            StatusBarHint::new("q", "quit"),
        ]
    } else {
        vec![
            StatusBarHint::new("2", "list"),
            StatusBarHint::new("n", "nav"),
            StatusBarHint::new("q", "quit"),
        ]
    };

    let path = [StatusBarItem::span(Span::styled(
        state.route.path(),
        Style::default().fg(Color::DarkGray),
    ))];
    let count = match &state.pokemons {
        DataResource::Loaded(all) if state.route.shows_list() => {
            format!("{}/{}", state.filtered_indices.len(), all.len())
        }
        _ => String::new(),
    };
    let count = [StatusBarItem::span(Span::raw(count))];

    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::items(&path),
            center: StatusBarSection::hints(&hints),
            right: StatusBarSection::items(&count),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    initial_route: Route,
    source: Arc<dyn PokemonSource>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokeUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_home = Rc::clone(&ui);
    bus.register(PokeComponentId::Home, move |event, _state| {
        ui_home.borrow_mut().handle_home_event(&event.kind)
    });

    let ui_list = Rc::clone(&ui);
    bus.register(PokeComponentId::List, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokeComponentId::Detail, move |event, state| {
        ui_detail.borrow_mut().handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        EventKind::Key(key) if !state.search.active => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            KeyCode::Char('1') => HandlerResponse::action(Action::RouteNavigate(Route::Home)),
            KeyCode::Char('2') => HandlerResponse::action(Action::RouteNavigate(Route::List)),
            KeyCode::Char('n') => HandlerResponse::action(Action::NavToggle),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::RouteNavigate(initial_route)),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&source)),
        )
        .await
}

/// Fetches run as keyed tasks; a new fetch under the same key replaces the old one
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, source: Arc<dyn PokemonSource>) {
    let key = TaskKey::new(effect.task_key());
    match effect {
        Effect::CancelCollectionFetch | Effect::CancelPokemonFetch => {
            tracing::debug!(task = effect.task_key(), "cancel");
            ctx.tasks().cancel(&key);
        }
        Effect::FetchCollection { .. } | Effect::FetchPokemon { .. } => {
            ctx.tasks().spawn(key, async move {
                perform(source.as_ref(), effect)
                    .await
                    .unwrap_or(Action::Render)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokegraph::state::{DetailModal, PokemonDetail};

    fn open_modal(detail: DataResource<Option<PokemonDetail>>) -> AppState {
        AppState {
            route: Route::Detail("001".into()),
            modal: DetailModal::Open {
                id: "001".into(),
                ticket: 1,
                detail,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_visible_modal_blocks_global_keys() {
        let state = open_modal(DataResource::Loading);
        assert_eq!(state.modal(), Some(PokeComponentId::Detail));
        assert_eq!(state.focused(), Some(PokeComponentId::Detail));
    }

    #[test]
    fn test_not_found_modal_leaves_focus_on_list() {
        let state = open_modal(DataResource::Loaded(None));
        assert_eq!(state.modal(), None);
        assert_eq!(state.focused(), Some(PokeComponentId::List));
    }

    #[test]
    fn test_search_context() {
        let mut state = AppState::new(Route::List);
        assert!(state.binding_context(PokeComponentId::List) == PokeContext::Main);
        state.search.active = true;
        assert!(state.binding_context(PokeComponentId::List) == PokeContext::Search);
    }
}
