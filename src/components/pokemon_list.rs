use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    highlight_substring, BaseStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior,
    SelectListProps, SelectListStyle, SelectionStyle, TextInput, TextInputProps, TextInputStyle,
};

use super::{Component, ACCENT, ERROR, MUTED};
use crate::action::Action;
use crate::state::{spinner_frame, AppState, PokemonSummary};

pub const LOADING_MESSAGE: &str = "Loading...";
pub const FETCH_ERROR_MESSAGE: &str = "Error loading Pokémon";
const SEARCH_PLACEHOLDER: &str = "Search Pokémon by name...";

pub fn empty_result_message(query: &str) -> String {
    format!("No Pokémon found for \"{query}\"")
}

pub struct PokemonListProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Search input over the filtered collection
pub struct PokemonList {
    input: TextInput,
    list: SelectList,
}

impl Default for PokemonList {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            list: SelectList::new(),
        }
    }
}

impl PokemonList {
    pub fn new() -> Self {
        Self::default()
    }

    fn row(pokemon: &PokemonSummary, query: &str) -> Line<'static> {
        let base = Style::default().fg(Color::Reset);
        let highlight = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        let mut line = Line::from(Span::styled(
            format!("#{} ", pokemon.number),
            Style::default().fg(MUTED),
        ));
        line.spans
            .extend(highlight_substring(&pokemon.name, query, base, highlight).spans);
        line.spans.push(Span::styled(
            format!("  {}", pokemon.types.join(", ")),
            Style::default().fg(MUTED),
        ));
        line
    }

    fn rows(state: &AppState) -> Vec<Line<'static>> {
        state
            .visible_pokemons()
            .into_iter()
            .map(|pokemon| Self::row(pokemon, &state.search.query))
            .collect()
    }
}

fn input_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::all(1),
            bg: Some(Color::Rgb(50, 50, 60)),
            fg: None,
        },
        placeholder_style: None,
        cursor_style: None,
    }
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: None,
        },
        selection: SelectionStyle {
            style: Some(Style::default().bg(Color::Rgb(60, 60, 80)).fg(ACCENT)),
            marker: None,
            disabled: false,
        },
        scrollbar: ScrollbarStyle::default(),
    }
}

fn render_message(frame: &mut Frame, area: Rect, message: Line<'_>) {
    let [_, row] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);
    frame.render_widget(Paragraph::new(message).alignment(Alignment::Center), row);
}

impl Component<Action> for PokemonList {
    type Props<'a> = PokemonListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        let state = props.state;

        if state.search.active {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Down) {
                return vec![Action::SearchBlur];
            }
            let input_props = TextInputProps {
                value: &state.search.query,
                placeholder: SEARCH_PLACEHOLDER,
                is_focused: true,
                style: input_style(),
                on_change: Action::SearchQueryChange,
                on_submit: |_| Action::SearchBlur,
                on_cursor_move: Some(|_| Action::Render),
            };
            return self
                .input
                .handle_event(event, input_props)
                .into_iter()
                .collect();
        }

        match key.code {
            KeyCode::Char('/') => vec![Action::SearchFocus],
            KeyCode::Char('r') => vec![Action::PokemonsFetch],
            KeyCode::Enter => vec![Action::ListOpenSelected],
            // Also leaves a not-found detail route, which draws no dialog
            KeyCode::Esc if state.modal.is_open() => vec![Action::DetailClose],
            _ if state.filtered_indices.is_empty() => Vec::new(),
            _ => {
                let items = Self::rows(state);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: state.selected_index,
                    is_focused: true,
                    style: list_style(),
                    behavior: SelectListBehavior::default(),
                    on_select: Action::ListSelect,
                    render_item: &|item| item.clone(),
                };
                self.list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let [search_area, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

        let input_props = TextInputProps {
            value: &state.search.query,
            placeholder: SEARCH_PLACEHOLDER,
            is_focused: props.is_focused && state.search.active,
            style: input_style(),
            on_change: Action::SearchQueryChange,
            on_submit: |_| Action::SearchBlur,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, search_area, input_props);

        match &state.pokemons {
            DataResource::Empty => {}
            DataResource::Loading => render_message(
                frame,
                body,
                Line::from(vec![
                    Span::styled(spinner_frame(state.tick_count), Style::default().fg(ACCENT)),
                    Span::raw(" "),
                    Span::styled(LOADING_MESSAGE, Style::default().fg(MUTED)),
                ]),
            ),
            DataResource::Failed(_) => render_message(
                frame,
                body,
                Line::from(vec![
                    Span::styled(
                        FETCH_ERROR_MESSAGE,
                        Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("  (r to retry)", Style::default().fg(MUTED)),
                ]),
            ),
            DataResource::Loaded(_) if state.filtered_indices.is_empty() => render_message(
                frame,
                body,
                Line::styled(
                    empty_result_message(&state.search.query),
                    Style::default().fg(MUTED),
                ),
            ),
            DataResource::Loaded(_) => {
                let items = Self::rows(state);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: state.selected_index,
                    is_focused: props.is_focused && !state.search.active,
                    style: list_style(),
                    behavior: SelectListBehavior {
                        show_scrollbar: true,
                        wrap_navigation: false,
                    },
                    on_select: Action::ListSelect,
                    render_item: &|item| item.clone(),
                };
                self.list.render(frame, body, list_props);
            }
        }
    }
}
