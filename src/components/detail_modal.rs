use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding};

use super::{Component, ACCENT, ERROR, MUTED, PANEL_BG};
use crate::action::Action;
use crate::state::{spinner_frame, DetailModal, PokemonDetail};

pub const DETAIL_ERROR_MESSAGE: &str = "Error loading Pokémon details";

const DIALOG_WIDTH: u16 = 64;
const DIALOG_HEIGHT: u16 = 18;

pub struct PokemonDetailModalProps<'a> {
    pub modal: &'a DetailModal,
    pub tick_count: u32,
    pub is_focused: bool,
}

pub struct PokemonDetailModal {
    modal: Modal,
}

impl Default for PokemonDetailModal {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl PokemonDetailModal {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Centered dialog rect, clamped to `area`
pub fn dialog_area(area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(DIALOG_HEIGHT)])
        .flex(Flex::Center)
        .areas(area);
    let [dialog] = Layout::horizontal([Constraint::Length(DIALOG_WIDTH)])
        .flex(Flex::Center)
        .areas(row);
    dialog
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(MUTED)),
        Span::raw(value),
    ])
}

fn detail_lines(detail: &PokemonDetail) -> Vec<Line<'_>> {
    vec![
        Line::from(Span::styled(
            detail.name.as_str(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        field("Number", detail.number.clone()),
        field("Classification", detail.classification.clone()),
        field("Types", detail.types.join(", ")),
        field("Resistant", detail.resistant.join(", ")),
        field("Weaknesses", detail.weaknesses.join(", ")),
        field("Max HP", detail.max_hp.to_string()),
        field("Max CP", detail.max_cp.to_string()),
        field("Flee Rate", detail.flee_rate.to_string()),
        field("Height", detail.height.range()),
        field("Weight", detail.weight.range()),
        field("Image", detail.image.clone()),
        Line::default(),
        Line::from(Span::styled("esc/q close", Style::default().fg(MUTED))),
    ]
}

impl Component<Action> for PokemonDetailModal {
    type Props<'a> = PokemonDetailModalProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.modal.is_open() {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => Some(Action::DetailClose),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let DetailModal::Open { id, detail, .. } = props.modal else {
            return;
        };

        let lines = match detail {
            DataResource::Empty | DataResource::Loading => vec![
                Line::default(),
                Line::from(vec![
                    Span::styled(spinner_frame(props.tick_count), Style::default().fg(ACCENT)),
                    Span::styled(format!(" Loading Pokémon {id}..."), Style::default().fg(MUTED)),
                ]),
            ],
            DataResource::Failed(_) => vec![
                Line::default(),
                Line::from(Span::styled(
                    DETAIL_ERROR_MESSAGE,
                    Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
                )),
            ],
            // Unknown id: nothing to show
            DataResource::Loaded(None) => return,
            DataResource::Loaded(Some(detail)) => detail_lines(detail),
        };

        let centered = !matches!(detail, DataResource::Loaded(Some(_)));
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let paragraph = Paragraph::new(lines.clone()).wrap(Wrap { trim: false });
            let paragraph = if centered {
                paragraph.alignment(Alignment::Center)
            } else {
                paragraph
            };
            frame.render_widget(paragraph, content_area);
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: dialog_area(area),
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(PANEL_BG),
                        padding: Padding::xy(2, 1),
                        border: None,
                        fg: Some(Color::Reset),
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::DetailClose,
                render_content: &mut render_content,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppState, Dimension};
    use tui_dispatch::testing::*;
    use tui_dispatch::NumericComponentId;

    fn bulbasaur() -> PokemonDetail {
        PokemonDetail {
            id: "001".into(),
            name: "Bulbasaur".into(),
            number: "001".into(),
            image: String::new(),
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
            resistant: vec![],
            weaknesses: vec!["Fire".into(), "Ice".into(), "Flying".into(), "Psychic".into()],
            flee_rate: 0.1,
            max_cp: 951,
            max_hp: 1071,
        }
    }

    fn open(detail: DataResource<Option<PokemonDetail>>) -> DetailModal {
        DetailModal::Open {
            id: "001".into(),
            ticket: 1,
            detail,
        }
    }

    fn render(modal: &DetailModal) -> String {
        let mut render = RenderHarness::new(80, 24);
        let mut component = PokemonDetailModal::new();
        render.render_to_string_plain(|frame| {
            component.render(
                frame,
                frame.area(),
                PokemonDetailModalProps {
                    modal,
                    tick_count: 0,
                    is_focused: true,
                },
            );
        })
    }

    #[test]
    fn test_renders_every_field() {
        let output = render(&open(DataResource::Loaded(Some(bulbasaur()))));
        assert!(output.contains("Bulbasaur"));
        assert!(output.contains("Number: 001"));
        assert!(output.contains("Classification: Seed Pokémon"));
        assert!(output.contains("Types: Grass, Poison"));
        assert!(output.contains("Weaknesses: Fire, Ice, Flying, Psychic"));
        assert!(output.contains("Max HP: 1071"));
        assert!(output.contains("Max CP: 951"));
        assert!(output.contains("Flee Rate: 0.1"));
        assert!(output.contains("Height: 0.61 m - 0.71 m"));
        assert!(output.contains("Weight: 6.04 kg - 7.07 kg"));
    }

    #[test]
    fn test_loading_and_error() {
        assert!(render(&open(DataResource::Loading)).contains("Loading Pokémon 001"));

        let output = render(&open(DataResource::Failed("HTTP 500".into())));
        assert!(output.contains(DETAIL_ERROR_MESSAGE));
        assert!(!output.contains("Number:"));
    }

    #[test]
    fn test_not_found_and_closed_render_nothing() {
        assert!(render(&open(DataResource::Loaded(None))).trim().is_empty());
        assert!(render(&DetailModal::Closed).trim().is_empty());
    }

    #[test]
    fn test_close_keys() {
        let state = AppState {
            modal: open(DataResource::Loading),
            ..Default::default()
        };
        let mut harness = TestHarness::<AppState, Action>::new(state);
        let mut component = PokemonDetailModal::new();

        let actions = harness.send_keys::<NumericComponentId, _, _>("esc q x", |state, event| {
            component
                .handle_event(
                    &event.kind,
                    PokemonDetailModalProps {
                        modal: &state.modal,
                        tick_count: 0,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect::<Vec<_>>()
        });

        actions.assert_count(2);
        actions.assert_first(Action::DetailClose);
    }
}
