use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT, MUTED};
use crate::action::Action;
use crate::route::Route;

pub struct HomePageProps {
    pub is_focused: bool,
}

/// Landing page for the `/` route
#[derive(Default)]
pub struct HomePage;

impl Component<Action> for HomePage {
    type Props<'a> = HomePageProps;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) if key.code == KeyCode::Enter => {
                Some(Action::RouteNavigate(Route::List))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _props: Self::Props<'_>) {
        let [content] = Layout::vertical([Constraint::Length(4)])
            .flex(Flex::Center)
            .areas(area);

        let lines = vec![
            Line::from(Span::styled(
                "Welcome to the Pokédex",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(MUTED)),
                Span::styled("enter", Style::default().fg(ACCENT)),
                Span::styled(" or ", Style::default().fg(MUTED)),
                Span::styled("2", Style::default().fg(ACCENT)),
                Span::styled(" to browse the list", Style::default().fg(MUTED)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), content);
    }
}
