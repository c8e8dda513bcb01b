use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Component, ACCENT, MUTED};
use crate::action::Action;
use crate::route::Route;

pub const NAV_EXPANDED_WIDTH: u16 = 18;
pub const NAV_COLLAPSED_WIDTH: u16 = 6;

pub struct NavBarProps<'a> {
    pub route: &'a Route,
    pub collapsed: bool,
}

/// Sidebar with the Home/List options
#[derive(Default)]
pub struct NavBar;

impl NavBar {
    pub fn width(collapsed: bool) -> u16 {
        if collapsed {
            NAV_COLLAPSED_WIDTH
        } else {
            NAV_EXPANDED_WIDTH
        }
    }
}

fn option_line(
    hotkey: &'static str,
    label: &'static str,
    active: bool,
    collapsed: bool,
) -> Line<'static> {
    let style = if active {
        Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let text = if collapsed {
        format!(" {} ", &label[..1])
    } else {
        format!(" {label} ")
    };
    Line::from(vec![
        Span::styled(hotkey, Style::default().fg(MUTED)),
        Span::raw(" "),
        Span::styled(text, style),
    ])
}

impl Component<Action> for NavBar {
    type Props<'a> = NavBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let title = if props.collapsed { "" } else { " Pokédex " };
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(MUTED))
            .title(Span::styled(
                title,
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ));

        let toggle = if props.collapsed { "n »" } else { "n « Collapse" };
        let lines = vec![
            Line::default(),
            option_line("1", "Home", *props.route == Route::Home, props.collapsed),
            option_line("2", "List", props.route.shows_list(), props.collapsed),
            Line::default(),
            Line::from(Span::styled(toggle, Style::default().fg(MUTED))),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
