pub mod detail_modal;
pub mod home;
pub mod nav;
pub mod pokemon_list;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use detail_modal::{PokemonDetailModal, PokemonDetailModalProps};
pub use home::{HomePage, HomePageProps};
pub use nav::{NavBar, NavBarProps};
pub use pokemon_list::{PokemonList, PokemonListProps};

use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(255, 203, 5);
pub const MUTED: Color = Color::DarkGray;
pub const ERROR: Color = Color::Red;
pub const PANEL_BG: Color = Color::Rgb(30, 30, 40);
