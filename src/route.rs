//! Routes - which page is visible and which Pokémon is open

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const HOME_PATH: &str = "/";
pub const LIST_PATH: &str = "/pokemon";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("unknown route: {0:?} (expected /, /pokemon or /pokemon/<id>)")]
    Unknown(String),
}

/// Application route, rendered as a path like `/pokemon/001`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Route {
    #[default]
    Home,
    List,
    Detail(String),
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        if normalized.is_empty() {
            return Ok(Route::Home);
        }
        if normalized == LIST_PATH {
            return Ok(Route::List);
        }

        match normalized
            .strip_prefix(LIST_PATH)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            Some(id) if !id.is_empty() && !id.contains('/') => Ok(Route::Detail(id.to_string())),
            _ => Err(RouteError::Unknown(trimmed.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => HOME_PATH.to_string(),
            Route::List => LIST_PATH.to_string(),
            Route::Detail(id) => format!("{LIST_PATH}/{id}"),
        }
    }

    /// The list page stays mounted underneath an open detail modal.
    pub fn shows_list(&self) -> bool {
        matches!(self, Route::List | Route::Detail(_))
    }

    pub fn detail_id(&self) -> Option<&str> {
        match self {
            Route::Detail(id) => Some(id),
            _ => None,
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
