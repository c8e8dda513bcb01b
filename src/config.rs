//! Fetch settings shared by the GraphQL client

/// Public GraphQL Pokémon endpoint
pub const DEFAULT_ENDPOINT: &str = "https://graphql-pokemon2.vercel.app/";

/// Size of the collection request (first generation)
pub const DEFAULT_FIRST: u32 = 151;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    /// `first` argument of the collection query
    pub first: u32,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>, first: u32) -> Self {
        Self {
            endpoint: endpoint.into(),
            first,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_FIRST)
    }
}
