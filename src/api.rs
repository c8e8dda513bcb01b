//! GraphQL client for the Pokémon API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ClientConfig;
use crate::state::{Dimension, PokemonDetail, PokemonSummary};

pub const COLLECTION_QUERY: &str = "query pokemons($first: Int!) {
  pokemons(first: $first) {
    id
    number
    name
    image
    types
  }
}";

pub const POKEMON_QUERY: &str = "query pokemon($id: String, $name: String) {
  pokemon(id: $id, name: $name) {
    id
    number
    name
    weight {
      minimum
      maximum
    }
    height {
      minimum
      maximum
    }
    classification
    types
    resistant
    weaknesses
    fleeRate
    maxCP
    maxHP
    image
  }
}";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("graphql error: {0}")]
    GraphQl(String),
    #[error("response has no data")]
    MissingData,
    #[error("response parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where Pokémon data comes from
#[async_trait]
pub trait PokemonSource: Send + Sync {
    async fn fetch_collection(&self) -> Result<Vec<PokemonSummary>, ApiError>;

    /// `Ok(None)` when the id is unknown
    async fn fetch_by_id(&self, id: &str) -> Result<Option<PokemonDetail>, ApiError>;
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CollectionData {
    pokemons: Option<Vec<PokemonNode>>,
}

#[derive(Debug, Deserialize)]
struct PokemonData {
    pokemon: Option<PokemonNode>,
}

// Every field but `id` is nullable in the schema
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PokemonNode {
    id: String,
    number: Option<String>,
    name: Option<String>,
    image: Option<String>,
    types: Option<Vec<String>>,
    classification: Option<String>,
    weight: Option<DimensionNode>,
    height: Option<DimensionNode>,
    resistant: Option<Vec<String>>,
    weaknesses: Option<Vec<String>>,
    flee_rate: Option<f64>,
    #[serde(rename = "maxCP")]
    max_cp: Option<u32>,
    #[serde(rename = "maxHP")]
    max_hp: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DimensionNode {
    minimum: Option<String>,
    maximum: Option<String>,
}

impl From<DimensionNode> for Dimension {
    fn from(node: DimensionNode) -> Self {
        Dimension {
            minimum: node.minimum.unwrap_or_default(),
            maximum: node.maximum.unwrap_or_default(),
        }
    }
}

impl From<PokemonNode> for PokemonSummary {
    fn from(node: PokemonNode) -> Self {
        PokemonSummary {
            id: node.id,
            name: node.name.unwrap_or_default(),
            number: node.number.unwrap_or_default(),
            image: node.image.unwrap_or_default(),
            types: node.types.unwrap_or_default(),
        }
    }
}

impl From<PokemonNode> for PokemonDetail {
    fn from(node: PokemonNode) -> Self {
        PokemonDetail {
            id: node.id,
            name: node.name.unwrap_or_default(),
            number: node.number.unwrap_or_default(),
            image: node.image.unwrap_or_default(),
            types: node.types.unwrap_or_default(),
            classification: node.classification.unwrap_or_default(),
            weight: node.weight.map(Dimension::from).unwrap_or_default(),
            height: node.height.map(Dimension::from).unwrap_or_default(),
            resistant: node.resistant.unwrap_or_default(),
            weaknesses: node.weaknesses.unwrap_or_default(),
            flee_rate: node.flee_rate.unwrap_or_default(),
            max_cp: node.max_cp.unwrap_or_default(),
            max_hp: node.max_hp.unwrap_or_default(),
        }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let response: GraphQlResponse<T> = serde_json::from_slice(body)?;
    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(ApiError::GraphQl(messages.join("; ")));
    }
    response.data.ok_or(ApiError::MissingData)
}

/// Decode a `pokemons` response body
pub fn decode_collection(body: &[u8]) -> Result<Vec<PokemonSummary>, ApiError> {
    let data: CollectionData = decode(body)?;
    Ok(data
        .pokemons
        .unwrap_or_default()
        .into_iter()
        .map(PokemonSummary::from)
        .collect())
}

/// Decode a `pokemon` response body; `pokemon: null` is `Ok(None)`
pub fn decode_pokemon(body: &[u8]) -> Result<Option<PokemonDetail>, ApiError> {
    let data: PokemonData = decode(body)?;
    Ok(data.pokemon.map(PokemonDetail::from))
}

pub struct GraphQlClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl GraphQlClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn post(&self, query: &str, variables: serde_json::Value) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl PokemonSource for GraphQlClient {
    async fn fetch_collection(&self) -> Result<Vec<PokemonSummary>, ApiError> {
        tracing::debug!(
            endpoint = %self.config.endpoint,
            first = self.config.first,
            "query pokemons"
        );
        let body = self
            .post(COLLECTION_QUERY, json!({ "first": self.config.first }))
            .await?;
        let pokemons = decode_collection(&body)?;
        tracing::debug!(count = pokemons.len(), "decoded pokemons");
        Ok(pokemons)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<PokemonDetail>, ApiError> {
        tracing::debug!(endpoint = %self.config.endpoint, id, "query pokemon");
        let body = self.post(POKEMON_QUERY, json!({ "id": id })).await?;
        decode_pokemon(&body)
    }
}
