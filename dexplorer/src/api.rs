use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{OnceCell, Semaphore};
use tokio::task::JoinSet;

use crate::evolution::{parse_chain, ChainLink, EvolutionChainResponse};
use crate::filter::{CategoryMembers, CategoryQuery};
use crate::state::{Ability, DetailRecord, FilterOptions, ListEntry};
use crate::stats::{grass_knot_power, StatSet};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_SPECIES_LIMIT: u32 = 1025;
pub const DEFAULT_FORM_IDS: RangeInclusive<u32> = 10001..=10277;
pub const DEFAULT_CONCURRENCY: usize = 12;

const SPRITE_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";
const HIDDEN_TYPES: [&str; 2] = ["unknown", "shadow"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub species_limit: u32,
    pub form_ids: RangeInclusive<u32>,
    pub concurrency: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            species_limit: DEFAULT_SPECIES_LIMIT,
            form_ids: DEFAULT_FORM_IDS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0} not found")]
    NotFound(String),
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("could not decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} has no evolution chain")]
    MissingChain(String),
    #[error("background task failed: {0}")]
    Task(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Trailing numeric path segment of a resource URL, 0 when absent.
pub fn id_from_url(url: &str) -> u32 {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .unwrap_or(0)
}

pub fn default_sprite_url(id: u32) -> String {
    format!("{SPRITE_BASE}/{id}.png")
}

/// One member of a category value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMember {
    pub id: u32,
    pub name: String,
}

/// Read-only access to the creature database.
#[async_trait]
pub trait DexSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<ListEntry>, ApiError>;

    async fn fetch_filter_options(&self) -> Result<FilterOptions, ApiError>;

    async fn fetch_by_category(&self, query: &CategoryQuery)
        -> Result<Vec<CategoryMember>, ApiError>;

    async fn fetch_detail(&self, id_or_name: &str) -> Result<DetailRecord, ApiError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    abilities: Vec<PokemonAbilitySlot>,
    #[serde(default)]
    sprites: serde_json::Value,
    species: NamedResource,
    cries: Option<PokemonCries>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonCries {
    latest: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    gender_rate: i8,
    color: NamedResource,
    #[serde(default)]
    egg_groups: Vec<NamedResource>,
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

/// `/type/{name}` nests each member one level deeper than color and egg
/// group listings do.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum CategoryResponse {
    Species { pokemon_species: Vec<NamedResource> },
    Pokemon { pokemon: Vec<TypeMemberSlot> },
}

#[derive(Clone, Debug, Deserialize)]
struct TypeMemberSlot {
    pokemon: NamedResource,
}

impl CategoryResponse {
    fn into_members(self) -> Vec<CategoryMember> {
        let resources: Vec<NamedResource> = match self {
            CategoryResponse::Species { pokemon_species } => pokemon_species,
            CategoryResponse::Pokemon { pokemon } => {
                pokemon.into_iter().map(|slot| slot.pokemon).collect()
            }
        };
        resources
            .into_iter()
            .map(|resource| CategoryMember {
                id: id_from_url(&resource.url),
                name: resource.name,
            })
            .collect()
    }
}

/// HTTP source backed by the public API.
#[derive(Clone, Debug)]
pub struct PokeApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl PokeApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn fetch_species_list(&self) -> Result<Vec<ListEntry>, ApiError> {
        let url = self.url(&format!("pokemon?limit={}", self.config.species_limit));
        let response: ListResponse = get_json(&self.client, &url).await?;
        Ok(response
            .results
            .into_iter()
            .map(|resource| {
                let id = id_from_url(&resource.url);
                ListEntry {
                    id,
                    name: resource.name,
                    sprite_url: default_sprite_url(id),
                }
            })
            .collect())
    }

    /// Alternate forms are best effort: any id that fails is skipped.
    async fn fetch_alternate_forms(&self) -> Vec<ListEntry> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut join_set = JoinSet::new();
        for id in self.config.form_ids.clone() {
            let client = self.client.clone();
            let url = self.url(&format!("pokemon/{id}"));
            let semaphore = semaphore.clone();
            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|err| ApiError::Task(err.to_string()))?;
                let response: PokemonResponse = get_json(&client, &url).await?;
                Ok::<_, ApiError>(form_entry(response))
            });
        }

        let mut forms = Vec::new();
        let mut skipped = 0usize;
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(Ok(entry)) => forms.push(entry),
                Ok(Err(error)) => {
                    skipped += 1;
                    tracing::debug!(%error, "skipping alternate form");
                }
                Err(error) => {
                    skipped += 1;
                    tracing::debug!(%error, "alternate form task failed");
                }
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, loaded = forms.len(), "some alternate forms were skipped");
        }
        forms.sort_by_key(|entry| entry.id);
        forms
    }

    async fn fetch_names(&self, path: &str) -> Result<Vec<String>, ApiError> {
        let response: ListResponse = get_json(&self.client, &self.url(path)).await?;
        Ok(response
            .results
            .into_iter()
            .map(|resource| resource.name)
            .collect())
    }
}

#[async_trait]
impl DexSource for PokeApi {
    async fn fetch_catalog(&self) -> Result<Vec<ListEntry>, ApiError> {
        let (base, forms) = tokio::join!(self.fetch_species_list(), self.fetch_alternate_forms());
        let catalog = merge_catalog(base?, forms);
        tracing::debug!(entries = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptions, ApiError> {
        let (types, colors, egg_groups) = tokio::try_join!(
            self.fetch_names("type?limit=100"),
            self.fetch_names("pokemon-color?limit=100"),
            self.fetch_names("egg-group?limit=100"),
        )?;
        Ok(FilterOptions {
            types: types
                .into_iter()
                .filter(|name| !HIDDEN_TYPES.contains(&name.as_str()))
                .collect(),
            colors,
            egg_groups,
        })
    }

    async fn fetch_by_category(
        &self,
        query: &CategoryQuery,
    ) -> Result<Vec<CategoryMember>, ApiError> {
        let url = self.url(&query.path());
        let response: CategoryResponse = get_json(&self.client, &url).await?;
        Ok(response.into_members())
    }

    async fn fetch_detail(&self, id_or_name: &str) -> Result<DetailRecord, ApiError> {
        let url = self.url(&format!("pokemon/{id_or_name}"));
        let pokemon: PokemonResponse = get_json(&self.client, &url).await.map_err(|error| {
            match error {
                ApiError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND => {
                    ApiError::NotFound(format!("\"{id_or_name}\""))
                }
                other => other,
            }
        })?;
        let species: SpeciesResponse = get_json(&self.client, &pokemon.species.url).await?;
        let chain_url = species
            .evolution_chain
            .as_ref()
            .map(|resource| resource.url.clone())
            .ok_or_else(|| ApiError::MissingChain(pokemon.name.clone()))?;
        let chain: EvolutionChainResponse = get_json(&self.client, &chain_url).await?;
        Ok(assemble_detail(pokemon, species, &chain.chain))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = send(&self.client, url).await?;
        let bytes = response.bytes().await.map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

/// Wraps a source and remembers the catalog and filter options for its own
/// lifetime. Category lookups and details pass straight through.
pub struct CachedSource<S> {
    inner: S,
    catalog: OnceCell<Vec<ListEntry>>,
    options: OnceCell<FilterOptions>,
}

impl<S: DexSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            catalog: OnceCell::new(),
            options: OnceCell::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: DexSource> DexSource for CachedSource<S> {
    async fn fetch_catalog(&self) -> Result<Vec<ListEntry>, ApiError> {
        self.catalog
            .get_or_try_init(|| self.inner.fetch_catalog())
            .await
            .cloned()
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptions, ApiError> {
        self.options
            .get_or_try_init(|| self.inner.fetch_filter_options())
            .await
            .cloned()
    }

    async fn fetch_by_category(
        &self,
        query: &CategoryQuery,
    ) -> Result<Vec<CategoryMember>, ApiError> {
        self.inner.fetch_by_category(query).await
    }

    async fn fetch_detail(&self, id_or_name: &str) -> Result<DetailRecord, ApiError> {
        self.inner.fetch_detail(id_or_name).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.inner.fetch_bytes(url).await
    }
}

/// Outcome of one detail batch. Every requested id ends up in exactly one of
/// the two lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailBatch {
    pub records: Vec<DetailRecord>,
    pub failed: Vec<u32>,
}

/// Fetches details for `ids`, at most `permits` at a time across every batch
/// sharing the semaphore. Failures are collected, never propagated.
pub async fn fetch_detail_batch(
    source: Arc<dyn DexSource>,
    ids: Vec<u32>,
    permits: Arc<Semaphore>,
) -> DetailBatch {
    let mut outstanding: HashSet<u32> = ids.iter().copied().collect();
    let mut join_set = JoinSet::new();
    for id in ids {
        let source = source.clone();
        let permits = permits.clone();
        join_set.spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => source.fetch_detail(&id.to_string()).await,
                Err(err) => Err(ApiError::Task(err.to_string())),
            };
            (id, result)
        });
    }

    let mut batch = DetailBatch::default();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((id, Ok(record))) => {
                outstanding.remove(&id);
                batch.records.push(record);
            }
            Ok((id, Err(error))) => {
                tracing::warn!(id, %error, "detail fetch failed");
            }
            Err(error) => {
                tracing::warn!(%error, "detail task failed");
            }
        }
    }
    batch.records.sort_by_key(|record| record.id);
    batch.failed = outstanding.into_iter().collect();
    batch.failed.sort_unstable();
    batch
}

/// Looks up every query concurrently. The first failure fails the whole set.
pub async fn fetch_memberships(
    source: Arc<dyn DexSource>,
    queries: Vec<CategoryQuery>,
) -> Result<Vec<CategoryMembers>, ApiError> {
    let mut join_set = JoinSet::new();
    for query in queries {
        let source = source.clone();
        join_set.spawn(async move {
            let members = source.fetch_by_category(&query).await?;
            Ok::<_, ApiError>(CategoryMembers {
                query,
                names: members.into_iter().map(|member| member.name).collect(),
            })
        });
    }

    let mut all = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        let members = joined.map_err(|err| ApiError::Task(err.to_string()))??;
        all.push(members);
    }
    Ok(all)
}

/// Base list first; a form is added only if its name is not taken yet.
pub fn merge_catalog(base: Vec<ListEntry>, forms: Vec<ListEntry>) -> Vec<ListEntry> {
    let mut seen: HashSet<String> = HashSet::with_capacity(base.len() + forms.len());
    base.into_iter()
        .chain(forms)
        .filter(|entry| seen.insert(entry.name.clone()))
        .collect()
}

fn form_entry(response: PokemonResponse) -> ListEntry {
    let sprite_url = pointer_string(&response.sprites, "/front_default")
        .unwrap_or_else(|| default_sprite_url(response.id));
    ListEntry {
        id: response.id,
        name: response.name,
        sprite_url,
    }
}

fn assemble_detail(
    pokemon: PokemonResponse,
    species: SpeciesResponse,
    chain: &ChainLink,
) -> DetailRecord {
    let stat = |name: &str| {
        pokemon
            .stats
            .iter()
            .find(|slot| slot.stat.name == name)
            .map(|slot| slot.base_stat)
            .unwrap_or(0)
    };
    let base_stats = StatSet {
        hp: stat("hp"),
        attack: stat("attack"),
        defense: stat("defense"),
        special_attack: stat("special-attack"),
        special_defense: stat("special-defense"),
        speed: stat("speed"),
    };
    let weight = pokemon.weight as f32 / 10.0;
    let sprite_url = pointer_string(&pokemon.sprites, "/other/official-artwork/front_default")
        .or_else(|| pointer_string(&pokemon.sprites, "/front_default"))
        .unwrap_or_else(|| default_sprite_url(pokemon.id));

    DetailRecord {
        id: pokemon.id,
        name: pokemon.name,
        sprite_url,
        types: pokemon
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        height: pokemon.height as f32 / 10.0,
        weight,
        abilities: pokemon
            .abilities
            .into_iter()
            .map(|slot| Ability {
                name: slot.ability.name,
                is_hidden: slot.is_hidden,
            })
            .collect(),
        base_stat_total: base_stats.total(),
        base_stat_product: base_stats.product(),
        base_stats,
        gender_ratio: species.gender_rate,
        color: species.color.name,
        egg_groups: species
            .egg_groups
            .into_iter()
            .map(|group| group.name)
            .collect(),
        evolution_chain: parse_chain(chain),
        grass_knot_power: grass_knot_power(weight),
        cry_url: pokemon.cries.and_then(|cries| cries.latest),
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

async fn send(client: &reqwest::Client, url: &str) -> Result<reqwest::Response, ApiError> {
    tracing::debug!(url, "GET");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(response)
}

async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T, ApiError> {
    let response = send(client, url).await?;
    let bytes = response.bytes().await.map_err(|source| ApiError::Request {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}
