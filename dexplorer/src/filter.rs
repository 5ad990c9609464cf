//! Filter/sort engine over the master list and the detail cache.
//!
//! Stages run in a fixed order: categorical, search, numeric, sort. The first
//! two only need the master list and category memberships; the last two read
//! the detail cache and report which ids they could not evaluate.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::state::{DetailCache, DetailRecord, ListEntry};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    Type,
    Color,
    EggGroup,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 3] = [
        CategoryKind::Type,
        CategoryKind::Color,
        CategoryKind::EggGroup,
    ];

    /// Path segment of the upstream resource listing this category.
    pub fn endpoint(&self) -> &'static str {
        match self {
            CategoryKind::Type => "type",
            CategoryKind::Color => "pokemon-color",
            CategoryKind::EggGroup => "egg-group",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryKind::Type => "Type",
            CategoryKind::Color => "Color",
            CategoryKind::EggGroup => "Egg Group",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryQuery {
    pub kind: CategoryKind,
    pub value: String,
}

impl CategoryQuery {
    /// Upstream path of the member listing, also used as the membership key.
    pub fn path(&self) -> String {
        format!("{}/{}", self.kind.endpoint(), self.value)
    }
}

/// Member names of one category value, as returned upstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryMembers {
    pub query: CategoryQuery,
    pub names: Vec<String>,
}

/// Member names per category value, keyed by [`CategoryQuery::path`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Memberships {
    sets: HashMap<String, HashSet<String>>,
}

impl Memberships {
    pub fn insert(&mut self, members: CategoryMembers) {
        self.sets
            .insert(members.query.path(), members.names.into_iter().collect());
    }

    pub fn contains(&self, query: &CategoryQuery, name: &str) -> bool {
        self.sets
            .get(&query.path())
            .map(|names| names.contains(name))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl FromIterator<CategoryMembers> for Memberships {
    fn from_iter<I: IntoIterator<Item = CategoryMembers>>(iter: I) -> Self {
        let mut memberships = Memberships::default();
        for members in iter {
            memberships.insert(members);
        }
        memberships
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKey {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Total,
    Product,
}

impl NumericKey {
    pub const ALL: [NumericKey; 8] = [
        NumericKey::Hp,
        NumericKey::Attack,
        NumericKey::Defense,
        NumericKey::SpecialAttack,
        NumericKey::SpecialDefense,
        NumericKey::Speed,
        NumericKey::Total,
        NumericKey::Product,
    ];

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            NumericKey::Hp => "HP",
            NumericKey::Attack => "Atk",
            NumericKey::Defense => "Def",
            NumericKey::SpecialAttack => "SpA",
            NumericKey::SpecialDefense => "SpD",
            NumericKey::Speed => "Spe",
            NumericKey::Total => "Total",
            NumericKey::Product => "Product",
        }
    }

    pub fn value(&self, detail: &DetailRecord) -> u64 {
        let stats = &detail.base_stats;
        match self {
            NumericKey::Hp => stats.hp as u64,
            NumericKey::Attack => stats.attack as u64,
            NumericKey::Defense => stats.defense as u64,
            NumericKey::SpecialAttack => stats.special_attack as u64,
            NumericKey::SpecialDefense => stats.special_defense as u64,
            NumericKey::Speed => stats.speed as u64,
            NumericKey::Total => detail.base_stat_total as u64,
            NumericKey::Product => detail.base_stat_product,
        }
    }
}

impl FromStr for NumericKey {
    type Err = BoundExprError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = match value.trim().to_ascii_lowercase().as_str() {
            "hp" => NumericKey::Hp,
            "atk" | "attack" => NumericKey::Attack,
            "def" | "defense" => NumericKey::Defense,
            "spa" | "special-attack" => NumericKey::SpecialAttack,
            "spd" | "special-defense" => NumericKey::SpecialDefense,
            "spe" | "speed" => NumericKey::Speed,
            "total" | "bst" => NumericKey::Total,
            "product" | "bsp" => NumericKey::Product,
            other => return Err(BoundExprError::UnknownStat(other.to_string())),
        };
        Ok(key)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl NumericRange {
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Both bounds are inclusive; a missing bound is open.
    pub fn contains(&self, value: u64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    Min,
    Max,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveFilters {
    pub search: String,
    pub types: Vec<String>,
    pub colors: Vec<String>,
    pub egg_groups: Vec<String>,
    pub numeric: [NumericRange; 8],
}

impl ActiveFilters {
    pub fn selected(&self, kind: CategoryKind) -> &[String] {
        match kind {
            CategoryKind::Type => &self.types,
            CategoryKind::Color => &self.colors,
            CategoryKind::EggGroup => &self.egg_groups,
        }
    }

    fn selected_mut(&mut self, kind: CategoryKind) -> &mut Vec<String> {
        match kind {
            CategoryKind::Type => &mut self.types,
            CategoryKind::Color => &mut self.colors,
            CategoryKind::EggGroup => &mut self.egg_groups,
        }
    }

    pub fn is_selected(&self, kind: CategoryKind, value: &str) -> bool {
        self.selected(kind).iter().any(|selected| selected == value)
    }

    pub fn toggle(&mut self, kind: CategoryKind, value: &str) {
        let selected = self.selected_mut(kind);
        if let Some(pos) = selected.iter().position(|item| item == value) {
            selected.remove(pos);
        } else {
            selected.push(value.to_string());
        }
    }

    /// Selects every option, or clears the dimension when all are selected.
    pub fn toggle_all(&mut self, kind: CategoryKind, options: &[String]) {
        let selected = self.selected_mut(kind);
        if selected.len() == options.len() {
            selected.clear();
        } else {
            *selected = options.to_vec();
        }
    }

    pub fn range(&self, key: NumericKey) -> NumericRange {
        self.numeric[key.index()]
    }

    pub fn set_bound(&mut self, key: NumericKey, bound: Bound, value: Option<u64>) {
        let range = &mut self.numeric[key.index()];
        match bound {
            Bound::Min => range.min = value,
            Bound::Max => range.max = value,
        }
    }

    pub fn has_numeric(&self) -> bool {
        self.numeric.iter().any(NumericRange::is_active)
    }

    pub fn category_queries(&self) -> Vec<CategoryQuery> {
        CategoryKind::ALL
            .into_iter()
            .flat_map(|kind| {
                self.selected(kind).iter().map(move |value| CategoryQuery {
                    kind,
                    value: value.clone(),
                })
            })
            .collect()
    }

    pub fn has_categorical(&self) -> bool {
        CategoryKind::ALL
            .into_iter()
            .any(|kind| !self.selected(kind).is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Stat(NumericKey),
}

impl SortKey {
    pub const ALL: [SortKey; 10] = [
        SortKey::Id,
        SortKey::Name,
        SortKey::Stat(NumericKey::Hp),
        SortKey::Stat(NumericKey::Attack),
        SortKey::Stat(NumericKey::Defense),
        SortKey::Stat(NumericKey::SpecialAttack),
        SortKey::Stat(NumericKey::SpecialDefense),
        SortKey::Stat(NumericKey::Speed),
        SortKey::Stat(NumericKey::Total),
        SortKey::Stat(NumericKey::Product),
    ];

    pub fn needs_detail(&self) -> bool {
        matches!(self, SortKey::Stat(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Id => "ID",
            SortKey::Name => "Name",
            SortKey::Stat(key) => key.label(),
        }
    }

    pub fn next(&self) -> SortKey {
        let index = SortKey::ALL
            .iter()
            .position(|key| key == self)
            .unwrap_or(0);
        SortKey::ALL[(index + 1) % SortKey::ALL.len()]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub by: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Picking the active key flips direction; a new key starts ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.by == key {
            self.direction = self.direction.toggle();
        } else {
            self.by = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Displayed entries plus the ids the numeric/sort stages could not evaluate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DexView {
    pub entries: Vec<ListEntry>,
    pub missing: Vec<u32>,
}

pub fn apply(
    master: &[ListEntry],
    cache: &DetailCache,
    filters: &ActiveFilters,
    sort: &SortState,
    memberships: &Memberships,
) -> DexView {
    let narrowed = narrow(master, filters, memberships);
    refine(&narrowed, cache, filters, sort)
}

/// Categorical and search stages. Neither reads the detail cache.
pub fn narrow(
    master: &[ListEntry],
    filters: &ActiveFilters,
    memberships: &Memberships,
) -> Vec<ListEntry> {
    let categorical = filter_categorical(master, filters, memberships);
    filter_search(categorical, &filters.search)
}

/// Numeric and sort stages over an already narrowed list.
pub fn refine(
    narrowed: &[ListEntry],
    cache: &DetailCache,
    filters: &ActiveFilters,
    sort: &SortState,
) -> DexView {
    let missing = missing_detail_ids(narrowed, cache, filters, sort);
    let mut entries = filter_numeric(narrowed, cache, filters);
    sort_entries(&mut entries, cache, sort);
    DexView { entries, missing }
}

/// An entry must belong to every selected value across all dimensions.
pub fn filter_categorical(
    master: &[ListEntry],
    filters: &ActiveFilters,
    memberships: &Memberships,
) -> Vec<ListEntry> {
    let queries = filters.category_queries();
    if queries.is_empty() {
        return master.to_vec();
    }
    master
        .iter()
        .filter(|entry| {
            queries
                .iter()
                .all(|query| memberships.contains(query, &entry.name))
        })
        .cloned()
        .collect()
}

pub fn filter_search(entries: Vec<ListEntry>, search: &str) -> Vec<ListEntry> {
    let term = search.trim().to_lowercase();
    if term.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|entry| entry.name.to_lowercase().contains(&term) || entry.id.to_string() == term)
        .collect()
}

pub fn filter_numeric(
    entries: &[ListEntry],
    cache: &DetailCache,
    filters: &ActiveFilters,
) -> Vec<ListEntry> {
    if !filters.has_numeric() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| {
            let Some(detail) = cache.get(entry.id) else {
                return false;
            };
            NumericKey::ALL
                .into_iter()
                .all(|key| filters.range(key).contains(key.value(detail)))
        })
        .cloned()
        .collect()
}

/// Entries without cached detail sort after every entry with detail when the
/// key needs it, whatever the direction.
pub fn sort_entries(entries: &mut [ListEntry], cache: &DetailCache, sort: &SortState) {
    match sort.by {
        SortKey::Id => entries.sort_by(|a, b| sort.direction.apply(a.id.cmp(&b.id))),
        SortKey::Name => entries.sort_by(|a, b| sort.direction.apply(a.name.cmp(&b.name))),
        SortKey::Stat(key) => entries.sort_by(|a, b| {
            match (cache.get(a.id), cache.get(b.id)) {
                (Some(left), Some(right)) => {
                    sort.direction.apply(key.value(left).cmp(&key.value(right)))
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

pub fn needs_detail(filters: &ActiveFilters, sort: &SortState) -> bool {
    filters.has_numeric() || sort.by.needs_detail()
}

pub fn missing_detail_ids(
    entries: &[ListEntry],
    cache: &DetailCache,
    filters: &ActiveFilters,
    sort: &SortState,
) -> Vec<u32> {
    if !needs_detail(filters, sort) {
        return Vec::new();
    }
    entries
        .iter()
        .map(|entry| entry.id)
        .filter(|id| !cache.contains(*id))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundExprError {
    #[error("unknown stat `{0}`")]
    UnknownStat(String),
    #[error("expected one of >=, <=, = in `{0}`")]
    MissingOperator(String),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundOp {
    AtLeast,
    AtMost,
    Exactly,
}

/// Short form for editing one numeric bound, e.g. `hp>=45`, `total<=300`,
/// `speed=100`. An empty right-hand side clears the bound(s).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundExpr {
    pub key: NumericKey,
    pub op: BoundOp,
    pub value: Option<u64>,
}

impl BoundExpr {
    pub fn apply_to(&self, filters: &mut ActiveFilters) {
        match self.op {
            BoundOp::AtLeast => filters.set_bound(self.key, Bound::Min, self.value),
            BoundOp::AtMost => filters.set_bound(self.key, Bound::Max, self.value),
            BoundOp::Exactly => {
                filters.set_bound(self.key, Bound::Min, self.value);
                filters.set_bound(self.key, Bound::Max, self.value);
            }
        }
    }
}

impl FromStr for BoundExpr {
    type Err = BoundExprError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let (key, op, value) = if let Some((key, value)) = input.split_once(">=") {
            (key, BoundOp::AtLeast, value)
        } else if let Some((key, value)) = input.split_once("<=") {
            (key, BoundOp::AtMost, value)
        } else if let Some((key, value)) = input.split_once('=') {
            (key, BoundOp::Exactly, value)
        } else {
            return Err(BoundExprError::MissingOperator(input.to_string()));
        };
        let key = key.parse::<NumericKey>()?;
        let value = value.trim();
        let value = if value.is_empty() {
            None
        } else {
            Some(
                value
                    .parse::<u64>()
                    .map_err(|_| BoundExprError::InvalidNumber(value.to_string()))?,
            )
        };
        Ok(BoundExpr { key, op, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatSet;
    use pretty_assertions::assert_eq;

    fn entry(id: u32, name: &str) -> ListEntry {
        ListEntry {
            id,
            name: name.to_string(),
            sprite_url: String::new(),
        }
    }

    fn detail(id: u32, name: &str, hp: u16, speed: u16) -> DetailRecord {
        let base_stats = StatSet {
            hp,
            attack: 50,
            defense: 50,
            special_attack: 50,
            special_defense: 50,
            speed,
        };
        DetailRecord {
            id,
            name: name.to_string(),
            base_stat_total: base_stats.total(),
            base_stat_product: base_stats.product(),
            base_stats,
            ..DetailRecord::default()
        }
    }

    fn starters() -> Vec<ListEntry> {
        vec![
            entry(1, "bulbasaur"),
            entry(4, "charmander"),
            entry(7, "squirtle"),
        ]
    }

    fn names(entries: &[ListEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    fn members(kind: CategoryKind, value: &str, names: &[&str]) -> CategoryMembers {
        CategoryMembers {
            query: CategoryQuery {
                kind,
                value: value.to_string(),
            },
            names: names.iter().map(|name| name.to_string()).collect(),
        }
    }

    #[test]
    fn search_matches_name_substring() {
        let filters = ActiveFilters {
            search: "char".to_string(),
            ..Default::default()
        };
        let view = apply(
            &starters(),
            &DetailCache::default(),
            &filters,
            &SortState::default(),
            &Memberships::default(),
        );
        assert_eq!(names(&view.entries), vec!["charmander"]);
        assert!(view.missing.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_matches_exact_id() {
        let entries = starters();
        assert_eq!(
            names(&filter_search(entries.clone(), "  SQUIR ")),
            vec!["squirtle"]
        );
        assert_eq!(names(&filter_search(entries.clone(), "7")), vec!["squirtle"]);
        // ids match exactly, not as substrings
        assert!(filter_search(vec![entry(17, "pidgeotto")], "7").is_empty());
    }

    #[test]
    fn numeric_filter_excludes_uncached_entries() {
        let mut cache = DetailCache::default();
        cache.insert(detail(4, "charmander", 39, 65));
        cache.insert(detail(1, "bulbasaur", 45, 45));
        let mut filters = ActiveFilters::default();
        filters.set_bound(NumericKey::Hp, Bound::Min, Some(45));

        let view = apply(
            &starters(),
            &cache,
            &filters,
            &SortState::default(),
            &Memberships::default(),
        );
        assert_eq!(names(&view.entries), vec!["bulbasaur"]);
        assert_eq!(view.missing, vec![7]);
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let mut cache = DetailCache::default();
        cache.insert(detail(1, "bulbasaur", 45, 45));
        cache.insert(detail(4, "charmander", 39, 65));
        cache.insert(detail(7, "squirtle", 44, 43));
        let mut filters = ActiveFilters::default();
        filters.set_bound(NumericKey::Hp, Bound::Min, Some(39));
        filters.set_bound(NumericKey::Hp, Bound::Max, Some(44));

        let kept = filter_numeric(&starters(), &cache, &filters);
        assert_eq!(names(&kept), vec!["charmander", "squirtle"]);

        let mut total = ActiveFilters::default();
        total.set_bound(NumericKey::Total, Bound::Max, Some(45 + 200 + 45));
        assert_eq!(
            names(&filter_numeric(&starters(), &cache, &total)),
            vec!["bulbasaur", "squirtle"]
        );
    }

    #[test]
    fn stat_sort_puts_uncached_last() {
        let mut cache = DetailCache::default();
        cache.insert(detail(4, "charmander", 39, 65));
        cache.insert(detail(1, "bulbasaur", 45, 45));
        let sort = SortState {
            by: SortKey::Stat(NumericKey::Speed),
            direction: SortDirection::Descending,
        };

        let view = apply(
            &starters(),
            &cache,
            &ActiveFilters::default(),
            &sort,
            &Memberships::default(),
        );
        assert_eq!(
            names(&view.entries),
            vec!["charmander", "bulbasaur", "squirtle"]
        );
        assert_eq!(view.missing, vec![7]);

        let ascending = SortState {
            direction: SortDirection::Ascending,
            ..sort
        };
        let mut entries = starters();
        sort_entries(&mut entries, &cache, &ascending);
        assert_eq!(names(&entries), vec!["bulbasaur", "charmander", "squirtle"]);
    }

    #[test]
    fn id_and_name_sort_need_no_detail() {
        let mut entries = vec![entry(7, "squirtle"), entry(1, "bulbasaur"), entry(4, "charmander")];
        let cache = DetailCache::default();
        sort_entries(
            &mut entries,
            &cache,
            &SortState {
                by: SortKey::Id,
                direction: SortDirection::Descending,
            },
        );
        assert_eq!(names(&entries), vec!["squirtle", "charmander", "bulbasaur"]);

        sort_entries(
            &mut entries,
            &cache,
            &SortState {
                by: SortKey::Name,
                direction: SortDirection::Ascending,
            },
        );
        assert_eq!(names(&entries), vec!["bulbasaur", "charmander", "squirtle"]);
        assert!(missing_detail_ids(&entries, &cache, &ActiveFilters::default(), &SortState::default())
            .is_empty());
    }

    #[test]
    fn categorical_intersects_every_selected_value() {
        let memberships: Memberships = [
            members(CategoryKind::Type, "grass", &["bulbasaur", "oddish"]),
            members(CategoryKind::Type, "poison", &["bulbasaur", "oddish", "ekans"]),
            members(CategoryKind::Color, "green", &["bulbasaur", "caterpie"]),
        ]
        .into_iter()
        .collect();
        let master = vec![
            entry(1, "bulbasaur"),
            entry(10, "caterpie"),
            entry(23, "ekans"),
            entry(43, "oddish"),
        ];
        let mut filters = ActiveFilters::default();
        filters.toggle(CategoryKind::Type, "grass");
        filters.toggle(CategoryKind::Type, "poison");
        assert_eq!(
            names(&filter_categorical(&master, &filters, &memberships)),
            vec!["bulbasaur", "oddish"]
        );

        filters.toggle(CategoryKind::Color, "green");
        assert_eq!(
            names(&filter_categorical(&master, &filters, &memberships)),
            vec!["bulbasaur"]
        );
    }

    #[test]
    fn two_disjoint_types_yield_nothing() {
        let memberships: Memberships = [
            members(CategoryKind::Type, "fire", &["charmander"]),
            members(CategoryKind::Type, "water", &["squirtle"]),
        ]
        .into_iter()
        .collect();
        let mut filters = ActiveFilters::default();
        filters.toggle(CategoryKind::Type, "fire");
        filters.toggle(CategoryKind::Type, "water");
        assert!(filter_categorical(&starters(), &filters, &memberships).is_empty());
    }

    #[test]
    fn no_categorical_selection_is_identity() {
        let master = starters();
        let filtered =
            filter_categorical(&master, &ActiveFilters::default(), &Memberships::default());
        assert_eq!(filtered, master);
    }

    #[test]
    fn apply_is_idempotent() {
        let mut cache = DetailCache::default();
        cache.insert(detail(4, "charmander", 39, 65));
        cache.insert(detail(7, "squirtle", 44, 43));
        let mut filters = ActiveFilters::default();
        filters.set_bound(NumericKey::Speed, Bound::Max, Some(70));
        let sort = SortState {
            by: SortKey::Stat(NumericKey::Hp),
            direction: SortDirection::Descending,
        };
        let memberships = Memberships::default();

        let first = apply(&starters(), &cache, &filters, &sort, &memberships);
        let second = apply(&starters(), &cache, &filters, &sort, &memberships);
        assert_eq!(first, second);
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let options = vec!["red".to_string(), "blue".to_string()];
        let mut filters = ActiveFilters::default();
        filters.toggle(CategoryKind::Color, "red");
        filters.toggle_all(CategoryKind::Color, &options);
        assert_eq!(filters.colors, options);
        filters.toggle_all(CategoryKind::Color, &options);
        assert!(filters.colors.is_empty());
    }

    #[test]
    fn sort_select_toggles_direction_on_same_key() {
        let mut sort = SortState::default();
        sort.select(SortKey::Id);
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.select(SortKey::Stat(NumericKey::Total));
        assert_eq!(sort.by, SortKey::Stat(NumericKey::Total));
        assert_eq!(sort.direction, SortDirection::Ascending);
        assert_eq!(SortKey::Stat(NumericKey::Product).next(), SortKey::Id);
    }

    #[test]
    fn bound_expressions() {
        let expr: BoundExpr = "hp>=45".parse().unwrap();
        assert_eq!(
            expr,
            BoundExpr {
                key: NumericKey::Hp,
                op: BoundOp::AtLeast,
                value: Some(45)
            }
        );

        let mut filters = ActiveFilters::default();
        "speed=100".parse::<BoundExpr>().unwrap().apply_to(&mut filters);
        assert_eq!(
            filters.range(NumericKey::Speed),
            NumericRange {
                min: Some(100),
                max: Some(100)
            }
        );
        "spe<=".parse::<BoundExpr>().unwrap().apply_to(&mut filters);
        assert_eq!(filters.range(NumericKey::Speed).max, None);

        assert_eq!(
            "luck>=3".parse::<BoundExpr>(),
            Err(BoundExprError::UnknownStat("luck".to_string()))
        );
        assert_eq!(
            "hp 45".parse::<BoundExpr>(),
            Err(BoundExprError::MissingOperator("hp 45".to_string()))
        );
        assert_eq!(
            "total<=lots".parse::<BoundExpr>(),
            Err(BoundExprError::InvalidNumber("lots".to_string()))
        );
    }
}
