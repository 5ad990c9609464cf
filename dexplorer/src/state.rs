use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::evolution::EvolutionStage;
use crate::filter::{self, ActiveFilters, CategoryKind, Memberships, SortState};
use crate::stats::{StatSet, MAX_LEVEL};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: u32,
    pub name: String,
    pub sprite_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    pub sprite_url: String,
    pub types: Vec<String>,
    /// Meters.
    pub height: f32,
    /// Kilograms.
    pub weight: f32,
    pub abilities: Vec<Ability>,
    pub base_stats: StatSet,
    /// Female chance in eighths, -1 when genderless.
    pub gender_ratio: i8,
    pub color: String,
    pub egg_groups: Vec<String>,
    pub evolution_chain: Vec<EvolutionStage>,
    pub grass_knot_power: u8,
    pub base_stat_total: u32,
    pub base_stat_product: u64,
    pub cry_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub types: Vec<String>,
    pub colors: Vec<String>,
    pub egg_groups: Vec<String>,
}

impl FilterOptions {
    pub fn values(&self, kind: CategoryKind) -> &[String] {
        match kind {
            CategoryKind::Type => &self.types,
            CategoryKind::Color => &self.colors,
            CategoryKind::EggGroup => &self.egg_groups,
        }
    }
}

/// Details by id. Entries are never evicted; re-inserting an id replaces the
/// record with identical content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailCache {
    records: HashMap<u32, DetailRecord>,
}

impl DetailCache {
    pub fn insert(&mut self, record: DetailRecord) {
        self.records.insert(record.id, record);
    }

    pub fn get(&self, id: u32) -> Option<&DetailRecord> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// `mr-mime` -> `Mr Mime`.
pub fn display_name(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppPhase {
    LoadingCatalog,
    Ready,
    ApplyingFilters,
    LoadingSelectionDetail,
    Error,
}

/// The entry shown in the detail pane. Every new selection takes a fresh
/// token; results for older tokens are cached but not shown.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Selection {
    pub token: u64,
    pub id: Option<u32>,
    pub detail: DataResource<DetailRecord>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            token: 0,
            id: None,
            detail: DataResource::Empty,
        }
    }
}

/// An apply waiting on category member lookups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingApply {
    pub generation: u64,
    pub filters: ActiveFilters,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptKind {
    Search,
    Bound,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusArea {
    DexList,
    Filters,
    Detail,
}

/// One line of the filter pane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterRow<'a> {
    All(CategoryKind),
    Value(CategoryKind, &'a str),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub focus: FocusArea,

    pub catalog: DataResource<Vec<ListEntry>>,
    pub options: FilterOptions,

    pub staged: ActiveFilters,
    pub active: ActiveFilters,
    pub sort: SortState,
    pub memberships: Memberships,
    pub apply_generation: u64,
    pub pending_apply: Option<PendingApply>,

    /// Categorical and search stages of the active filters.
    pub narrowed: Vec<ListEntry>,
    /// What the list shows.
    pub visible: Vec<ListEntry>,
    pub selected_index: usize,

    pub details: DetailCache,
    pub detail_requests: HashSet<u32>,
    pub detail_failures: HashSet<u32>,
    pub detail_batch: u64,

    pub selection: Selection,
    pub level: u8,

    pub prompt: Option<Prompt>,
    pub filter_cursor: usize,
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MAX_LEVEL)
    }
}

impl AppState {
    pub fn new(level: u8) -> Self {
        Self {
            terminal_size: (80, 24),
            focus: FocusArea::DexList,
            catalog: DataResource::Empty,
            options: FilterOptions::default(),
            staged: ActiveFilters::default(),
            active: ActiveFilters::default(),
            sort: SortState::default(),
            memberships: Memberships::default(),
            apply_generation: 0,
            pending_apply: None,
            narrowed: Vec::new(),
            visible: Vec::new(),
            selected_index: 0,
            details: DetailCache::default(),
            detail_requests: HashSet::new(),
            detail_failures: HashSet::new(),
            detail_batch: 0,
            selection: Selection::default(),
            level: crate::stats::clamp_level(level as i32),
            prompt: None,
            filter_cursor: 0,
            message: None,
            tick: 0,
        }
    }

    pub fn phase(&self) -> AppPhase {
        match &self.catalog {
            DataResource::Empty | DataResource::Loading => AppPhase::LoadingCatalog,
            DataResource::Failed(_) => AppPhase::Error,
            DataResource::Loaded(_) => {
                if self.pending_apply.is_some() {
                    AppPhase::ApplyingFilters
                } else if self.selection.detail.is_loading() {
                    AppPhase::LoadingSelectionDetail
                } else if self.selection.detail.is_failed() {
                    AppPhase::Error
                } else {
                    AppPhase::Ready
                }
            }
        }
    }

    /// Details are being fetched so the numeric filter or sort can see them.
    pub fn fetching_details(&self) -> bool {
        !self.detail_requests.is_empty()
    }

    pub fn master(&self) -> &[ListEntry] {
        self.catalog.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected_entry(&self) -> Option<&ListEntry> {
        self.visible.get(self.selected_index)
    }

    pub fn selected_detail(&self) -> Option<&DetailRecord> {
        self.selection.detail.data()
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.visible.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.visible.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    /// Re-runs the categorical and search stages of the active filters.
    pub fn renarrow(&mut self) {
        let narrowed = filter::narrow(self.master(), &self.active, &self.memberships);
        self.narrowed = narrowed;
    }

    /// Re-runs the numeric and sort stages and returns the ids that still
    /// need a detail fetch: missing from the cache, not in flight and not
    /// known to fail.
    pub fn refresh_visible(&mut self) -> Vec<u32> {
        let view = filter::refine(&self.narrowed, &self.details, &self.active, &self.sort);
        self.visible = view.entries;
        // Keep the cursor on the shown entry when it survives a reorder.
        let followed = self
            .selection
            .id
            .and_then(|id| self.visible.iter().position(|entry| entry.id == id));
        if let Some(index) = followed {
            self.selected_index = index;
        } else if self.selected_index >= self.visible.len() {
            self.selected_index = self.visible.len().saturating_sub(1);
        }
        view.missing
            .into_iter()
            .filter(|id| !self.detail_requests.contains(id) && !self.detail_failures.contains(id))
            .collect()
    }

    pub fn filter_rows(&self) -> Vec<FilterRow<'_>> {
        let mut rows = Vec::new();
        for kind in CategoryKind::ALL {
            rows.push(FilterRow::All(kind));
            rows.extend(
                self.options
                    .values(kind)
                    .iter()
                    .map(|value| FilterRow::Value(kind, value.as_str())),
            );
        }
        rows
    }

    pub fn staged_differs(&self) -> bool {
        self.staged != self.active
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FocusArea::DexList => FocusArea::Filters,
            FocusArea::Filters => FocusArea::Detail,
            FocusArea::Detail => FocusArea::DexList,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FocusArea::DexList => FocusArea::Detail,
            FocusArea::Filters => FocusArea::DexList,
            FocusArea::Detail => FocusArea::Filters,
        };
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Dex")
                .entry("phase", ron_string(&self.phase()))
                .entry("catalog", ron_string(&self.master().len()))
                .entry("narrowed", ron_string(&self.narrowed.len()))
                .entry("visible", ron_string(&self.visible.len()))
                .entry("selected", ron_string(&self.selected_index))
                .entry("focus", ron_string(&self.focus)),
            DebugSection::new("Filters")
                .entry("active", ron_string(&self.active))
                .entry("staged_differs", ron_string(&self.staged_differs()))
                .entry("sort", ron_string(&self.sort))
                .entry("generation", ron_string(&self.apply_generation))
                .entry(
                    "pending",
                    ron_string(&self.pending_apply.as_ref().map(|pending| pending.generation)),
                )
                .entry("memberships", ron_string(&self.memberships.len())),
            DebugSection::new("Details")
                .entry("cached", ron_string(&self.details.len()))
                .entry("in_flight", ron_string(&self.detail_requests.len()))
                .entry("failed", ron_string(&self.detail_failures.len()))
                .entry("selection_token", ron_string(&self.selection.token))
                .entry("selection_id", ron_string(&self.selection.id))
                .entry("level", ron_string(&self.level))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
