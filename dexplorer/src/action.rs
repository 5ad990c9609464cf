use serde::{Deserialize, Serialize};

use crate::filter::{Bound, CategoryKind, CategoryMembers, NumericKey, SortKey};
use crate::state::{DetailRecord, FilterOptions, ListEntry, PromptKind};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    CatalogDidLoad {
        entries: Vec<ListEntry>,
        options: FilterOptions,
    },
    CatalogDidError(String),

    FilterToggle { kind: CategoryKind, value: String },
    FilterToggleAll(CategoryKind),
    FilterBoundSet {
        key: NumericKey,
        bound: Bound,
        value: Option<u64>,
    },
    FilterSearchSet(String),
    FilterCursor(usize),
    FilterToggleAtCursor,
    FilterApply,
    FilterReset,

    CategoryMembersDidLoad {
        generation: u64,
        members: Vec<CategoryMembers>,
    },
    CategoryMembersDidError { generation: u64, error: String },

    SortBy(SortKey),
    SortNext,
    SortDirectionToggle,

    DetailsDidLoad {
        batch: u64,
        records: Vec<DetailRecord>,
        failed: Vec<u32>,
    },

    SelectionMove(i16),
    SelectionPage(i16),
    SelectionJumpTop,
    SelectionJumpBottom,
    DexSelect(usize),
    SelectId(u32),
    SelectionDidLoad { token: u64, record: DetailRecord },
    SelectionDidError { token: u64, id: u32, error: String },
    EvolutionSelect(usize),

    LevelSet(u8),
    LevelStep(i16),
    PlayCry,
    CryDidError(String),

    PromptStart(PromptKind),
    PromptInput(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,

    FocusNext,
    FocusPrev,

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
