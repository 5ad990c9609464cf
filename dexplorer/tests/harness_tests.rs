//! End-to-end coordinator flows driven through EffectStoreTestHarness.
//!
//! Async results are fed back with `complete_action`, the way the runtime
//! would deliver them from spawned tasks.

use tui_dispatch::testing::*;
use dexplorer::{
    action::Action,
    effect::Effect,
    filter::{
        ActiveFilters, CategoryKind, CategoryMembers, CategoryQuery, NumericKey, SortKey, SortState,
    },
    reducer::{reducer, DETAIL_BATCH_SIZE},
    state::{AppPhase, AppState, DetailRecord, FilterOptions, ListEntry, PromptKind},
    stats::StatSet,
};

fn entry(id: u32, name: &str) -> ListEntry {
    ListEntry {
        id,
        name: name.to_string(),
        sprite_url: format!("https://sprites.test/{id}.png"),
    }
}

fn record(id: u32, name: &str, speed: u16) -> DetailRecord {
    let base_stats = StatSet {
        hp: 60,
        attack: 60,
        defense: 60,
        special_attack: 60,
        special_defense: 60,
        speed,
    };
    DetailRecord {
        id,
        name: name.to_string(),
        base_stat_total: base_stats.total(),
        base_stat_product: base_stats.product(),
        base_stats,
        cry_url: Some(format!("https://cries.test/{id}.ogg")),
        ..DetailRecord::default()
    }
}

fn catalog() -> Vec<ListEntry> {
    vec![
        entry(1, "bulbasaur"),
        entry(4, "charmander"),
        entry(6, "charizard"),
        entry(7, "squirtle"),
        entry(43, "oddish"),
    ]
}

fn options() -> FilterOptions {
    FilterOptions {
        types: ["fire", "flying", "grass", "poison", "water"]
            .into_iter()
            .map(String::from)
            .collect(),
        colors: vec!["green".to_string(), "red".to_string()],
        egg_groups: vec!["monster".to_string()],
    }
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

fn visible_names(state: &AppState) -> Vec<String> {
    state.visible.iter().map(|entry| entry.name.clone()).collect()
}

/// Catalog loaded, first entry selected and its detail still in flight.
fn loaded_state() -> AppState {
    let mut state = AppState::default();
    reducer(&mut state, Action::Init);
    reducer(
        &mut state,
        Action::CatalogDidLoad {
            entries: catalog(),
            options: options(),
        },
    );
    state
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn test_startup_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.phase() == AppPhase::LoadingCatalog);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadCatalog));

    harness.dispatch_collect(Action::CatalogDidLoad {
        entries: catalog(),
        options: options(),
    });
    harness.assert_state(|s| s.visible.len() == 5);
    harness.assert_state(|s| s.phase() == AppPhase::LoadingSelectionDetail);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadSelection { id: 1, .. }));

    harness.complete_action(Action::SelectionDidLoad {
        token: 1,
        record: record(1, "bulbasaur", 45),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| s.phase() == AppPhase::Ready);
    harness.assert_state(|s| s.selected_detail().map(|d| d.id) == Some(1));
    harness.assert_state(|s| s.details.contains(1));
}

#[test]
fn test_catalog_failure_is_an_error_phase() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::CatalogDidError("connection refused".into()));
    harness.process_emitted();

    harness.assert_state(|s| s.phase() == AppPhase::Error);
    harness.assert_state(|s| s.catalog.error() == Some("connection refused"));
    harness.assert_state(|s| s.visible.is_empty());
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_categorical_filters_intersect() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_all([
        Action::FilterToggle {
            kind: CategoryKind::Type,
            value: "grass".into(),
        },
        Action::FilterToggle {
            kind: CategoryKind::Type,
            value: "poison".into(),
        },
    ]);
    // Staged only; the list is untouched until an apply.
    harness.assert_state(|s| s.staged_differs());
    harness.assert_state(|s| s.visible.len() == 5);

    harness.dispatch_collect(Action::FilterApply);
    harness.assert_state(|s| s.phase() == AppPhase::ApplyingFilters);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::LoadCategoryMembers { generation: 1, queries } if queries.len() == 2)
    });

    harness.complete_action(Action::CategoryMembersDidLoad {
        generation: 1,
        members: vec![
            members(CategoryKind::Type, "grass", &["bulbasaur", "oddish", "tangela"]),
            members(CategoryKind::Type, "poison", &["bulbasaur", "oddish", "ekans"]),
        ],
    });
    harness.process_emitted();

    harness.assert_state(|s| s.phase() != AppPhase::ApplyingFilters);
    harness.assert_state(|s| !s.staged_differs());
    harness.assert_state(|s| visible_names(s) == ["bulbasaur", "oddish"]);
}

#[test]
fn test_categorical_filters_across_dimensions() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_all([
        Action::FilterToggle {
            kind: CategoryKind::Type,
            value: "fire".into(),
        },
        Action::FilterToggle {
            kind: CategoryKind::Color,
            value: "red".into(),
        },
        Action::FilterApply,
    ]);
    harness.complete_action(Action::CategoryMembersDidLoad {
        generation: 1,
        members: vec![
            members(CategoryKind::Type, "fire", &["charmander", "charizard"]),
            members(CategoryKind::Color, "red", &["charmander"]),
        ],
    });
    harness.process_emitted();

    harness.assert_state(|s| visible_names(s) == ["charmander"]);
}

#[test]
fn test_search_prompt_applies_immediately() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_collect(Action::PromptStart(PromptKind::Search));
    for ch in "CHAR".chars() {
        harness.dispatch_collect(Action::PromptInput(ch));
    }
    harness.dispatch_collect(Action::PromptSubmit);

    harness.assert_state(|s| s.prompt.is_none());
    harness.assert_state(|s| s.active.search == "CHAR");
    harness.assert_state(|s| visible_names(s) == ["charmander", "charizard"]);
}

#[test]
fn test_search_matches_exact_id() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_collect(Action::FilterSearchSet("43".into()));
    harness.dispatch_collect(Action::FilterApply);

    harness.assert_state(|s| visible_names(s) == ["oddish"]);
}

#[test]
fn test_numeric_bound_waits_for_details() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_collect(Action::PromptStart(PromptKind::Bound));
    for ch in "spe>=70".chars() {
        harness.dispatch_collect(Action::PromptInput(ch));
    }
    harness.dispatch_collect(Action::PromptSubmit);

    // Nothing is cached yet, so nothing can satisfy the bound.
    harness.assert_state(|s| s.visible.is_empty());
    harness.assert_state(|s| s.fetching_details());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::LoadDetails { batch: 1, ids } if ids.len() == 5),
    );

    harness.complete_action(Action::DetailsDidLoad {
        batch: 1,
        records: vec![
            record(1, "bulbasaur", 45),
            record(4, "charmander", 65),
            record(6, "charizard", 100),
            record(7, "squirtle", 43),
            record(43, "oddish", 30),
        ],
        failed: vec![],
    });
    harness.process_emitted();

    harness.assert_state(|s| !s.fetching_details());
    harness.assert_state(|s| visible_names(s) == ["charizard"]);
}

#[test]
fn test_reset_clears_everything() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_all([
        Action::FilterSearchSet("squirt".into()),
        Action::FilterApply,
        Action::SortBy(SortKey::Name),
        Action::FilterReset,
    ]);

    harness.assert_state(|s| s.visible.len() == 5);
    harness.assert_state(|s| s.active == ActiveFilters::default());
    harness.assert_state(|s| s.sort == SortState::default());
    harness.assert_state(|s| !s.staged_differs());
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_stat_sort_fills_in_as_details_arrive() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_collect(Action::SortBy(SortKey::Stat(NumericKey::Speed)));
    let effects = harness.drain_effects();
    effects.effects_count(1);

    // A partial batch: cached entries first, the rest keep id order.
    harness.complete_action(Action::DetailsDidLoad {
        batch: 1,
        records: vec![record(6, "charizard", 100), record(43, "oddish", 30)],
        failed: vec![1, 4, 7],
    });
    harness.process_emitted();

    harness.assert_state(|s| {
        visible_names(s) == ["oddish", "charizard", "bulbasaur", "charmander", "squirtle"]
    });
    // Failed ids are never requested again.
    harness.dispatch_collect(Action::SortDirectionToggle);
    harness.drain_effects().effects_empty();
    harness.assert_state(|s| {
        visible_names(s) == ["charizard", "oddish", "bulbasaur", "charmander", "squirtle"]
    });
}

#[test]
fn test_large_lists_are_fetched_in_batches() {
    let entries: Vec<ListEntry> = (1..=100).map(|id| entry(id, &format!("mon-{id:03}"))).collect();
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::CatalogDidLoad {
        entries,
        options: options(),
    });
    harness.drain_effects();

    harness.dispatch_collect(Action::SortBy(SortKey::Stat(NumericKey::Total)));
    let effects = harness.drain_effects();
    effects.effects_count(100_usize.div_ceil(DETAIL_BATCH_SIZE));
    effects.effects_all_match(|e| {
        matches!(e, Effect::LoadDetails { ids, .. } if ids.len() <= DETAIL_BATCH_SIZE)
    });
    harness.assert_state(|s| s.detail_requests.len() == 100);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_fast_navigation_only_shows_latest() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_all([Action::SelectionMove(1), Action::SelectionMove(1)]);
    harness.assert_state(|s| s.selection.id == Some(6));
    harness.assert_state(|s| s.selection.token == 3);

    // The older request finishes last but must not win.
    harness.complete_action(Action::SelectionDidLoad {
        token: 3,
        record: record(6, "charizard", 100),
    });
    harness.complete_action(Action::SelectionDidLoad {
        token: 2,
        record: record(4, "charmander", 65),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.selected_detail().map(|d| d.id) == Some(6));
    harness.assert_state(|s| s.details.contains(4));
}

#[test]
fn test_cry_requires_a_loaded_detail() {
    let mut harness = EffectStoreTestHarness::new(loaded_state(), reducer);

    harness.dispatch_collect(Action::PlayCry);
    harness.drain_effects().effects_empty();

    harness.complete_action(Action::SelectionDidLoad {
        token: 1,
        record: record(1, "bulbasaur", 45),
    });
    harness.process_emitted();
    harness.dispatch_collect(Action::PlayCry);
    harness.drain_effects().effects_first_matches(
        |e| matches!(e, Effect::PlayCry { name, url } if name == "bulbasaur" && url.ends_with("1.ogg")),
    );
}
