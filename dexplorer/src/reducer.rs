use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::filter::{ActiveFilters, BoundExpr, Memberships, SortState};
use crate::state::{AppPhase, AppState, FilterRow, PendingApply, Prompt, PromptKind};
use crate::stats::clamp_level;

/// Ids per detail-fetch task. Each finished batch refreshes the list.
pub const DETAIL_BATCH_SIZE: usize = 48;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.catalog = DataResource::Loading;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadCatalog)
        }

        Action::CatalogDidLoad { entries, options } => {
            state.catalog = DataResource::Loaded(entries);
            state.options = options;
            state.renarrow();
            state.selected_index = 0;
            let mut effects = detail_effects(state);
            effects.extend(select_current(state));
            DispatchResult::changed_with_many(effects)
        }

        Action::CatalogDidError(error) => {
            state.catalog = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::FilterToggle { kind, value } => {
            state.staged.toggle(kind, &value);
            DispatchResult::changed()
        }

        Action::FilterToggleAll(kind) => {
            let options = state.options.values(kind).to_vec();
            state.staged.toggle_all(kind, &options);
            DispatchResult::changed()
        }

        Action::FilterBoundSet { key, bound, value } => {
            let before = state.staged.range(key);
            state.staged.set_bound(key, bound, value);
            if state.staged.range(key) == before {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::FilterSearchSet(search) => {
            if state.staged.search == search {
                return DispatchResult::unchanged();
            }
            state.staged.search = search;
            DispatchResult::changed()
        }

        Action::FilterCursor(index) => {
            let last = state.filter_rows().len().saturating_sub(1);
            let next = index.min(last);
            if next == state.filter_cursor {
                return DispatchResult::unchanged();
            }
            state.filter_cursor = next;
            DispatchResult::changed()
        }

        Action::FilterToggleAtCursor => {
            let row = state
                .filter_rows()
                .get(state.filter_cursor)
                .map(|row| match row {
                    FilterRow::All(kind) => (*kind, None),
                    FilterRow::Value(kind, value) => (*kind, Some(value.to_string())),
                });
            match row {
                Some((kind, None)) => {
                    let options = state.options.values(kind).to_vec();
                    state.staged.toggle_all(kind, &options);
                }
                Some((kind, Some(value))) => state.staged.toggle(kind, &value),
                None => return DispatchResult::unchanged(),
            }
            DispatchResult::changed()
        }

        Action::FilterApply => apply_staged(state),

        Action::FilterReset => {
            state.staged = ActiveFilters::default();
            state.active = ActiveFilters::default();
            state.sort = SortState::default();
            state.memberships = Memberships::default();
            // Invalidates any apply still waiting on lookups.
            state.apply_generation += 1;
            state.pending_apply = None;
            state.message = None;
            state.renarrow();
            state.selected_index = 0;
            DispatchResult::changed_with_many(detail_effects(state))
        }

        Action::CategoryMembersDidLoad {
            generation,
            members,
        } => {
            let Some(pending) = take_pending(state, generation) else {
                tracing::debug!(generation, "dropping stale category lookup");
                return DispatchResult::unchanged();
            };
            state.memberships = members.into_iter().collect();
            DispatchResult::changed_with_many(commit_filters(state, pending.filters))
        }

        Action::CategoryMembersDidError { generation, error } => {
            if take_pending(state, generation).is_none() {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Filter error: {error}"));
            DispatchResult::changed()
        }

        Action::SortBy(key) => {
            state.sort.select(key);
            DispatchResult::changed_with_many(detail_effects(state))
        }

        Action::SortNext => {
            let next = state.sort.by.next();
            state.sort.select(next);
            DispatchResult::changed_with_many(detail_effects(state))
        }

        Action::SortDirectionToggle => {
            state.sort.direction = state.sort.direction.toggle();
            DispatchResult::changed_with_many(detail_effects(state))
        }

        Action::DetailsDidLoad {
            batch,
            records,
            failed,
        } => {
            tracing::debug!(
                batch,
                loaded = records.len(),
                failed = failed.len(),
                "detail batch finished"
            );
            for record in records {
                state.detail_requests.remove(&record.id);
                if state.selection.id == Some(record.id) && state.selection.detail.is_loading() {
                    state.selection.detail = DataResource::Loaded(record.clone());
                }
                state.details.insert(record);
            }
            for id in failed {
                state.detail_requests.remove(&id);
                state.detail_failures.insert(id);
            }
            DispatchResult::changed_with_many(detail_effects(state))
        }

        Action::SelectionMove(delta) => {
            let index = clamp_index(state.selected_index, state.visible.len(), delta);
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with_many(select_current(state))
        }

        Action::SelectionPage(delta) => {
            let page = list_page_size(state) as i16;
            let index = clamp_index(
                state.selected_index,
                state.visible.len(),
                delta.saturating_mul(page),
            );
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with_many(select_current(state))
        }

        Action::SelectionJumpTop => {
            if !state.set_selected_index(0) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with_many(select_current(state))
        }

        Action::SelectionJumpBottom => {
            let last = state.visible.len().saturating_sub(1);
            if !state.set_selected_index(last) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with_many(select_current(state))
        }

        Action::DexSelect(index) => {
            if index >= state.visible.len() {
                return DispatchResult::unchanged();
            }
            // Re-selecting the shown row only refetches after a failure.
            let current = state.selected_entry().map(|entry| entry.id);
            if index == state.selected_index
                && current.is_some()
                && state.selection.id == current
                && state.selection.detail.error().is_none()
            {
                return DispatchResult::unchanged();
            }
            state.selected_index = index;
            DispatchResult::changed_with_many(select_current(state))
        }

        Action::SelectId(id) => {
            if let Some(index) = state.visible.iter().position(|entry| entry.id == id) {
                state.selected_index = index;
            }
            DispatchResult::changed_with_many(select_id(state, id))
        }

        Action::SelectionDidLoad { token, record } => {
            let current = token == state.selection.token;
            if current {
                state.selection.detail = DataResource::Loaded(record.clone());
            }
            state.detail_requests.remove(&record.id);
            state.details.insert(record);
            DispatchResult::changed_with_many(detail_effects(state))
        }

        Action::SelectionDidError { token, id, error } => {
            if token != state.selection.token {
                tracing::debug!(id, token, "ignoring stale selection error");
                return DispatchResult::unchanged();
            }
            if !state.selection.detail.is_loading() || state.details.contains(id) {
                tracing::debug!(id, token, "selection already filled, ignoring error");
                return DispatchResult::unchanged();
            }
            state.selection.detail = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::EvolutionSelect(index) => {
            let Some(name) = state
                .selected_detail()
                .and_then(|detail| detail.evolution_chain.get(index))
                .map(|stage| stage.name.clone())
            else {
                return DispatchResult::unchanged();
            };
            let Some(id) = state
                .master()
                .iter()
                .find(|entry| entry.name == name)
                .map(|entry| entry.id)
            else {
                state.message = Some(format!("{name} is not in the catalog"));
                return DispatchResult::changed();
            };
            if let Some(index) = state.visible.iter().position(|entry| entry.id == id) {
                state.selected_index = index;
            }
            DispatchResult::changed_with_many(select_id(state, id))
        }

        Action::LevelSet(level) => set_level(state, level as i32),

        Action::LevelStep(step) => set_level(state, state.level as i32 + step as i32),

        Action::PlayCry => {
            let Some((name, cry_url)) = state
                .selected_detail()
                .map(|detail| (detail.name.clone(), detail.cry_url.clone()))
            else {
                return DispatchResult::unchanged();
            };
            match cry_url {
                Some(url) => {
                    state.message = None;
                    DispatchResult::changed_with(Effect::PlayCry { name, url })
                }
                None => {
                    state.message = Some(format!("No cry available for {name}"));
                    DispatchResult::changed()
                }
            }
        }

        Action::CryDidError(error) => {
            state.message = Some(format!("Cry error: {error}"));
            DispatchResult::changed()
        }

        Action::PromptStart(kind) => {
            let input = match kind {
                PromptKind::Search => state.staged.search.clone(),
                PromptKind::Bound => String::new(),
            };
            state.prompt = Some(Prompt { kind, input });
            DispatchResult::changed()
        }

        Action::PromptInput(ch) => {
            let Some(prompt) = state.prompt.as_mut() else {
                return DispatchResult::unchanged();
            };
            prompt.input.push(ch);
            DispatchResult::changed()
        }

        Action::PromptBackspace => {
            let Some(prompt) = state.prompt.as_mut() else {
                return DispatchResult::unchanged();
            };
            if prompt.input.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::PromptCancel => {
            if state.prompt.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::PromptSubmit => {
            let Some(prompt) = state.prompt.take() else {
                return DispatchResult::unchanged();
            };
            match prompt.kind {
                PromptKind::Search => {
                    state.staged.search = prompt.input.trim().to_string();
                }
                PromptKind::Bound => match prompt.input.parse::<BoundExpr>() {
                    Ok(expr) => expr.apply_to(&mut state.staged),
                    Err(error) => {
                        state.message = Some(error.to_string());
                        return DispatchResult::changed();
                    }
                },
            }
            apply_staged(state)
        }

        Action::FocusNext => {
            if state.prompt.is_some() {
                return DispatchResult::unchanged();
            }
            state.focus_next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            if state.prompt.is_some() {
                return DispatchResult::unchanged();
            }
            state.focus_prev();
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Tick => {
            let busy = matches!(
                state.phase(),
                AppPhase::LoadingCatalog
                    | AppPhase::ApplyingFilters
                    | AppPhase::LoadingSelectionDetail
            ) || state.fetching_details();
            if !busy {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Makes the staged filters active. Without categorical selections this
/// happens at once; otherwise the filters wait on member lookups tagged with
/// a fresh generation.
fn apply_staged(state: &mut AppState) -> DispatchResult<Effect> {
    if !state.catalog.is_loaded() {
        return DispatchResult::unchanged();
    }
    state.apply_generation += 1;
    let generation = state.apply_generation;
    let filters = state.staged.clone();
    let queries = filters.category_queries();
    state.message = None;

    if queries.is_empty() {
        state.pending_apply = None;
        state.memberships = Memberships::default();
        return DispatchResult::changed_with_many(commit_filters(state, filters));
    }

    state.pending_apply = Some(PendingApply {
        generation,
        filters,
    });
    DispatchResult::changed_with(Effect::LoadCategoryMembers {
        generation,
        queries,
    })
}

fn take_pending(state: &mut AppState, generation: u64) -> Option<PendingApply> {
    match &state.pending_apply {
        Some(pending) if pending.generation == generation => state.pending_apply.take(),
        _ => None,
    }
}

fn commit_filters(state: &mut AppState, filters: ActiveFilters) -> Vec<Effect> {
    state.active = filters;
    state.renarrow();
    state.selected_index = 0;
    detail_effects(state)
}

/// Refreshes the visible list and requests the details it still lacks.
fn detail_effects(state: &mut AppState) -> Vec<Effect> {
    let missing = state.refresh_visible();
    missing
        .chunks(DETAIL_BATCH_SIZE)
        .map(|chunk| {
            state.detail_batch += 1;
            state.detail_requests.extend(chunk.iter().copied());
            Effect::LoadDetails {
                batch: state.detail_batch,
                ids: chunk.to_vec(),
            }
        })
        .collect()
}

fn select_current(state: &mut AppState) -> Vec<Effect> {
    match state.selected_entry().map(|entry| entry.id) {
        Some(id) => select_id(state, id),
        None => Vec::new(),
    }
}

fn select_id(state: &mut AppState, id: u32) -> Vec<Effect> {
    state.selection.token += 1;
    state.selection.id = Some(id);
    if let Some(record) = state.details.get(id) {
        state.selection.detail = DataResource::Loaded(record.clone());
        return Vec::new();
    }
    state.selection.detail = DataResource::Loading;
    vec![Effect::LoadSelection {
        token: state.selection.token,
        id,
    }]
}

fn set_level(state: &mut AppState, level: i32) -> DispatchResult<Effect> {
    let level = clamp_level(level);
    if level == state.level {
        return DispatchResult::unchanged();
    }
    state.level = level;
    DispatchResult::changed()
}

fn clamp_index(current: usize, len: usize, delta: i16) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as i64 + delta as i64;
    next.clamp(0, len as i64 - 1) as usize
}

fn list_page_size(state: &AppState) -> usize {
    state.terminal_size.1.saturating_sub(8).max(1) as usize
}
