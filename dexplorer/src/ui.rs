use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{Component, EventContext, EventKind, HandlerResponse, RenderContext};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use dexplorer::action::Action;
use dexplorer::filter::{CategoryKind, NumericKey, SortKey};
use dexplorer::state::{display_name, AppPhase, AppState, DetailRecord, FilterRow, FocusArea, PromptKind};
use dexplorer::stats::{calculate_stats, gender_ratio_label, StatSet};

use crate::DexComponentId;

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const ACCENT_RED: Color = Color::Rgb(226, 96, 88);
const STAT_BAR_WIDTH: usize = 20;
const MAX_BASE_STAT: u16 = 255;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct DexUi {
    dex_list: SelectList,
    filter_list: SelectList,
    status_bar: StatusBar,
}

impl DexUi {
    pub fn new() -> Self {
        Self {
            dex_list: SelectList::new(),
            filter_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state, event_ctx);
        match state.phase() {
            AppPhase::LoadingCatalog => render_notice(
                frame,
                layout[1],
                &format!("{} Loading catalog...", spinner(state)),
                ACCENT_TEAL,
            ),
            AppPhase::Error if !state.catalog.is_loaded() => render_notice(
                frame,
                layout[1],
                &format!(
                    "Could not load the catalog: {}",
                    state.catalog.error().unwrap_or("unknown error")
                ),
                ACCENT_RED,
            ),
            _ => {
                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Percentage(30),
                        Constraint::Percentage(22),
                        Constraint::Percentage(48),
                    ])
                    .split(layout[1]);
                render_list(frame, body[0], state, event_ctx, &mut self.dex_list);
                render_filters(frame, body[1], state, event_ctx, &mut self.filter_list);
                render_detail(frame, body[2], state, event_ctx);
            }
        }
        render_footer(frame, layout[2], state, &mut self.status_bar);
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::PageDown => vec![Action::SelectionPage(1)],
                crossterm::event::KeyCode::PageUp => vec![Action::SelectionPage(-1)],
                crossterm::event::KeyCode::Home => vec![Action::SelectionJumpTop],
                crossterm::event::KeyCode::End => vec![Action::SelectionJumpBottom],
                _ => {
                    let items = dex_items(state);
                    let props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: state.selected_index.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: list_style(None),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::DexSelect,
                        render_item: &|item| item.clone(),
                    };
                    let actions: Vec<_> = self
                        .dex_list
                        .handle_event(event, props)
                        .into_iter()
                        .collect();
                    return handler_response(actions);
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_filter_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        if let EventKind::Key(key) = event {
            match key.code {
                crossterm::event::KeyCode::Char(' ') | crossterm::event::KeyCode::Enter => {
                    return handler_response(vec![Action::FilterToggleAtCursor]);
                }
                _ => {}
            }
        }
        let items = filter_items(state);
        let props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.filter_cursor.min(items.len().saturating_sub(1)),
            is_focused: true,
            style: list_style(Some(BG_PANEL_ALT)),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::FilterCursor,
            render_item: &|item| item.clone(),
        };
        let actions: Vec<_> = self
            .filter_list
            .handle_event(event, props)
            .into_iter()
            .collect();
        handler_response(actions)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Left | crossterm::event::KeyCode::Char('h') => {
                    vec![Action::LevelStep(-1)]
                }
                crossterm::event::KeyCode::Right | crossterm::event::KeyCode::Char('l') => {
                    vec![Action::LevelStep(1)]
                }
                crossterm::event::KeyCode::Char(ch) if ch.is_ascii_digit() && ch != '0' => {
                    let index = ch.to_digit(10).unwrap_or(1) as usize - 1;
                    vec![Action::EvolutionSelect(index)]
                }
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_prompt_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Esc => vec![Action::PromptCancel],
                crossterm::event::KeyCode::Enter => vec![Action::PromptSubmit],
                crossterm::event::KeyCode::Backspace => vec![Action::PromptBackspace],
                crossterm::event::KeyCode::Char(ch) => vec![Action::PromptInput(ch)],
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
) {
    if state.prompt.is_some() {
        event_ctx.set_component_area(DexComponentId::Prompt, area);
    }
    let title_style = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);
    let prompt = match &state.prompt {
        Some(prompt) => {
            let sigil = match prompt.kind {
                PromptKind::Search => "/",
                PromptKind::Bound => ":",
            };
            format!("{sigil}{}_", prompt.input)
        }
        None if state.active.search.is_empty() => "/".to_string(),
        None => format!("/{}", state.active.search),
    };
    let applying = match state.phase() {
        AppPhase::ApplyingFilters => format!("  {} applying", spinner(state)),
        _ if state.fetching_details() => format!(
            "  {} fetching {} details",
            spinner(state),
            state.detail_requests.len()
        ),
        _ => String::new(),
    };
    let pending = if state.staged_differs() {
        "  (unapplied changes, a to apply)"
    } else {
        ""
    };

    let header = Text::from(vec![
        Line::from(vec![
            Span::styled("DEXPLORER", title_style),
            Span::raw(format!(
                "  {}/{} shown",
                state.visible.len(),
                state.master().len()
            )),
            Span::raw("  |  Sort: "),
            Span::styled(
                format!("{} {}", state.sort.by.label(), state.sort.direction.arrow()),
                Style::default().fg(ACCENT_GOLD),
            ),
            Span::raw("  |  Search: "),
            Span::styled(prompt, Style::default().fg(ACCENT_TEAL)),
            Span::styled(applying, Style::default().fg(ACCENT_GOLD)),
        ]),
        Line::from(vec![
            Span::raw("Filters: "),
            Span::styled(active_summary(state), Style::default().fg(ACCENT_GOLD)),
            Span::styled(pending, Style::default().fg(TEXT_DIM)),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    let paragraph = Paragraph::new(header)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(TEXT_MAIN));
    frame.render_widget(paragraph, area);
}

fn active_summary(state: &AppState) -> String {
    let mut parts = Vec::new();
    for kind in CategoryKind::ALL {
        let selected = state.active.selected(kind);
        if !selected.is_empty() {
            parts.push(format!("{}: {}", kind.label(), selected.join("+")));
        }
    }
    for key in NumericKey::ALL {
        let range = state.active.range(key);
        match (range.min, range.max) {
            (Some(min), Some(max)) if min == max => parts.push(format!("{} = {min}", key.label())),
            (Some(min), Some(max)) => parts.push(format!("{min} <= {} <= {max}", key.label())),
            (Some(min), None) => parts.push(format!("{} >= {min}", key.label())),
            (None, Some(max)) => parts.push(format!("{} <= {max}", key.label())),
            (None, None) => {}
        }
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

fn render_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(block)
    .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
    dex_list: &mut SelectList,
) {
    event_ctx.set_component_area(DexComponentId::DexList, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DEX")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::DexList));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = dex_items(state);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.selected_index.min(items.len().saturating_sub(1)),
        is_focused: state.focus == FocusArea::DexList,
        style: list_style(None),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::DexSelect,
        render_item: &|item| item.clone(),
    };
    dex_list.render(frame, inner, props);
}

fn dex_items(state: &AppState) -> Vec<Line<'static>> {
    let stat_key = match state.sort.by {
        SortKey::Stat(key) => Some(key),
        SortKey::Id | SortKey::Name => None,
    };
    state
        .visible
        .iter()
        .map(|entry| {
            let mut spans = vec![Span::raw(format!(
                "#{:04} {}",
                entry.id,
                display_name(&entry.name)
            ))];
            if let Some(key) = stat_key {
                let value = state
                    .details
                    .get(entry.id)
                    .map(|detail| key.value(detail).to_string())
                    .unwrap_or_else(|| "?".to_string());
                spans.push(Span::styled(
                    format!("  {value}"),
                    Style::default().fg(ACCENT_GOLD),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

fn render_filters(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
    filter_list: &mut SelectList,
) {
    event_ctx.set_component_area(DexComponentId::Filters, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("FILTERS")
        .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::Filters));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = filter_items(state);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.filter_cursor.min(items.len().saturating_sub(1)),
        is_focused: state.focus == FocusArea::Filters,
        style: list_style(Some(BG_PANEL_ALT)),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::FilterCursor,
        render_item: &|item| item.clone(),
    };
    filter_list.render(frame, inner, props);
}

fn filter_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .filter_rows()
        .into_iter()
        .map(|row| match row {
            FilterRow::All(kind) => {
                let selected = state.staged.selected(kind).len();
                let total = state.options.values(kind).len();
                Line::from(Span::styled(
                    format!("{} ({selected}/{total})", kind.label().to_uppercase()),
                    Style::default()
                        .fg(ACCENT_TEAL)
                        .add_modifier(Modifier::BOLD),
                ))
            }
            FilterRow::Value(kind, value) => {
                let mark = if state.staged.is_selected(kind, value) {
                    "[x]"
                } else {
                    "[ ]"
                };
                Line::from(format!(" {mark} {}", display_name(value)))
            }
        })
        .collect()
}

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
) {
    event_ctx.set_component_area(DexComponentId::Detail, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("DATA  Lv {}", state.level))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::Detail));

    let text = if let Some(detail) = state.selected_detail() {
        detail_text(detail, state.level)
    } else if let Some(error) = state.selection.detail.error() {
        Text::from(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(ACCENT_RED),
        )))
    } else if state.selection.detail.is_loading() {
        Text::from(format!("{} Loading...", spinner(state)))
    } else {
        Text::from("Select an entry")
    };
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn detail_text(detail: &DetailRecord, level: u8) -> Text<'static> {
    let label = Style::default().fg(TEXT_DIM);
    let value = Style::default().fg(TEXT_MAIN);
    let heading = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);

    let abilities = detail
        .abilities
        .iter()
        .map(|ability| {
            if ability.is_hidden {
                format!("{} (hidden)", display_name(&ability.name))
            } else {
                display_name(&ability.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let egg_groups = detail
        .egg_groups
        .iter()
        .map(|name| display_name(name))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        Line::from(type_badges(
            format!("#{:04} {}", detail.id, display_name(&detail.name)),
            heading,
            &detail.types,
        )),
        Line::from(vec![
            Span::styled("Height ", label),
            Span::styled(format!("{:.1} m", detail.height), value),
            Span::styled("  Weight ", label),
            Span::styled(format!("{:.1} kg", detail.weight), value),
            Span::styled("  Grass Knot ", label),
            Span::styled(detail.grass_knot_power.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Abilities ", label),
            Span::styled(abilities, value),
        ]),
        Line::from(vec![
            Span::styled("Gender ", label),
            Span::styled(gender_ratio_label(detail.gender_ratio), value),
            Span::styled("  Color ", label),
            Span::styled(display_name(&detail.color), value),
        ]),
        Line::from(vec![
            Span::styled("Egg groups ", label),
            Span::styled(egg_groups, value),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            format!(
                "{:<5}{:>6}{:>6}{:>6}{:>6}{:>6}",
                "", "Base", "Min", "Neut", "Max", "Max+"
            ),
            heading,
        )),
    ];

    let calculated = calculate_stats(&detail.base_stats, level);
    let rows: [(&str, Color, fn(&StatSet) -> u16); 6] = [
        ("HP", Color::Rgb(239, 68, 68), |stats| stats.hp),
        ("Atk", Color::Rgb(249, 115, 22), |stats| stats.attack),
        ("Def", Color::Rgb(234, 179, 8), |stats| stats.defense),
        ("SpA", Color::Rgb(59, 130, 246), |stats| stats.special_attack),
        ("SpD", Color::Rgb(34, 197, 94), |stats| stats.special_defense),
        ("Spe", Color::Rgb(236, 72, 153), |stats| stats.speed),
    ];
    for (name, color, pick) in rows {
        let base = pick(&detail.base_stats);
        lines.push(Line::from(vec![
            Span::raw(format!(
                "{name:<5}{:>6}{:>6}{:>6}{:>6}{:>6}  ",
                base,
                pick(&calculated.min),
                pick(&calculated.base),
                pick(&calculated.max),
                pick(&calculated.max_plus),
            )),
            Span::styled(stat_bar(base, STAT_BAR_WIDTH), Style::default().fg(color)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Total ", label),
        Span::styled(detail.base_stat_total.to_string(), value),
        Span::styled("  Product ", label),
        Span::styled(detail.base_stat_product.to_string(), value),
    ]));

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Evolution", heading)));
    for (index, stage) in detail.evolution_chain.iter().enumerate() {
        let marker = if stage.name == detail.name { ">" } else { " " };
        let mut spans = vec![Span::raw(format!(
            "{marker}{} {}",
            index + 1,
            display_name(&stage.name)
        ))];
        if !stage.triggers.is_empty() {
            spans.push(Span::styled(
                format!("  ({})", stage.triggers.join("; ")),
                label,
            ));
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

/// Header line: name followed by one coloured badge per type.
fn type_badges(title: String, title_style: Style, types: &[String]) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(title, title_style)];
    for name in types {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!(" {} ", name.to_ascii_uppercase()),
            Style::default()
                .fg(BG_BASE)
                .bg(type_color(name))
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

fn type_color(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "normal" => Color::Rgb(168, 168, 120),
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "electric" => Color::Rgb(248, 208, 48),
        "grass" => Color::Rgb(120, 200, 80),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "dark" => Color::Rgb(112, 88, 72),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        _ => TEXT_DIM,
    }
}

/// Bar of `width` cells scaled against the 255 base-stat ceiling.
fn stat_bar(base: u16, width: usize) -> String {
    let filled = (usize::from(base.min(MAX_BASE_STAT)) * width + 127) / 255;
    let filled = if base > 0 { filled.max(1).min(width) } else { 0 };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_default();
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if let Some(prompt) = &state.prompt {
        let mut left = vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Cancel"),
        ];
        if prompt.kind == PromptKind::Bound {
            left.push(StatusBarHint::new("hp>=45", "Min"));
            left.push(StatusBarHint::new("total<=300", "Max"));
            left.push(StatusBarHint::new("spe=", "Clear"));
        }
        return (left, Vec::new());
    }

    let left = match state.focus {
        FocusArea::DexList => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("PgUp/PgDn", "Page"),
        ],
        FocusArea::Filters => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Space", "Toggle"),
            StatusBarHint::new("a", "Apply"),
        ],
        FocusArea::Detail => vec![
            StatusBarHint::new("h/l", "Level"),
            StatusBarHint::new("1-9", "Evolution"),
        ],
    };
    let center = vec![
        StatusBarHint::new("Tab", "Focus"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new(":", "Bound"),
        StatusBarHint::new("s/S", "Sort"),
        StatusBarHint::new("t", "By total"),
        StatusBarHint::new("x", "Reset"),
        StatusBarHint::new("p", "Cry"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}

fn list_style(bg: Option<Color>) -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn focus_border(state: &AppState, area: FocusArea) -> Style {
    if state.focus == area {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}

fn spinner(state: &AppState) -> &'static str {
    SPINNER[(state.tick / 3) as usize % SPINNER.len()]
}
