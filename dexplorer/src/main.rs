mod audio;
mod ui;

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::Semaphore;
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use dexplorer::action::Action;
use dexplorer::api::{
    self, ApiConfig, CachedSource, DexSource, PokeApi, DEFAULT_API_BASE, DEFAULT_CONCURRENCY,
    DEFAULT_SPECIES_LIMIT,
};
use dexplorer::effect::Effect;
use dexplorer::filter::{NumericKey, SortKey};
use dexplorer::reducer::reducer;
use dexplorer::state::{AppState, FocusArea, PromptKind};
use dexplorer::stats::MAX_LEVEL;

#[derive(Parser, Debug)]
#[command(name = "dexplorer")]
#[command(about = "Browse, filter and sort the Pokedex from the terminal")]
struct Args {
    /// PokeAPI base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Number of base species to list
    #[arg(long, default_value_t = DEFAULT_SPECIES_LIMIT)]
    species_limit: u32,

    /// First alternate-form id
    #[arg(long, default_value_t = 10001)]
    form_start: u32,

    /// Last alternate-form id (inclusive)
    #[arg(long, default_value_t = 10277)]
    form_end: u32,

    /// Maximum concurrent detail requests
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Level used for the stat table
    #[arg(long, short, default_value_t = MAX_LEVEL)]
    level: u8,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DexComponentId {
    DexList,
    Filters,
    Detail,
    Prompt,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DexContext {
    DexList,
    Filters,
    Detail,
    Prompt,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.prompt.is_some() {
            return Some(DexComponentId::Prompt);
        }
        match self.focus {
            FocusArea::DexList => Some(DexComponentId::DexList),
            FocusArea::Filters => Some(DexComponentId::Filters),
            FocusArea::Detail => Some(DexComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        self.prompt.as_ref().map(|_| DexComponentId::Prompt)
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::DexList => DexContext::DexList,
            DexComponentId::Filters => DexContext::Filters,
            DexComponentId::Detail => DexContext::Detail,
            DexComponentId::Prompt => DexContext::Prompt,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::DexList
    }
}

/// Shared by every spawned effect task.
struct EffectEnv {
    source: Arc<dyn DexSource>,
    detail_permits: Arc<Semaphore>,
}

static EFFECT_ENV: OnceLock<EffectEnv> = OnceLock::new();

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = ApiConfig {
        base_url: args.api_base.trim_end_matches('/').to_string(),
        species_limit: args.species_limit,
        form_ids: args.form_start..=args.form_end,
        concurrency: args.concurrency.max(1),
    };
    let source = CachedSource::new(PokeApi::new(config));
    tracing::info!(
        base_url = %source.inner().config().base_url,
        species_limit = source.inner().config().species_limit,
        "starting dexplorer"
    );
    let detail_permits = Arc::new(Semaphore::new(source.inner().config().concurrency));
    let env = EffectEnv {
        source: Arc::new(source),
        detail_permits,
    };
    if EFFECT_ENV.set(env).is_err() {
        return Err(io::Error::other("effect environment already initialised"));
    }

    let level = args.level;
    let debug = DebugSession::new(args.debug);
    let state = debug
        .load_state_or_else_async(|| async move { Ok::<AppState, io::Error>(AppState::new(level)) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dexplorer=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| io::Error::other(format!("logging setup failed: {err}")))
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(ui::DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(DexComponentId::DexList, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_filters = Rc::clone(&ui);
    bus.register(DexComponentId::Filters, move |event, state| {
        ui_filters
            .borrow_mut()
            .handle_filter_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(DexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    let ui_prompt = Rc::clone(&ui);
    bus.register(DexComponentId::Prompt, move |event, state| {
        ui_prompt
            .borrow_mut()
            .handle_prompt_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if state.prompt.is_none() => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Tab => HandlerResponse::action(Action::FocusNext),
            crossterm::event::KeyCode::BackTab => HandlerResponse::action(Action::FocusPrev),
            crossterm::event::KeyCode::Char('/') => {
                HandlerResponse::action(Action::PromptStart(PromptKind::Search))
            }
            crossterm::event::KeyCode::Char(':') => {
                HandlerResponse::action(Action::PromptStart(PromptKind::Bound))
            }
            crossterm::event::KeyCode::Char('a') => HandlerResponse::action(Action::FilterApply),
            crossterm::event::KeyCode::Char('x') => HandlerResponse::action(Action::FilterReset),
            crossterm::event::KeyCode::Char('s') => HandlerResponse::action(Action::SortNext),
            crossterm::event::KeyCode::Char('S') => {
                HandlerResponse::action(Action::SortDirectionToggle)
            }
            crossterm::event::KeyCode::Char('t') => {
                HandlerResponse::action(Action::SortBy(SortKey::Stat(NumericKey::Total)))
            }
            crossterm::event::KeyCode::Char('p') => HandlerResponse::action(Action::PlayCry),
            crossterm::event::KeyCode::Char('+') => HandlerResponse::action(Action::LevelStep(1)),
            crossterm::event::KeyCode::Char('-') => HandlerResponse::action(Action::LevelStep(-1)),
            crossterm::event::KeyCode::Char('>') => HandlerResponse::action(Action::LevelStep(10)),
            crossterm::event::KeyCode::Char('<') => {
                HandlerResponse::action(Action::LevelStep(-10))
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(90), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    let Some(env) = EFFECT_ENV.get() else {
        tracing::error!(?effect, "effect dispatched before the environment was set");
        return;
    };
    let source = Arc::clone(&env.source);
    match effect {
        Effect::LoadCatalog => {
            ctx.tasks().spawn(TaskKey::new("catalog"), async move {
                match tokio::try_join!(source.fetch_catalog(), source.fetch_filter_options()) {
                    Ok((entries, options)) => {
                        tracing::info!(entries = entries.len(), "catalog loaded");
                        Action::CatalogDidLoad { entries, options }
                    }
                    Err(error) => {
                        tracing::error!(%error, "catalog load failed");
                        Action::CatalogDidError(error.to_string())
                    }
                }
            });
        }
        Effect::LoadCategoryMembers {
            generation,
            queries,
        } => {
            let key = format!("members_{generation}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_memberships(source, queries).await {
                    Ok(members) => Action::CategoryMembersDidLoad {
                        generation,
                        members,
                    },
                    Err(error) => Action::CategoryMembersDidError {
                        generation,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadDetails { batch, ids } => {
            let key = format!("details_{batch}");
            let permits = Arc::clone(&env.detail_permits);
            ctx.tasks().spawn(TaskKey::new(key), async move {
                tracing::debug!(batch, count = ids.len(), "fetching detail batch");
                let result = api::fetch_detail_batch(source, ids, permits).await;
                Action::DetailsDidLoad {
                    batch,
                    records: result.records,
                    failed: result.failed,
                }
            });
        }
        Effect::LoadSelection { token, id } => {
            let key = format!("selection_{token}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match source.fetch_detail(&id.to_string()).await {
                    Ok(record) => Action::SelectionDidLoad { token, record },
                    Err(error) => Action::SelectionDidError {
                        token,
                        id,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::PlayCry { name, url } => {
            ctx.tasks().spawn(TaskKey::new("cry"), async move {
                match source.fetch_bytes(&url).await {
                    Ok(bytes) => {
                        match tokio::task::spawn_blocking(move || audio::play_cry(bytes)).await {
                            Ok(Ok(())) => Action::Tick,
                            Ok(Err(error)) => Action::CryDidError(format!("{name}: {error}")),
                            Err(error) => Action::CryDidError(error.to_string()),
                        }
                    }
                    Err(error) => Action::CryDidError(format!("{name}: {error}")),
                }
            });
        }
    }
}
