use std::env;
use std::rc::Rc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::task::LocalSet;
use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::{CatalogManager, HttpTrackApi};
use crate::playback::PlaybackCoordinator;
use crate::state::ClientState;

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = settings::load_settings();

    if let Some(url) = env::args().nth(1) {
        settings.server.base_url = url;
    }

    logging::init(&settings);
    info!("starting musicshare");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = LocalSet::new();

    let state = Rc::new(ClientState::new());
    let api = HttpTrackApi::new(&settings.server.base_url)?;
    info!(base_url = %api.base_url(), "track service");
    let catalog = Rc::new(CatalogManager::new(api, state.clone()));
    let audio_player = AudioPlayer::new(settings.server.base_url.clone(), settings.audio.clone());
    let coordinator = PlaybackCoordinator::new(state.clone(), audio_player.clone());
    let mut app = App::new(settings.server.base_url.clone());

    {
        let catalog = catalog.clone();
        local.spawn_local(async move { catalog.refresh().await });
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let ctx = event_loop::Context {
        settings: &settings,
        catalog: &catalog,
        coordinator: &coordinator,
        audio_player: &audio_player,
    };
    let run_result = runtime.block_on(local.run_until(event_loop::run(&mut terminal, &mut app, &ctx)));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shut down");
    run_result
}
