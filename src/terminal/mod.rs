pub mod events;
pub mod state;
pub mod ui;

use anyhow::Result;
use ratatui::{
    DefaultTerminal,
    crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;

use crate::api::MailService;
use crate::session::SessionContext;
use crate::sync::SyncOrchestrator;
use crate::terminal::state::AppState;

const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Run the dashboard on a single-threaded executor. When a session is given,
/// its sync cycle runs as a local task next to the UI loop.
pub fn run_dashboard<S: MailService + 'static>(
    session: Option<SessionContext>,
    orchestrator: SyncOrchestrator<S>,
) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();

    local.block_on(&rt, async move {
        if let Some(s) = session.clone() {
            tokio::task::spawn_local(async move {
                let report = orchestrator.run_session(&s).await;
                log::debug!("cycle report: {report:?}");
            });
        }

        let terminal = ratatui::init();
        let result = run(terminal, AppState::new(session)).await;
        ratatui::restore();
        result
    })
}

async fn run(mut terminal: DefaultTerminal, mut state: AppState) -> Result<()> {
    loop {
        state.reconcile();
        terminal.draw(|f| ui::render(f, &mut state))?;

        // drain pending input without blocking the sync task
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && events::handle_key(key, &mut state)?
            {
                return Ok(());
            }
        }

        tokio::time::sleep(FRAME_INTERVAL).await;
    }
}
