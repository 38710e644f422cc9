use std::io::{self, IsTerminal, Stdout};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use stockdash_core::{Dashboard, FetchOutcome, Fetcher, PredictionApi};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::cli::TuiArgs;
use crate::error::CliError;
use crate::keymap::{self, Effect};
use crate::ui;

const INPUT_POLL: Duration = Duration::from_millis(100);

pub async fn run(api: Arc<dyn PredictionApi>, args: &TuiArgs) -> Result<ExitCode, CliError> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(CliError::NotATerminal);
    }

    let mut dashboard = Dashboard::new(args.ticker, args.chart);
    let (mut fetcher, mut outcomes) = Fetcher::new(api);
    fetcher.start(dashboard.initial_cycle());
    info!(ticker = %args.ticker, chart = %args.chart, "dashboard started");

    let mut screen = Screen::enter()?;
    let result = event_loop(&mut screen.terminal, &mut dashboard, &mut fetcher, &mut outcomes);
    drop(screen);
    fetcher.cancel();

    result?;
    info!("dashboard closed");
    Ok(ExitCode::SUCCESS)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    dashboard: &mut Dashboard,
    fetcher: &mut Fetcher,
    outcomes: &mut UnboundedReceiver<FetchOutcome>,
) -> Result<(), CliError> {
    loop {
        while let Ok(outcome) = outcomes.try_recv() {
            dashboard.apply(outcome);
        }

        terminal.draw(|frame| ui::draw(frame, dashboard))?;

        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        let Some(action) = keymap::action_for(key) else {
            continue;
        };

        match keymap::dispatch(dashboard, action) {
            Effect::Quit => return Ok(()),
            Effect::Fetch(cycle) => fetcher.start(cycle),
            Effect::None => {}
        }
    }
}

/// Raw mode plus alternate screen, restored on drop so a failed draw still
/// hands the terminal back.
struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
    fn enter() -> Result<Self, CliError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(error.into());
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
