//! Key bindings for the interactive dashboard.
//!
//! | Key | Action |
//! |-----|--------|
//! | `t` / `Tab` | next ticker |
//! | `T` / `BackTab` | previous ticker |
//! | `1`..`5` | pick ticker by position |
//! | `c` | next chart kind |
//! | `Left` / `h`, `Right` / `l` | pan |
//! | `+` / `=`, `-` / `_` | zoom in / out |
//! | `0` | reset zoom |
//! | `q` / `Esc` / `Ctrl-C` | quit |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use stockdash_core::{Dashboard, FetchCycle, Ticker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextTicker,
    PreviousTicker,
    SelectTicker(Ticker),
    NextChartKind,
    PanLeft,
    PanRight,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Quit,
}

/// What the event loop must do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Fetch(FetchCycle),
    Quit,
}

pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }

    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('t') | KeyCode::Tab => Action::NextTicker,
        KeyCode::Char('T') | KeyCode::BackTab => Action::PreviousTicker,
        KeyCode::Char(digit @ '1'..='5') => {
            let index = digit as usize - '1' as usize;
            Action::SelectTicker(Ticker::ALL[index])
        }
        KeyCode::Char('c') | KeyCode::Char('C') => Action::NextChartKind,
        KeyCode::Left | KeyCode::Char('h') => Action::PanLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::PanRight,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::ZoomIn,
        KeyCode::Char('-') | KeyCode::Char('_') => Action::ZoomOut,
        KeyCode::Char('0') => Action::ResetZoom,
        _ => return None,
    };
    Some(action)
}

pub fn dispatch(dashboard: &mut Dashboard, action: Action) -> Effect {
    let cycle = match action {
        Action::Quit => return Effect::Quit,
        Action::NextTicker => dashboard.next_ticker(),
        Action::PreviousTicker => dashboard.previous_ticker(),
        Action::SelectTicker(ticker) => dashboard.select_ticker(ticker),
        Action::NextChartKind => {
            dashboard.next_chart_kind();
            None
        }
        Action::PanLeft => {
            dashboard.viewport_mut().pan_left();
            None
        }
        Action::PanRight => {
            dashboard.viewport_mut().pan_right();
            None
        }
        Action::ZoomIn => {
            dashboard.viewport_mut().zoom_in();
            None
        }
        Action::ZoomOut => {
            dashboard.viewport_mut().zoom_out();
            None
        }
        Action::ResetZoom => {
            dashboard.viewport_mut().reset();
            None
        }
    };

    cycle.map_or(Effect::None, Effect::Fetch)
}
