use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use scan_types::AnalysisRequest;

use super::app::{AppState, Tab, ViewMode};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KeyOutcome {
    Continue,
    Quit,
    StartScan(AnalysisRequest),
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut AppState) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c')) {
        return KeyOutcome::Quit;
    }

    if app.confirm_quit {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return KeyOutcome::Quit,
            KeyCode::Esc => {
                app.confirm_quit = false;
                return KeyOutcome::Continue;
            }
            _ => app.confirm_quit = false,
        }
    }

    if app.view_mode == ViewMode::ReportFullscreen {
        handle_fullscreen_key(key, app);
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Tab => {
            app.set_tab(app.tab.next());
            return KeyOutcome::Continue;
        }
        KeyCode::BackTab => {
            app.set_tab(app.tab.prev());
            return KeyOutcome::Continue;
        }
        _ => {}
    }

    if app.tab.kind().is_some() {
        handle_input_tab_key(key, app)
    } else {
        handle_browse_key(key, app);
        KeyOutcome::Continue
    }
}

fn handle_input_tab_key(key: KeyEvent, app: &mut AppState) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => {
                if let Some(request) = app.begin_scan() {
                    return KeyOutcome::StartScan(request);
                }
            }
            KeyCode::Char('l') => app.load_sample(),
            KeyCode::Char('u') => app.clear_input(),
            KeyCode::Char('r') => app.enter_report_fullscreen(),
            _ => {}
        }
        return KeyOutcome::Continue;
    }
    match key.code {
        KeyCode::Char(ch) => app.push_char(ch),
        KeyCode::Enter => app.push_char('\n'),
        KeyCode::Backspace => app.backspace(),
        _ => {}
    }
    KeyOutcome::Continue
}

fn handle_browse_key(key: KeyEvent, app: &mut AppState) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.confirm_quit = true,
        KeyCode::Down | KeyCode::Char('j') if app.tab == Tab::History => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') if app.tab == Tab::History => app.select_prev(),
        KeyCode::Enter if app.tab == Tab::History => app.open_selected_history(),
        _ => {}
    }
}

fn handle_fullscreen_key(key: KeyEvent, app: &mut AppState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.confirm_quit = true,
        KeyCode::Esc => app.exit_report_fullscreen(),
        KeyCode::Char('r') if ctrl => app.exit_report_fullscreen(),
        KeyCode::Char('f') if ctrl => app.scroll_down(app.page_size()),
        KeyCode::Char('b') if ctrl => app.scroll_up(app.page_size()),
        KeyCode::Char('d') if ctrl => app.scroll_down(app.half_page_size()),
        KeyCode::Char('u') if ctrl => app.scroll_up(app.half_page_size()),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(app.page_size()),
        KeyCode::PageUp => app.scroll_up(app.page_size()),
        KeyCode::Char('g') => {
            if app.pending_g {
                app.scroll_to_top();
            } else {
                app.pending_g = true;
            }
        }
        KeyCode::Char('G') => app.scroll_to_bottom(),
        _ => app.pending_g = false,
    }
}
