use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, FormField, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.dashboard`(...) for the selected source
    LoadDashboard,
    /// Run `service.predict`(...) with the form contents
    SubmitPrediction,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global quit shortcut
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    // 'q' is text on the prediction form
    if key.code == Char('q') && key.modifiers.is_empty() && app.screen != Screen::Predict {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::SourceSelect => match key.code {
            Up | Char('k') => {
                app.source_list_index = app.source_list_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.source_list_index + 1 < app.sources.len() {
                    app.source_list_index += 1;
                }
            }
            Enter | Char(' ') => {
                if app.select_current_source().is_some() {
                    action = Action::LoadDashboard;
                }
            }
            _ => {}
        },

        Screen::Dashboard => match key.code {
            Up | Char('k') => {
                app.district_list_index = app.district_list_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.district_list_index + 1 < app.district_count() {
                    app.district_list_index += 1;
                }
            }
            Char('r') => {
                action = Action::LoadDashboard;
            }
            Char('p') | Right | Tab => {
                app.screen = Screen::Predict;
                app.focus = FormField::District;
            }
            Left | Esc | Char('b') => {
                app.screen = Screen::SourceSelect;
            }
            _ => {}
        },

        Screen::Predict => match key.code {
            Tab => {
                app.focus = app.focus.next();
            }
            Esc => {
                app.screen = Screen::Dashboard;
            }
            Enter => {
                action = Action::SubmitPrediction;
            }
            Backspace => match app.focus {
                FormField::District => {
                    app.district_input.pop();
                }
                FormField::Volume => {
                    app.volume_input.pop();
                }
                FormField::Period => {}
            },
            Left | Right | Up | Down if app.focus == FormField::Period => {
                app.toggle_period();
            }
            Char(character)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                match app.focus {
                    FormField::District => app.district_input.push(character),
                    FormField::Volume => {
                        if character.is_ascii_digit() || matches!(character, '.' | ',' | '-') {
                            app.volume_input.push(character);
                        }
                    }
                    FormField::Period => {
                        if character == ' ' {
                            app.toggle_period();
                        }
                    }
                }
            }
            _ => {}
        },
    }
    action
}
