use super::view::Controls;
use crate::application::{App, AppMode, PendingAction};
use crate::domain::{SubjectField, WorkflowStep};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::FilePath => Self::handle_file_path_mode(app, key),
            AppMode::NameEntry => Self::handle_name_entry_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        let controls = Controls::derive(app);

        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('o') = key {
                if controls.select_file {
                    app.start_file_prompt();
                }
            }
            return;
        }

        match key {
            KeyCode::Char('o') => {
                if controls.select_file {
                    app.start_file_prompt();
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            _ => match app.step() {
                WorkflowStep::Upload => Self::handle_upload_step(app, key, controls),
                WorkflowStep::SelectSubject => Self::handle_selection_step(app, key, controls),
                WorkflowStep::Review => Self::handle_review_step(app, key, controls),
            },
        }
    }

    fn handle_upload_step(app: &mut App, key: KeyCode, controls: Controls) {
        if let KeyCode::Char('u') | KeyCode::Enter = key {
            if controls.upload {
                app.queue(PendingAction::Upload);
            }
        }
    }

    fn handle_selection_step(app: &mut App, key: KeyCode, controls: Controls) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_candidate_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_candidate_cursor(1),
            KeyCode::Char(' ') => {
                if controls.choose_candidate {
                    app.pick_cursor_candidate();
                }
            }
            KeyCode::Enter => {
                if controls.choose_candidate {
                    if let Some(candidate) = app.cursor_candidate().cloned() {
                        app.queue(PendingAction::SelectAndProcess(candidate));
                    }
                }
            }
            KeyCode::Char('f') => {
                if controls.edit_names {
                    app.start_name_entry(SubjectField::FirstName);
                }
            }
            KeyCode::Char('l') => {
                if controls.edit_names {
                    app.start_name_entry(SubjectField::LastName);
                }
            }
            KeyCode::Char('p') => {
                if controls.process {
                    app.queue(PendingAction::ProcessSubject);
                }
            }
            _ => {}
        }
    }

    fn handle_review_step(app: &mut App, key: KeyCode, controls: Controls) {
        match key {
            KeyCode::Char('g') => {
                if controls.generate {
                    app.queue(PendingAction::GeneratePdf);
                }
            }
            KeyCode::Char('d') => {
                if controls.download {
                    app.queue(PendingAction::DownloadPdf);
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => {
                if controls.return_to_selection {
                    app.return_to_selection();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => app.scroll_tables(-1),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_tables(1),
            KeyCode::PageUp => app.scroll_tables(-10),
            KeyCode::PageDown => app.scroll_tables(10),
            KeyCode::Home => app.table_scroll = 0,
            _ => {}
        }
    }

    fn handle_file_path_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.submit_file_path(),
            KeyCode::Esc => app.cancel_filename_input(),
            KeyCode::Backspace => app.delete_filename_char_before_cursor(),
            KeyCode::Delete => app.delete_filename_char_at_cursor(),
            KeyCode::Char(c) => app.insert_filename_char(c),
            _ => Self::move_cursor(app, key),
        }
    }

    fn handle_name_entry_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                app.finish_name_entry();
                if Controls::derive(app).process {
                    app.queue(PendingAction::ProcessSubject);
                }
            }
            KeyCode::Esc => app.finish_name_entry(),
            KeyCode::Tab | KeyCode::BackTab => app.switch_name_field(),
            KeyCode::Backspace => app.delete_name_char_before_cursor(),
            KeyCode::Delete => app.delete_name_char_at_cursor(),
            KeyCode::Char(c) => app.insert_name_char(c),
            _ => Self::move_cursor(app, key),
        }
    }

    fn move_cursor(app: &mut App, key: KeyCode) {
        let len = app.active_input_len();
        match key {
            KeyCode::Left => app.cursor_position = app.cursor_position.saturating_sub(1),
            KeyCode::Right => {
                if app.cursor_position < len {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => app.cursor_position = 0,
            KeyCode::End => app.cursor_position = len,
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}
