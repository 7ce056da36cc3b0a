use crate::bank::QuestionBank;
use crate::exam::ExamSession;
use crate::form::{self, Control, Edit, Form};
use crate::logger;
use crate::models::AppState;
use crate::utils::{insert_char, remove_char_before};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Lines moved per PgUp/PgDn on the review screen.
const REVIEW_PAGE: u16 = 10;

/// Terminal-side state around an `ExamSession`: which screen is showing,
/// which control has focus and where the text cursor sits.
#[derive(Debug)]
pub struct ExamApp {
    pub exam: ExamSession,
    pub state: AppState,
    pub focus: usize,
    /// Cursor position in chars within the focused text control.
    pub cursor: usize,
    pub input_scroll_y: u16,
    pub review_scroll_y: u16,
    pub should_quit: bool,
}

impl ExamApp {
    pub fn new(bank: QuestionBank) -> Self {
        let mut app = Self {
            exam: ExamSession::new(bank),
            state: AppState::Exam,
            focus: 0,
            cursor: 0,
            input_scroll_y: 0,
            review_scroll_y: 0,
            should_quit: false,
        };
        app.reset_focus();
        app
    }

    pub fn form(&self) -> Form {
        form::build(self.exam.current_question(), self.exam.current_answer())
    }

    pub fn focused_control(&self) -> Option<Control> {
        self.form().controls.into_iter().nth(self.focus)
    }

    fn reset_focus(&mut self) {
        self.set_focus(0);
    }

    fn set_focus(&mut self, focus: usize) {
        let count = self.form().controls.len();
        self.focus = focus.min(count.saturating_sub(1));
        self.cursor = self
            .focused_control()
            .and_then(|c| c.text().map(|t| t.chars().count()))
            .unwrap_or(0);
        self.input_scroll_y = 0;
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.form().controls.len();
        if count == 0 {
            return;
        }
        let next = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
        // A lone control keeps its cursor and scroll.
        if next != self.focus {
            self.set_focus(next);
        }
    }

    fn go_next(&mut self) {
        if self.exam.is_last() {
            self.state = AppState::SubmitConfirm;
        } else if self.exam.next() {
            logger::log(&format!("Moved to question {}", self.exam.current_index() + 1));
            self.reset_focus();
        }
    }

    fn go_previous(&mut self) {
        if self.exam.previous() {
            logger::log(&format!("Moved to question {}", self.exam.current_index() + 1));
            self.reset_focus();
        }
    }

    /// Applies `edit` to the current question's answer. Returns whether the
    /// stored answer changed.
    fn edit(&mut self, edit: Edit) -> bool {
        let question = self.exam.current_question();
        let Some(answer) = form::apply(question, self.exam.current_answer(), edit) else {
            return false;
        };
        match self.exam.set_answer_checked(answer) {
            Ok(()) => true,
            Err(e) => {
                logger::log(&format!("Rejected edit: {}", e));
                false
            }
        }
    }

    fn set_focused_text(&mut self, value: String) -> bool {
        match self.focused_control() {
            Some(Control::Surface { row, .. }) => self.edit(Edit::SetSurface { row, value }),
            Some(Control::Text { .. }) => self.edit(Edit::SetText {
                control: self.focus,
                value,
            }),
            _ => false,
        }
    }

    fn type_char(&mut self, c: char) {
        let Some(text) = self.focused_control().and_then(|c| c.text().map(str::to_string)) else {
            return;
        };
        if self.set_focused_text(insert_char(&text, self.cursor, c)) {
            self.cursor += 1;
        }
    }

    fn backspace(&mut self) {
        let Some(text) = self.focused_control().and_then(|c| c.text().map(str::to_string)) else {
            return;
        };
        if self.cursor > 0 && self.set_focused_text(remove_char_before(&text, self.cursor)) {
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        let Some(text) = self.focused_control().and_then(|c| c.text().map(str::to_string)) else {
            return;
        };
        if self.cursor < text.chars().count() {
            self.set_focused_text(remove_char_before(&text, self.cursor + 1));
        }
    }

    fn focused_text_len(&self) -> usize {
        self.focused_control()
            .and_then(|c| c.text().map(|t| t.chars().count()))
            .unwrap_or(0)
    }

    fn append_entity_row(&mut self) {
        if self.edit(Edit::AppendRow) {
            let count = self.form().controls.len();
            self.set_focus(count.saturating_sub(2));
        }
    }

    fn remove_entity_row(&mut self) {
        let row = match self.focused_control() {
            Some(Control::Surface { row, .. }) | Some(Control::Label { row, .. }) => row,
            _ => return,
        };
        if self.edit(Edit::RemoveRow(row)) {
            self.set_focus(row * 2);
        }
    }

    fn clear_answer(&mut self) {
        match self.exam.clear_answer() {
            Ok(()) => self.reset_focus(),
            Err(e) => logger::log(&format!("Rejected clear: {}", e)),
        }
    }
}

pub fn handle_key(app: &mut ExamApp, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    match app.state {
        AppState::Exam => handle_exam_input(app, key),
        AppState::SubmitConfirm => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if app.exam.submit() {
                    logger::log(&format!(
                        "Exam submitted with {}/{} answered",
                        app.exam.answered_count(),
                        app.exam.question_count()
                    ));
                }
                app.review_scroll_y = 0;
                app.state = AppState::Review;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Exam;
            }
            _ => {}
        },
        AppState::QuitConfirm => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.should_quit = true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Exam;
            }
            _ => {}
        },
        AppState::Review => handle_review_input(app, key),
    }
}

pub fn handle_exam_input(app: &mut ExamApp, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let focused = app.focused_control();

    match key.code {
        KeyCode::Esc => app.state = AppState::QuitConfirm,
        KeyCode::PageDown => app.go_next(),
        KeyCode::PageUp => app.go_previous(),
        KeyCode::Char('n') if ctrl => app.go_next(),
        KeyCode::Char('p') if ctrl => app.go_previous(),
        KeyCode::Char('s') if ctrl => {
            if app.exam.is_last() {
                app.state = AppState::SubmitConfirm;
            }
        }
        KeyCode::Char('a') if ctrl => app.append_entity_row(),
        KeyCode::Char('d') if ctrl => app.remove_entity_row(),
        KeyCode::Char('u') if ctrl => app.clear_answer(),
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Tab | KeyCode::Down => app.move_focus(true),
        KeyCode::BackTab | KeyCode::Up => app.move_focus(false),
        KeyCode::Left => match focused {
            Some(Control::Label { row, .. }) => {
                app.edit(Edit::CycleLabel {
                    row,
                    forward: false,
                });
            }
            _ => app.cursor = app.cursor.saturating_sub(1),
        },
        KeyCode::Right => match focused {
            Some(Control::Label { row, .. }) => {
                app.edit(Edit::CycleLabel { row, forward: true });
            }
            _ => app.cursor = (app.cursor + 1).min(app.focused_text_len()),
        },
        KeyCode::Home => app.cursor = 0,
        KeyCode::End => app.cursor = app.focused_text_len(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Enter => match focused {
            Some(Control::Option { index, .. }) => {
                app.edit(Edit::Select(index));
            }
            Some(ref control) if control.is_multiline() => app.type_char('\n'),
            _ => app.move_focus(true),
        },
        KeyCode::Char(c) => match focused {
            Some(Control::Option { index, .. }) if c == ' ' => {
                app.edit(Edit::Select(index));
            }
            Some(Control::Option { .. }) => {
                if let Some(digit) = c.to_digit(10).filter(|d| *d > 0) {
                    app.edit(Edit::Select(digit as usize - 1));
                }
            }
            Some(Control::Label { row, .. }) if c == ' ' => {
                app.edit(Edit::CycleLabel { row, forward: true });
            }
            _ => app.type_char(c),
        },
        _ => {}
    }
}

pub fn handle_review_input(app: &mut ExamApp, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.review_scroll_y = app.review_scroll_y.saturating_sub(1),
        KeyCode::Down => app.review_scroll_y = app.review_scroll_y.saturating_add(1),
        KeyCode::PageUp => app.review_scroll_y = app.review_scroll_y.saturating_sub(REVIEW_PAGE),
        KeyCode::PageDown => app.review_scroll_y = app.review_scroll_y.saturating_add(REVIEW_PAGE),
        KeyCode::Home => app.review_scroll_y = 0,
        KeyCode::Char('r') | KeyCode::Char('R') => {
            if app.exam.restart() {
                logger::log("Exam restarted");
                app.state = AppState::Exam;
                app.review_scroll_y = 0;
                app.reset_focus();
            }
        }
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, Entity};

    fn app() -> ExamApp {
        ExamApp::new(QuestionBank::builtin().unwrap())
    }

    fn press(app: &mut ExamApp, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::empty()));
    }

    fn ctrl(app: &mut ExamApp, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_str(app: &mut ExamApp, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn go_to(app: &mut ExamApp, index: usize) {
        while app.exam.current_index() < index {
            press(app, KeyCode::PageDown);
        }
    }

    #[test]
    fn test_select_option_with_enter_and_digit() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.exam.current_answer(), Some(&Answer::Choice(0)));
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.exam.current_answer(), Some(&Answer::Choice(2)));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.exam.current_answer(), Some(&Answer::Choice(1)));
        assert_eq!(app.exam.answered_count(), 1);
    }

    #[test]
    fn test_digit_out_of_range_ignored() {
        let mut app = app();
        press(&mut app, KeyCode::Char('9'));
        assert!(app.exam.current_answer().is_none());
    }

    #[test]
    fn test_typing_into_subtasks_keeps_positions() {
        let mut app = app();
        go_to(&mut app, 30);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "NO");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "elpa");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(
            app.exam.current_answer(),
            Some(&Answer::Lines(vec![
                String::new(),
                "NO".to_string(),
                String::new(),
                "elppa".to_string()
            ]))
        );
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut app = app();
        go_to(&mut app, 36);
        type_str(&mut app, "abc");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.exam.current_answer(), Some(&Answer::Text("b".to_string())));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_enter_inserts_newline_in_multiline_field() {
        let mut app = app();
        go_to(&mut app, 36);
        type_str(&mut app, "a");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "AI");
        assert_eq!(
            app.exam.current_answer(),
            Some(&Answer::Text("a\nAI".to_string()))
        );
    }

    #[test]
    fn test_ner_remove_other_row_leaves_content() {
        let mut app = app();
        go_to(&mut app, 32);
        ctrl(&mut app, 'a');
        ctrl(&mut app, 'a');
        assert_eq!(app.focus, 2);
        type_str(&mut app, "Samira");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);

        app.set_focus(0);
        ctrl(&mut app, 'd');
        assert_eq!(
            app.exam.current_answer(),
            Some(&Answer::Entities(vec![Entity::new("Samira", "PERSON")]))
        );
        assert_eq!(app.focus, 0);
    }

    #[test]
    fn test_next_at_last_question_asks_to_submit() {
        let mut app = app();
        go_to(&mut app, 46);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.state, AppState::SubmitConfirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state, AppState::Exam);
        assert!(!app.exam.is_submitted());
    }

    #[test]
    fn test_ctrl_s_only_submits_at_last_question() {
        let mut app = app();
        ctrl(&mut app, 's');
        assert_eq!(app.state, AppState::Exam);
        go_to(&mut app, 46);
        ctrl(&mut app, 's');
        assert_eq!(app.state, AppState::SubmitConfirm);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.state, AppState::Review);
        assert!(app.exam.is_submitted());
    }

    #[test]
    fn test_restart_from_review() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        go_to(&mut app, 46);
        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.review_scroll_y, 1);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.state, AppState::Exam);
        assert_eq!(app.exam.current_index(), 0);
        assert_eq!(app.exam.answered_count(), 0);
        assert_eq!(app.exam.answers().len(), 47);
    }

    #[test]
    fn test_quit_confirmation_and_ctrl_c() {
        let mut app = app();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::QuitConfirm);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Exam);
        assert!(!app.should_quit);
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn test_clear_answer() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        ctrl(&mut app, 'u');
        assert!(app.exam.current_answer().is_none());
    }

    #[test]
    fn test_focus_keys_keep_cursor_in_single_field() {
        let mut app = app();
        go_to(&mut app, 36);
        type_str(&mut app, "abcd");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        app.input_scroll_y = 1;

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, 0);
        assert_eq!(app.cursor, 2);
        assert_eq!(app.input_scroll_y, 1);

        press(&mut app, KeyCode::Char('X'));
        assert_eq!(
            app.exam.current_answer(),
            Some(&Answer::Text("abXcd".to_string()))
        );
    }

    #[test]
    fn test_focus_wraps_and_navigation_resets_it() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.focus, 3);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focus, 0);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.focus, 0);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.exam.current_index(), 0);
    }
}
