#[cfg(test)]
mod ui_integration_tests {
    use crate::bank::QuestionBank;
    use crate::models::AppState;
    use crate::session::{handle_key, ExamApp};
    use crate::ui::{draw_exam, draw_quit_confirmation, draw_review, draw_submit_confirmation};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(110, 45)).unwrap()
    }

    fn draw(terminal: &mut Terminal<TestBackend>, app: &mut ExamApp) -> String {
        terminal
            .draw(|f| match app.state {
                AppState::Exam => draw_exam(f, app),
                AppState::SubmitConfirm => draw_submit_confirmation(
                    f,
                    app.exam.answered_count(),
                    app.exam.question_count(),
                ),
                AppState::QuitConfirm => draw_quit_confirmation(f),
                AppState::Review => draw_review(f, app),
            })
            .unwrap();
        screen(terminal)
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn press(app: &mut ExamApp, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::empty()));
    }

    fn ctrl(app: &mut ExamApp, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn builtin_app() -> ExamApp {
        ExamApp::new(QuestionBank::builtin().unwrap())
    }

    #[test]
    fn test_first_question_screen() {
        let mut terminal = terminal();
        let mut app = builtin_app();
        let out = draw(&mut terminal, &mut app);

        assert!(out.contains("Data Annotation Practice Exam"));
        assert!(out.contains("0 / 47 answered"));
        assert!(out.contains("Question 1 of 47"));
        assert!(out.contains("( ) 2. O(log n)"));
        assert!(out.contains("PgDn"));
        assert!(!out.contains("Ctrl+S"));
    }

    #[test]
    fn test_selection_is_shown_and_counted() {
        let mut terminal = terminal();
        let mut app = builtin_app();
        press(&mut app, KeyCode::Char('2'));
        let out = draw(&mut terminal, &mut app);

        assert!(out.contains("(•) 2. O(log n)"));
        assert!(out.contains("1 / 47 answered"));
    }

    #[test]
    fn test_last_question_offers_submit() {
        let mut terminal = terminal();
        let mut app = builtin_app();
        while !app.exam.is_last() {
            press(&mut app, KeyCode::PageDown);
        }
        let out = draw(&mut terminal, &mut app);
        assert!(out.contains("Question 47 of 47"));
        assert!(out.contains("Ctrl+S"));
    }

    #[test]
    fn test_typed_text_appears_in_editor() {
        let mut terminal = terminal();
        let mut app = builtin_app();
        while app.exam.current_index() < 36 {
            press(&mut app, KeyCode::PageDown);
        }
        for c in "def solve():".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let out = draw(&mut terminal, &mut app);
        assert!(out.contains("def solve():"));
    }

    #[test]
    fn test_submit_and_review_flow() {
        let mut terminal = terminal();
        let mut app = builtin_app();
        press(&mut app, KeyCode::Char('1'));
        while !app.exam.is_last() {
            press(&mut app, KeyCode::PageDown);
        }
        ctrl(&mut app, 's');
        let out = draw(&mut terminal, &mut app);
        assert!(out.contains("Submit Exam"));
        assert!(out.contains("You have answered 1 of 47 questions."));

        press(&mut app, KeyCode::Char('y'));
        let out = draw(&mut terminal, &mut app);
        assert!(out.contains("Exam Complete - Review Your Answers Below"));
        assert!(out.contains("1. O(1)  [Your Answer]"));
        assert!(out.contains("2. O(log n)  [Correct Answer]"));
        assert!(out.contains("Retake Exam"));
    }

    #[test]
    fn test_review_scroll_is_clamped() {
        let mut terminal = terminal();
        let mut app = builtin_app();
        app.exam.submit();
        app.state = AppState::Review;
        app.review_scroll_y = u16::MAX;
        draw(&mut terminal, &mut app);

        let clamped = app.review_scroll_y;
        assert!(clamped > 0 && clamped < u16::MAX);
        press(&mut app, KeyCode::Down);
        draw(&mut terminal, &mut app);
        assert_eq!(app.review_scroll_y, clamped);
    }

    #[test]
    fn test_quit_confirmation_screen() {
        let mut terminal = terminal();
        let mut app = builtin_app();
        press(&mut app, KeyCode::Esc);
        let out = draw(&mut terminal, &mut app);
        assert!(out.contains("Quit Exam"));
        assert!(out.contains("No (Continue Exam)"));
    }

    #[test]
    fn test_unknown_question_type_renders_placeholder() {
        let json = r#"[{"id": 1, "type": "drawing", "category": "Art", "prompt": "Draw a cat"}]"#;
        let mut terminal = terminal();
        let mut app = ExamApp::new(QuestionBank::from_json(json).unwrap());
        let out = draw(&mut terminal, &mut app);
        assert!(out.contains("Unknown question type"));
        assert!(out.contains("Draw a cat"));

        press(&mut app, KeyCode::Char('x'));
        assert!(app.exam.current_answer().is_none());

        ctrl(&mut app, 's');
        press(&mut app, KeyCode::Char('y'));
        let out = draw(&mut terminal, &mut app);
        assert!(out.contains("This question type is not supported"));
    }
}
