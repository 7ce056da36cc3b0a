use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use practice_exam::{
    cli::Cli, draw_exam, draw_quit_confirmation, draw_review, draw_submit_confirmation,
    handle_key, logger, utils::truncate_string, AppState, ExamApp, QuestionBank,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

fn print_question_list(bank: &QuestionBank) {
    for (i, question) in bank.iter().enumerate() {
        println!(
            "{:>3}. [{}] {} - {}",
            i + 1,
            question.kind.label(),
            question.category,
            truncate_string(&question.prompt.replace('\n', " "), 70)
        );
    }
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut ExamApp) -> io::Result<()> {
    loop {
        terminal.draw(|f| match app.state {
            AppState::Exam => draw_exam(f, app),
            AppState::SubmitConfirm => {
                draw_submit_confirmation(f, app.exam.answered_count(), app.exam.question_count())
            }
            AppState::QuitConfirm => draw_quit_confirmation(f),
            AppState::Review => draw_review(f, app),
        })?;

        if let Event::Key(key) = event::read()? {
            // Windows reports releases as separate events.
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(app, key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logger::init(&cli.log_file) {
        eprintln!(
            "Warning: could not open log file {}: {}",
            cli.log_file.display(),
            e
        );
    }

    let bank = match &cli.bank {
        Some(path) => QuestionBank::load(path),
        None => QuestionBank::builtin(),
    }
    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    logger::log(&format!("Loaded {} questions", bank.len()));

    if cli.list {
        print_question_list(&bank);
        return Ok(());
    }

    let mut app = ExamApp::new(bank);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    logger::log(&format!(
        "Exiting with {}/{} answered",
        app.exam.answered_count(),
        app.exam.question_count()
    ));
    result
}
