use crate::form::{ContextBlock, Control, Form};
use crate::models::{Question, QuestionKind};
use crate::session::ExamApp;
use crate::ui::layout::calculate_exam_chunks;
use crate::utils::{calculate_max_scroll, calculate_wrapped_cursor_position, estimate_text_height};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

pub const EXAM_TITLE: &str = "Data Annotation Practice Exam";

pub const FOOTER_TEXT: &str = "Navigate through questions and submit when ready. You can review your answers with detailed explanations after submission. DO NOT USE AI OR EXTERNAL TOOLS WHILE TAKING THE EXAM. You are encouraged to use AI to brush up on topics after taking the exam once on your own. Good luck!";

fn key_span(key: &str) -> Span<'static> {
    Span::styled(
        key.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn push_multiline(text: &mut Text<'static>, content: &str, style: Style) {
    for line in content.lines() {
        text.push_line(Line::from(Span::styled(line.to_string(), style)));
    }
}

/// Question panel content and the line index where the focused control starts.
pub fn question_text(
    question: &Question,
    form: &Form,
    focus: usize,
    number: usize,
    total: usize,
) -> (Text<'static>, usize) {
    let mut text = Text::default();
    text.push_line(Line::from(vec![
        Span::styled(
            question.category.clone(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from("  |  "),
        Span::styled(question.kind.label(), Style::default().fg(Color::Blue)),
        Span::from("  |  "),
        Span::from(format!("Question {} of {}", number, total)),
    ]));
    text.push_line(Line::from(""));
    push_multiline(
        &mut text,
        &question.prompt,
        Style::default().add_modifier(Modifier::BOLD),
    );

    for block in &form.context {
        text.push_line(Line::from(""));
        push_context(&mut text, block);
    }

    text.push_line(Line::from(""));
    let mut focus_line = text.lines.len();
    if form.controls.is_empty() && matches!(question.kind, QuestionKind::NerTagging { .. }) {
        text.push_line(Line::from(Span::styled(
            "(no entities yet, press Ctrl+A to add one)",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    for (i, control) in form.controls.iter().enumerate() {
        let focused = i == focus;
        if focused && !matches!(control, Control::Label { .. }) {
            focus_line = text.lines.len();
        }
        match control {
            Control::Option {
                index,
                text: option,
                selected,
            } => {
                let marker = if *selected { "(•)" } else { "( )" };
                let style = if *selected {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else if focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                text.push_line(Line::from(vec![
                    Span::from(if focused { "> " } else { "  " }),
                    Span::styled(format!("{} {}. {}", marker, index + 1, option), style),
                ]));
            }
            Control::Text {
                label,
                value,
                placeholder,
                ..
            } => {
                let label_style = if focused {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                text.push_line(Line::from(vec![
                    Span::from(if focused { "> " } else { "  " }),
                    Span::styled(label.clone(), label_style),
                ]));
                if value.is_empty() {
                    text.push_line(Line::from(Span::styled(
                        format!("    [{}]", placeholder),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )));
                } else {
                    for line in value.split('\n') {
                        text.push_line(Line::from(format!("    {}", line)));
                    }
                }
            }
            Control::Surface { row, value } => {
                let label_focused = focus == i + 1;
                if label_focused {
                    focus_line = text.lines.len();
                }
                let label = match form.controls.get(i + 1) {
                    Some(Control::Label { value, .. }) => value.clone(),
                    _ => String::new(),
                };
                let surface = if value.is_empty() {
                    "[Entity text]".to_string()
                } else {
                    format!("[{}]", value)
                };
                let label = if label.is_empty() {
                    "<Select label>".to_string()
                } else {
                    format!("<{}>", label)
                };
                let focus_style = Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD);
                text.push_line(Line::from(vec![
                    Span::from(if focused || label_focused { "> " } else { "  " }),
                    Span::from(format!("Row {}: ", row + 1)),
                    Span::styled(
                        surface,
                        if focused { focus_style } else { Style::default() },
                    ),
                    Span::from("  "),
                    Span::styled(
                        label,
                        if label_focused {
                            focus_style
                        } else {
                            Style::default().fg(Color::Blue)
                        },
                    ),
                ]));
            }
            // Drawn on the row line of the preceding surface control.
            Control::Label { .. } => {}
        }
    }

    (text, focus_line)
}

fn push_context(text: &mut Text<'static>, block: &ContextBlock) {
    let muted = Style::default().fg(Color::Gray);
    match block {
        ContextBlock::Constraints(constraints) => {
            text.push_line(heading("Constraints:"));
            for c in constraints {
                text.push_line(Line::from(format!("  • {}", c)));
            }
        }
        ContextBlock::Passage(passage) => {
            text.push_line(heading("Passage:"));
            push_multiline(text, passage, muted);
        }
        ContextBlock::AnnotateText(content) => {
            text.push_line(heading("Text to annotate:"));
            push_multiline(text, content, muted);
        }
        ContextBlock::Labels(labels) => {
            text.push_line(Line::from(vec![
                Span::styled(
                    "Available labels: ",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(labels.join(", "), Style::default().fg(Color::Blue)),
            ]));
        }
        ContextBlock::Case {
            user_prompt,
            model_response,
        } => {
            text.push_line(heading("User Prompt:"));
            push_multiline(text, user_prompt, muted);
            text.push_line(heading("Model Response:"));
            push_multiline(text, model_response, muted);
        }
        ContextBlock::WordLimit { max, min, current } => {
            let limit = match min {
                Some(min) => format!("Word limit: {} words max (minimum {})", max, min),
                None => format!("Word limit: {} words max", max),
            };
            text.push_line(heading(&limit));
            let over = *current > *max as usize;
            text.push_line(Line::from(Span::styled(
                format!("Current: {} words", current),
                if over {
                    Style::default().fg(Color::Yellow)
                } else {
                    muted
                },
            )));
        }
        ContextBlock::CodingInfo {
            language,
            function_name,
        } => {
            text.push_line(Line::from(format!("Language: {}", language)));
            if let Some(name) = function_name {
                text.push_line(Line::from(format!("Function: {}", name)));
            }
        }
        ContextBlock::StarterCode(code) => {
            text.push_line(heading("Starter Code:"));
            push_multiline(text, code, Style::default().fg(Color::Green));
        }
        ContextBlock::Tests(tests) => {
            text.push_line(heading("Test Cases:"));
            for t in tests {
                text.push_line(Line::from(format!("  {}", t)));
            }
        }
        ContextBlock::Unknown(message) => {
            text.push_line(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }
    }
}

/// Scroll offset that keeps the line at `focus_row` (in wrapped rows) visible,
/// with a little context above it.
pub fn focus_scroll(focus_row: usize, content_height: usize, visible_height: usize) -> u16 {
    let wanted = (focus_row + 3).saturating_sub(visible_height) as u16;
    wanted.min(calculate_max_scroll(content_height, visible_height))
}

pub fn draw_exam(f: &mut Frame, app: &mut ExamApp) {
    let layout = calculate_exam_chunks(f.area());
    let total = app.exam.question_count();
    let number = app.exam.current_index() + 1;

    let header = Paragraph::new(format!(
        "{}    {} / {} answered",
        EXAM_TITLE,
        app.exam.answered_count(),
        total
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .ratio(app.exam.progress())
        .label(format!("Question {} of {}", number, total));
    f.render_widget(gauge, layout.progress_area);

    let form = app.form();
    let question = app.exam.current_question();
    let (question_content, focus_line) = question_text(question, &form, app.focus, number, total);

    let visible_height = layout.question_area.height.saturating_sub(2) as usize;
    let text_width = layout.question_area.width.saturating_sub(2) as usize;
    let before = Text::from(question_content.lines[..focus_line].to_vec());
    let focus_row = estimate_text_height(&before, text_width);
    let content_height = estimate_text_height(&question_content, text_width);
    let question_scroll = focus_scroll(focus_row, content_height, visible_height);

    let question_panel = Paragraph::new(question_content)
        .wrap(Wrap { trim: false })
        .scroll((question_scroll, 0))
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question_panel, layout.question_area);

    let focused = form.controls.get(app.focus);
    draw_editor(f, app, focused, layout.editor_area);

    let first = app.exam.is_first();
    let mut nav_spans = vec![
        Span::styled(
            "PgUp",
            if first {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            },
        ),
        Span::styled(
            " Previous  ",
            if first {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            },
        ),
    ];
    if app.exam.is_last() {
        nav_spans.extend([key_span("Ctrl+S"), Span::from(" Submit Exam  ")]);
    } else {
        nav_spans.extend([key_span("PgDn"), Span::from(" Next  ")]);
    }
    nav_spans.extend([
        key_span("Tab/↑/↓"),
        Span::from(" Focus  "),
        key_span("Ctrl+U"),
        Span::from(" Clear  "),
        key_span("Esc"),
        Span::from(" Quit"),
    ]);

    let control_spans = match focused {
        Some(Control::Option { .. }) => vec![
            key_span("Enter/Space/1-9"),
            Span::from(" Select option"),
        ],
        Some(Control::Surface { .. }) | Some(Control::Label { .. }) => vec![
            key_span("Ctrl+A"),
            Span::from(" Add entity  "),
            key_span("Ctrl+D"),
            Span::from(" Remove row  "),
            key_span("←/→"),
            Span::from(" Change label"),
        ],
        Some(control) if control.is_multiline() => vec![
            key_span("←/→"),
            Span::from(" Move cursor  "),
            key_span("Enter"),
            Span::from(" New line"),
        ],
        Some(_) => vec![
            key_span("←/→"),
            Span::from(" Move cursor  "),
            key_span("Enter"),
            Span::from(" Next field"),
        ],
        None if matches!(app.exam.current_question().kind, QuestionKind::NerTagging { .. }) => {
            vec![key_span("Ctrl+A"), Span::from(" Add entity")]
        }
        None => vec![Span::from("Nothing to answer here")],
    };

    let help = Paragraph::new(vec![Line::from(nav_spans), Line::from(control_spans)])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);

    let footer = Paragraph::new(FOOTER_TEXT)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(footer, layout.footer_area);
}

fn draw_editor(
    f: &mut Frame,
    app: &mut ExamApp,
    control: Option<&Control>,
    area: ratatui::layout::Rect,
) {
    let (title, value, placeholder) = match control {
        Some(Control::Text {
            label,
            value,
            placeholder,
            ..
        }) => (label.clone(), Some(value.clone()), *placeholder),
        Some(Control::Surface { row, value }) => (
            format!("Entity {} text", row + 1),
            Some(value.clone()),
            "Entity text",
        ),
        Some(Control::Label { row, value, choices }) => {
            let current = if value.is_empty() {
                "(none)".to_string()
            } else {
                value.clone()
            };
            let body = format!(
                "Label: {}\n\nUse ←/→ or Space to choose one of: {}",
                current,
                choices.join(", ")
            );
            let editor = Paragraph::new(body)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Entity {} label", row + 1)),
                );
            f.render_widget(editor, area);
            return;
        }
        Some(Control::Option { .. }) => {
            let editor = Paragraph::new("Select an option with Enter, Space or its number.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title("Your Answer"));
            f.render_widget(editor, area);
            return;
        }
        None => {
            let editor = Paragraph::new("")
                .block(Block::default().borders(Borders::ALL).title("Your Answer"));
            f.render_widget(editor, area);
            return;
        }
    };
    let value = value.unwrap_or_default();

    let visible_height = area.height.saturating_sub(2) as usize;
    let text_width = area.width.saturating_sub(2) as usize;
    let (cursor_line, cursor_col) =
        calculate_wrapped_cursor_position(&value, app.cursor, text_width);

    // Keep the cursor inside the visible rows.
    let mut new_scroll = app.input_scroll_y as usize;
    if cursor_line < new_scroll {
        new_scroll = cursor_line;
    } else if visible_height > 0 && cursor_line >= new_scroll + visible_height {
        new_scroll = cursor_line + 1 - visible_height;
    }
    app.input_scroll_y = new_scroll as u16;

    let content = if value.is_empty() {
        Text::from(Span::styled(
            format!("[{}]", placeholder),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Text::from(value.clone())
    };

    let editor = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((app.input_scroll_y, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(editor, area);

    let cursor_x = area.x + 1 + cursor_col as u16;
    let cursor_y = area.y + 1 + (cursor_line as u16).saturating_sub(app.input_scroll_y);
    f.set_cursor_position((cursor_x, cursor_y));
}

fn draw_confirmation(f: &mut Frame, title: &str, message: &str, yes: &str, no: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(format!(" {}  ", yes)),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(format!(" {}  ", no)),
        key_span("Ctrl+C"),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

pub fn draw_submit_confirmation(f: &mut Frame, answered: usize, total: usize) {
    let message = format!(
        "You have answered {} of {} questions.\nSubmit the exam and review your answers?",
        answered, total
    );
    draw_confirmation(
        f,
        "Submit Exam",
        &message,
        "Yes (Submit)",
        "No (Keep Working)",
    );
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    draw_confirmation(
        f,
        "Quit Exam",
        "Quit now? Answers are kept in memory only and will be lost.",
        "Yes (Quit)",
        "No (Continue Exam)",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::form;
    use crate::models::{Answer, Entity};

    fn rendered(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_question_text_badges_and_options() {
        let bank = QuestionBank::builtin().unwrap();
        let q = bank.get(0).unwrap();
        let form = form::build(q, Some(&Answer::Choice(1)));
        let (text, focus_line) = question_text(q, &form, 2, 1, 47);
        let lines = rendered(&text);

        assert!(lines[0].contains("Data Structures"));
        assert!(lines[0].contains("multiple choice"));
        assert!(lines[0].contains("Question 1 of 47"));
        assert!(lines.iter().any(|l| l == "  (•) 2. O(log n)"));
        assert_eq!(lines[focus_line], "> ( ) 3. O(n)");
    }

    #[test]
    fn test_question_text_entity_rows() {
        let bank = QuestionBank::builtin().unwrap();
        let q = bank.get(32).unwrap();
        let answer = Answer::Entities(vec![
            Entity::new("Samira", "PERSON"),
            Entity::default(),
        ]);
        let form = form::build(q, Some(&answer));
        let (text, focus_line) = question_text(q, &form, 3, 33, 47);
        let lines = rendered(&text);

        assert!(lines.iter().any(|l| l == "  Row 1: [Samira]  <PERSON>"));
        assert_eq!(lines[focus_line], "> Row 2: [Entity text]  <Select label>");
        assert!(lines.iter().any(|l| l.starts_with("Available labels: PERSON")));
    }

    #[test]
    fn test_question_text_empty_ner_hint() {
        let bank = QuestionBank::builtin().unwrap();
        let q = bank.get(32).unwrap();
        let form = form::build(q, None);
        let (text, _) = question_text(q, &form, 0, 33, 47);
        assert!(rendered(&text).iter().any(|l| l.contains("Ctrl+A")));
    }

    #[test]
    fn test_question_text_writing_word_count() {
        let bank = QuestionBank::builtin().unwrap();
        let q = bank.get(34).unwrap();
        let form = form::build(q, Some(&Answer::Text("a penguin jumps".to_string())));
        let (text, _) = question_text(q, &form, 0, 35, 47);
        let lines = rendered(&text);
        assert!(lines.iter().any(|l| l == "Word limit: 300 words max"));
        assert!(lines.iter().any(|l| l == "Current: 3 words"));
    }

    #[test]
    fn test_focus_scroll() {
        assert_eq!(focus_scroll(2, 50, 20), 0);
        assert_eq!(focus_scroll(30, 50, 20), 13);
        assert_eq!(focus_scroll(49, 50, 20), 30);
    }
}
