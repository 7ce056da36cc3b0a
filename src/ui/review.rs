use crate::review::{self, ReviewBody, ReviewEntry, BLANK, NO_ANSWER};
use crate::session::ExamApp;
use crate::ui::layout::calculate_review_chunks;
use crate::utils::{calculate_max_scroll, estimate_text_height};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn bold(text: String) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn push_indented(text: &mut Text<'static>, content: &str, indent: &str, style: Style) {
    for line in content.lines() {
        text.push_line(Line::from(Span::styled(format!("{}{}", indent, line), style)));
    }
}

/// Full review document for a submitted exam.
pub fn review_text(entries: &[ReviewEntry], answered: usize, total: usize) -> Text<'static> {
    let mut text = Text::default();
    text.push_line(Line::from(format!(
        "You answered {} of {} questions.",
        answered, total
    )));
    text.push_line(Line::from(""));

    for entry in entries {
        push_entry(&mut text, entry);
    }
    text
}

fn push_entry(text: &mut Text<'static>, entry: &ReviewEntry) {
    let correct_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let answer_style = Style::default().fg(Color::Yellow);
    let missing_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    text.push_line(Line::from(vec![
        Span::styled(
            format!("Question {}", entry.number),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from("  "),
        Span::styled(entry.category.clone(), Style::default().fg(Color::Magenta)),
        Span::from(" | "),
        Span::styled(entry.type_label.clone(), Style::default().fg(Color::Blue)),
    ]));
    push_indented(
        text,
        &entry.prompt,
        "",
        Style::default().add_modifier(Modifier::BOLD),
    );
    text.push_line(Line::from(""));

    match &entry.body {
        ReviewBody::Choice(options) => {
            for (i, option) in options.iter().enumerate() {
                let mut spans = vec![Span::styled(
                    format!("  {}. {}", i + 1, option.text),
                    if option.correct {
                        correct_style
                    } else {
                        Style::default()
                    },
                )];
                if option.correct {
                    spans.push(Span::styled("  [Correct Answer]", correct_style));
                }
                if option.picked {
                    spans.push(Span::styled(
                        "  [Your Answer]",
                        if option.correct {
                            correct_style
                        } else {
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                        },
                    ));
                }
                text.push_line(Line::from(spans));
            }
            if !options.iter().any(|o| o.picked) {
                text.push_line(Line::from(Span::styled(
                    format!("  Your Answer: {}", NO_ANSWER),
                    missing_style,
                )));
            }
        }
        ReviewBody::Positional(items) => {
            for item in items {
                text.push_line(bold(format!("  {}", item.prompt)));
                match &item.answer {
                    Some(answer) => {
                        text.push_line(Line::from("    Your Answer:"));
                        push_indented(text, answer, "      ", answer_style);
                    }
                    None => text.push_line(Line::from(Span::styled(
                        format!("    Your Answer: {}", NO_ANSWER),
                        missing_style,
                    ))),
                }
                if let Some(expected) = &item.expected {
                    text.push_line(Line::from(Span::styled(
                        format!("    Expected: {}", expected),
                        correct_style,
                    )));
                }
                if !item.key_points.is_empty() {
                    text.push_line(Line::from("    Key points:"));
                    for point in &item.key_points {
                        text.push_line(Line::from(Span::styled(
                            format!("      • {}", point),
                            Style::default().fg(Color::Green),
                        )));
                    }
                }
            }
        }
        ReviewBody::Entities { entered, expected } => {
            text.push_line(bold("  Your Entities:".to_string()));
            if entered.is_empty() {
                text.push_line(Line::from(Span::styled(
                    format!("    {}", NO_ANSWER),
                    missing_style,
                )));
            }
            for entity in entered {
                let surface = if entity.surface.is_empty() {
                    BLANK
                } else {
                    entity.surface.as_str()
                };
                let label = if entity.label.is_empty() {
                    BLANK
                } else {
                    entity.label.as_str()
                };
                text.push_line(Line::from(Span::styled(
                    format!("    {} -> {}", surface, label),
                    answer_style,
                )));
            }
            text.push_line(bold("  Expected Entities:".to_string()));
            for entity in expected {
                text.push_line(Line::from(Span::styled(
                    format!("    {} -> {}", entity.surface, entity.label),
                    Style::default().fg(Color::Green),
                )));
            }
        }
        ReviewBody::FreeText(answer) => match answer {
            Some(answer) => {
                text.push_line(Line::from("  Your Answer:"));
                push_indented(text, answer, "    ", answer_style);
            }
            None => text.push_line(Line::from(Span::styled(
                format!("  Your Answer: {}", NO_ANSWER),
                missing_style,
            ))),
        },
        ReviewBody::Unknown => {
            text.push_line(Line::from(Span::styled(
                "  This question type is not supported and could not be answered.",
                Style::default().fg(Color::Red),
            )));
        }
    }

    for (title, items) in &entry.expectations {
        text.push_line(bold(format!("  {}:", title)));
        for item in items {
            text.push_line(Line::from(Span::styled(
                format!("    • {}", item),
                Style::default().fg(Color::Green),
            )));
        }
    }

    if let Some(explanation) = &entry.explanation {
        text.push_line(Line::from(Span::styled(
            "  Explanation:",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        push_indented(text, explanation, "    ", Style::default().fg(Color::Gray));
    }
    text.push_line(Line::from(""));
}

pub fn draw_review(f: &mut Frame, app: &mut ExamApp) {
    let layout = calculate_review_chunks(f.area());

    let header = Paragraph::new(vec![
        Line::from("Exam Complete - Review Your Answers Below"),
        Line::from(format!(
            "{} / {} answered",
            app.exam.answered_count(),
            app.exam.question_count()
        )),
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Exam Results"));
    f.render_widget(header, layout.header_area);

    let entries = review::build(&app.exam);
    let content = review_text(
        &entries,
        app.exam.answered_count(),
        app.exam.question_count(),
    );

    let visible_height = layout.content_area.height.saturating_sub(2) as usize;
    let text_width = layout.content_area.width.saturating_sub(2) as usize;
    let content_height = estimate_text_height(&content, text_width);
    let max_scroll = calculate_max_scroll(content_height, visible_height);
    app.review_scroll_y = app.review_scroll_y.min(max_scroll);

    let body = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((app.review_scroll_y, 0))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, layout.content_area);

    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help = Paragraph::new(Line::from(vec![
        Span::styled("↑/↓", key),
        Span::from(" Scroll  "),
        Span::styled("PgUp/PgDn", key),
        Span::from(" Page  "),
        Span::styled("r", key),
        Span::from(" Retake Exam  "),
        Span::styled("q", key),
        Span::from(" Quit"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::models::{Answer, Entity};
    use crate::review::review_question;

    fn lines(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_choice_marks() {
        let bank = QuestionBank::builtin().unwrap();
        let entry = review_question(0, bank.get(0).unwrap(), Some(&Answer::Choice(0)));
        let text = review_text(&[entry], 1, 47);
        let lines = lines(&text);

        assert_eq!(lines[0], "You answered 1 of 47 questions.");
        assert!(lines.iter().any(|l| l == "  1. O(1)  [Your Answer]"));
        assert!(lines.iter().any(|l| l == "  2. O(log n)  [Correct Answer]"));
    }

    #[test]
    fn test_correct_pick_shows_both_marks() {
        let bank = QuestionBank::builtin().unwrap();
        let entry = review_question(0, bank.get(0).unwrap(), Some(&Answer::Choice(1)));
        let lines = lines(&review_text(&[entry], 1, 47));
        assert!(
            lines
                .iter()
                .any(|l| l == "  2. O(log n)  [Correct Answer]  [Your Answer]")
        );
    }

    #[test]
    fn test_unanswered_choice() {
        let bank = QuestionBank::builtin().unwrap();
        let entry = review_question(1, bank.get(1).unwrap(), None);
        let lines = lines(&review_text(&[entry], 0, 47));
        assert!(lines.iter().any(|l| l == "  Your Answer: (no answer)"));
    }

    #[test]
    fn test_entities_and_blank_labels() {
        let bank = QuestionBank::builtin().unwrap();
        let answer = Answer::Entities(vec![Entity::new("Samira", "")]);
        let entry = review_question(32, bank.get(32).unwrap(), Some(&answer));
        let lines = lines(&review_text(&[entry], 1, 47));
        assert!(lines.iter().any(|l| l == "    Samira -> (blank)"));
        assert!(lines.iter().any(|l| l == "  Expected Entities:"));
    }

    #[test]
    fn test_free_text_answer_and_expectations() {
        let bank = QuestionBank::builtin().unwrap();
        let answer = Answer::Text("first\nsecond".to_string());
        let entry = review_question(33, bank.get(33).unwrap(), Some(&answer));
        let lines = lines(&review_text(&[entry], 1, 47));
        assert!(lines.iter().any(|l| l == "    first"));
        assert!(lines.iter().any(|l| l == "    second"));
        assert!(lines.iter().any(|l| l == "  Expected key findings:"));
    }
}
