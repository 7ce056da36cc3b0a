use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct ExamLayout {
    pub header_area: Rect,
    pub progress_area: Rect,
    pub question_area: Rect,
    pub editor_area: Rect,
    pub help_area: Rect,
    pub footer_area: Rect,
}

pub struct ReviewLayout {
    pub header_area: Rect,
    pub content_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_exam_chunks(area: Rect) -> ExamLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(8),
            Constraint::Length(4),
            Constraint::Length(2),
        ])
        .split(area);

    ExamLayout {
        header_area: chunks[0],
        progress_area: chunks[1],
        question_area: chunks[2],
        editor_area: chunks[3],
        help_area: chunks[4],
        footer_area: chunks[5],
    }
}

pub fn calculate_review_chunks(area: Rect) -> ReviewLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    ReviewLayout {
        header_area: chunks[0],
        content_area: chunks[1],
        footer_area: chunks[2],
    }
}
