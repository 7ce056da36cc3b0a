pub mod layout;
mod exam;
mod review;

pub use exam::{
    draw_exam, draw_quit_confirmation, draw_submit_confirmation, focus_scroll, question_text,
    EXAM_TITLE, FOOTER_TEXT,
};
pub use layout::{calculate_exam_chunks, calculate_review_chunks};
pub use review::{draw_review, review_text};
