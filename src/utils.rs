use ratatui::text::Text;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Whitespace-separated, non-empty tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Byte offset of the `char_index`-th character, clamped to the end.
pub fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(offset, _)| offset)
}

pub fn insert_char(text: &str, char_index: usize, c: char) -> String {
    let mut updated = text.to_string();
    updated.insert(byte_offset(text, char_index), c);
    updated
}

/// Removes the character before `char_index`, if any.
pub fn remove_char_before(text: &str, char_index: usize) -> String {
    if char_index == 0 {
        return text.to_string();
    }
    let mut updated = text.to_string();
    updated.remove(byte_offset(text, char_index - 1));
    updated
}

/// Visual lines of `text` wrapped at `max_width` columns, as
/// (line_text, start_char, end_char). Explicit newlines always break.
fn simulate_wrapped_lines(text: &str, max_width: usize) -> Vec<(String, usize, usize)> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;
    let mut line_start = 0;
    let mut char_count = 0;

    for (char_idx, ch) in text.chars().enumerate() {
        char_count = char_idx + 1;
        if ch == '\n' {
            lines.push((std::mem::take(&mut current_line), line_start, char_idx));
            current_width = 0;
            line_start = char_idx + 1;
            continue;
        }

        let char_width = ch.width().unwrap_or(1);
        if current_width + char_width > max_width && current_width > 0 {
            lines.push((std::mem::take(&mut current_line), line_start, char_idx));
            current_width = 0;
            line_start = char_idx;
        }
        current_line.push(ch);
        current_width += char_width;
    }

    if !current_line.is_empty() || text.is_empty() || text.ends_with('\n') {
        lines.push((current_line, line_start, char_count));
    }

    lines
}

/// (line, column) of a cursor at `cursor_index` chars into `text` once it is
/// wrapped at `max_width`.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor_index: usize,
    max_width: usize,
) -> (usize, usize) {
    if text.is_empty() || cursor_index == 0 || max_width == 0 {
        return (0, 0);
    }

    let wrapped_lines = simulate_wrapped_lines(text, max_width);
    for (line_idx, (line, start, end)) in wrapped_lines.iter().enumerate() {
        if cursor_index >= *start && cursor_index <= *end {
            let before: String = line.chars().take(cursor_index - start).collect();
            // A cursor sitting exactly on a wrap boundary belongs to the next line.
            if before.width() >= max_width && line_idx + 1 < wrapped_lines.len() {
                continue;
            }
            return (line_idx, before.width());
        }
    }

    let last_idx = wrapped_lines.len().saturating_sub(1);
    let last_width = wrapped_lines.last().map_or(0, |(line, _, _)| line.width());
    (last_idx, last_width)
}

/// Rough number of rows `text` occupies when wrapped at `width`.
pub fn estimate_text_height(text: &Text, width: usize) -> usize {
    if width == 0 {
        return text.lines.len();
    }
    text.lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

pub fn calculate_max_scroll(content_height: usize, visible_height: usize) -> u16 {
    content_height
        .saturating_sub(visible_height)
        .min(u16::MAX as usize) as u16
}
