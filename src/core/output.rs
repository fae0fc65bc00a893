//! Compact output rendering helpers for CLI surfaces.
//!
//! Keeps card titles and descriptions bounded to one terminal line.

/// Single-line preview of a board, column or card title (or a card
/// description): whitespace runs become one space and anything past
/// `max_chars` characters is replaced by `...`.
pub fn compact_line(text: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(text.len().min(max_chars + 3));
    for (taken, word) in text.split_whitespace().enumerate() {
        if taken > 0 {
            out.push(' ');
        }
        out.push_str(word);
    }
    match out.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            out.truncate(cut);
            out.push_str("...");
            out
        }
        None => out,
    }
}

/// `"<count> <noun>"` with a naive plural.
pub fn counted(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
