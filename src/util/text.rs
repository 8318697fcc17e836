// src/util/text.rs

/// First non-empty line of a text, trimmed and cut to `max_chars` characters.
///
/// An ellipsis is appended when the line was cut or further lines follow.
///
/// # Examples
///
/// ```
/// use notesapp::util::text::summary_line;
///
/// assert_eq!(summary_line("Milk, eggs\nBread", 40), "Milk, eggs…");
/// ```
pub fn summary_line(text: &str, max_chars: usize) -> String {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let first = match lines.next() {
        Some(line) => line,
        None => return String::new(),
    };

    let truncated = first.chars().count() > max_chars;
    let mut out: String = first.chars().take(max_chars).collect();
    if truncated || lines.next().is_some() {
        out.push('…');
    }
    out
}
