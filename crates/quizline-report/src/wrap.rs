//! Greedy word wrap by character count.

/// Wrap `text` to lines of at most `width` characters.
///
/// Whitespace runs collapse to a single space. Words longer than `width` are
/// split hard. Always returns at least one line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(width) {
            if line_len > 0 && line_len + 1 + chunk.len() > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(chunk);
            line_len += chunk.len();
        }
    }

    if line_len > 0 || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wrap `text` to `width` and prefix every line with `indent`.
pub fn wrap_indented(text: &str, width: usize, indent: &str) -> Vec<String> {
    let inner = width.saturating_sub(indent.chars().count()).max(1);
    wrap(text, inner)
        .into_iter()
        .map(|line| format!("{indent}{line}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_at_word_boundaries() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(
            lines,
            ["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn long_words_are_split_hard() {
        let lines = wrap("a abcdefghijkl b", 5);
        assert_eq!(lines, ["a", "abcde", "fghij", "kl b"]);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap("", 20), [""]);
        assert_eq!(wrap("   \n ", 20), [""]);
    }

    #[test]
    fn indentation_counts_toward_width() {
        let lines = wrap_indented("one two three", 8, "   ");
        assert_eq!(lines, ["   one", "   two", "   three"]);
    }
}
