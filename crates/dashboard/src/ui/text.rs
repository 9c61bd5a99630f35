const TAB_WIDTH: usize = 4;

/// Wraps on word boundaries; words longer than `width` are split.
pub(crate) fn wrap_text_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in raw.split(' ') {
            let word_width = display_width(word);
            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + 1 + word_width
            };
            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width = needed;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > width {
                let rest = chars.split_off(width);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            current = chars.into_iter().collect();
            current_width = display_width(&current);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Strips escape sequences and control characters from pasted logs so they
/// cannot move the cursor or recolor the dashboard.
pub(crate) fn sanitize_text_for_tui(text: &str) -> String {
    let stripped = strip_ansi_sequences(text);
    let mut out = String::with_capacity(stripped.len());
    let mut col = 0usize;
    for ch in stripped.chars() {
        match ch {
            '\n' | '\r' => {
                out.push('\n');
                col = 0;
            }
            '\t' => {
                let spaces = TAB_WIDTH - col % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(spaces));
                col += spaces;
            }
            _ if ch.is_control() => {
                out.push(' ');
                col += 1;
            }
            _ => {
                out.push(ch);
                col += 1;
            }
        }
    }
    out
}

fn strip_ansi_sequences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\u{1b}' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('[') => {
                chars.next();
                for seq_ch in chars.by_ref() {
                    if ('@'..='~').contains(&seq_ch) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(seq_ch) = chars.next() {
                    if seq_ch == '\u{7}' {
                        break;
                    }
                    if seq_ch == '\u{1b}' {
                        if chars.peek() == Some(&'\\') {
                            chars.next();
                        }
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}

pub(crate) fn display_width(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn pad_right(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    let current = display_width(text);
    if current < width {
        out.extend(std::iter::repeat(' ').take(width - current));
    }
    out
}

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if display_width(text) <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return text.chars().take(max_len).collect();
    }
    let mut out: String = text.chars().take(max_len - 3).collect();
    out.push_str("...");
    out
}

/// Collapses all whitespace runs so multi-line input fits one table row.
pub(crate) fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_words() {
        let lines = wrap_text_lines("do not click the link", 10);
        assert_eq!(lines, vec!["do not", "click the", "link"]);
    }

    #[test]
    fn splits_words_longer_than_width() {
        let lines = wrap_text_lines("http://bit.ly/apple-security", 10);
        assert_eq!(lines, vec!["http://bit", ".ly/apple-", "security"]);
    }

    #[test]
    fn keeps_blank_lines() {
        let lines = wrap_text_lines("a\n\nb", 5);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn strips_escape_sequences() {
        let cleaned = sanitize_text_for_tui("\u{1b}[31mFAILED\u{1b}[0m\tlogin\u{7}");
        assert_eq!(cleaned, "FAILED  login ");
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdefgh", 6), "abc...");
        assert_eq!(truncate_with_ellipsis("abc", 6), "abc");
        assert_eq!(truncate_with_ellipsis("abcdef", 2), "ab");
    }

    #[test]
    fn one_line_collapses_whitespace() {
        assert_eq!(one_line("Subject: URGENT\n  Dear  customer"), "Subject: URGENT Dear customer");
        assert_eq!(pad_right("ab", 4), "ab  ");
    }
}
