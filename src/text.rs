//! Text normalization helpers shared by the segmenters.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Collapse every whitespace run to a single space, trim, and NFC-normalize.
pub fn collapse_whitespace(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a section body while keeping its line structure.
///
/// Each line has its whitespace runs collapsed and is trimmed; runs of
/// blank lines shrink to a single blank line and leading/trailing blank
/// lines are removed. Markdown tables therefore stay one row per line.
pub fn normalize_whitespace(text: &str) -> String {
    let composed: String = text.nfc().collect();
    let mut lines: Vec<String> = Vec::new();
    let mut pending_blank = false;

    for line in composed.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push(String::new());
            pending_blank = false;
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Fold text for keyword matching: strip accents and upper-case.
///
/// "Capítulo técnico" folds to "CAPITULO TECNICO".
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}

/// First `max_chars` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Whether the text has at least one cased letter and no lower-case letter.
pub fn is_all_upper(text: &str) -> bool {
    let mut has_upper = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\t c  "), "a b c");
        assert_eq!(collapse_whitespace("\n \t"), "");
    }

    #[test]
    fn test_normalize_whitespace_keeps_lines() {
        let body = "\n\n[TABLE DETECTED]:\n| a | b |\n| --- | --- |\n\n\n\nuno  dos \n tres\n";
        assert_eq!(
            normalize_whitespace(body),
            "[TABLE DETECTED]:\n| a | b |\n| --- | --- |\n\nuno dos\ntres"
        );
        assert_eq!(normalize_whitespace("\n \t\n"), "");
    }

    #[test]
    fn test_normalize_composes_accents() {
        // 'e' followed by a combining acute accent
        let decomposed = "Te\u{301}cnico";
        assert_eq!(collapse_whitespace(decomposed), "Técnico");
    }

    #[test]
    fn test_fold_strips_accents() {
        assert_eq!(fold("Capítulo técnico"), "CAPITULO TECNICO");
        assert_eq!(fold("JURÍDICO"), "JURIDICO");
        assert_eq!(fold("Constitución"), "CONSTITUCION");
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("añoxyz", 3), "año");
        assert_eq!(truncate_chars("ab", 10), "ab");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn test_is_all_upper() {
        assert!(is_all_upper("CAPITULO 1"));
        assert!(is_all_upper("ÍNDICE"));
        assert!(!is_all_upper("Capitulo"));
        assert!(!is_all_upper("1.2.3"));
    }
}
