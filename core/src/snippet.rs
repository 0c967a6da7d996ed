//! Result previews: a window of text around the earliest query-term match.
//!
//! Offsets and widths are counted in characters, never bytes, so a window
//! can not split a multi-byte character.

/// Characters kept on each side of the anchor.
pub const SNIPPET_CONTEXT: usize = 80;
pub const ELLIPSIS: &str = "...";

/// Build a preview of `content` anchored at the first case-insensitive
/// occurrence of any of `terms`, or at the start when none occurs.
pub fn extract_snippet<S: AsRef<str>>(content: &str, terms: &[S]) -> String {
    if content.is_empty() || terms.is_empty() {
        return String::new();
    }
    // ASCII lowering keeps byte offsets identical to `content`.
    let lowered = content.to_ascii_lowercase();
    let first_byte = terms
        .iter()
        .map(|t| t.as_ref().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .filter_map(|t| lowered.find(&t))
        .min()
        .unwrap_or(0);
    let offset = content[..first_byte].chars().count();
    window(content, offset, SNIPPET_CONTEXT)
}

/// Characters `[offset - context, offset + context)` clamped to the content,
/// with [`ELLIPSIS`] marking each side that was cut.
pub fn window(content: &str, offset: usize, context: usize) -> String {
    let total = content.chars().count();
    if offset >= total {
        return String::new();
    }
    let start = offset.saturating_sub(context);
    let end = offset.saturating_add(context).min(total);

    let mut out = String::with_capacity(end - start + 2 * ELLIPSIS.len());
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.extend(content.chars().skip(start).take(end - start));
    if end < total {
        out.push_str(ELLIPSIS);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_returned_whole() {
        assert_eq!(extract_snippet("Rust is fun", &["fun"]), "Rust is fun");
    }

    #[test]
    fn empty_inputs_give_empty_snippet() {
        assert_eq!(extract_snippet("", &["rust"]), "");
        assert_eq!(extract_snippet::<&str>("some text", &[]), "");
    }

    #[test]
    fn match_in_the_middle_is_cut_both_sides() {
        let content = format!("{}needle{}", "a".repeat(100), "b".repeat(200));
        let snippet = extract_snippet(&content, &["needle"]);
        let expected = format!("...{}needle{}...", "a".repeat(80), "b".repeat(74));
        assert_eq!(snippet, expected);
    }

    #[test]
    fn no_match_anchors_at_start() {
        let content = "x".repeat(200);
        let snippet = extract_snippet(&content, &["absent"]);
        assert_eq!(snippet, format!("{}...", "x".repeat(80)));
    }

    #[test]
    fn earliest_term_wins() {
        let content = format!("{}second {}first", "-".repeat(10), "-".repeat(200));
        // "second" occurs earlier in the text even though it is listed last.
        let snippet = extract_snippet(&content, &["first", "second"]);
        assert!(snippet.starts_with(&"-".repeat(10)));
        assert!(snippet.ends_with(ELLIPSIS));
    }

    #[test]
    fn matching_ignores_case() {
        let content = format!("{}Needle", " ".repeat(120));
        let snippet = extract_snippet(&content, &["needle"]);
        assert!(snippet.starts_with(ELLIPSIS));
        assert!(snippet.ends_with("Needle"));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let content = format!("{}target", "é".repeat(100));
        let snippet = extract_snippet(&content, &["target"]);
        assert_eq!(snippet, format!("...{}target", "é".repeat(80)));
    }

    #[test]
    fn window_clamps_and_rejects_out_of_range() {
        assert_eq!(window("abcdef", 2, 1), "...bc...");
        assert_eq!(window("abcdef", 0, 10), "abcdef");
        assert_eq!(window("abcdef", 6, 3), "");
    }
}
