//! Locating a JSON object inside free-form model output.

/// Returns the first balanced `{...}` substring of `text`.
///
/// Braces inside JSON strings are ignored, and backslash escapes inside
/// strings are honoured. If an opening brace never closes, the search
/// resumes at the next opening brace.
///
/// ```rust
/// use inventory_advisor::extract_json_object;
///
/// let reply = "Sure! Here is the analysis: {\"dataQualityScore\": 0.8} Hope it helps.";
/// assert_eq!(extract_json_object(reply), Some("{\"dataQualityScore\": 0.8}"));
/// ```
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut offset = 0;

    while let Some(start) = text[offset..].find('{').map(|idx| idx + offset) {
        if let Some(end) = balanced_end(&text[start..]) {
            return Some(&text[start..start + end]);
        }
        offset = start + 1;
    }

    None
}

/// Byte length of the balanced object starting at the first byte of `text`.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_object() {
        assert_eq!(extract_json_object(r#"{"a":1}"#), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_nested_object_with_surrounding_text() {
        let text = r#"Result: {"a": {"b": [1, {"c": 2}]}} and {"second": true}"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"a": {"b": [1, {"c": 2}]}}"#)
        );
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"{"msg": "use } and { freely", "q": "say \"}\""}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_markdown_fence() {
        let text = "```json\n{\"suggestions\": []}\n```";
        assert_eq!(extract_json_object(text), Some("{\"suggestions\": []}"));
    }

    #[test]
    fn test_unclosed_brace_is_skipped() {
        assert_eq!(extract_json_object("{ oops {\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(extract_json_object("{\"a\":1} {"), Some("{\"a\":1}"));
    }

    #[test]
    fn test_no_object() {
        assert_eq!(extract_json_object("I cannot help with that."), None);
        assert_eq!(extract_json_object("}{"), None);
    }

    #[test]
    fn test_multibyte_text() {
        let text = "Qualità: {\"note\": \"pietra ✓\"} fine";
        assert_eq!(extract_json_object(text), Some("{\"note\": \"pietra ✓\"}"));
    }
}
