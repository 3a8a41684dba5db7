//! Byte-level scanning helpers for locating JSON objects and fenced blocks
//! inside free-form model output.
//!
//! All delimiters searched for here are ASCII, so byte offsets returned by
//! these functions always fall on `char` boundaries of the input `&str`.

use std::ops::Range;

const FENCE: &str = "```";

/// Every balanced `{...}` span in `text`, ordered by start offset.
///
/// One forward pass with a stack of open-brace offsets. Quotes only open a
/// string inside an object, so prose quotes before the JSON are ignored.
/// Braces inside string literals are skipped and backslash escapes are
/// honoured. A raw newline also ends a string.
/// Braces that never close produce no span.
pub fn object_spans(text: &str) -> Vec<Range<usize>> {
    let mut open: Vec<usize> = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (idx, &byte) in text.as_bytes().iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' || byte == b'\n' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(idx),
            b'}' => {
                if let Some(start) = open.pop() {
                    spans.push(start..idx + 1);
                }
            }
            _ => {}
        }
    }

    spans.sort_by_key(|span| span.start);
    spans
}

/// A closed triple-backtick block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Whole block including both fences
    pub span: Range<usize>,
    /// Interior between the info string and the closing fence
    pub body: Range<usize>,
    /// Language tag after the opening fence (`json`, ...), if any
    pub tag: Option<String>,
}

/// All closed fenced blocks in `text`. An unterminated trailing fence is ignored.
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(FENCE) {
        let open = cursor + found;
        let after_open = open + FENCE.len();

        // Only a fence at the start of a line opens a block
        if !starts_line(text, open) {
            cursor = after_open;
            continue;
        }

        let line_end = text[after_open..]
            .find('\n')
            .map(|i| after_open + i)
            .unwrap_or(text.len());
        let info = text[after_open..line_end].trim();

        // `{` right after the fence means the JSON starts on the same line
        let (tag, body_start) = if info.starts_with('{') || info.contains(FENCE) {
            (None, after_open)
        } else if line_end < text.len() {
            let tag = (!info.is_empty()).then(|| info.to_string());
            (tag, line_end + 1)
        } else {
            break;
        };

        let Some(close_rel) = text[body_start..].find(FENCE) else {
            break;
        };
        let close = body_start + close_rel;
        let end = close + FENCE.len();

        blocks.push(FencedBlock {
            span: open..end,
            body: body_start..close,
            tag,
        });
        cursor = end;
    }

    blocks
}

fn starts_line(text: &str, offset: usize) -> bool {
    let before = text[..offset].trim_end_matches(|c| c == ' ' || c == '\t');
    before.is_empty() || before.ends_with('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_text(text: &str) -> Vec<&str> {
        object_spans(text).into_iter().map(|span| &text[span]).collect()
    }

    #[test]
    fn test_object_spans_nested() {
        let text = r#"x {"a": {"b": 1}} y"#;
        assert_eq!(spans_text(text), vec![r#"{"a": {"b": 1}}"#, r#"{"b": 1}"#]);
    }

    #[test]
    fn test_object_spans_ignore_braces_in_strings() {
        let text = r#"{"note": "use } and { freely", "k": "esc \" }"}"#;
        assert_eq!(spans_text(text), vec![text]);
    }

    #[test]
    fn test_object_spans_skip_unclosed() {
        assert!(object_spans(r#"{"buySellScore": 80"#).is_empty());
        assert!(object_spans("abc").is_empty());
        assert!(object_spans("").is_empty());
        assert!(object_spans("} stray").is_empty());
        assert_eq!(spans_text(r#"{ open {"riskScore": 1}"#), vec![r#"{"riskScore": 1}"#]);
    }

    #[test]
    fn test_object_spans_prose_quotes_outside_objects() {
        let text = r#"The 5" screen shows {"riskScore": 2}"#;
        assert_eq!(spans_text(text), vec![r#"{"riskScore": 2}"#]);
    }

    #[test]
    fn test_object_spans_linear_on_unclosed_braces() {
        let text = format!("{}{}", "{".repeat(200_000), "}");
        let spans = object_spans(&text);
        assert_eq!(spans, vec![199_999..200_001]);
    }

    #[test]
    fn test_fenced_blocks_with_and_without_tag() {
        let text = "intro\n```json\n{\"a\":1}\n```\nmid\n```\nplain\n```\n";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].tag.as_deref(), Some("json"));
        assert_eq!(&text[blocks[0].body.clone()], "{\"a\":1}\n");
        assert_eq!(blocks[1].tag, None);
        assert_eq!(&text[blocks[1].body.clone()], "plain\n");
    }

    #[test]
    fn test_fenced_block_inline_json() {
        let text = "see\n```{\"a\":1}``` done";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(&text[blocks[0].body.clone()], "{\"a\":1}");
        assert_eq!(&text[blocks[0].span.clone()], "```{\"a\":1}```");
    }

    #[test]
    fn test_mid_line_fence_does_not_open_block() {
        let text = "Use ``` to fence code.\n\n  ```json\n{\"a\":1}\n```";
        let blocks = fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].tag.as_deref(), Some("json"));
        assert_eq!(&text[blocks[0].body.clone()], "{\"a\":1}\n");
    }

    #[test]
    fn test_unterminated_fence_ignored() {
        assert!(fenced_blocks("body\n```json\n{\"a\":1}").is_empty());
    }
}
