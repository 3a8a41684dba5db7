//! Repairs the "fake bold" artifacts models emit instead of `**bold**`.
//!
//! `normalize` is idempotent. Apostrophe runs are only ever removed whole and
//! replaced by `**`, so runs never merge or change length between passes.

use std::ops::Range;

const BOLD: &str = "**";

/// Normalize emphasis markup and trim the result
pub fn normalize(text: &str) -> String {
    let text = wrap_runs(text, 5, true);
    let text = wrap_runs(&text, 2, false);
    let text = space_after_bold(&text);
    text.trim().to_string()
}

/// Maximal runs of `'` in `text`
fn apostrophe_runs(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            let start = i;
            while i < bytes.len() && bytes[i] == b'\'' {
                i += 1;
            }
            runs.push(start..i);
        } else {
            i += 1;
        }
    }
    runs
}

/// Replace paired apostrophe runs of exactly `len` with `**`.
///
/// With `across_lines`, pairs are consecutive runs of that length regardless
/// of what lies between them. Otherwise both runs must be neighbours in the
/// run sequence with no newline between them.
fn wrap_runs(text: &str, len: usize, across_lines: bool) -> String {
    let runs = apostrophe_runs(text);
    let mut pairs: Vec<(Range<usize>, Range<usize>)> = Vec::new();

    if across_lines {
        let matching: Vec<&Range<usize>> = runs.iter().filter(|r| r.len() == len).collect();
        for pair in matching.chunks_exact(2) {
            pairs.push((pair[0].clone(), pair[1].clone()));
        }
    } else {
        let mut i = 0;
        while i < runs.len() {
            let open = &runs[i];
            if open.len() == len {
                if let Some(close) = runs.get(i + 1) {
                    if close.len() == len && !text[open.end..close.start].contains('\n') {
                        pairs.push((open.clone(), close.clone()));
                        i += 2;
                        continue;
                    }
                }
            }
            i += 1;
        }
    }

    if pairs.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (open, close) in pairs {
        out.push_str(&text[cursor..open.start]);
        out.push_str(BOLD);
        out.push_str(&text[open.end..close.start]);
        out.push_str(BOLD);
        cursor = close.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Insert a space after each closing `**` that runs straight into a word
fn space_after_bold(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 8);
    let mut cursor = 0;
    let mut open = false;
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'*' {
            i += 2;
            if open {
                let next = text[i..].chars().next();
                if matches!(next, Some(c) if !c.is_whitespace()) {
                    out.push_str(&text[cursor..i]);
                    out.push(' ');
                    cursor = i;
                }
            }
            open = !open;
        } else {
            i += 1;
        }
    }

    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_apostrophes_become_bold() {
        assert_eq!(
            normalize("Some analysis ''highlighted phrase'' more text."),
            "Some analysis **highlighted phrase** more text."
        );
    }

    #[test]
    fn test_five_apostrophes_become_bold_across_lines() {
        assert_eq!(
            normalize("'''''Key\nLevels''''' ahead"),
            "**Key\nLevels** ahead"
        );
    }

    #[test]
    fn test_double_apostrophes_do_not_cross_newlines() {
        let text = "a ''first\nsecond'' b";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_other_run_lengths_untouched() {
        assert_eq!(normalize("it's '''odd''' here"), "it's '''odd''' here");
    }

    #[test]
    fn test_space_inserted_after_closing_bold() {
        assert_eq!(normalize("**Support**at 100"), "**Support** at 100");
        assert_eq!(normalize("**Trend**: up"), "**Trend** : up");
        assert_eq!(normalize("**ok** fine"), "**ok** fine");
    }

    #[test]
    fn test_opening_marker_not_spaced() {
        assert_eq!(normalize("a **b** c **d"), "a **b** c **d");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize("\n\n  body  \n"), "body");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_idempotent_on_tricky_inputs() {
        let samples = [
            "",
            "plain",
            "''a'' ''b'' ''c",
            "'''''''x'' y '''''",
            "'''''a''''' '''''b",
            "**a***b**c",
            "**a****b",
            "''x''**y**z ''' '''' '''''",
            "line one ''bold''\n\n'''''multi\nline'''''tail",
            "émoji ''naïve''😀**ß**ü",
            "''\n''",
            "*",
            "**",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
