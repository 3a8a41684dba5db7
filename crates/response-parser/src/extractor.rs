use std::ops::Range;

use analysis_core::{ExtractionMethod, MetricsPayload, ParsedAnalysis};
use serde_json::{Map, Value};

use crate::metrics::decode_metrics;
use crate::normalizer::normalize;
use crate::scanner::{fenced_blocks, object_spans};

/// Shown when the model returned nothing but JSON (or nothing at all)
pub const NO_ANALYSIS_TEXT: &str = "No analysis available.";

/// Keys that mark an inline object as the metrics block
pub const SIGNATURE_KEYS: &[&str] = &["buySellScore", "globalRiskScore", "riskScore"];

/// Split one raw model response into display text and metrics.
///
/// Tries, in order: a fenced code block, an object closing the response, and
/// an inline object carrying a signature key. When none parses, the whole
/// response becomes the display text and the metrics are empty.
pub fn extract(raw: &str) -> ParsedAnalysis {
    if let Some((object, span)) = from_fenced_block(raw) {
        tracing::debug!("Parsed metrics from fenced block");
        return finish(splice_out(raw, span), object, ExtractionMethod::Fenced);
    }

    if let Some((object, start)) = from_trailing_object(raw) {
        tracing::debug!("Parsed metrics from trailing object");
        return finish(raw[..start].to_string(), object, ExtractionMethod::Trailing);
    }

    if let Some((object, span)) = from_signature_object(raw) {
        tracing::debug!("Parsed metrics from inline signature object");
        return finish(splice_out(raw, span), object, ExtractionMethod::Signature);
    }

    tracing::warn!(
        "No metrics JSON recoverable from model response ({} chars)",
        raw.len()
    );
    ParsedAnalysis {
        display_text: display_or_placeholder(&normalize(raw)),
        metrics: MetricsPayload::Empty,
        raw_metrics: Map::new(),
        extraction: ExtractionMethod::None,
    }
}

fn finish(display: String, object: Map<String, Value>, method: ExtractionMethod) -> ParsedAnalysis {
    let metrics = decode_metrics(&object);
    ParsedAnalysis {
        display_text: display_or_placeholder(&normalize(&display)),
        metrics,
        raw_metrics: object,
        extraction: method,
    }
}

fn display_or_placeholder(text: &str) -> String {
    if text.is_empty() {
        NO_ANALYSIS_TEXT.to_string()
    } else {
        text.to_string()
    }
}

fn splice_out(raw: &str, span: Range<usize>) -> String {
    let mut out = String::with_capacity(raw.len() - span.len());
    out.push_str(&raw[..span.start]);
    out.push_str(&raw[span.end..]);
    out
}

/// Only JSON objects count; arrays and scalars are not a metrics block
fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn from_fenced_block(raw: &str) -> Option<(Map<String, Value>, Range<usize>)> {
    for block in fenced_blocks(raw) {
        match parse_object(&raw[block.body.clone()]) {
            Some(object) => return Some((object, block.span)),
            None => tracing::debug!(
                "Fenced block (tag {:?}) is not a JSON object",
                block.tag
            ),
        }
    }
    None
}

fn from_trailing_object(raw: &str) -> Option<(Map<String, Value>, usize)> {
    let end = raw.trim_end().len();
    if !raw[..end].ends_with('}') {
        return None;
    }

    let trailing = &raw[..end];
    object_spans(trailing)
        .into_iter()
        .filter(|span| span.end == end)
        .find_map(|span| parse_object(&trailing[span.clone()]).map(|object| (object, span.start)))
}

fn from_signature_object(raw: &str) -> Option<(Map<String, Value>, Range<usize>)> {
    for span in object_spans(raw) {
        let candidate = &raw[span.clone()];
        if !SIGNATURE_KEYS.iter().any(|k| candidate.contains(k)) {
            continue;
        }
        if let Some(object) = parse_object(candidate) {
            if SIGNATURE_KEYS.iter().any(|k| object.contains_key(*k)) {
                return Some((object, span));
            }
        }
    }
    None
}
