//! Normalize — turn a raw block into a de-identified record.
//!
//! Steps, in order: detect the log-line shape and pull the timestamp, strip
//! the per-line timestamp prefix, redact volatile spans to `<name>`
//! placeholders, run the signature's post-process transform, extract fields.

mod post;
mod span;

use std::sync::Arc;

use crate::catalog::{Catalog, LineShape, Signature};
use crate::record::{Block, Record};

pub struct Normalizer {
    catalog: Arc<Catalog>,
}

impl Normalizer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn normalize(&self, block: &Block) -> Record {
        let sig = &self.catalog.signatures[block.signature];
        let shape = self.detect_shape(&block.lines);
        if shape.is_none() {
            tracing::debug!(signature = %sig.name, "no log-line shape matched; timestamp unknown");
        }

        let timestamp = shape.and_then(|shape| extract_timestamp(shape, &block.lines));
        let text = strip_prefixes(shape, &block.lines);
        let text = redact(sig, text);
        let text = match sig.post_process {
            Some(kind) => post::apply(kind, &text),
            None => text,
        };
        let fields = extract_fields(sig, &text);

        Record {
            text,
            timestamp,
            fields,
        }
    }

    /// First shape with at least one matching line in the block.
    fn detect_shape(&self, lines: &[String]) -> Option<&LineShape> {
        self.catalog
            .shapes
            .iter()
            .find(|shape| lines.iter().any(|line| shape.prefix.is_match(line)))
    }
}

/// Timestamp of the first line that belongs to the shape.
fn extract_timestamp(shape: &LineShape, lines: &[String]) -> Option<String> {
    let line = lines.iter().find(|line| shape.prefix.is_match(line))?;
    shape
        .timestamp
        .find(line)
        .map(|m| m.as_str().to_string())
}

/// Remove the shape's leading prefix from every line and rejoin the block.
fn strip_prefixes(shape: Option<&LineShape>, lines: &[String]) -> String {
    match shape {
        Some(shape) => lines
            .iter()
            .map(|line| shape.prefix.replace(line, ""))
            .collect::<Vec<_>>()
            .join("\n"),
        None => lines.join("\n"),
    }
}

/// Apply each redaction pattern once: every named group of its first match
/// is rewritten to a `<name>` placeholder. Replacements are applied from the
/// highest start offset down so earlier spans stay valid.
fn redact(sig: &Signature, text: String) -> String {
    let mut text = text;
    for pattern in &sig.redact {
        let Some(caps) = pattern.captures(&text) else {
            continue;
        };
        let mut spans = Vec::new();
        for name in pattern.capture_names().flatten() {
            if let Some(group) = caps.name(name) {
                spans.push((group.range(), format!("<{name}>")));
            }
        }
        if !spans.is_empty() {
            text = span::replace_spans(&text, spans);
        }
    }
    text
}

/// Static defaults first, then each field pattern in order; named groups of
/// a later match overwrite earlier values.
fn extract_fields(
    sig: &Signature,
    text: &str,
) -> std::collections::BTreeMap<String, String> {
    let mut fields = sig.defaults.clone();
    for pattern in &sig.fields {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        for name in pattern.capture_names().flatten() {
            if let Some(group) = caps.name(name) {
                fields.insert(name.to_string(), group.as_str().to_string());
            }
        }
    }
    fields
}
