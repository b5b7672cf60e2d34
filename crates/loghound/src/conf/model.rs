//! Model — ScanConfig and related structs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Declarative scan configuration: log-line shapes plus an ordered list of
/// crash signatures. Order matters — the first signature whose `begin`
/// pattern matches a line wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub logline: Vec<LineShapeConfig>,
    #[serde(default)]
    pub signature: Vec<SignatureConfig>,
}

/// One recognizable log-line format: how to spot a line belonging to it and
/// how to pull the leading timestamp out of such a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineShapeConfig {
    pub format: String,
    pub prefix: String,
    pub timestamp: String,
}

/// One crash/anomaly category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureConfig {
    pub name: String,
    /// Marks the first line of an occurrence.
    pub begin: String,
    /// Informational only; `begin` is authoritative.
    #[serde(default)]
    pub key: Option<String>,
    /// A line continues the block if it matches at least one of these.
    pub lines: Vec<String>,
    /// Explicit terminator; a matching line is excluded from the block.
    #[serde(default)]
    pub end: Option<String>,
    /// Static field values merged into every record of this category.
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    /// Field-extraction patterns, applied in order; later matches overwrite.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Redaction patterns; named groups are rewritten to `<name>`.
    #[serde(default)]
    pub redact: Vec<String>,
    /// Named category-specific text transform.
    #[serde(default)]
    pub post_process: Option<String>,
}

impl ScanConfig {
    /// Validate structural requirements (pattern compilation is checked
    /// separately when the catalog is built).
    pub fn validate(&self) -> Result<(), String> {
        if self.logline.is_empty() {
            return Err("at least one [[logline]] shape is required".to_string());
        }
        if self.signature.is_empty() {
            return Err("at least one [[signature]] is required".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for sig in &self.signature {
            if sig.name.is_empty() {
                return Err("signature name must not be empty".to_string());
            }
            if !seen.insert(sig.name.as_str()) {
                return Err(format!("duplicate signature name '{}'", sig.name));
            }
            if sig.begin.is_empty() {
                return Err(format!("signature '{}': begin must not be empty", sig.name));
            }
            if sig.lines.is_empty() {
                return Err(format!(
                    "signature '{}': at least one continuation pattern is required",
                    sig.name
                ));
            }
        }

        for shape in &self.logline {
            if shape.prefix.is_empty() || shape.timestamp.is_empty() {
                return Err(format!(
                    "logline shape '{}': prefix and timestamp must not be empty",
                    shape.format
                ));
            }
        }

        Ok(())
    }
}
