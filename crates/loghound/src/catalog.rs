//! Catalog — the compiled, immutable pattern catalog.
//!
//! Built once from a validated [`ScanConfig`] and shared (via `Arc`) by the
//! scanner and aggregator tasks. Any pattern that fails to compile aborts the
//! load; a scanning session never starts with a half-usable catalog.

use std::collections::BTreeMap;

use regex::Regex;
use thiserror::Error;

use crate::conf::{LineShapeConfig, ScanConfig, SignatureConfig};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid {field} pattern in signature '{name}': {source}")]
    Pattern {
        name: String,
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("invalid {field} pattern in log-line shape '{format}': {source}")]
    Shape {
        format: String,
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("unknown post_process '{value}' in signature '{name}'")]
    UnknownPostProcess { name: String, value: String },
}

/// Category-specific text transforms, dispatched by pattern match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Drop raw register/backtrace dump lines from native crash bodies.
    StripNativeDump,
}

impl PostProcess {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "strip_native_dump" => Some(PostProcess::StripNativeDump),
            _ => None,
        }
    }
}

/// A recognizable log-line format: line membership and timestamp extraction.
#[derive(Debug, Clone)]
pub struct LineShape {
    pub format: String,
    pub prefix: Regex,
    pub timestamp: Regex,
}

/// A compiled crash category.
#[derive(Debug, Clone)]
pub struct Signature {
    pub name: String,
    pub begin: Regex,
    pub line_tags: Vec<Regex>,
    pub end: Option<Regex>,
    pub defaults: BTreeMap<String, String>,
    pub fields: Vec<Regex>,
    pub redact: Vec<Regex>,
    pub post_process: Option<PostProcess>,
}

/// The full compiled catalog. Signature order is preserved from the config
/// and acts as a priority order.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub shapes: Vec<LineShape>,
    pub signatures: Vec<Signature>,
}

impl Catalog {
    /// Compile every pattern in the raw config. Fails fast on the first bad
    /// pattern or unknown post-process name.
    pub fn compile(config: &ScanConfig) -> Result<Self, CatalogError> {
        let shapes = config
            .logline
            .iter()
            .map(compile_shape)
            .collect::<Result<Vec<_>, _>>()?;
        let signatures = config
            .signature
            .iter()
            .map(compile_signature)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { shapes, signatures })
    }

    /// Index of the first signature whose begin pattern matches `line`.
    pub fn match_begin(&self, line: &str) -> Option<usize> {
        self.signatures.iter().position(|sig| sig.begin.is_match(line))
    }

    /// Whether `line` continues a block claimed by `sig`: it matches one of
    /// the signature's continuation tags, is not the signature's explicit
    /// terminator, and does not begin a new occurrence of any category.
    pub fn is_continuation(&self, sig: &Signature, line: &str) -> bool {
        if !sig.line_tags.iter().any(|tag| tag.is_match(line)) {
            return false;
        }
        if let Some(end) = &sig.end {
            if end.is_match(line) {
                return false;
            }
        }
        self.match_begin(line).is_none()
    }
}

fn compile_shape(shape: &LineShapeConfig) -> Result<LineShape, CatalogError> {
    let compile = |field, pattern: &str| {
        Regex::new(pattern).map_err(|source| CatalogError::Shape {
            format: shape.format.clone(),
            field,
            source,
        })
    };
    Ok(LineShape {
        format: shape.format.clone(),
        prefix: compile("prefix", &shape.prefix)?,
        timestamp: compile("timestamp", &shape.timestamp)?,
    })
}

fn compile_signature(sig: &SignatureConfig) -> Result<Signature, CatalogError> {
    let compile = |field, pattern: &str| {
        Regex::new(pattern).map_err(|source| CatalogError::Pattern {
            name: sig.name.clone(),
            field,
            source,
        })
    };

    let post_process = match &sig.post_process {
        Some(value) => Some(PostProcess::from_name(value).ok_or_else(|| {
            CatalogError::UnknownPostProcess {
                name: sig.name.clone(),
                value: value.clone(),
            }
        })?),
        None => None,
    };

    Ok(Signature {
        name: sig.name.clone(),
        begin: compile("begin", &sig.begin)?,
        line_tags: sig
            .lines
            .iter()
            .map(|p| compile("lines", p))
            .collect::<Result<Vec<_>, _>>()?,
        end: sig.end.as_deref().map(|p| compile("end", p)).transpose()?,
        defaults: sig.defaults.clone(),
        fields: sig
            .fields
            .iter()
            .map(|p| compile("fields", p))
            .collect::<Result<Vec<_>, _>>()?,
        redact: sig
            .redact
            .iter()
            .map(|p| compile("redact", p))
            .collect::<Result<Vec<_>, _>>()?,
        post_process,
    })
}
