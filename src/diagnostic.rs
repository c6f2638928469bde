//! Diagnostics produced by the rule engine

use serde::{Serialize, Serializer};
use std::fmt;

/// Dot/bracket address of a value inside the document,
/// e.g. `spec.containers[0].ports[1].protocol`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

impl FieldPath {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.to_string()));
        Self { segments }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "document");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Classification of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// The document is not well-formed YAML
    ParseError,
    /// A mandatory field is absent (or empty where emptiness is meaningless)
    Required,
    /// Present but of the wrong shape
    WrongType,
    /// Numeric value outside its domain
    OutOfRange,
    /// Pattern, enum, prefix or suffix rule broken
    BadFormat,
    /// Unrecognized key under a known parent
    UnknownField,
}

impl ViolationKind {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::ParseError => "PARSE_ERROR",
            ViolationKind::Required => "REQUIRED",
            ViolationKind::WrongType => "WRONG_TYPE",
            ViolationKind::OutOfRange => "OUT_OF_RANGE",
            ViolationKind::BadFormat => "BAD_FORMAT",
            ViolationKind::UnknownField => "UNKNOWN_FIELD",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One rule failure, before it is attributed to a source
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: FieldPath,
    pub kind: ViolationKind,
    pub detail: String,
}

impl Violation {
    pub fn new(path: &FieldPath, kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            kind,
            detail: detail.into(),
        }
    }

    pub fn required(path: &FieldPath) -> Self {
        Self::new(path, ViolationKind::Required, "is required")
    }

    pub fn wrong_type(path: &FieldPath, expected: &str, found: &str) -> Self {
        Self::new(
            path,
            ViolationKind::WrongType,
            format!("must be {}, found {}", expected, found),
        )
    }

    pub fn out_of_range(path: &FieldPath, detail: impl Into<String>) -> Self {
        Self::new(path, ViolationKind::OutOfRange, detail)
    }

    pub fn bad_format(path: &FieldPath, detail: impl Into<String>) -> Self {
        Self::new(path, ViolationKind::BadFormat, detail)
    }

    pub fn unknown_field(path: &FieldPath, detail: impl Into<String>) -> Self {
        Self::new(path, ViolationKind::UnknownField, detail)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.detail)
    }
}

/// A violation attributed to a source document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub source: String,
    /// `None` only for parse failures, which have no field
    pub path: Option<FieldPath>,
    pub kind: ViolationKind,
    pub message: String,
}

impl Diagnostic {
    pub fn from_violation(source: &str, violation: Violation) -> Self {
        let message = violation.to_string();
        Self {
            source: source.to_string(),
            path: Some(violation.path),
            kind: violation.kind,
            message,
        }
    }

    pub fn parse_error(source: &str, error: &str) -> Self {
        Self {
            source: source.to_string(),
            path: None,
            kind: ViolationKind::ParseError,
            message: format!("invalid YAML format: {}", error),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}
