//! Pod Descriptor Rule Engine
//!
//! Walks a parsed Pod document and reports every violation of the Pod
//! schema, in a fixed traversal order:
//!
//! 1. `apiVersion`, `kind`
//! 2. `metadata` (`name`, `namespace`, `labels`)
//! 3. `spec` (`os`, then each container: `name`, `image`, `ports`,
//!    `resources`, `readinessProbe`, `livenessProbe`)
//!
//! Each field is checked for presence, then type, then domain, and the
//! first failing stage is the only one reported for that field. Rules
//! return their own violations; nothing is accumulated in shared state.
//!
//! ## Modes
//! - **Collect-all** (default): every violation, in traversal order
//! - **Fail-fast** (`stop_on_first_error`): the same stream, cut after the
//!   first item. Later sections are never evaluated.

mod checks;
mod container;
mod network;
mod pod;
mod resources;

use crate::config::ValidationConfig;
use crate::diagnostic::{Diagnostic, FieldPath, Violation};
use crate::document::{self, Mapping, Node};
use tracing::{debug, trace};

pub use container::{IMAGE_REGISTRY, OPERATING_SYSTEMS};
pub use network::PROTOCOLS;
pub use pod::{API_VERSION, KIND};
pub use resources::MEMORY_SUFFIXES;

/// Validation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    CollectAll,
    FailFast,
}

type Rule = fn(&Mapping) -> Vec<Violation>;

/// Top-level sections in traversal order
static RULES: [Rule; 4] = [
    pod::check_api_version,
    pod::check_kind,
    pod::check_metadata,
    container::check_spec,
];

/// The Pod validator
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    mode: Mode,
}

impl Validator {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        let mode = if config.stop_on_first_error {
            Mode::FailFast
        } else {
            Mode::CollectAll
        };
        Self::new(mode)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Validate raw document bytes.
    ///
    /// `source` is only used to label diagnostics. An empty result means the
    /// document is valid. A malformed document yields exactly one parse
    /// diagnostic and nothing else.
    pub fn validate(&self, bytes: &[u8], source: &str) -> Vec<Diagnostic> {
        let limit = match self.mode {
            Mode::CollectAll => usize::MAX,
            Mode::FailFast => 1,
        };
        self.run(bytes, source, limit)
    }

    /// First violation in traversal order, whatever the configured mode
    pub fn first_error(&self, bytes: &[u8], source: &str) -> Option<Diagnostic> {
        self.run(bytes, source, 1).into_iter().next()
    }

    fn run(&self, bytes: &[u8], source: &str, limit: usize) -> Vec<Diagnostic> {
        debug!(source, mode = ?self.mode, "validating document");

        let root = match document::parse(bytes) {
            Ok(root) => root,
            Err(e) => {
                debug!(source, error = %e, "document is not well-formed");
                return vec![Diagnostic::parse_error(source, &e)];
            }
        };

        let diagnostics: Vec<Diagnostic> = violations(&root)
            .take(limit)
            .inspect(|v| trace!(source, kind = %v.kind, path = %v.path, "violation"))
            .map(|v| Diagnostic::from_violation(source, v))
            .collect();

        debug!(source, count = diagnostics.len(), "validation finished");
        diagnostics
    }
}

/// Lazily evaluated violation stream for a parsed document
fn violations(root: &Node) -> Box<dyn Iterator<Item = Violation> + '_> {
    let doc: &Mapping = match root {
        Node::Mapping(m) => m,
        // An empty file parses to null
        _ if root.is_null() => &EMPTY,
        other => {
            return Box::new(std::iter::once(Violation::wrong_type(
                &FieldPath::root(),
                "a mapping",
                other.type_name(),
            )))
        }
    };
    Box::new(RULES.iter().flat_map(move |rule| rule(doc)))
}

static EMPTY: Mapping = Mapping::new();

/// Validate in collect-all mode
pub fn validate(bytes: &[u8], source: &str) -> Vec<Diagnostic> {
    Validator::default().validate(bytes, source)
}
