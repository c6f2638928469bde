//! Pod Descriptor Validator
//!
//! Validates Pod descriptor YAML documents against a fixed schema and
//! reports every violation found, not just the first.
//!
//! ## Features
//!
//! - **Complete reports**: every violation, in a stable traversal order
//! - **Fail-fast mode**: first violation only, for pass/fail callers
//! - **Field paths**: each diagnostic names its field, e.g.
//!   `spec.containers[0].ports[1].containerPort`
//! - **Classified violations**: required, wrong type, out of range, bad
//!   format, unknown field
//!
//! ## Example
//!
//! ```
//! let yaml = b"apiVersion: v1\nkind: Deployment\nmetadata: {name: web}\n\
//! spec: {containers: [{name: web, image: 'registry.bigbrother.io/web:1', resources: {}}]}\n";
//! let diagnostics = pod_validator::validate(yaml, "pod.yaml");
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].to_string(), "pod.yaml: kind must be 'Pod', found 'Deployment'");
//! ```

pub mod config;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod rules;
pub mod source;

pub use config::{OutputFormat, ValidationConfig, ValidatorConfig};
pub use diagnostic::{Diagnostic, FieldPath, Violation, ViolationKind};
pub use document::{Mapping, Node, Scalar};
pub use error::{Result, ValidatorError};
pub use rules::{validate, Mode, Validator};
