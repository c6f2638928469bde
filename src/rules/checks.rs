//! Presence and type helpers shared by every rule.
//!
//! Each helper returns `Err(Violation)` on the first failed stage so that a
//! field check reads as a `?` chain: presence, then type, then domain.

use crate::diagnostic::{FieldPath, Violation};
use crate::document::{Mapping, Node};

/// Inclusive port domain
pub(crate) const PORT_RANGE: std::ops::RangeInclusive<f64> = 1.0..=65535.0;

/// Outcome of a single field check
pub(crate) type Check = Result<(), Violation>;

pub(crate) fn required<'a>(parent: &'a Mapping, key: &str, path: &FieldPath) -> Result<&'a Node, Violation> {
    parent.get(key).ok_or_else(|| Violation::required(path))
}

pub(crate) fn string<'a>(node: &'a Node, path: &FieldPath) -> Result<&'a str, Violation> {
    node.as_str()
        .ok_or_else(|| Violation::wrong_type(path, "a string", node.type_name()))
}

pub(crate) fn mapping<'a>(node: &'a Node, path: &FieldPath) -> Result<&'a Mapping, Violation> {
    node.as_mapping()
        .ok_or_else(|| Violation::wrong_type(path, "a mapping", node.type_name()))
}

pub(crate) fn sequence<'a>(node: &'a Node, path: &FieldPath) -> Result<&'a [Node], Violation> {
    node.as_sequence()
        .ok_or_else(|| Violation::wrong_type(path, "a sequence", node.type_name()))
}

/// Integer-valued fields accept floats too; the domain check decides
pub(crate) fn number(node: &Node, path: &FieldPath) -> Result<f64, Violation> {
    node.as_number()
        .ok_or_else(|| Violation::wrong_type(path, "an integer", &describe(node)))
}

/// Port number check used by container ports and probes
pub(crate) fn port(node: &Node, path: &FieldPath) -> Check {
    let value = number(node, path)?;
    if !PORT_RANGE.contains(&value) {
        return Err(Violation::out_of_range(
            path,
            format!("value {} out of range 1-65535", node),
        ));
    }
    Ok(())
}

/// Required string field that must equal a fixed literal
pub(crate) fn literal(parent: &Mapping, key: &str, path: &FieldPath, expected: &str) -> Check {
    let value = string(required(parent, key, path)?, path)?;
    if value != expected {
        return Err(Violation::bad_format(
            path,
            format!("must be '{}', found '{}'", expected, value),
        ));
    }
    Ok(())
}

/// Collects the failures of independent checks in order
pub(crate) fn failures(checks: impl IntoIterator<Item = Check>) -> Vec<Violation> {
    checks.into_iter().filter_map(Result::err).collect()
}

/// Type name, plus the offending value for scalars that merely look wrong
fn describe(node: &Node) -> String {
    match node {
        Node::Mapping(_) | Node::Sequence(_) => node.type_name().to_string(),
        _ => format!("{} '{}'", node.type_name(), node),
    }
}
