//! Container resource rules

use super::checks::{self, Check};
use crate::diagnostic::{FieldPath, Violation};
use crate::document::{Mapping, Node};

/// Accepted memory quantity suffixes
pub const MEMORY_SUFFIXES: [&str; 3] = ["Gi", "Mi", "Ki"];

/// Sub-mappings of `resources`, checked in this order
const REQUIREMENT_SECTIONS: [&str; 2] = ["requests", "limits"];

pub(super) fn check_resources(container: &Mapping, parent: &FieldPath) -> Vec<Violation> {
    let path = parent.key("resources");
    let resources = match checks::required(container, "resources", &path).and_then(|n| checks::mapping(n, &path)) {
        Ok(r) => r,
        Err(v) => return vec![v],
    };

    REQUIREMENT_SECTIONS
        .iter()
        .flat_map(|section| check_requirements(resources, &path, section))
        .collect()
}

fn check_requirements(resources: &Mapping, parent: &FieldPath, section: &str) -> Vec<Violation> {
    let path = parent.key(section);
    let Some(node) = resources.get(section) else {
        return Vec::new();
    };
    let requirements = match checks::mapping(node, &path) {
        Ok(r) => r,
        Err(v) => return vec![v],
    };

    checks::failures(
        requirements
            .iter()
            .map(|(name, value)| check_quantity(name, value, &path.key(name))),
    )
}

fn check_quantity(name: &str, value: &Node, path: &FieldPath) -> Check {
    match name {
        "cpu" => check_cpu(value, path),
        "memory" => check_memory(value, path),
        other => Err(Violation::unknown_field(
            path,
            format!("unknown resource type '{}'", other),
        )),
    }
}

/// Whole cores only, and at least one
fn check_cpu(value: &Node, path: &FieldPath) -> Check {
    let cores = checks::number(value, path)?;
    if cores <= 0.0 {
        return Err(Violation::out_of_range(
            path,
            format!("must be a positive integer, found {}", value),
        ));
    }
    if !cores.is_finite() || cores.fract() != 0.0 {
        return Err(Violation::bad_format(
            path,
            format!("must be a whole number of cores, found {}", value),
        ));
    }
    Ok(())
}

fn check_memory(value: &Node, path: &FieldPath) -> Check {
    let quantity = checks::string(value, path)?;
    if !MEMORY_SUFFIXES.iter().any(|suffix| quantity.ends_with(suffix)) {
        return Err(Violation::bad_format(
            path,
            format!("'{}' must end with Gi, Mi, or Ki", quantity),
        ));
    }
    Ok(())
}
