//! Top-level document and metadata rules

use super::checks::{self, Check};
use crate::diagnostic::{FieldPath, Violation, ViolationKind};
use crate::document::Mapping;

pub const API_VERSION: &str = "v1";
pub const KIND: &str = "Pod";

pub(super) fn check_api_version(doc: &Mapping) -> Vec<Violation> {
    let path = FieldPath::root().key("apiVersion");
    checks::failures([checks::literal(doc, "apiVersion", &path, API_VERSION)])
}

pub(super) fn check_kind(doc: &Mapping) -> Vec<Violation> {
    let path = FieldPath::root().key("kind");
    checks::failures([checks::literal(doc, "kind", &path, KIND)])
}

pub(super) fn check_metadata(doc: &Mapping) -> Vec<Violation> {
    let path = FieldPath::root().key("metadata");
    let metadata = match checks::required(doc, "metadata", &path).and_then(|n| checks::mapping(n, &path)) {
        Ok(m) => m,
        Err(v) => return vec![v],
    };

    let mut found = checks::failures([
        check_name(metadata, &path),
        check_namespace(metadata, &path),
    ]);
    found.extend(check_labels(metadata, &path));
    found
}

fn check_name(metadata: &Mapping, parent: &FieldPath) -> Check {
    let path = parent.key("name");
    let name = checks::string(checks::required(metadata, "name", &path)?, &path)?;
    if name.is_empty() {
        return Err(Violation::new(&path, ViolationKind::Required, "must not be empty"));
    }
    Ok(())
}

fn check_namespace(metadata: &Mapping, parent: &FieldPath) -> Check {
    let path = parent.key("namespace");
    match metadata.get("namespace") {
        Some(node) => checks::string(node, &path).map(|_| ()),
        None => Ok(()),
    }
}

fn check_labels(metadata: &Mapping, parent: &FieldPath) -> Vec<Violation> {
    let path = parent.key("labels");
    let Some(node) = metadata.get("labels") else {
        return Vec::new();
    };
    let labels = match checks::mapping(node, &path) {
        Ok(m) => m,
        Err(v) => return vec![v],
    };

    checks::failures(
        labels
            .iter()
            .map(|(key, value)| checks::string(value, &path.key(key)).map(|_| ())),
    )
}
