//! Pod spec and container rules

use super::checks::{self, Check};
use super::{network, resources};
use crate::diagnostic::{FieldPath, Violation, ViolationKind};
use crate::document::{Mapping, Node};
use regex::Regex;
use std::sync::OnceLock;

/// Registry every container image must come from
pub const IMAGE_REGISTRY: &str = "registry.bigbrother.io/";

/// Supported values of `spec.os.name`
pub const OPERATING_SYSTEMS: [&str; 2] = ["linux", "windows"];

/// Lowercase words joined by single underscores
const CONTAINER_NAME_PATTERN: &str = r"^[a-z]+(_[a-z]+)*$";

fn container_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CONTAINER_NAME_PATTERN).expect("container name pattern compiles"))
}

pub(super) fn check_spec(doc: &Mapping) -> Vec<Violation> {
    let path = FieldPath::root().key("spec");
    let spec = match checks::required(doc, "spec", &path).and_then(|n| checks::mapping(n, &path)) {
        Ok(s) => s,
        Err(v) => return vec![v],
    };

    let mut found = checks::failures([check_os(spec, &path)]);
    found.extend(check_containers(spec, &path));
    found
}

fn check_os(spec: &Mapping, parent: &FieldPath) -> Check {
    let path = parent.key("os");
    let Some(node) = spec.get("os") else {
        return Ok(());
    };
    let os = checks::mapping(node, &path)?;

    let name_path = path.key("name");
    let name = checks::string(checks::required(os, "name", &name_path)?, &name_path)?;
    if !OPERATING_SYSTEMS.contains(&name) {
        return Err(Violation::bad_format(
            &name_path,
            format!(
                "has unsupported value '{}', expected one of {}",
                name,
                OPERATING_SYSTEMS.join(", ")
            ),
        ));
    }
    Ok(())
}

fn check_containers(spec: &Mapping, parent: &FieldPath) -> Vec<Violation> {
    let path = parent.key("containers");
    let containers = match checks::required(spec, "containers", &path).and_then(|n| checks::sequence(n, &path)) {
        Ok(c) => c,
        Err(v) => return vec![v],
    };

    if containers.is_empty() {
        return vec![Violation::new(
            &path,
            ViolationKind::Required,
            "requires at least one container",
        )];
    }

    containers
        .iter()
        .enumerate()
        .flat_map(|(i, node)| check_container(node, &path.index(i)))
        .collect()
}

fn check_container(node: &Node, path: &FieldPath) -> Vec<Violation> {
    let container = match checks::mapping(node, path) {
        Ok(c) => c,
        Err(v) => return vec![v],
    };

    let mut found = checks::failures([check_name(container, path)]);
    found.extend(check_image(container, path));
    found.extend(network::check_ports(container, path));
    found.extend(resources::check_resources(container, path));
    found.extend(network::check_probe(container, path, "readinessProbe"));
    found.extend(network::check_probe(container, path, "livenessProbe"));
    found
}

fn check_name(container: &Mapping, parent: &FieldPath) -> Check {
    let path = parent.key("name");
    let name = checks::string(checks::required(container, "name", &path)?, &path)?;
    if !container_name_re().is_match(name) {
        return Err(Violation::bad_format(
            &path,
            format!("'{}' must be in snake_case format", name),
        ));
    }
    Ok(())
}

/// Registry prefix and version tag are independent; both may be reported
fn check_image(container: &Mapping, parent: &FieldPath) -> Vec<Violation> {
    let path = parent.key("image");
    let image = match checks::required(container, "image", &path).and_then(|n| checks::string(n, &path)) {
        Ok(i) => i,
        Err(v) => return vec![v],
    };

    let mut found = Vec::new();
    if !image.starts_with(IMAGE_REGISTRY) {
        found.push(Violation::bad_format(
            &path,
            format!("'{}' must be in domain {}", image, IMAGE_REGISTRY.trim_end_matches('/')),
        ));
    }
    if !image.contains(':') {
        found.push(Violation::bad_format(
            &path,
            format!("'{}' must have a version tag", image),
        ));
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;

    fn spec(yaml: &str) -> Vec<Violation> {
        let doc = parse(yaml.as_bytes()).unwrap();
        check_spec(doc.as_mapping().unwrap())
    }

    fn container(body: &str) -> Vec<Violation> {
        spec(&format!("spec:\n  containers:\n    - {}\n", body))
    }

    const VALID: &str = "{name: web_app, image: 'registry.bigbrother.io/app:v1', resources: {}}";

    #[test]
    fn test_valid_container() {
        assert!(container(VALID).is_empty());
    }

    #[test]
    fn test_spec_and_containers_presence() {
        let missing = spec("kind: Pod");
        assert_eq!(missing[0].to_string(), "spec is required");

        let no_containers = spec("spec: {}");
        assert_eq!(no_containers[0].to_string(), "spec.containers is required");

        let empty = spec("spec: {containers: []}");
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].kind, ViolationKind::Required);

        let wrong = spec("spec: {containers: {name: web}}");
        assert_eq!(wrong[0].kind, ViolationKind::WrongType);

        let scalar = spec("spec: {containers: [web]}");
        assert_eq!(scalar[0].path.to_string(), "spec.containers[0]");
        assert_eq!(scalar[0].kind, ViolationKind::WrongType);
    }

    #[test]
    fn test_os() {
        let base = format!("  containers:\n    - {}\n", VALID);
        assert!(spec(&format!("spec:\n  os: {{name: linux}}\n{}", base)).is_empty());
        assert!(spec(&format!("spec:\n  os: {{name: windows}}\n{}", base)).is_empty());

        let bad = spec(&format!("spec:\n  os: {{name: macos}}\n{}", base));
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].path.to_string(), "spec.os.name");
        assert_eq!(bad[0].kind, ViolationKind::BadFormat);

        let missing = spec(&format!("spec:\n  os: {{}}\n{}", base));
        assert_eq!(missing[0].kind, ViolationKind::Required);

        let scalar = spec(&format!("spec:\n  os: linux\n{}", base));
        assert_eq!(scalar[0].path.to_string(), "spec.os");
        assert_eq!(scalar[0].kind, ViolationKind::WrongType);
    }

    #[test]
    fn test_container_names() {
        for good in ["web", "web_app", "a_b_c"] {
            assert!(container_name_re().is_match(good), "{} should match", good);
        }
        for bad in ["MyContainer", "my-container", "my_Container", "_leading", "trailing_", "double__underscore", "app1", ""] {
            assert!(!container_name_re().is_match(bad), "{} should not match", bad);
        }

        let found = container("{name: my-container, image: 'registry.bigbrother.io/app:v1', resources: {}}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path.to_string(), "spec.containers[0].name");
        assert_eq!(found[0].kind, ViolationKind::BadFormat);
    }

    #[test]
    fn test_image() {
        let wrong_domain = container("{name: web, image: 'docker.io/app:v1.0', resources: {}}");
        assert_eq!(wrong_domain.len(), 1);
        assert!(wrong_domain[0].detail.contains("registry.bigbrother.io"));

        let no_tag = container("{name: web, image: registry.bigbrother.io/app, resources: {}}");
        assert_eq!(no_tag.len(), 1);
        assert!(no_tag[0].detail.contains("version tag"));

        let both = container("{name: web, image: docker.io/app, resources: {}}");
        assert_eq!(both.len(), 2);

        let missing = container("{name: web, resources: {}}");
        assert_eq!(missing[0].to_string(), "spec.containers[0].image is required");
    }

    #[test]
    fn test_resources_required() {
        let found = container("{name: web, image: 'registry.bigbrother.io/app:v1'}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].to_string(), "spec.containers[0].resources is required");
    }

    #[test]
    fn test_containers_are_indexed_in_order() {
        let found = spec(
            "spec:\n  containers:\n    - {name: ok, image: 'registry.bigbrother.io/a:1', resources: {}}\n    - {name: Bad, image: 'registry.bigbrother.io/a:1', resources: {}}\n    - {name: Worse1, image: 'registry.bigbrother.io/a:1', resources: {}}\n",
        );
        let paths: Vec<_> = found.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(paths, vec!["spec.containers[1].name", "spec.containers[2].name"]);
    }
}
