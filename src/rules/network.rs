//! Container port and HTTP probe rules

use super::checks::{self, Check};
use crate::diagnostic::{FieldPath, Violation};
use crate::document::{Mapping, Node};

pub const PROTOCOLS: [&str; 2] = ["TCP", "UDP"];

pub(super) fn check_ports(container: &Mapping, parent: &FieldPath) -> Vec<Violation> {
    let path = parent.key("ports");
    let Some(node) = container.get("ports") else {
        return Vec::new();
    };
    let ports = match checks::sequence(node, &path) {
        Ok(p) => p,
        Err(v) => return vec![v],
    };

    ports
        .iter()
        .enumerate()
        .flat_map(|(i, port)| check_port(port, &path.index(i)))
        .collect()
}

fn check_port(node: &Node, path: &FieldPath) -> Vec<Violation> {
    let port = match checks::mapping(node, path) {
        Ok(p) => p,
        Err(v) => return vec![v],
    };

    checks::failures([check_container_port(port, path), check_protocol(port, path)])
}

fn check_container_port(port: &Mapping, parent: &FieldPath) -> Check {
    let path = parent.key("containerPort");
    checks::port(checks::required(port, "containerPort", &path)?, &path)
}

fn check_protocol(port: &Mapping, parent: &FieldPath) -> Check {
    let path = parent.key("protocol");
    let Some(node) = port.get("protocol") else {
        return Ok(());
    };
    let protocol = checks::string(node, &path)?;
    if !PROTOCOLS.contains(&protocol) {
        return Err(Violation::bad_format(
            &path,
            format!("must be 'TCP' or 'UDP', found '{}'", protocol),
        ));
    }
    Ok(())
}

/// `readinessProbe` / `livenessProbe`, both optional and shaped alike
pub(super) fn check_probe(container: &Mapping, parent: &FieldPath, probe_key: &str) -> Vec<Violation> {
    let path = parent.key(probe_key);
    let Some(node) = container.get(probe_key) else {
        return Vec::new();
    };

    let http_path = path.key("httpGet");
    let http_get = match checks::mapping(node, &path)
        .and_then(|probe| checks::required(probe, "httpGet", &http_path))
        .and_then(|n| checks::mapping(n, &http_path))
    {
        Ok(h) => h,
        Err(v) => return vec![v],
    };

    checks::failures([check_http_path(http_get, &http_path), check_http_port(http_get, &http_path)])
}

fn check_http_path(http_get: &Mapping, parent: &FieldPath) -> Check {
    let path = parent.key("path");
    let value = checks::string(checks::required(http_get, "path", &path)?, &path)?;
    if !value.starts_with('/') {
        return Err(Violation::bad_format(
            &path,
            format!("'{}' must be absolute (start with '/')", value),
        ));
    }
    Ok(())
}

fn check_http_port(http_get: &Mapping, parent: &FieldPath) -> Check {
    let path = parent.key("port");
    checks::port(checks::required(http_get, "port", &path)?, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::ViolationKind;
    use crate::document::parse;

    fn container(yaml: &str) -> Mapping {
        parse(yaml.as_bytes()).unwrap().as_mapping().unwrap().clone()
    }

    fn root() -> FieldPath {
        FieldPath::root().key("spec").key("containers").index(0)
    }

    fn ports(yaml: &str) -> Vec<Violation> {
        check_ports(&container(yaml), &root())
    }

    fn readiness(yaml: &str) -> Vec<Violation> {
        check_probe(&container(yaml), &root(), "readinessProbe")
    }

    #[test]
    fn test_ports_absent_or_valid() {
        assert!(ports("name: web").is_empty());
        assert!(ports("ports: [{containerPort: 80}, {containerPort: 53, protocol: UDP}]").is_empty());
        assert!(ports("ports: [{containerPort: 8080.0, protocol: TCP}]").is_empty());
        assert!(ports("ports: [{containerPort: 1}, {containerPort: 65535}]").is_empty());
        assert!(ports("ports: [{containerPort: 80.5}, {containerPort: 1.0e3}]").is_empty());
    }

    #[test]
    fn test_port_out_of_range() {
        for bad in ["0", "65536", "-1", "0.0", "70000.0", "70000.5", "0.5", "1e300", ".inf", "99999999999999999999"] {
            let found = ports(&format!("ports: [{{containerPort: {}}}]", bad));
            assert_eq!(found.len(), 1, "{}", bad);
            assert_eq!(found[0].kind, ViolationKind::OutOfRange, "{}", bad);
            assert_eq!(found[0].path.to_string(), "spec.containers[0].ports[0].containerPort");
        }
    }

    #[test]
    fn test_port_not_numeric() {
        for bad in ["'80'", "http", "true", "~", ".nan"] {
            let found = ports(&format!("ports: [{{containerPort: {}}}]", bad));
            assert_eq!(found.len(), 1, "{}", bad);
            assert_eq!(found[0].kind, ViolationKind::WrongType, "{}", bad);
        }
    }

    #[test]
    fn test_port_shape_errors() {
        let missing = ports("ports: [{protocol: TCP}]");
        assert_eq!(missing[0].kind, ViolationKind::Required);

        let not_seq = ports("ports: {containerPort: 80}");
        assert_eq!(not_seq[0].path.to_string(), "spec.containers[0].ports");
        assert_eq!(not_seq[0].kind, ViolationKind::WrongType);

        let not_map = ports("ports: [80]");
        assert_eq!(not_map[0].path.to_string(), "spec.containers[0].ports[0]");
    }

    #[test]
    fn test_protocol() {
        let lower = ports("ports: [{containerPort: 80, protocol: tcp}]");
        assert_eq!(lower.len(), 1);
        assert_eq!(lower[0].kind, ViolationKind::BadFormat);

        let number = ports("ports: [{containerPort: 80, protocol: 6}]");
        assert_eq!(number[0].kind, ViolationKind::WrongType);

        let both = ports("ports: [{containerPort: 0, protocol: SCTP}]");
        let paths: Vec<_> = both.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "spec.containers[0].ports[0].containerPort",
                "spec.containers[0].ports[0].protocol"
            ]
        );
    }

    #[test]
    fn test_probe_valid_and_absent() {
        assert!(readiness("name: web").is_empty());
        assert!(readiness("readinessProbe: {httpGet: {path: /healthz, port: 8080}}").is_empty());
    }

    #[test]
    fn test_probe_errors() {
        let not_map = readiness("readinessProbe: yes");
        assert_eq!(not_map[0].path.to_string(), "spec.containers[0].readinessProbe");

        let no_http = readiness("readinessProbe: {exec: {}}");
        assert_eq!(
            no_http[0].to_string(),
            "spec.containers[0].readinessProbe.httpGet is required"
        );

        let found = readiness("readinessProbe: {httpGet: {path: healthz, port: 0}}");
        let kinds: Vec<_> = found.iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::BadFormat, ViolationKind::OutOfRange]);

        let missing = readiness("readinessProbe: {httpGet: {}}");
        let paths: Vec<_> = missing.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "spec.containers[0].readinessProbe.httpGet.path",
                "spec.containers[0].readinessProbe.httpGet.port"
            ]
        );
    }

    #[test]
    fn test_liveness_uses_its_own_path() {
        let found = check_probe(
            &container("livenessProbe: {httpGet: {path: /, port: '80'}}"),
            &root(),
            "livenessProbe",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].path.to_string(),
            "spec.containers[0].livenessProbe.httpGet.port"
        );
    }
}
