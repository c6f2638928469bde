//! Untyped document tree
//!
//! The rule engine never deserializes into typed structs: a Pod descriptor
//! that is wrong in ten places must still be walkable. The parser feeds
//! [`Node`] directly, and every check becomes a single match on it.

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use std::fmt;

/// One node of a parsed document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(Mapping),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

/// Leaf values
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// String-keyed mapping that keeps the parser's entry order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        self.entries.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Node {
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of a scalar.
    ///
    /// YAML parsers disagree on whether `8080` is an integer or a float, so
    /// both are accepted here and range checks run on the value itself.
    /// NaN has no place on a number line and is rejected; strings never
    /// qualify, even when they look numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Node::Scalar(Scalar::Int(i)) => Some(*i as f64),
            Node::Scalar(Scalar::Float(f)) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Short type description used in wrong-type messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(Scalar::Null) => "null",
            Node::Scalar(Scalar::Bool(_)) => "boolean",
            Node::Scalar(Scalar::Int(_)) => "integer",
            Node::Scalar(Scalar::Float(_)) => "float",
            Node::Scalar(Scalar::String(_)) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Mapping(_) => write!(f, "<mapping>"),
            Node::Sequence(_) => write!(f, "<sequence>"),
            Node::Scalar(scalar) => write!(f, "{}", scalar),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            // Debug keeps `8080.0` and writes `1e300` instead of 301 digits
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::Bool(b)))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::Int(i)))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Node, E> {
        Ok(Node::Scalar(wide_integer(u.into())))
    }

    fn visit_i128<E: de::Error>(self, i: i128) -> Result<Node, E> {
        Ok(Node::Scalar(wide_integer(i)))
    }

    fn visit_u128<E: de::Error>(self, u: u128) -> Result<Node, E> {
        Ok(Node::Scalar(match i128::try_from(u) {
            Ok(i) => wide_integer(i),
            Err(_) => Scalar::Float(u as f64),
        }))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::Float(f)))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::String(s.to_string())))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::String(s)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((key, value)) = map.next_entry::<Node, Node>()? {
            let key = key_text(&key);
            if mapping.get(&key).is_some() {
                return Err(de::Error::custom(format!("duplicate entry with key {:?}", key)));
            }
            mapping.insert(key, value);
        }
        Ok(Node::Mapping(mapping))
    }

    /// Custom tags (`!foo value`) are dropped; the tagged value stands alone
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Node, A::Error> {
        let (_tag, contents) = data.variant::<String>()?;
        contents.newtype_variant::<Node>()
    }
}

/// Integers outside `i64` keep their magnitude as a float, so range checks
/// still see them
fn wide_integer(i: i128) -> Scalar {
    match i64::try_from(i) {
        Ok(i) => Scalar::Int(i),
        Err(_) => Scalar::Float(i as f64),
    }
}

/// Render a mapping key as text so it can appear in a field path
fn key_text(key: &Node) -> String {
    match key {
        Node::Scalar(Scalar::String(s)) => s.clone(),
        Node::Scalar(scalar) => scalar.to_string(),
        Node::Mapping(_) | Node::Sequence(_) => "<complex key>".to_string(),
    }
}

/// Parse raw document bytes into a tree.
///
/// The error string is the parser's own message; callers turn it into a
/// single parse diagnostic.
pub fn parse(bytes: &[u8]) -> Result<Node, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| format!("input is not valid UTF-8: {}", e))?;
    serde_yaml::from_str(text).map_err(|e| e.to_string())
}
