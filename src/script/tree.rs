//! Parsed script values
//!
//! A script file is a sequence of `name op value` entries. Values are either
//! scalars, lists of anonymous values (`{ a b c }`), or nested trees.

use serde::{Deserialize, Serialize};

/// Assignment or comparison operator between a name and its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    EqEq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    /// `?=`, assignment only if the target exists
    QEq,
}

/// A single `name op value` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub op: Operator,
    pub value: Value,
}

impl Node {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            op: Operator::Eq,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Scalar(String),
    /// Block of anonymous entries; usually scalars, occasionally nested blocks
    List(Vec<Value>),
    /// Block of named entries (also used for `{}`)
    Tree(Tree),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Value::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Scalars of a list, in order. Nested blocks are skipped.
    pub fn scalars(&self) -> Vec<&str> {
        match self {
            Value::Scalar(s) => vec![s.as_str()],
            Value::List(items) => items.iter().filter_map(Value::as_scalar).collect(),
            Value::Tree(_) => Vec::new(),
        }
    }

    /// Flatten to a single string: scalars as-is, lists space-joined
    pub fn joined(&self) -> String {
        match self {
            Value::Scalar(s) => s.clone(),
            _ => self.scalars().join(" "),
        }
    }
}

/// Ordered collection of named entries. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// First value under `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.nodes.iter().find(|n| n.name == name).map(|n| &n.value)
    }

    /// Every value under `name`, in source order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.name == name)
            .map(|n| &n.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
