//! CST nodes and their identity, type and location.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a node, unique within one [`CstRoot`](super::CstRoot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural kind of a node.
///
/// The set is closed: parsers map their language-specific constructs onto
/// one of these tags when building the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    File,
    Class,
    Interface,
    Enum,
    Method,
    Constructor,
    Function,
    Field,
    Block,
}

/// Coarse grouping of node types, used by the `SameKind` compatibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeFamily {
    /// Whole files.
    Container,
    /// Type declarations.
    Type,
    /// Anything with a body that can be invoked.
    Callable,
    /// Data members.
    Member,
    /// Statement blocks.
    Statement,
}

impl NodeType {
    /// Returns the family this type belongs to.
    pub fn family(self) -> NodeFamily {
        match self {
            NodeType::File => NodeFamily::Container,
            NodeType::Class | NodeType::Interface | NodeType::Enum => NodeFamily::Type,
            NodeType::Method | NodeType::Constructor | NodeType::Function => NodeFamily::Callable,
            NodeType::Field => NodeFamily::Member,
            NodeType::Block => NodeFamily::Statement,
        }
    }

    /// Returns a short lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            NodeType::File => "file",
            NodeType::Class => "class",
            NodeType::Interface => "interface",
            NodeType::Enum => "enum",
            NodeType::Method => "method",
            NodeType::Constructor => "constructor",
            NodeType::Function => "function",
            NodeType::Field => "field",
            NodeType::Block => "block",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a node lives in its source file.
///
/// `begin..end` spans the whole declaration, `body_begin..body_end` the part
/// whose tokens make up the node's content. Offsets index the file text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub begin: usize,
    pub end: usize,
    pub body_begin: usize,
    pub body_end: usize,
    /// 1-based line of the declaration.
    #[serde(default)]
    pub line: usize,
}

impl Location {
    /// Creates a location whose body covers the whole span.
    pub fn new(file: impl Into<String>, begin: usize, end: usize, line: usize) -> Self {
        Location {
            file: file.into(),
            begin,
            end,
            body_begin: begin,
            body_end: end,
            line,
        }
    }

    /// Narrows the body span.
    pub fn with_body(mut self, body_begin: usize, body_end: usize) -> Self {
        self.body_begin = body_begin;
        self.body_end = body_end;
        self
    }

    /// Returns true if `offset` falls inside `begin..end`.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.begin && offset < self.end
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One structural unit of source: a type, method, field, block, ...
///
/// A node exclusively owns its children, stored in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CstNode {
    id: NodeId,
    #[serde(rename = "type")]
    node_type: NodeType,
    location: Location,
    simple_name: String,
    local_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
    #[serde(default, rename = "nodes", skip_serializing_if = "Vec::is_empty")]
    children: Vec<CstNode>,
}

impl CstNode {
    /// Creates a node with no names and no children.
    pub fn new(id: u32, node_type: NodeType, location: Location) -> Self {
        CstNode {
            id: NodeId(id),
            node_type,
            location,
            simple_name: String::new(),
            local_name: String::new(),
            namespace: None,
            parameters: Vec::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets the simple name; the local name defaults to the same value.
    pub fn with_name(mut self, simple_name: impl Into<String>) -> Self {
        self.simple_name = simple_name.into();
        self.local_name = self.simple_name.clone();
        self
    }

    /// Sets the local name (e.g. `m1(String)` for a method `m1`).
    pub fn with_local_name(mut self, local_name: impl Into<String>) -> Self {
        self.local_name = local_name.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Appends a child; children keep insertion order.
    pub fn add_child(&mut self, child: CstNode) {
        self.children.push(child);
    }

    /// Builder form of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: CstNode) -> Self {
        self.add_child(child);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Returns a named attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[CstNode] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns true if `offset` is covered by one of the direct children.
    pub(crate) fn child_covers(&self, offset: usize) -> bool {
        self.children.iter().any(|c| c.location.contains(offset))
    }
}

impl fmt::Display for CstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.location, self.node_type, self.local_name)
    }
}
