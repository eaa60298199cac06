//! The metric browser tree.
//!
//! Nodes live in an arena owned by [`MetricTree`]; parent and child links are
//! [`NodeId`] indices into it, so a node can walk up to the root to build its
//! path without owning its parent.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::model::{decode, json_kind, Constrained, Field, FieldMapped, FromWire};
use crate::Error;

domain!(MetricTreeNodeType, "node_type", ["leaf", "folder"]);

/// Path separator of metric paths.
pub const PATH_SEPARATOR: &str = "|";

/// Index of a node inside the [`MetricTree`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricTreeNode {
    pub name: String,
    pub node_type: Constrained<MetricTreeNodeType>,
    #[serde(skip)]
    parent: Option<NodeId>,
    #[serde(skip)]
    children: Vec<NodeId>,
}

impl MetricTreeNode {
    pub fn new(name: impl Into<String>, node_type: &str) -> Result<Self, Error> {
        Ok(Self {
            name: name.into(),
            node_type: Constrained::try_new(node_type)?,
            ..Self::default()
        })
    }

    pub fn is_folder(&self) -> bool {
        self.node_type == "folder"
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl FieldMapped for MetricTreeNode {
    const TYPE_NAME: &'static str = "MetricTreeNode";
    const FIELDS: &'static [Field] = &[Field::new("name", ""), Field::new("node_type", "type")];

    fn assign(&mut self, attr: &'static str, value: &Value) -> Result<(), Error> {
        match attr {
            "name" => self.name = FromWire::from_wire(attr, value)?,
            "node_type" => self.node_type = FromWire::from_wire(attr, value)?,
            _ => {
                return Err(DecodeError::UnknownAttribute {
                    type_name: Self::TYPE_NAME,
                    attribute: attr,
                }
                .into())
            }
        }
        Ok(())
    }

    // Links are tree state, never read from the wire.
    fn decode_extra(&mut self, _object: &Map<String, Value>) -> Result<(), Error> {
        self.parent = None;
        self.children.clear();
        Ok(())
    }
}

/// A metric tree: an arena of nodes plus the level a query returned.
#[derive(Debug, Clone, Default)]
pub struct MetricTree {
    nodes: Vec<MetricTreeNode>,
    level: Vec<NodeId>,
}

impl MetricTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree whose queries start below `path`.
    ///
    /// The anchor is a folder named after the whole path. It is not part of
    /// the returned level but prefixes the path of every node below it.
    pub fn anchored(path: &str) -> (Self, NodeId) {
        let mut tree = Self::new();
        let anchor = tree.insert(
            MetricTreeNode {
                name: path.to_string(),
                node_type: Constrained::try_new("folder").unwrap_or_default(),
                ..MetricTreeNode::default()
            },
            None,
        );
        (tree, anchor)
    }

    /// Add `node` to the arena and link it under `parent`.
    pub fn insert(&mut self, mut node: MetricTreeNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        if let Some(parent) = parent {
            self.attach(parent, id);
        }
        id
    }

    /// Link `child` under `parent`.
    ///
    /// Unknown ids are ignored, as is any link that would put `child` above
    /// itself (a self-link or a move under one of its own descendants).
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len()
            || child.0 >= self.nodes.len()
            || self.is_ancestor_or_self(child, parent)
        {
            return;
        }
        let previous = self.nodes[child.0].parent.replace(parent);
        if let Some(old) = previous {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
        self.nodes[parent.0].children.push(child);
    }

    /// True when `ancestor` is `id` or lies on the walk from `id` to its root.
    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes.get(node.0).and_then(|n| n.parent);
        }
        false
    }

    /// Decode one level of nodes from a JSON array and link them under `parent`.
    pub fn extend_from_json(
        &mut self,
        value: &Value,
        parent: Option<NodeId>,
    ) -> Result<Vec<NodeId>, Error> {
        let array = value
            .as_array()
            .ok_or_else(|| DecodeError::NotAnArray(json_kind(value)))?;
        let decoded = array
            .iter()
            .map(decode::<MetricTreeNode>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(decoded
            .into_iter()
            .map(|node| self.insert(node, parent))
            .collect())
    }

    pub fn set_level(&mut self, ids: Vec<NodeId>) {
        self.level = ids
            .into_iter()
            .filter(|id| id.0 < self.nodes.len())
            .collect();
    }

    /// The nodes the query returned.
    pub fn level(&self) -> Level<'_> {
        Level {
            tree: self,
            ids: &self.level,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    pub fn node(&self, id: NodeId) -> Option<&MetricTreeNode> {
        self.nodes.get(id.0)
    }

    /// Names from the root down to `id`, joined with `|`.
    pub fn path(&self, id: NodeId) -> Option<String> {
        self.get(id).map(|n| n.path())
    }

    /// Number of nodes in the arena, anchor included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A borrowed view of one node together with its tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a MetricTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a MetricTreeNode {
        &self.tree.nodes[self.id.0]
    }

    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    pub fn node_type(&self) -> Option<&'a str> {
        self.node().node_type.get()
    }

    pub fn is_folder(&self) -> bool {
        self.node().is_folder()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.and_then(|p| self.tree.get(p))
    }

    pub fn children(&self) -> Level<'a> {
        Level {
            tree: self.tree,
            ids: &self.node().children,
        }
    }

    pub fn path(&self) -> String {
        let mut names = vec![self.name()];
        let mut current = self.parent();
        while let Some(node) = current {
            names.push(node.name());
            current = node.parent();
        }
        names.reverse();
        names.join(PATH_SEPARATOR)
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("node_type", &self.node_type())
            .finish()
    }
}

/// An ordered list of sibling nodes.
#[derive(Clone, Copy)]
pub struct Level<'a> {
    tree: &'a MetricTree,
    ids: &'a [NodeId],
}

impl<'a> Level<'a> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeRef<'a>> {
        self.ids.get(index).and_then(|id| self.tree.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let (tree, ids) = (self.tree, self.ids);
        ids.iter().filter_map(move |id| tree.get(*id))
    }

    pub fn by_name(&self, name: &str) -> Result<NodeRef<'a>, Error> {
        self.iter()
            .find(|n| n.name() == name)
            .ok_or_else(|| Error::not_found(name))
    }
}

impl std::fmt::Debug for Level<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_follow_parent_links() {
        let mut tree = MetricTree::new();
        let top = tree
            .extend_from_json(&json!([{"name": "root", "type": "folder"}]), None)
            .unwrap();
        tree.set_level(top.clone());
        let kids = tree
            .extend_from_json(&json!([{"name": "child", "type": "leaf"}]), Some(top[0]))
            .unwrap();

        let root = tree.level().by_name("root").unwrap();
        assert!(root.is_folder());
        assert_eq!(root.children().len(), 1);
        let leaf = root.children().get(0).unwrap();
        assert_eq!(leaf.id(), kids[0]);
        assert_eq!(leaf.path(), "root|child");
        assert_eq!(leaf.parent().unwrap().name(), "root");
        assert_eq!(tree.path(top[0]).as_deref(), Some("root"));
    }

    #[test]
    fn anchor_prefixes_paths_but_is_not_in_level() {
        let (mut tree, anchor) = MetricTree::anchored("Overall Application Performance|web");
        let ids = tree
            .extend_from_json(&json!([{"name": "Calls per Minute", "type": "leaf"}]), Some(anchor))
            .unwrap();
        tree.set_level(ids);
        assert_eq!(tree.level().len(), 1);
        assert_eq!(
            tree.level().get(0).unwrap().path(),
            "Overall Application Performance|web|Calls per Minute"
        );
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn attach_moves_a_child() {
        let mut tree = MetricTree::new();
        let a = tree.insert(MetricTreeNode::new("a", "folder").unwrap(), None);
        let b = tree.insert(MetricTreeNode::new("b", "folder").unwrap(), None);
        let c = tree.insert(MetricTreeNode::new("c", "leaf").unwrap(), Some(a));
        tree.attach(b, c);
        assert!(tree.node(a).unwrap().children().is_empty());
        assert_eq!(tree.node(b).unwrap().children(), &[c]);
        assert_eq!(tree.path(c).as_deref(), Some("b|c"));
        tree.attach(c, c);
        assert_eq!(tree.node(c).unwrap().parent(), Some(b));
    }

    #[test]
    fn attach_under_own_descendant_is_ignored() {
        let mut tree = MetricTree::new();
        let a = tree.insert(MetricTreeNode::new("a", "folder").unwrap(), None);
        let b = tree.insert(MetricTreeNode::new("b", "folder").unwrap(), Some(a));
        let c = tree.insert(MetricTreeNode::new("c", "folder").unwrap(), Some(b));

        tree.attach(b, a);
        tree.attach(c, a);
        assert_eq!(tree.node(a).unwrap().parent(), None);
        assert_eq!(tree.node(a).unwrap().children(), &[b]);
        assert_eq!(tree.path(b).as_deref(), Some("a|b"));
        assert_eq!(tree.path(c).as_deref(), Some("a|b|c"));
    }

    #[test]
    fn lookup_failures() {
        let mut tree = MetricTree::new();
        let ids = tree
            .extend_from_json(&json!([{"name": "x", "type": "leaf"}]), None)
            .unwrap();
        tree.set_level(ids);
        assert!(matches!(
            tree.level().by_name("y"),
            Err(Error::NotFound { key }) if key == "y"
        ));
        assert!(tree
            .extend_from_json(&json!([{"name": "x", "type": "branch"}]), None)
            .is_err());
        assert!(MetricTreeNode::new("x", "branch").is_err());
        assert!(tree.extend_from_json(&json!({"name": "x"}), None).is_err());
    }
}
