//! Document tree: the format-agnostic shape of every generated document.
//!
//! A [`DocTreeNode`] is either a leaf carrying a scalar value or a branch with
//! ordered children. Sibling names are not unique (`fields` holds many
//! `field` children), and lookups by name return the first match.

use crate::serialize::Serializer;

/// Scalar payload of a leaf node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocValue {
    /// Free-form text. Every serializer encodes it for its own syntax.
    Escaped(String),
    /// Text the caller guarantees is already safe for every output format.
    Verbatim(String),
}

impl DocValue {
    pub fn as_str(&self) -> &str {
        match self {
            DocValue::Escaped(s) | DocValue::Verbatim(s) => s,
        }
    }
}

/// One named node of a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTreeNode {
    name: String,
    value: Option<DocValue>,
    children: Vec<DocTreeNode>,
}

impl DocTreeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Root node of a standalone document.
    pub fn root() -> Self {
        Self::new("root")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scalar value, or `""` for branches and empty leaves.
    pub fn value(&self) -> &str {
        self.value.as_ref().map(DocValue::as_str).unwrap_or("")
    }

    pub fn doc_value(&self) -> Option<&DocValue> {
        self.value.as_ref()
    }

    pub fn children(&self) -> &[DocTreeNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Append an empty child and return it for further population.
    pub fn append_child(&mut self, name: impl Into<String>) -> &mut DocTreeNode {
        self.children.push(DocTreeNode::new(name));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append a leaf whose value is emitted as-is by every serializer.
    pub fn append_child_with_value(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut DocTreeNode {
        let child = self.append_child(name);
        child.value = Some(DocValue::Verbatim(value.into()));
        child
    }

    /// Append a leaf holding free-form text, encoded per output format.
    pub fn append_child_with_value_escaped(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut DocTreeNode {
        let child = self.append_child(name);
        child.value = Some(DocValue::Escaped(value.into()));
        child
    }

    pub fn find_child_by_name(&self, name: &str) -> Option<&DocTreeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn find_child_by_name_mut(&mut self, name: &str) -> Option<&mut DocTreeNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// First child named `name`, appended first if missing.
    pub fn child_or_insert(&mut self, name: &str) -> &mut DocTreeNode {
        match self.children.iter().position(|c| c.name == name) {
            Some(idx) => &mut self.children[idx],
            None => self.append_child(name),
        }
    }

    /// Value of the first child named `name`, if that child exists.
    pub fn child_value(&self, name: &str) -> Option<&str> {
        self.find_child_by_name(name).map(DocTreeNode::value)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocTreeNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Pre-order walk feeding `serializer` with this node and its subtree.
    pub fn serialize_with(&self, serializer: &mut dyn Serializer) {
        match (&self.value, self.children.is_empty()) {
            (Some(value), true) => serializer.leaf(&self.name, value),
            _ => {
                serializer.open(&self.name);
                for child in &self.children {
                    child.serialize_with(serializer);
                }
                serializer.close(&self.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_keep_insertion_order() {
        let mut root = DocTreeNode::root();
        root.append_child_with_value_escaped("a", "1");
        root.append_child_with_value_escaped("b", "2");
        root.append_child_with_value_escaped("a", "3");
        let names: Vec<_> = root.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["a", "b", "a"]);
    }

    #[test]
    fn find_returns_first_match() {
        let mut root = DocTreeNode::root();
        root.append_child_with_value_escaped("field", "first");
        root.append_child_with_value_escaped("field", "second");
        assert_eq!(root.child_value("field"), Some("first"));
        assert_eq!(root.children_named("field").count(), 2);
    }

    #[test]
    fn missing_child_is_none() {
        let root = DocTreeNode::root();
        assert!(root.find_child_by_name("nope").is_none());
        assert_eq!(root.child_value("nope"), None);
    }

    #[test]
    fn child_or_insert_creates_once() {
        let mut root = DocTreeNode::root();
        root.child_or_insert("classes").append_child("class");
        root.child_or_insert("classes").append_child("class");
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].children().len(), 2);
    }

    #[test]
    fn branch_value_is_empty() {
        let mut root = DocTreeNode::root();
        root.append_child("fields").append_child_with_value_escaped("name", "x");
        assert_eq!(root.find_child_by_name("fields").map(|f| f.value()), Some(""));
    }

    #[test]
    fn value_kinds_are_kept() {
        let mut root = DocTreeNode::root();
        root.append_child_with_value("static", "true");
        root.append_child_with_value_escaped("description", "<b>");
        assert_eq!(
            root.children()[0].doc_value(),
            Some(&DocValue::Verbatim("true".into()))
        );
        assert_eq!(
            root.children()[1].doc_value(),
            Some(&DocValue::Escaped("<b>".into()))
        );
    }
}
