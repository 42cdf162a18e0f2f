use id_arena::{Arena, Id};
use std::fmt::{self, Write as _};

pub type NodeId = Id<Node>;

/// An element's tag, classes and remaining attributes
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl Element {
    pub fn new<S: ToString>(tag: S) -> Element {
        Element {
            tag: tag.to_string(),
            ..Element::default()
        }
    }

    pub fn with_class<S: ToString>(mut self, class: S) -> Element {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attribute<K: ToString, V: ToString>(mut self, key: K, value: V) -> Element {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root; has no markup of its own
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Node {
        Node {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A tree of elements and text nodes. Nodes live in an arena and refer to each
/// other by [NodeId], so splitting one text node never invalidates the ids held
/// for any other node. Nodes removed from the tree stay in the arena, detached.
pub struct Tree {
    nodes: Arena<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Tree {
    pub fn new() -> Tree {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::new(NodeKind::Root));
        Tree { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes[id].element()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id].text()
    }

    /// Create a detached element node
    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.nodes.alloc(Node::new(NodeKind::Element(element)))
    }

    /// Create a detached text node
    pub fn create_text<S: Into<String>>(&mut self, text: S) -> NodeId {
        self.nodes.alloc(Node::new(NodeKind::Text(text.into())))
    }

    /// Move `child` to the end of `parent`'s children, detaching it from any
    /// previous parent first
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        child
    }

    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create_element(element);
        self.append(parent, id)
    }

    pub fn append_text<S: Into<String>>(&mut self, parent: NodeId, text: S) -> NodeId {
        let id = self.create_text(text);
        self.append(parent, id)
    }

    /// Remove `node` from its parent's children. The node keeps its own subtree.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        }
    }

    /// Replace `node`, in its exact position among its siblings, with the
    /// `replacements` in order. Returns `false` (and changes nothing) if `node`
    /// has no parent.
    pub fn replace_with(&mut self, node: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.nodes[node].parent else {
            return false;
        };
        if !self.nodes[parent].children.contains(&node) {
            return false;
        }

        for &replacement in replacements {
            self.detach(replacement);
            self.nodes[replacement].parent = Some(parent);
        }
        // detaching a replacement that was a sibling shifts the node's position
        let Some(index) = self.nodes[parent].children.iter().position(|&c| c == node) else {
            return false;
        };

        self.nodes[parent]
            .children
            .splice(index..=index, replacements.iter().copied());
        self.nodes[node].parent = None;
        true
    }

    /// All nodes below `id` in document order, not including `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next].children.iter().rev().copied());
        }
        out
    }

    /// Text nodes below `id`, in document order
    pub fn text_leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&d| self.nodes[d].text().is_some())
            .collect()
    }

    /// The concatenated text of every text node below `id`
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.nodes[id].text() {
            return text.to_string();
        }
        self.text_leaves(id)
            .into_iter()
            .filter_map(|leaf| self.nodes[leaf].text())
            .collect()
    }

    /// `true` if `id` is an empty element carrying `class`
    pub fn is_marker(&self, id: NodeId, class: &str) -> bool {
        let node = &self.nodes[id];
        node.children.is_empty() && node.element().is_some_and(|e| e.has_class(class))
    }

    /// Serialize the subtree at `id` as HTML
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "wbr"];

        let node = &self.nodes[id];
        match &node.kind {
            NodeKind::Root => {
                for &child in node.children.iter() {
                    self.write_html(child, out);
                }
            }
            NodeKind::Text(text) => {
                out.push_str(&html_escape::encode_text(text));
            }
            NodeKind::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                if !element.classes.is_empty() {
                    let _ = write!(
                        out,
                        " class=\"{}\"",
                        html_escape::encode_double_quoted_attribute(&element.classes.join(" "))
                    );
                }
                for (key, value) in element.attributes.iter() {
                    let _ = write!(
                        out,
                        " {key}=\"{}\"",
                        html_escape::encode_double_quoted_attribute(value)
                    );
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) && node.children.is_empty() {
                    return;
                }
                for &child in node.children.iter() {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html(self.root))
    }
}
