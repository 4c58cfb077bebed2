//! Minimal in-memory tree for unit tests.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::node::{MarkupNode, NodeType};

struct Inner {
    kind: NodeType,
    tag: Option<String>,
    data: RefCell<String>,
    attrs: RefCell<Vec<(String, String)>>,
    parent: RefCell<Weak<Inner>>,
    children: RefCell<Vec<TestNode>>,
}

#[derive(Clone)]
pub struct TestNode(Rc<Inner>);

impl PartialEq for TestNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for TestNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markup())
    }
}

fn make(kind: NodeType, tag: Option<&str>, data: &str) -> TestNode {
    TestNode(Rc::new(Inner {
        kind,
        tag: tag.map(str::to_string),
        data: RefCell::new(data.to_string()),
        attrs: RefCell::new(Vec::new()),
        parent: RefCell::new(Weak::new()),
        children: RefCell::new(Vec::new()),
    }))
}

pub fn el(tag: &str, children: Vec<TestNode>) -> TestNode {
    let node = make(NodeType::Element, Some(tag), "");
    for child in &children {
        node.append_child(child);
    }
    node
}

pub fn text(data: &str) -> TestNode {
    make(NodeType::Text, None, data)
}

pub fn comment(data: &str) -> TestNode {
    make(NodeType::Comment, None, data)
}

impl TestNode {
    /// Compact serialization: `<p>a<b>c</b></p>`, comments as `<!--x-->`.
    pub fn markup(&self) -> String {
        match self.0.kind {
            NodeType::Text | NodeType::CData => self.0.data.borrow().clone(),
            NodeType::Comment => format!("<!--{}-->", self.0.data.borrow()),
            _ => {
                let tag = self.0.tag.clone().unwrap_or_default();
                let inner: String = self.children().iter().map(TestNode::markup).collect();
                format!("<{tag}>{inner}</{tag}>")
            }
        }
    }
}

impl MarkupNode for TestNode {
    fn node_type(&self) -> NodeType {
        self.0.kind
    }

    fn tag_name(&self) -> Option<&str> {
        self.0.tag.as_deref()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .attrs
            .borrow()
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let mut attrs = self.0.attrs.borrow_mut();
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some(attr) => attr.1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn data(&self) -> Option<String> {
        match self.0.kind {
            NodeType::Text | NodeType::CData | NodeType::Comment => {
                Some(self.0.data.borrow().clone())
            }
            _ => None,
        }
    }

    fn set_data(&self, data: &str) {
        *self.0.data.borrow_mut() = data.to_string();
    }

    fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(TestNode)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    fn create_element(&self, tag: &str) -> Self {
        make(NodeType::Element, Some(tag), "")
    }

    fn create_text(&self, text: &str) -> Self {
        make(NodeType::Text, None, text)
    }

    fn clone_shallow(&self) -> Self {
        let node = make(self.0.kind, self.0.tag.as_deref(), &self.0.data.borrow());
        *node.0.attrs.borrow_mut() = self.0.attrs.borrow().clone();
        node
    }

    fn insert_before(&self, child: &Self, reference: Option<&Self>) {
        child.detach();
        let mut children = self.0.children.borrow_mut();
        let index = reference
            .and_then(|r| children.iter().position(|c| c == r))
            .unwrap_or(children.len());
        children.insert(index, child.clone());
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
    }

    fn remove_child(&self, child: &Self) {
        self.0.children.borrow_mut().retain(|c| c != child);
        *child.0.parent.borrow_mut() = Weak::new();
    }
}
