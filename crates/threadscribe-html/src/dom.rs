//! [`MarkupNode`] over `markup5ever_rcdom`.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData};
use threadscribe_core::{MarkupNode, NodeType};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Handle to a node of an html5ever `RcDom`. Equality is identity.
#[derive(Clone)]
pub struct RcNode(pub Handle);

impl RcNode {
    pub fn handle(&self) -> &Handle {
        &self.0
    }
}

impl PartialEq for RcNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RcNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Document => f.write_str("#document"),
            NodeData::Element { name, .. } => write!(f, "<{}>", name.local),
            NodeData::Text { contents } => write!(f, "#text {:?}", &**contents.borrow()),
            NodeData::Comment { contents } => write!(f, "#comment {:?}", &**contents),
            NodeData::Doctype { name, .. } => write!(f, "<!DOCTYPE {name}>"),
            NodeData::ProcessingInstruction { target, .. } => write!(f, "<?{target}?>"),
        }
    }
}

fn attr_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}

fn element(name: QualName, attrs: Vec<Attribute>) -> Handle {
    Node::new(NodeData::Element {
        name,
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

impl MarkupNode for RcNode {
    fn node_type(&self) -> NodeType {
        match self.0.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element { .. } => NodeType::Element,
            NodeData::Text { .. } => NodeType::Text,
            NodeData::Comment { .. } => NodeType::Comment,
            NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => NodeType::Other,
        }
    }

    fn tag_name(&self) -> Option<&str> {
        match &self.0.data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        let NodeData::Element { attrs, .. } = &self.0.data else {
            return None;
        };
        attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string())
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let NodeData::Element { attrs, .. } = &self.0.data else {
            return;
        };
        let mut attrs = attrs.borrow_mut();
        match attrs.iter_mut().find(|a| &*a.name.local == name) {
            Some(attr) => attr.value = StrTendril::from_slice(value),
            None => attrs.push(Attribute {
                name: attr_name(name),
                value: StrTendril::from_slice(value),
            }),
        }
    }

    fn data(&self) -> Option<String> {
        match &self.0.data {
            NodeData::Text { contents } => Some(contents.borrow().to_string()),
            NodeData::Comment { contents } => Some(contents.to_string()),
            _ => None,
        }
    }

    fn set_data(&self, data: &str) {
        if let NodeData::Text { contents } = &self.0.data {
            *contents.borrow_mut() = StrTendril::from_slice(data);
        }
    }

    fn parent(&self) -> Option<Self> {
        let weak = self.0.parent.take();
        let parent = weak.as_ref().and_then(Weak::upgrade);
        self.0.parent.set(weak);
        parent.map(RcNode)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.borrow().iter().cloned().map(RcNode).collect()
    }

    fn create_element(&self, tag: &str) -> Self {
        let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
        RcNode(element(name, Vec::new()))
    }

    fn create_text(&self, text: &str) -> Self {
        RcNode(Node::new(NodeData::Text {
            contents: RefCell::new(StrTendril::from_slice(text)),
        }))
    }

    fn clone_shallow(&self) -> Self {
        let handle = match &self.0.data {
            NodeData::Document => Node::new(NodeData::Document),
            NodeData::Element { name, attrs, .. } => element(name.clone(), attrs.borrow().clone()),
            NodeData::Text { contents } => Node::new(NodeData::Text {
                contents: RefCell::new(contents.borrow().clone()),
            }),
            NodeData::Comment { contents } => Node::new(NodeData::Comment {
                contents: contents.clone(),
            }),
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => Node::new(NodeData::Doctype {
                name: name.clone(),
                public_id: public_id.clone(),
                system_id: system_id.clone(),
            }),
            NodeData::ProcessingInstruction { target, contents } => {
                Node::new(NodeData::ProcessingInstruction {
                    target: target.clone(),
                    contents: contents.clone(),
                })
            }
        };
        RcNode(handle)
    }

    fn insert_before(&self, child: &Self, reference: Option<&Self>) {
        child.detach();
        let mut children = self.0.children.borrow_mut();
        let index = reference
            .and_then(|r| children.iter().position(|c| Rc::ptr_eq(c, &r.0)))
            .unwrap_or(children.len());
        children.insert(index, child.0.clone());
        child.0.parent.set(Some(Rc::downgrade(&self.0)));
    }

    fn remove_child(&self, child: &Self) {
        self.0
            .children
            .borrow_mut()
            .retain(|c| !Rc::ptr_eq(c, &child.0));
        child.0.parent.set(None);
    }
}
