//! Virtual Nodes
//!
//! A [`VNode`] describes one element: its tag, its properties and its
//! children. A child is either another element or a text leaf. Trees are
//! immutable once built; every render builds a fresh one and the differ
//! compares them by shape.

use super::props::{format_number, Props};

/// An element in the virtual tree.
#[derive(Debug, Clone, PartialEq)]
pub struct VNode {
    tag: String,
    props: Props,
    children: Vec<Child>,
}

impl VNode {
    /// Element tag, as given to [`create_element`].
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Properties in insertion order.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Children in order. Positions are what the differ matches on.
    pub fn children(&self) -> &[Child] {
        &self.children
    }
}

/// One child slot of a [`VNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(VNode),
    Text(String),
}

impl Child {
    /// The element, if this child is one.
    pub fn as_element(&self) -> Option<&VNode> {
        match self {
            Child::Element(node) => Some(node),
            Child::Text(_) => None,
        }
    }

    /// The text, if this child is a text leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Text(text) => Some(text),
            Child::Element(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Child::Text(_))
    }
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Element(node)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<&String> for Child {
    fn from(text: &String) -> Self {
        Child::Text(text.clone())
    }
}

macro_rules! impl_number_child {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Child {
                fn from(value: $ty) -> Self {
                    Child::Text(format_number(value as f64))
                }
            }
        )*
    };
}

impl_number_child!(i32, i64, u32, u64, usize, f32, f64);

/// Build an element. No validation is performed; zero children is fine.
///
/// ```rust
/// use unreacted_core::vdom::{create_element, Child, Props};
///
/// let node = create_element("h1", Props::new(), [Child::from("Count: "), Child::from(0)]);
/// assert_eq!(node.tag(), "h1");
/// assert_eq!(node.children().len(), 2);
/// ```
pub fn create_element<I>(tag: impl Into<String>, props: Props, children: I) -> VNode
where
    I: IntoIterator<Item = Child>,
{
    VNode {
        tag: tag.into(),
        props,
        children: children.into_iter().collect(),
    }
}
