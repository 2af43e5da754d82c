//! The virtual tree: an owned, host-independent description of markup.
//!
//! Trees are plain owned data. [`Clone`] is a deep copy with disjoint ownership,
//! which is how the previous render's shadow is captured between cycles:
//!
//! ```
//! use vdom_patch::VirtualNode;
//!
//! let mut current = VirtualNode::element("h1").with_child(VirtualNode::text("Hello, world!"));
//! let previous = current.clone();
//!
//! current.children_mut().unwrap()[0] = VirtualNode::text("Hi everyone!");
//! assert_ne!(current, previous);
//! ```

use core::{fmt, iter::FromIterator};
use hashbrown::HashMap;

/// The four kinds of [`VirtualNode`], used for logging and for the replacement rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Document,
	Element,
	Text,
	Comment,
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			NodeKind::Document => "document",
			NodeKind::Element => "element",
			NodeKind::Text => "text",
			NodeKind::Comment => "comment",
		})
	}
}

/// One node of a virtual tree.
///
/// [`VirtualNode::Document`] stands in for the host-provided root.
/// It is never constructed or diffed, only [loaded](`crate::load`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualNode {
	Document(Vec<VirtualNode>),
	Element(Element),
	Text(String),
	Comment(String),
}

impl VirtualNode {
	/// Creates an [`Element`] node without namespace, attributes or children.
	#[must_use]
	pub fn element(name: impl Into<String>) -> Self {
		VirtualNode::Element(Element::new(name))
	}

	#[must_use]
	pub fn element_ns(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		VirtualNode::Element(Element::new(name).in_namespace(namespace))
	}

	#[must_use]
	pub fn text(data: impl Into<String>) -> Self {
		VirtualNode::Text(data.into())
	}

	#[must_use]
	pub fn comment(data: impl Into<String>) -> Self {
		VirtualNode::Comment(data.into())
	}

	#[must_use]
	pub fn kind(&self) -> NodeKind {
		match self {
			VirtualNode::Document(_) => NodeKind::Document,
			VirtualNode::Element(_) => NodeKind::Element,
			VirtualNode::Text(_) => NodeKind::Text,
			VirtualNode::Comment(_) => NodeKind::Comment,
		}
	}

	/// Whether the live node for `self` can be updated in place to represent `other`.
	///
	/// Kinds must match, and elements must additionally agree on tag name and namespace.
	/// Tag names are compared exactly: `DIV` and `div` are different elements here.
	#[must_use]
	pub fn is_compatible_with(&self, other: &VirtualNode) -> bool {
		match (self, other) {
			(VirtualNode::Element(a), VirtualNode::Element(b)) => a.name == b.name && a.namespace == b.namespace,
			(a, b) => a.kind() == b.kind(),
		}
	}

	/// Builder-style child append. Does nothing useful on leaves, so it panics there.
	///
	/// # Panics
	///
	/// Iff `self` is a [`VirtualNode::Text`] or [`VirtualNode::Comment`].
	#[must_use]
	pub fn with_child(mut self, child: VirtualNode) -> Self {
		match self.children_mut() {
			Some(children) => children.push(child),
			None => panic!("Tried to add a child to a {} node", self.kind()),
		}
		self
	}

	/// Builder-style attribute setter for element nodes.
	///
	/// # Panics
	///
	/// Iff `self` is not a [`VirtualNode::Element`].
	#[must_use]
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		match &mut self {
			VirtualNode::Element(element) => {
				element.attributes.set(name, value);
			}
			other => panic!("Tried to set an attribute on a {} node", other.kind()),
		}
		self
	}

	#[must_use]
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			VirtualNode::Element(element) => Some(element),
			_ => None,
		}
	}

	pub fn as_element_mut(&mut self) -> Option<&mut Element> {
		match self {
			VirtualNode::Element(element) => Some(element),
			_ => None,
		}
	}

	/// The character data of a text or comment node.
	#[must_use]
	pub fn data(&self) -> Option<&str> {
		match self {
			VirtualNode::Text(data) | VirtualNode::Comment(data) => Some(data),
			_ => None,
		}
	}

	pub fn data_mut(&mut self) -> Option<&mut String> {
		match self {
			VirtualNode::Text(data) | VirtualNode::Comment(data) => Some(data),
			_ => None,
		}
	}

	/// Children in display order. Leaves have none and return an empty slice.
	#[must_use]
	pub fn children(&self) -> &[VirtualNode] {
		match self {
			VirtualNode::Document(children) | VirtualNode::Element(Element { children, .. }) => children,
			VirtualNode::Text(_) | VirtualNode::Comment(_) => &[],
		}
	}

	pub fn children_mut(&mut self) -> Option<&mut Vec<VirtualNode>> {
		match self {
			VirtualNode::Document(children) | VirtualNode::Element(Element { children, .. }) => Some(children),
			VirtualNode::Text(_) | VirtualNode::Comment(_) => None,
		}
	}

	/// Number of nodes in this subtree, including `self`.
	#[must_use]
	pub fn node_count(&self) -> usize {
		1 + self.children().iter().map(VirtualNode::node_count).sum::<usize>()
	}

	/// Height of this subtree. Leaves have depth 1.
	#[must_use]
	pub fn depth(&self) -> usize {
		1 + self.children().iter().map(VirtualNode::depth).max().unwrap_or(0)
	}
}

impl From<Element> for VirtualNode {
	fn from(element: Element) -> Self {
		VirtualNode::Element(element)
	}
}

/// An element's tag, namespace, attributes and exclusively owned children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	pub name: String,
	/// [`None`] means the host's default (HTML) namespace.
	pub namespace: Option<String>,
	pub attributes: Attributes,
	pub children: Vec<VirtualNode>,
}

impl Element {
	#[must_use]
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			namespace: None,
			attributes: Attributes::new(),
			children: Vec::new(),
		}
	}

	#[must_use]
	pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
	pub name: String,
	pub value: String,
}

impl Attribute {
	#[must_use]
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

/// An insertion-ordered attribute list with unique names.
///
/// The order is replayed when constructing live elements, but two lists with the same name/value pairs compare equal regardless of order.
#[derive(Debug, Clone, Default, Eq)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
	#[must_use]
	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// Sets `name` to `value`, keeping the original position if `name` was already present.
	///
	/// Returns the previous value, if any.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		let name = name.into();
		let value = value.into();
		match self.0.iter_mut().find(|a| a.name == name) {
			Some(existing) => Some(core::mem::replace(&mut existing.value, value)),
			None => {
				self.0.push(Attribute { name, value });
				None
			}
		}
	}

	pub fn remove(&mut self, name: &str) -> Option<String> {
		let index = self.0.iter().position(|a| a.name == name)?;
		Some(self.0.remove(index).value)
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.iter().find(|a| a.name == name).map(|a| a.value.as_str())
	}

	pub fn clear(&mut self) {
		self.0.clear()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> core::slice::Iter<'_, Attribute> {
		self.0.iter()
	}

	#[must_use]
	pub fn as_slice(&self) -> &[Attribute] {
		&self.0
	}
}

impl PartialEq for Attributes {
	fn eq(&self, other: &Self) -> bool {
		if self.0.len() != other.0.len() {
			return false;
		}
		if self.0 == other.0 {
			return true;
		}
		let other: HashMap<&str, &str> = other.0.iter().map(|a| (a.name.as_str(), a.value.as_str())).collect();
		self.0.iter().all(|a| other.get(a.name.as_str()) == Some(&a.value.as_str()))
	}
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
	/// Later duplicates overwrite earlier values in place.
	fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
		let mut attributes = Self::new();
		for (name, value) in iter {
			attributes.set(name, value);
		}
		attributes
	}
}

impl<'a> IntoIterator for &'a Attributes {
	type Item = &'a Attribute;
	type IntoIter = core::slice::Iter<'a, Attribute>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
