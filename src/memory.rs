//! A headless [`Dom`] backed by an arena of nodes.
//!
//! Nodes are addressed by [`NodeId`] and hold a non-owning link to their parent.
//! Removed nodes stay in the arena, detached, so stale handles remain valid identity tokens.
//!
//! Every mutation is recorded as a [`Mutation`], which makes this backend suitable for asserting exactly which calls a patch issued:
//!
//! ```
//! use vdom_patch::{memory::{MemoryDom, Mutation}, patch, VirtualNode};
//!
//! let mut dom = MemoryDom::new();
//! let root = dom.root();
//!
//! let previous = VirtualNode::text("Hello, world!");
//! let live = patch(&mut dom, &root, &previous, None)?;
//! dom.take_mutations();
//!
//! let current = VirtualNode::text("Hi everyone!");
//! patch(&mut dom, &live, &current, Some(&previous))?;
//! assert_eq!(dom.mutations(), &[Mutation::SetData { node: live, data: "Hi everyone!".to_owned() }]);
//! # Ok::<(), vdom_patch::Error<vdom_patch::memory::MemoryDomError>>(())
//! ```

use crate::{
	dom::Dom,
	load::{Inspect, LiveNode},
	node::Attribute,
};
use core::fmt;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	#[must_use]
	pub fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MemoryDomError {
	#[error("node {0} does not exist in this document")]
	UnknownNode(NodeId),
	#[error("node {child} is not a child of {parent}")]
	NotAChild { parent: NodeId, child: NodeId },
	#[error("node {0} cannot have children")]
	NotAParent(NodeId),
	#[error("node {0} is not an element")]
	NotAnElement(NodeId),
	#[error("node {0} is neither text nor comment")]
	NotCharacterData(NodeId),
	#[error("inserting {child} into {parent} would create a cycle or move the document")]
	HierarchyRequest { parent: NodeId, child: NodeId },
	#[error("injected failure")]
	Injected,
}

/// One mutating adapter call, as recorded by [`MemoryDom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
	CreateElement { node: NodeId, name: String, namespace: Option<String> },
	CreateTextNode { node: NodeId, data: String },
	CreateComment { node: NodeId, data: String },
	AppendChild { parent: NodeId, child: NodeId },
	InsertBefore { parent: NodeId, child: NodeId, anchor: NodeId },
	RemoveChild { parent: NodeId, child: NodeId },
	SetAttribute { element: NodeId, name: String, value: String },
	RemoveAttribute { element: NodeId, name: String },
	SetData { node: NodeId, data: String },
}

#[derive(Debug, Clone)]
enum Data {
	Document,
	Element { name: String, namespace: Option<String>, attributes: Vec<Attribute> },
	Text(String),
	Comment(String),
}

#[derive(Debug, Clone)]
struct Slot {
	data: Data,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// An in-memory document. The document node itself is created along with it.
#[derive(Debug, Clone)]
pub struct MemoryDom {
	slots: Vec<Slot>,
	mutations: Vec<Mutation>,
	fail_after: Option<usize>,
}

impl Default for MemoryDom {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryDom {
	#[must_use]
	pub fn new() -> Self {
		Self {
			slots: vec![Slot {
				data: Data::Document,
				parent: None,
				children: Vec::new(),
			}],
			mutations: Vec::new(),
			fail_after: None,
		}
	}

	/// The document node, which is never removed.
	#[must_use]
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Mutations since creation or the last [`MemoryDom::take_mutations`].
	#[must_use]
	pub fn mutations(&self) -> &[Mutation] {
		&self.mutations
	}

	pub fn take_mutations(&mut self) -> Vec<Mutation> {
		core::mem::take(&mut self.mutations)
	}

	/// Lets `count` further mutating calls succeed, then fails every one after with [`MemoryDomError::Injected`].
	pub fn fail_after(&mut self, count: usize) {
		self.fail_after = Some(count);
	}

	pub fn stop_failing(&mut self) {
		self.fail_after = None;
	}

	/// Total number of nodes ever created, including the document and detached nodes.
	#[must_use]
	pub fn node_count(&self) -> usize {
		self.slots.len()
	}

	/// Whether `node` is the document or (transitively) attached to it.
	#[must_use]
	pub fn is_connected(&self, node: NodeId) -> bool {
		let mut current = Some(node);
		while let Some(id) = current {
			if id == self.root() {
				return true;
			}
			current = self.slots.get(id.0).and_then(|slot| slot.parent);
		}
		false
	}

	fn slot(&self, node: NodeId) -> Result<&Slot, MemoryDomError> {
		self.slots.get(node.0).ok_or(MemoryDomError::UnknownNode(node))
	}

	fn slot_mut(&mut self, node: NodeId) -> Result<&mut Slot, MemoryDomError> {
		self.slots.get_mut(node.0).ok_or(MemoryDomError::UnknownNode(node))
	}

	fn check_injected(&mut self) -> Result<(), MemoryDomError> {
		match &mut self.fail_after {
			Some(0) => {
				warn!("Failing mutation as requested.");
				Err(MemoryDomError::Injected)
			}
			Some(remaining) => {
				*remaining -= 1;
				Ok(())
			}
			None => Ok(()),
		}
	}

	fn push(&mut self, data: Data) -> NodeId {
		let id = NodeId(self.slots.len());
		self.slots.push(Slot {
			data,
			parent: None,
			children: Vec::new(),
		});
		id
	}

	fn record(&mut self, mutation: Mutation) {
		trace!(?mutation, "Recorded mutation.");
		self.mutations.push(mutation)
	}

	/// Validates an insertion of `child` into `parent` and detaches `child` from its current parent.
	fn adopt(&mut self, parent: NodeId, child: NodeId) -> Result<(), MemoryDomError> {
		match self.slot(parent)?.data {
			Data::Document | Data::Element { .. } => (),
			Data::Text(_) | Data::Comment(_) => return Err(MemoryDomError::NotAParent(parent)),
		}
		if let Data::Document = self.slot(child)?.data {
			return Err(MemoryDomError::HierarchyRequest { parent, child });
		}
		let mut ancestor = Some(parent);
		while let Some(id) = ancestor {
			if id == child {
				return Err(MemoryDomError::HierarchyRequest { parent, child });
			}
			ancestor = self.slot(id)?.parent;
		}

		if let Some(old_parent) = self.slot(child)?.parent {
			self.slot_mut(old_parent)?.children.retain(|&c| c != child);
		}
		self.slot_mut(child)?.parent = Some(parent);
		Ok(())
	}

	fn attributes_mut(&mut self, element: NodeId) -> Result<&mut Vec<Attribute>, MemoryDomError> {
		match &mut self.slot_mut(element)?.data {
			Data::Element { attributes, .. } => Ok(attributes),
			_ => Err(MemoryDomError::NotAnElement(element)),
		}
	}
}

impl Dom for MemoryDom {
	type Node = NodeId;
	type Error = MemoryDomError;

	fn create_element(&mut self, name: &str, namespace: Option<&str>) -> Result<NodeId, MemoryDomError> {
		self.check_injected()?;
		let node = self.push(Data::Element {
			name: name.to_owned(),
			namespace: namespace.map(ToOwned::to_owned),
			attributes: Vec::new(),
		});
		self.record(Mutation::CreateElement {
			node,
			name: name.to_owned(),
			namespace: namespace.map(ToOwned::to_owned),
		});
		Ok(node)
	}

	fn create_text_node(&mut self, data: &str) -> Result<NodeId, MemoryDomError> {
		self.check_injected()?;
		let node = self.push(Data::Text(data.to_owned()));
		self.record(Mutation::CreateTextNode { node, data: data.to_owned() });
		Ok(node)
	}

	fn create_comment(&mut self, data: &str) -> Result<NodeId, MemoryDomError> {
		self.check_injected()?;
		let node = self.push(Data::Comment(data.to_owned()));
		self.record(Mutation::CreateComment { node, data: data.to_owned() });
		Ok(node)
	}

	fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryDomError> {
		let (parent, child) = (*parent, *child);
		self.check_injected()?;
		self.adopt(parent, child)?;
		self.slot_mut(parent)?.children.push(child);
		self.record(Mutation::AppendChild { parent, child });
		Ok(())
	}

	fn insert_before(&mut self, parent: &NodeId, child: &NodeId, anchor: &NodeId) -> Result<(), MemoryDomError> {
		let (parent, child, anchor) = (*parent, *child, *anchor);
		self.check_injected()?;
		if self.slot(anchor)?.parent != Some(parent) {
			return Err(MemoryDomError::NotAChild { parent, child: anchor });
		}
		if child == anchor {
			// Inserting a node before itself leaves it in place.
			self.record(Mutation::InsertBefore { parent, child, anchor });
			return Ok(());
		}
		self.adopt(parent, child)?;
		let children = &mut self.slot_mut(parent)?.children;
		let index = children.iter().position(|&c| c == anchor).ok_or(MemoryDomError::NotAChild { parent, child: anchor })?;
		children.insert(index, child);
		self.record(Mutation::InsertBefore { parent, child, anchor });
		Ok(())
	}

	fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryDomError> {
		let (parent, child) = (*parent, *child);
		self.check_injected()?;
		if self.slot(child)?.parent != Some(parent) {
			return Err(MemoryDomError::NotAChild { parent, child });
		}
		self.slot_mut(parent)?.children.retain(|&c| c != child);
		self.slot_mut(child)?.parent = None;
		self.record(Mutation::RemoveChild { parent, child });
		Ok(())
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> Result<(), MemoryDomError> {
		let element = *element;
		self.check_injected()?;
		let attributes = self.attributes_mut(element)?;
		match attributes.iter_mut().find(|a| a.name == name) {
			Some(existing) => existing.value = value.to_owned(),
			None => attributes.push(Attribute::new(name, value)),
		}
		self.record(Mutation::SetAttribute {
			element,
			name: name.to_owned(),
			value: value.to_owned(),
		});
		Ok(())
	}

	fn remove_attribute(&mut self, element: &NodeId, name: &str) -> Result<(), MemoryDomError> {
		let element = *element;
		self.check_injected()?;
		self.attributes_mut(element)?.retain(|a| a.name != name);
		self.record(Mutation::RemoveAttribute { element, name: name.to_owned() });
		Ok(())
	}

	fn set_data(&mut self, node: &NodeId, data: &str) -> Result<(), MemoryDomError> {
		let node = *node;
		self.check_injected()?;
		match &mut self.slot_mut(node)?.data {
			Data::Text(existing) | Data::Comment(existing) => *existing = data.to_owned(),
			_ => return Err(MemoryDomError::NotCharacterData(node)),
		}
		self.record(Mutation::SetData { node, data: data.to_owned() });
		Ok(())
	}

	fn parent_node(&self, node: &NodeId) -> Result<Option<NodeId>, MemoryDomError> {
		Ok(self.slot(*node)?.parent)
	}

	fn next_sibling(&self, node: &NodeId) -> Result<Option<NodeId>, MemoryDomError> {
		let parent = match self.slot(*node)?.parent {
			Some(parent) => parent,
			None => return Ok(None),
		};
		let siblings = &self.slot(parent)?.children;
		Ok(siblings
			.iter()
			.position(|c| c == node)
			.and_then(|index| siblings.get(index + 1))
			.copied())
	}

	fn child_nodes(&self, parent: &NodeId) -> Result<Vec<NodeId>, MemoryDomError> {
		Ok(self.slot(*parent)?.children.clone())
	}
}

impl Inspect for MemoryDom {
	fn inspect(&self, node: &NodeId) -> Result<LiveNode, MemoryDomError> {
		Ok(match &self.slot(*node)?.data {
			Data::Document => LiveNode::Document,
			Data::Element { name, namespace, attributes } => LiveNode::Element {
				name: name.clone(),
				namespace: namespace.clone(),
				attributes: attributes.clone(),
			},
			Data::Text(text) => LiveNode::Text(text.clone()),
			Data::Comment(comment) => LiveNode::Comment(comment.clone()),
		})
	}
}
