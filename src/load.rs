//! Reading live trees back into [`VirtualNode`]s.
//!
//! This is useful to adopt pre-rendered content as the previous tree of a first patch,
//! and to compare a live subtree against the virtual tree it should represent.

use crate::{
	diff::Content,
	dom::Dom,
	node::{Attribute, Attributes, Element, VirtualNode},
};
use tracing::{instrument, trace_span};

/// A shallow description of one live node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveNode {
	Document,
	Element {
		name: String,
		/// [`None`] for the host's default (HTML) namespace.
		namespace: Option<String>,
		attributes: Vec<Attribute>,
	},
	Text(String),
	Comment(String),
}

/// A [`Dom`] whose nodes can be read.
pub trait Inspect: Dom {
	/// # Errors
	///
	/// Iff `node` is of a kind that has no [`VirtualNode`] equivalent, or the host fails.
	fn inspect(&self, node: &Self::Node) -> Result<LiveNode, Self::Error>;
}

/// Recursively loads `node` and its descendants.
///
/// # Errors
///
/// Forwards the first error of [`Inspect::inspect`] or [`Dom::child_nodes`].
#[instrument(skip(dom))]
pub fn load_node<D: Inspect>(dom: &D, node: &D::Node) -> Result<VirtualNode, D::Error> {
	Ok(match dom.inspect(node)? {
		LiveNode::Document => VirtualNode::Document(load_child_nodes(dom, node)?),
		LiveNode::Element { name, namespace, attributes } => {
			let span = trace_span!("Loading element", tag = name.as_str(), ?namespace, attributes = attributes.len());
			let _enter = span.enter();
			VirtualNode::Element(Element {
				children: load_child_nodes(dom, node)?,
				name,
				namespace,
				attributes: load_attributes(attributes),
			})
		}
		LiveNode::Text(text) => {
			let span = trace_span!("Loading text node", text = ?Content(&text));
			let _enter = span.enter();
			VirtualNode::Text(text)
		}
		LiveNode::Comment(comment) => VirtualNode::Comment(comment),
	})
}

/// Loads the children of `parent`, in order.
///
/// # Errors
///
/// As [`load_node`].
pub fn load_child_nodes<D: Inspect>(dom: &D, parent: &D::Node) -> Result<Vec<VirtualNode>, D::Error> {
	dom.child_nodes(parent)?.iter().map(|child| load_node(dom, child)).collect()
}

/// Duplicate names, which some hosts tolerate, collapse onto the first position with the last value.
pub fn load_attributes(attributes: impl IntoIterator<Item = Attribute>) -> Attributes {
	attributes.into_iter().map(|Attribute { name, value }| (name, value)).collect()
}
