//! Construction and reconciliation of live subtrees.
//!
//! Children are matched positionally, without keys: a common prefix and suffix of compatible nodes is updated in place,
//! and whatever remains in between is removed and rebuilt. Reordered children are therefore recreated rather than moved.

use crate::{
	dom::Dom,
	error::Error,
	node::{Attribute, Element, VirtualNode},
};
use core::fmt::{self, Debug};
use hashbrown::{HashMap, HashSet};
use tracing::{error, instrument, level_filters::STATIC_MAX_LEVEL, trace, trace_span, warn, Level};

/// The depth limit used by [`construct`], [`patch`] and [`Differ::new`].
pub const DEFAULT_DEPTH_LIMIT: usize = 512;

/// Builds live subtrees from `node`. The result is detached.
///
/// # Errors
///
/// [`Error::DocumentNode`] iff `node` is or contains a [`VirtualNode::Document`], before any adapter call is made.
/// Adapter failures are forwarded as [`Error::Dom`], in which case the partially built subtree is abandoned.
pub fn construct<D: Dom>(dom: &mut D, node: &VirtualNode) -> Result<D::Node, Error<D::Error>> {
	Differ::new(dom).construct(node)
}

/// Converges the live node `live` from `previous` to `current` and returns the live node now representing `current`.
///
/// With `previous = None`, `current` is constructed and appended to `live` instead, and the new child is returned.
///
/// # Errors
///
/// See [`Differ::patch`].
pub fn patch<D: Dom>(dom: &mut D, live: &D::Node, current: &VirtualNode, previous: Option<&VirtualNode>) -> Result<D::Node, Error<D::Error>> {
	Differ::new(dom).patch(live, current, previous)
}

/// Drives a [`Dom`] to agree with virtual trees.
///
/// A `Differ` holds no state between calls apart from its configuration.
/// The previous tree is threaded through by the caller, usually as a [`Clone`] of the last successfully patched tree.
///
/// # Correct Use
///
/// `previous` must be exactly the tree that the live subtree was last constructed or patched to.
/// If a live child list is found to disagree with it in length, that child list is rebuilt from scratch (and an error is logged),
/// but other divergence (e.g. modified attributes) goes unnoticed.
pub struct Differ<'a, D: Dom> {
	dom: &'a mut D,
	depth_limit: usize,
}

impl<'a, D: Dom> Differ<'a, D> {
	#[must_use]
	pub fn new(dom: &'a mut D) -> Self {
		Self {
			dom,
			depth_limit: DEFAULT_DEPTH_LIMIT,
		}
	}

	/// Sets the maximum virtual tree depth accepted by [`Differ::construct`] and [`Differ::patch`].
	///
	/// The limit bounds the reconciler's recursion. A lone leaf has depth 1.
	#[must_use]
	pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
		self.depth_limit = depth_limit;
		self
	}

	#[must_use]
	pub fn depth_limit(&self) -> usize {
		self.depth_limit
	}

	/// See [`construct`].
	///
	/// # Errors
	///
	/// [`Error::DepthLimit`] iff `node` is deeper than [`Differ::depth_limit`].
	/// Otherwise as [`construct`].
	#[instrument(skip(self, node), fields(kind = %node.kind()))]
	pub fn construct(&mut self, node: &VirtualNode) -> Result<D::Node, Error<D::Error>> {
		validate::<D::Error>(node, self.depth_limit)?;
		self.create(node)
	}

	/// See [`patch`].
	///
	/// # Errors
	///
	/// Programming errors ([`Error::DocumentNode`], [`Error::DepthLimit`]) are raised for either tree before the live document is touched.
	///
	/// [`Error::Dom`] is returned as soon as the adapter fails. Mutations made up to that point stay in place.
	#[instrument(skip(self, current, previous), fields(first_render = previous.is_none()))]
	pub fn patch(&mut self, live: &D::Node, current: &VirtualNode, previous: Option<&VirtualNode>) -> Result<D::Node, Error<D::Error>> {
		validate::<D::Error>(current, self.depth_limit)?;
		match previous {
			None => {
				let node = self.create(current)?;
				self.dom.append_child(live, &node)?;
				Ok(node)
			}
			Some(previous) => {
				validate::<D::Error>(previous, self.depth_limit)?;
				self.diff_node(live, previous, current)
			}
		}
	}

	fn create(&mut self, node: &VirtualNode) -> Result<D::Node, Error<D::Error>> {
		match node {
			VirtualNode::Element(Element {
				name,
				namespace,
				attributes,
				children,
			}) => {
				let span = trace_span!("Creating element", tag = name.as_str(), ?namespace, attributes = attributes.len(), children = children.len());
				let _enter = span.enter();

				let element = self.dom.create_element(name, namespace.as_deref())?;
				for Attribute { name, value } in attributes {
					trace!(attribute = name.as_str(), value = ?Content(value), "Setting attribute.");
					self.dom.set_attribute(&element, name, value)?;
				}
				for child in children {
					let child = self.create(child)?;
					self.dom.append_child(&element, &child)?;
				}
				Ok(element)
			}

			VirtualNode::Text(text) => {
				let span = trace_span!("Creating text node", text = ?Content(text));
				let _enter = span.enter();
				Ok(self.dom.create_text_node(text)?)
			}

			VirtualNode::Comment(comment) => {
				let span = trace_span!("Creating comment", comment = ?Content(comment));
				let _enter = span.enter();
				Ok(self.dom.create_comment(comment)?)
			}

			VirtualNode::Document(_) => {
				error!("Tried to create a document node.");
				Err(Error::DocumentNode)
			}
		}
	}

	/// Updates `live` from `n_1` to `n_2`, replacing it if they aren't compatible.
	fn diff_node(&mut self, live: &D::Node, n_1: &VirtualNode, n_2: &VirtualNode) -> Result<D::Node, Error<D::Error>> {
		match (n_1, n_2) {
			(VirtualNode::Text(t_1), VirtualNode::Text(t_2)) => {
				let span = trace_span!("Diffing text node", t_1 = ?Content(t_1), t_2 = ?Content(t_2));
				let _enter = span.enter();
				if t_1 != t_2 {
					self.dom.set_data(live, t_2)?;
				}
				Ok(live.clone())
			}

			(VirtualNode::Comment(c_1), VirtualNode::Comment(c_2)) => {
				let span = trace_span!("Diffing comment", c_1 = ?Content(c_1), c_2 = ?Content(c_2));
				let _enter = span.enter();
				if c_1 != c_2 {
					self.dom.set_data(live, c_2)?;
				}
				Ok(live.clone())
			}

			(VirtualNode::Element(e_1), VirtualNode::Element(e_2)) if n_1.is_compatible_with(n_2) => {
				let span = trace_span!("Diffing element", tag = e_1.name.as_str(), namespace = ?e_1.namespace);
				let _enter = span.enter();
				self.update_element(live, e_1, e_2)?;
				Ok(live.clone())
			}

			// Mismatching nodes: Destroy and rebuild.
			(n_1, n_2) => self.replace(live, n_1, n_2),
		}
	}

	fn replace(&mut self, live: &D::Node, n_1: &VirtualNode, n_2: &VirtualNode) -> Result<D::Node, Error<D::Error>> {
		let span = trace_span!("Replacing mismatching", from = %n_1.kind(), to = %n_2.kind());
		let _enter = span.enter();

		if STATIC_MAX_LEVEL >= Level::WARN {
			if let (VirtualNode::Element(e_1), VirtualNode::Element(e_2)) = (n_1, n_2) {
				if e_1.name != e_2.name && e_1.name.eq_ignore_ascii_case(&e_2.name) && e_1.namespace == e_2.namespace {
					warn!("Recreating element due to different tag name casing: {:?} -> {:?}", e_1.name, e_2.name)
				}
			}
		}

		let parent = match self.dom.parent_node(live)? {
			Some(parent) => parent,
			None => {
				warn!("Replaced node has no parent. Its replacement is returned detached.");
				return self.create(n_2);
			}
		};
		let next_sibling = self.dom.next_sibling(live)?;

		self.dom.remove_child(&parent, live)?;
		let node = self.create(n_2)?;
		match next_sibling {
			Some(anchor) => self.dom.insert_before(&parent, &node, &anchor)?,
			None => self.dom.append_child(&parent, &node)?,
		}
		Ok(node)
	}

	#[allow(clippy::similar_names)]
	fn update_element(&mut self, element: &D::Node, e_1: &Element, e_2: &Element) -> Result<(), Error<D::Error>> {
		debug_assert_eq!(e_1.name, e_2.name);
		debug_assert_eq!(e_1.namespace, e_2.namespace);

		self.diff_attributes(element, e_1.attributes.as_slice(), e_2.attributes.as_slice())?;

		if e_1.children.is_empty() && e_2.children.is_empty() {
			return Ok(());
		}
		self.diff_children(element, &e_1.children, &e_2.children)
	}

	/// All removals happen before all additions.
	fn diff_attributes(&mut self, element: &D::Node, mut a_1: &[Attribute], mut a_2: &[Attribute]) -> Result<(), Error<D::Error>> {
		// Names are unique, so a name in the common prefix or suffix can't appear anywhere else on either side.
		while !a_1.is_empty() && a_1.first() == a_2.first() {
			a_1 = &a_1[1..];
			a_2 = &a_2[1..];
		}
		while !a_1.is_empty() && a_1.last() == a_2.last() {
			a_1 = &a_1[..a_1.len() - 1];
			a_2 = &a_2[..a_2.len() - 1];
		}
		if a_1.is_empty() && a_2.is_empty() {
			return Ok(());
		}

		let previous: HashMap<&str, &str> = a_1.iter().map(|a| (a.name.as_str(), a.value.as_str())).collect();
		let current: HashSet<&str> = a_2.iter().map(|a| a.name.as_str()).collect();

		for Attribute { name, value } in a_1 {
			if !current.contains(name.as_str()) {
				trace!(attribute = name.as_str(), value = ?Content(value), "Removing attribute.");
				self.dom.remove_attribute(element, name)?;
			}
		}

		for Attribute { name, value } in a_2 {
			if previous.get(name.as_str()) != Some(&value.as_str()) {
				trace!(attribute = name.as_str(), value = ?Content(value), "Setting attribute.");
				self.dom.set_attribute(element, name, value)?;
			}
		}

		Ok(())
	}

	#[allow(clippy::similar_names)]
	fn diff_children(&mut self, parent: &D::Node, c_1: &[VirtualNode], c_2: &[VirtualNode]) -> Result<(), Error<D::Error>> {
		let span = trace_span!("Diffing children", "c_1.len()" = c_1.len(), "c_2.len()" = c_2.len());
		let _enter = span.enter();

		let live = self.dom.child_nodes(parent)?;
		if live.len() != c_1.len() {
			error!(
				"Expected {} live child node(s) but found {}. Rebuilding all children.",
				c_1.len(),
				live.len()
			);
			for node in &live {
				self.dom.remove_child(parent, node)?;
			}
			for child in c_2 {
				let node = self.create(child)?;
				self.dom.append_child(parent, &node)?;
			}
			return Ok(());
		}

		let mut start = 0;
		while start < c_1.len() && start < c_2.len() && c_1[start].is_compatible_with(&c_2[start]) {
			self.diff_node(&live[start], &c_1[start], &c_2[start])?;
			start += 1;
		}

		let (mut end_1, mut end_2) = (c_1.len(), c_2.len());
		while end_1 > start && end_2 > start && c_1[end_1 - 1].is_compatible_with(&c_2[end_2 - 1]) {
			self.diff_node(&live[end_1 - 1], &c_1[end_1 - 1], &c_2[end_2 - 1])?;
			end_1 -= 1;
			end_2 -= 1;
		}

		trace!(
			"Matched {} leading and {} trailing child node(s). Removing {} and creating {}.",
			start,
			c_1.len() - end_1,
			end_1 - start,
			end_2 - start
		);

		for (removed, node) in c_1[start..end_1].iter().zip(&live[start..end_1]) {
			let span = trace_span!("Removing", kind = %removed.kind());
			let _enter = span.enter();
			self.dom.remove_child(parent, node)?;
		}

		// Nodes matched in the suffix keep their identity, so the first of them is still a valid anchor.
		let anchor = live.get(end_1);
		for added in &c_2[start..end_2] {
			let node = self.create(added)?;
			match anchor {
				Some(anchor) => self.dom.insert_before(parent, &node, anchor)?,
				None => self.dom.append_child(parent, &node)?,
			}
		}

		Ok(())
	}
}

/// Rejects trees that must not reach the adapter, so that programming errors never follow partial mutations.
fn validate<E>(node: &VirtualNode, depth_limit: usize) -> Result<(), Error<E>>
where
	E: std::error::Error + 'static,
{
	let mut stack = vec![(node, 1_usize)];
	while let Some((node, depth)) = stack.pop() {
		if depth > depth_limit {
			error!("Depth limit reached");
			return Err(Error::DepthLimit { limit: depth_limit });
		}
		match node {
			VirtualNode::Document(_) => {
				error!("Document node encountered at depth {}.", depth);
				return Err(Error::DocumentNode);
			}
			VirtualNode::Element(element) => stack.extend(element.children.iter().map(|child| (child, depth + 1))),
			VirtualNode::Text(_) | VirtualNode::Comment(_) => (),
		}
	}
	Ok(())
}

/// Page content as it appears in logs: verbatim only with the `dangerous-logging` feature.
pub(crate) struct Content<'a>(pub(crate) &'a str);
impl Debug for Content<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if cfg!(feature = "dangerous-logging") {
			Debug::fmt(self.0, f)
		} else {
			write!(f, "<{} bytes>", self.0.len())
		}
	}
}
