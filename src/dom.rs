//! The capability set through which live documents are created and mutated.
//!
//! The reconciler never looks inside live nodes. Everything it does to a host goes through [`Dom`],
//! so the same differ drives a browser document ([`WebDom`](`crate::web::WebDom`))
//! or a headless arena ([`MemoryDom`](`crate::memory::MemoryDom`)).

use core::fmt::Debug;

/// A live document backend.
///
/// Mutating operations take `&mut self`. Navigation is read-only and is only used to locate
/// the live counterpart of a previous virtual node by position.
///
/// # Correct Use
///
/// Handles are identity tokens: two handles compare equal iff they refer to the same live node.
/// Removal detaches a node from its parent; whether and when its resources are reclaimed is up to the implementation.
pub trait Dom {
	/// An opaque reference to one live node.
	type Node: Clone + PartialEq + Debug;
	type Error: std::error::Error + 'static;

	/// Creates a detached element. [`None`] selects the host's default namespace.
	fn create_element(&mut self, name: &str, namespace: Option<&str>) -> Result<Self::Node, Self::Error>;
	fn create_text_node(&mut self, data: &str) -> Result<Self::Node, Self::Error>;
	fn create_comment(&mut self, data: &str) -> Result<Self::Node, Self::Error>;

	/// Appends `child` as last child of `parent`, detaching it from its current parent first if necessary.
	fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
	/// Inserts `child` into `parent` immediately before `anchor`, which must be a child of `parent`.
	fn insert_before(&mut self, parent: &Self::Node, child: &Self::Node, anchor: &Self::Node) -> Result<(), Self::Error>;
	fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;
	fn remove_attribute(&mut self, element: &Self::Node, name: &str) -> Result<(), Self::Error>;
	/// Replaces the payload of a text or comment node.
	fn set_data(&mut self, node: &Self::Node, data: &str) -> Result<(), Self::Error>;

	fn parent_node(&self, node: &Self::Node) -> Result<Option<Self::Node>, Self::Error>;
	fn next_sibling(&self, node: &Self::Node) -> Result<Option<Self::Node>, Self::Error>;
	/// A snapshot of `parent`'s children in order.
	fn child_nodes(&self, parent: &Self::Node) -> Result<Vec<Self::Node>, Self::Error>;
}
