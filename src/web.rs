//! A [`Dom`] for browser documents via [`web_sys`].

use crate::{
	dom::Dom,
	load::{Inspect, LiveNode},
	node::Attribute,
};
use tracing::trace;
use wasm_bindgen::{JsCast, JsValue};

/// Browsers report this namespace for elements created without one.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

#[derive(Debug, thiserror::Error)]
pub enum WebError {
	#[error("`{operation}` threw: {message}")]
	Js { operation: &'static str, message: String },
	#[error("expected an element but found node type {0}")]
	NotAnElement(u16),
	#[error("expected text or comment but found node type {0}")]
	NotCharacterData(u16),
	#[error("node type {0} has no virtual equivalent")]
	UnsupportedNodeType(u16),
}

impl WebError {
	fn js(operation: &'static str) -> impl FnOnce(JsValue) -> Self {
		move |value| {
			let message = match value.dyn_ref::<js_sys::Error>() {
				Some(error) => String::from(error.message()),
				None => value.as_string().unwrap_or_else(|| format!("{:?}", value)),
			};
			WebError::Js { operation, message }
		}
	}
}

/// Creates nodes in one [`web_sys::Document`]. Handles are [`web_sys::Node`]s, which compare by identity.
#[derive(Debug, Clone)]
pub struct WebDom {
	document: web_sys::Document,
}

impl WebDom {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}
}

fn as_element(node: &web_sys::Node) -> Result<&web_sys::Element, WebError> {
	node.dyn_ref::<web_sys::Element>().ok_or_else(|| WebError::NotAnElement(node.node_type()))
}

impl Dom for WebDom {
	type Node = web_sys::Node;
	type Error = WebError;

	fn create_element(&mut self, name: &str, namespace: Option<&str>) -> Result<web_sys::Node, WebError> {
		let element = match namespace {
			Some(namespace) => self.document.create_element_ns(Some(namespace), name),
			None => self.document.create_element(name),
		}
		.map_err(WebError::js("createElement"))?;
		Ok(element.into())
	}

	fn create_text_node(&mut self, data: &str) -> Result<web_sys::Node, WebError> {
		Ok(self.document.create_text_node(data).into())
	}

	fn create_comment(&mut self, data: &str) -> Result<web_sys::Node, WebError> {
		Ok(self.document.create_comment(data).into())
	}

	fn append_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), WebError> {
		parent.append_child(child).map_err(WebError::js("appendChild"))?;
		Ok(())
	}

	fn insert_before(&mut self, parent: &web_sys::Node, child: &web_sys::Node, anchor: &web_sys::Node) -> Result<(), WebError> {
		parent.insert_before(child, Some(anchor)).map_err(WebError::js("insertBefore"))?;
		Ok(())
	}

	fn remove_child(&mut self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), WebError> {
		parent.remove_child(child).map_err(WebError::js("removeChild"))?;
		Ok(())
	}

	fn set_attribute(&mut self, element: &web_sys::Node, name: &str, value: &str) -> Result<(), WebError> {
		as_element(element)?.set_attribute(name, value).map_err(WebError::js("setAttribute"))
	}

	fn remove_attribute(&mut self, element: &web_sys::Node, name: &str) -> Result<(), WebError> {
		as_element(element)?.remove_attribute(name).map_err(WebError::js("removeAttribute"))
	}

	fn set_data(&mut self, node: &web_sys::Node, data: &str) -> Result<(), WebError> {
		match node.dyn_ref::<web_sys::CharacterData>() {
			Some(character_data) => {
				character_data.set_data(data);
				Ok(())
			}
			None => Err(WebError::NotCharacterData(node.node_type())),
		}
	}

	fn parent_node(&self, node: &web_sys::Node) -> Result<Option<web_sys::Node>, WebError> {
		Ok(node.parent_node())
	}

	fn next_sibling(&self, node: &web_sys::Node) -> Result<Option<web_sys::Node>, WebError> {
		Ok(node.next_sibling())
	}

	fn child_nodes(&self, parent: &web_sys::Node) -> Result<Vec<web_sys::Node>, WebError> {
		let child_nodes = parent.child_nodes();
		Ok((0..child_nodes.length()).filter_map(|i| child_nodes.item(i)).collect())
	}
}

impl Inspect for WebDom {
	fn inspect(&self, node: &web_sys::Node) -> Result<LiveNode, WebError> {
		if let Some(element) = node.dyn_ref::<web_sys::Element>() {
			let attributes = element.attributes();
			let attributes = (0..attributes.length())
				.filter_map(|i| attributes.item(i))
				.map(|attribute| Attribute::new(attribute.name(), attribute.value()))
				.collect();
			let namespace = element.namespace_uri().filter(|namespace| namespace != XHTML_NAMESPACE);
			trace!(tag = %element.local_name(), ?namespace, "Inspected element.");
			Ok(LiveNode::Element {
				name: element.local_name(),
				namespace,
				attributes,
			})
		} else if let Some(text) = node.dyn_ref::<web_sys::Text>() {
			Ok(LiveNode::Text(text.data()))
		} else if let Some(comment) = node.dyn_ref::<web_sys::Comment>() {
			Ok(LiveNode::Comment(comment.data()))
		} else if node.node_type() == web_sys::Node::DOCUMENT_NODE {
			Ok(LiveNode::Document)
		} else {
			Err(WebError::UnsupportedNodeType(node.node_type()))
		}
	}
}
