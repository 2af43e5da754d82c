#![doc(html_root_url = "https://docs.rs/vdom-patch/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A keyless reconciler between virtual trees and live documents.
//!
//! Each render, [`patch`] compares the current [`VirtualNode`] tree with a [`Clone`] of the tree that was patched last time
//! and applies the resulting mutations through a [`Dom`] backend.
//! Node identity is kept wherever kind and tag allow an in-place update. Anything else is removed and rebuilt.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod diff;
pub mod dom;
mod error;
pub mod load;
pub mod memory;
pub mod node;
pub mod web;

pub use diff::{construct, patch, Differ};
pub use dom::Dom;
pub use error::Error;
pub use node::{Attribute, Attributes, Element, NodeKind, VirtualNode};
