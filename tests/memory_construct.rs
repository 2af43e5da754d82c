use vdom_patch::{
	construct,
	memory::{MemoryDom, Mutation},
	Dom, Error, VirtualNode,
};

use fixture_::{assert_live, test_tree};

#[test]
fn construct_is_detached() {
	let mut dom = MemoryDom::new();
	let live = construct(&mut dom, &test_tree()).unwrap();
	assert_eq!(dom.parent_node(&live).unwrap(), None);
	assert!(!dom.is_connected(live));
	assert_live(&dom, live, &test_tree());
}

#[test]
fn construct_fidelity() {
	let mut dom = MemoryDom::new();
	let root = dom.root();
	let tree = test_tree();
	let live = construct(&mut dom, &tree).unwrap();
	dom.append_child(&root, &live).unwrap();

	assert!(dom.is_connected(live));
	assert_eq!(dom.child_nodes(&root).unwrap(), vec![live]);
	assert_live(&dom, live, &tree);
}

#[test]
fn one_call_per_node_and_attribute() {
	let mut dom = MemoryDom::new();
	let tree = VirtualNode::element("h1")
		.with_attribute("id", "greeting")
		.with_attribute("class", "title")
		.with_child(VirtualNode::text("Hello, world!"))
		.with_child(VirtualNode::comment("end"));
	let h1 = construct(&mut dom, &tree).unwrap();

	let text = dom.child_nodes(&h1).unwrap()[0];
	let comment = dom.child_nodes(&h1).unwrap()[1];
	assert_eq!(
		dom.mutations(),
		&[
			Mutation::CreateElement {
				node: h1,
				name: "h1".to_owned(),
				namespace: None
			},
			Mutation::SetAttribute {
				element: h1,
				name: "id".to_owned(),
				value: "greeting".to_owned()
			},
			Mutation::SetAttribute {
				element: h1,
				name: "class".to_owned(),
				value: "title".to_owned()
			},
			Mutation::CreateTextNode {
				node: text,
				data: "Hello, world!".to_owned()
			},
			Mutation::AppendChild { parent: h1, child: text },
			Mutation::CreateComment {
				node: comment,
				data: "end".to_owned()
			},
			Mutation::AppendChild { parent: h1, child: comment },
		]
	);
}

#[test]
fn namespaces_are_kept() {
	let mut dom = MemoryDom::new();
	let tree = VirtualNode::element_ns("http://www.w3.org/2000/svg", "svg").with_child(VirtualNode::element_ns("http://www.w3.org/2000/svg", "circle").with_attribute("r", "4"));
	let live = construct(&mut dom, &tree).unwrap();
	assert_live(&dom, live, &tree);
}

#[test]
fn document_is_rejected() {
	let mut dom = MemoryDom::new();
	let error = construct(&mut dom, &VirtualNode::Document(vec![])).unwrap_err();
	assert!(matches!(error, Error::DocumentNode));
	assert!(error.is_programming_error());
	assert!(dom.mutations().is_empty());
}

#[test]
fn nested_document_is_rejected_before_any_call() {
	let mut dom = MemoryDom::new();
	let tree = VirtualNode::element("div")
		.with_attribute("id", "outer")
		.with_child(VirtualNode::text("before"))
		.with_child(VirtualNode::element("p").with_child(VirtualNode::Document(vec![])));
	assert!(matches!(construct(&mut dom, &tree), Err(Error::DocumentNode)));
	assert!(dom.mutations().is_empty());
	assert_eq!(dom.node_count(), 1);
}
