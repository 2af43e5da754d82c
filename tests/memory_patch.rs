use vdom_patch::{
	memory::{MemoryDom, Mutation},
	patch, Dom, VirtualNode,
};

use fixture_::{assert_live, child_mut, mount, test_tree};

#[test]
fn first_render() {
	let mut dom = MemoryDom::new();
	let root = dom.root();
	let tree = VirtualNode::element("h1").with_child(VirtualNode::text("Hello, world!"));

	let live = patch(&mut dom, &root, &tree, None).unwrap();

	assert_eq!(dom.child_nodes(&root).unwrap(), vec![live]);
	assert_live(&dom, live, &tree);
}

#[test]
fn identical_patch_is_silent() {
	let tree = test_tree();
	let (mut dom, live) = mount(&tree);

	let patched = patch(&mut dom, &live, &tree, Some(&tree.clone())).unwrap();

	assert_eq!(patched, live);
	assert_eq!(dom.mutations(), &[]);
}

#[test]
fn text_update() {
	let previous = VirtualNode::text("Hello, world!");
	let (mut dom, live) = mount(&previous);

	let current = VirtualNode::text("Hi everyone!");
	let patched = patch(&mut dom, &live, &current, Some(&previous)).unwrap();

	assert_eq!(patched, live);
	assert_eq!(
		dom.mutations(),
		&[Mutation::SetData {
			node: live,
			data: "Hi everyone!".to_owned()
		}]
	);
	assert_live(&dom, live, &current);
}

#[test]
fn comment_update() {
	let previous = VirtualNode::element("div").with_child(VirtualNode::comment("a"));
	let (mut dom, live) = mount(&previous);
	let comment = dom.child_nodes(&live).unwrap()[0];

	let current = VirtualNode::element("div").with_child(VirtualNode::comment("b"));
	patch(&mut dom, &live, &current, Some(&previous)).unwrap();

	assert_eq!(dom.mutations(), &[Mutation::SetData { node: comment, data: "b".to_owned() }]);
	assert_live(&dom, live, &current);
}

/// Replays a sequence of edits across render cycles, threading the previous tree as a clone.
#[test]
fn render_cycles() {
	let mut tree = test_tree();
	let mut dom = MemoryDom::new();
	let root = dom.root();

	let body = patch(&mut dom, &root, &tree, None).unwrap();
	let mut previous = tree.clone();
	assert_live(&dom, body, &tree);
	dom.take_mutations();

	let live_children = dom.child_nodes(&body).unwrap();
	let (h1, p_0, p_1) = (live_children[0], live_children[1], live_children[2]);

	// Change some text.
	*child_mut(child_mut(&mut tree, 0), 0).data_mut().unwrap() = "Hi everyone!".to_owned();
	assert_eq!(patch(&mut dom, &body, &tree, Some(&previous)).unwrap(), body);
	previous = tree.clone();
	assert_live(&dom, body, &tree);
	assert_eq!(
		dom.take_mutations(),
		vec![Mutation::SetData {
			node: dom.child_nodes(&h1).unwrap()[0],
			data: "Hi everyone!".to_owned()
		}]
	);

	// Change some attributes.
	tree.as_element_mut().unwrap().attributes.set("charset", "ascii");
	child_mut(&mut tree, 0).as_element_mut().unwrap().attributes.set("class", "title");
	child_mut(&mut tree, 2).as_element_mut().unwrap().attributes.clear();
	assert_eq!(patch(&mut dom, &body, &tree, Some(&previous)).unwrap(), body);
	previous = tree.clone();
	assert_live(&dom, body, &tree);
	assert_eq!(
		dom.take_mutations(),
		vec![
			Mutation::SetAttribute {
				element: body,
				name: "charset".to_owned(),
				value: "ascii".to_owned()
			},
			Mutation::SetAttribute {
				element: h1,
				name: "class".to_owned(),
				value: "title".to_owned()
			},
			Mutation::RemoveAttribute {
				element: p_1,
				name: "data-foo".to_owned()
			},
		]
	);

	// Move a child to another parent.
	let bar_live = dom.child_nodes(&p_0).unwrap()[2];
	let bar = child_mut(&mut tree, 1).children_mut().unwrap().remove(2);
	child_mut(&mut tree, 2).children_mut().unwrap().push(bar);
	assert_eq!(patch(&mut dom, &body, &tree, Some(&previous)).unwrap(), body);
	previous = tree.clone();
	assert_live(&dom, body, &tree);
	let mutations = dom.take_mutations();
	let new_bar = dom.child_nodes(&p_1).unwrap()[1];
	assert_ne!(new_bar, bar_live);
	assert_eq!(
		mutations,
		vec![
			Mutation::RemoveChild { parent: p_0, child: bar_live },
			Mutation::CreateTextNode {
				node: new_bar,
				data: "bar".to_owned()
			},
			Mutation::AppendChild { parent: p_1, child: new_bar },
		]
	);
	assert_eq!(dom.child_nodes(&p_0).unwrap().len(), 6);
	assert_eq!(dom.child_nodes(&p_1).unwrap().len(), 2);

	// Change an element's name.
	child_mut(&mut tree, 1).as_element_mut().unwrap().name = "div".to_owned();
	assert_eq!(patch(&mut dom, &body, &tree, Some(&previous)).unwrap(), body);
	assert_live(&dom, body, &tree);
	let live_children = dom.child_nodes(&body).unwrap();
	assert_eq!(live_children.len(), 3);
	assert_eq!(live_children[0], h1);
	assert_ne!(live_children[1], p_0);
	assert_eq!(live_children[2], p_1);
	assert!(!dom.is_connected(p_0));
	assert!(dom
		.mutations()
		.iter()
		.any(|m| *m == Mutation::InsertBefore { parent: body, child: live_children[1], anchor: p_1 }));
}

#[test]
fn root_tag_rename_replaces_in_place() {
	let previous = VirtualNode::element("p")
		.with_attribute("id", "x")
		.with_child(VirtualNode::text("a"))
		.with_child(VirtualNode::element("br"));
	let mut dom = MemoryDom::new();
	let root = dom.root();
	let before = patch(&mut dom, &root, &VirtualNode::comment("before"), None).unwrap();
	let live = patch(&mut dom, &root, &previous, None).unwrap();
	let after = patch(&mut dom, &root, &VirtualNode::comment("after"), None).unwrap();

	let mut current = previous.clone();
	current.as_element_mut().unwrap().name = "div".to_owned();
	let replaced = patch(&mut dom, &live, &current, Some(&previous)).unwrap();

	assert_ne!(replaced, live);
	assert!(!dom.is_connected(live));
	assert_eq!(dom.child_nodes(&root).unwrap(), vec![before, replaced, after]);
	assert_live(&dom, replaced, &current);
}

#[test]
fn root_kind_change_replaces_last_child() {
	let previous = VirtualNode::text("plain");
	let (mut dom, live) = mount(&previous);
	let root = dom.root();

	let current = VirtualNode::element("em").with_child(VirtualNode::text("plain"));
	let replaced = patch(&mut dom, &live, &current, Some(&previous)).unwrap();

	assert_eq!(dom.child_nodes(&root).unwrap(), vec![replaced]);
	assert_eq!(dom.mutations()[0], Mutation::RemoveChild { parent: root, child: live });
	assert_live(&dom, replaced, &current);
}

#[test]
fn namespace_change_replaces() {
	let previous = VirtualNode::element("a");
	let (mut dom, live) = mount(&previous);

	let current = VirtualNode::element_ns("http://www.w3.org/2000/svg", "a");
	let replaced = patch(&mut dom, &live, &current, Some(&previous)).unwrap();

	assert_ne!(replaced, live);
	assert_live(&dom, replaced, &current);
}

#[test]
fn detached_root_replacement_is_returned_detached() {
	let mut dom = MemoryDom::new();
	let previous = VirtualNode::element("p");
	let live = vdom_patch::construct(&mut dom, &previous).unwrap();
	dom.take_mutations();

	let current = VirtualNode::element("div");
	let replaced = patch(&mut dom, &live, &current, Some(&previous)).unwrap();

	assert_ne!(replaced, live);
	assert_eq!(dom.parent_node(&replaced).unwrap(), None);
	assert!(!dom.mutations().iter().any(|m| matches!(m, Mutation::RemoveChild { .. })));
	assert_live(&dom, replaced, &current);
}
