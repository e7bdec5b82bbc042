//! Hover tracking and highlight state.
//!
//! Every hover event produces a brand new [`HighlightState`]; nothing is
//! mutated in place. The [`HighlightStore`] swaps the current value and
//! notifies its subscribers, which is how the render binding learns that the
//! engine must re-evaluate its per-element callbacks.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::types::{GraphLink, neighbors};

/// Change listeners shared by the interaction stores.
#[derive(Clone, Default)]
pub struct Subscribers {
	callbacks: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl Subscribers {
	pub fn add(&self, callback: impl Fn() + 'static) {
		self.callbacks.borrow_mut().push(Rc::new(callback));
	}

	pub fn notify(&self) {
		// Snapshot first so a callback may subscribe without a double borrow.
		let callbacks = self.callbacks.borrow().clone();
		for callback in callbacks {
			callback();
		}
	}

	pub fn len(&self) -> usize {
		self.callbacks.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// What the pointer is currently over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum Hover {
	#[default]
	Nothing,
	Node(String),
	Link(String),
}

/// Highlighted node and link names derived from the current hover target.
///
/// Invariants:
/// - hovering a node highlights it and all its neighbors, and no links
/// - hovering a link highlights that link and both of its endpoints
/// - hovering nothing highlights nothing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
	hover: Hover,
	nodes: HashSet<String>,
	links: HashSet<String>,
}

impl HighlightState {
	/// State for the pointer resting on a node, or on nothing.
	pub fn hover_node(node: Option<&str>, links: &[GraphLink]) -> Self {
		let Some(name) = node else {
			return Self::default();
		};

		let mut nodes = neighbors(name, links).nodes;
		nodes.insert(name.to_string());

		Self {
			hover: Hover::Node(name.to_string()),
			nodes,
			links: HashSet::new(),
		}
	}

	/// State for the pointer resting on a link, or on nothing.
	pub fn hover_link(link: Option<&GraphLink>) -> Self {
		let Some(link) = link else {
			return Self::default();
		};

		Self {
			hover: Hover::Link(link.id.clone()),
			nodes: HashSet::from([link.source.clone(), link.target.clone()]),
			links: HashSet::from([link.id.clone()]),
		}
	}

	/// Name of the hovered node, if the pointer is over a node.
	pub fn hovered_node(&self) -> Option<&str> {
		match &self.hover {
			Hover::Node(name) => Some(name),
			_ => None,
		}
	}

	pub fn nodes(&self) -> &HashSet<String> {
		&self.nodes
	}

	pub fn links(&self) -> &HashSet<String> {
		&self.links
	}

	pub fn is_node_highlighted(&self, node: &str) -> bool {
		self.nodes.contains(node)
	}

	pub fn is_link_highlighted(&self, link: &str) -> bool {
		self.links.contains(link)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}
}

/// Holds the current [`HighlightState`] and announces replacements.
#[derive(Clone, Default)]
pub struct HighlightStore {
	current: Rc<RefCell<Rc<HighlightState>>>,
	subscribers: Subscribers,
}

impl HighlightStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// The current state. The returned snapshot never changes underfoot.
	pub fn get(&self) -> Rc<HighlightState> {
		self.current.borrow().clone()
	}

	/// Replace the current state and notify subscribers.
	///
	/// Subscribers run even when the new state equals the old one, matching
	/// the engine's expectation of one refresh per hover event.
	pub fn replace(&self, next: HighlightState) {
		*self.current.borrow_mut() = Rc::new(next);
		self.subscribers.notify();
	}

	pub fn clear(&self) {
		self.replace(HighlightState::default());
	}

	pub fn subscribe(&self, callback: impl Fn() + 'static) {
		self.subscribers.add(callback);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;

	fn set(names: &[&str]) -> HashSet<String> {
		names.iter().map(|s| s.to_string()).collect()
	}

	fn links() -> Vec<GraphLink> {
		vec![
			GraphLink::new("ab", "a", "b"),
			GraphLink::new("ca", "c", "a"),
			GraphLink::new("cd", "c", "d"),
		]
	}

	#[test]
	fn test_node_hover_highlights_node_and_neighbors() {
		let state = HighlightState::hover_node(Some("a"), &links());
		assert_eq!(state.nodes(), &set(&["a", "b", "c"]));
		assert!(state.links().is_empty());
		assert_eq!(state.hovered_node(), Some("a"));
	}

	#[test]
	fn test_isolated_node_highlights_only_itself() {
		let state = HighlightState::hover_node(Some("lonely"), &links());
		assert_eq!(state.nodes(), &set(&["lonely"]));
	}

	#[test]
	fn test_null_hover_clears_everything() {
		let state = HighlightState::hover_node(None, &links());
		assert!(state.is_empty());
		assert_eq!(state.hovered_node(), None);
		assert_eq!(HighlightState::hover_link(None), HighlightState::default());
	}

	#[test]
	fn test_link_hover_highlights_link_and_endpoints() {
		let all = links();
		let state = HighlightState::hover_link(Some(&all[2]));
		assert_eq!(state.links(), &set(&["cd"]));
		assert_eq!(state.nodes(), &set(&["c", "d"]));
		assert_eq!(state.hover, Hover::Link("cd".into()));
		assert_eq!(state.hovered_node(), None);
	}

	#[test]
	fn test_store_replaces_instead_of_merging() {
		let all = links();
		let store = HighlightStore::new();
		store.replace(HighlightState::hover_link(Some(&all[0])));
		store.replace(HighlightState::hover_link(Some(&all[2])));
		let state = store.get();
		assert_eq!(state.links(), &set(&["cd"]));
		assert_eq!(state.nodes(), &set(&["c", "d"]));
	}

	#[test]
	fn test_node_hover_is_idempotent() {
		let store = HighlightStore::new();
		store.replace(HighlightState::hover_node(Some("a"), &links()));
		let once = store.get();
		store.replace(HighlightState::hover_node(Some("a"), &links()));
		assert_eq!(*once, *store.get());
	}

	#[test]
	fn test_snapshot_survives_replacement() {
		let store = HighlightStore::new();
		store.replace(HighlightState::hover_node(Some("a"), &links()));
		let held = store.get();
		store.clear();
		assert_eq!(held.nodes(), &set(&["a", "b", "c"]));
		assert!(store.get().is_empty());
	}

	#[test]
	fn test_every_replacement_notifies() {
		let store = HighlightStore::new();
		let refreshes = Rc::new(Cell::new(0));
		let seen = refreshes.clone();
		store.subscribe(move || seen.set(seen.get() + 1));

		store.replace(HighlightState::hover_node(Some("a"), &links()));
		store.replace(HighlightState::hover_node(Some("a"), &links()));
		store.clear();
		assert_eq!(refreshes.get(), 3);
	}
}
