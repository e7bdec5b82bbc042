//! Hidden-node filter.
//!
//! The set is shared: the render binding reads it for every node, while the
//! context menu (owned by the host) mutates it through a cloned handle. Every
//! mutation notifies subscribers so the engine re-evaluates visibility.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::state::Subscribers;

/// True iff `node` is not in `hidden`.
pub fn is_visible(node: &str, hidden: &HashSet<String>) -> bool {
	!hidden.contains(node)
}

/// Shared handle to the set of hidden node names.
///
/// Cloning the handle shares the underlying set.
#[derive(Clone, Default)]
pub struct VisibilityFilter {
	hidden: Rc<RefCell<HashSet<String>>>,
	subscribers: Subscribers,
}

impl VisibilityFilter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_visible(&self, node: &str) -> bool {
		is_visible(node, &self.hidden.borrow())
	}

	/// Hide a node. Returns false if it was already hidden.
	pub fn hide(&self, node: impl Into<String>) -> bool {
		let inserted = self.hidden.borrow_mut().insert(node.into());
		if inserted {
			self.subscribers.notify();
		}
		inserted
	}

	/// Show a previously hidden node. Returns false if it was not hidden.
	pub fn show(&self, node: &str) -> bool {
		let removed = self.hidden.borrow_mut().remove(node);
		if removed {
			self.subscribers.notify();
		}
		removed
	}

	/// Replace the whole hidden set.
	pub fn set_hidden(&self, hidden: HashSet<String>) {
		*self.hidden.borrow_mut() = hidden;
		self.subscribers.notify();
	}

	/// Show every node again.
	pub fn reset(&self) {
		if self.hidden.borrow().is_empty() {
			return;
		}
		self.hidden.borrow_mut().clear();
		self.subscribers.notify();
	}

	/// Snapshot of the hidden set.
	pub fn hidden(&self) -> HashSet<String> {
		self.hidden.borrow().clone()
	}

	/// Run `callback` after every change to the hidden set.
	pub fn subscribe(&self, callback: impl Fn() + 'static) {
		self.subscribers.add(callback);
	}
}

impl std::fmt::Debug for VisibilityFilter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VisibilityFilter")
			.field("hidden", &self.hidden.borrow())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;

	#[test]
	fn test_hide_and_show_round_trip() {
		let filter = VisibilityFilter::new();
		assert!(filter.is_visible("a"));
		assert!(filter.hide("a"));
		assert!(!filter.is_visible("a"));
		assert!(filter.is_visible("b"));
		assert!(filter.show("a"));
		assert!(filter.is_visible("a"));
	}

	#[test]
	fn test_cloned_handle_shares_set() {
		let filter = VisibilityFilter::new();
		let menu_handle = filter.clone();
		menu_handle.hide("orders");
		assert!(!filter.is_visible("orders"));
		filter.reset();
		assert!(menu_handle.hidden().is_empty());
	}

	#[test]
	fn test_only_real_changes_notify() {
		let filter = VisibilityFilter::new();
		let count = Rc::new(Cell::new(0));
		let seen = count.clone();
		filter.subscribe(move || seen.set(seen.get() + 1));

		filter.hide("a");
		filter.hide("a");
		filter.show("b");
		filter.reset();
		filter.reset();
		assert_eq!(count.get(), 2);
	}

	#[test]
	fn test_free_predicate() {
		let hidden = HashSet::from(["x".to_string()]);
		assert!(!is_visible("x", &hidden));
		assert!(is_visible("y", &hidden));
	}
}
