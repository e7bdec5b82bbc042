//! Reciprocal link detection.
//!
//! Two links in opposite directions between the same nodes would render on
//! top of each other, so both get bent into arcs. The index is rebuilt once
//! per graph-data update and then answers per-link queries in constant time.

use std::collections::{HashMap, HashSet};

use super::types::GraphLink;

/// Endpoint pair with the lexically smaller name first.
type PairKey = (String, String);

fn pair_key(a: &str, b: &str) -> PairKey {
	if a <= b {
		(a.to_string(), b.to_string())
	} else {
		(b.to_string(), a.to_string())
	}
}

/// Links that have a counterpart running the other way.
#[derive(Clone, Debug, Default)]
pub struct ReciprocalIndex {
	reciprocal: HashSet<String>,
}

impl ReciprocalIndex {
	/// Group links by unordered endpoint pair, then mark every link whose
	/// group also holds the reverse direction.
	pub fn build(links: &[GraphLink]) -> Self {
		let mut pairs: HashMap<PairKey, Vec<&GraphLink>> = HashMap::new();
		for link in links {
			pairs
				.entry(pair_key(&link.source, &link.target))
				.or_default()
				.push(link);
		}

		let mut reciprocal = HashSet::new();
		for group in pairs.values() {
			for link in group {
				// A self-loop is its own counterpart.
				if group
					.iter()
					.any(|other| other.source == link.target && other.target == link.source)
				{
					reciprocal.insert(link.id.clone());
				}
			}
		}

		Self { reciprocal }
	}

	/// Whether another link runs from this link's target back to its source.
	pub fn has_reciprocal(&self, link: &str) -> bool {
		self.reciprocal.contains(link)
	}

	/// Curvature to render `link` with.
	pub fn curvature(&self, link: &str, bend: f64) -> f64 {
		if self.has_reciprocal(link) { bend } else { 0.0 }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_reciprocal_pair_is_curved() {
		let index = ReciprocalIndex::build(&[
			GraphLink::new("ab", "a", "b"),
			GraphLink::new("ba", "b", "a"),
			GraphLink::new("bc", "b", "c"),
		]);
		assert_eq!(index.curvature("ab", 0.4), 0.4);
		assert_eq!(index.curvature("ba", 0.4), 0.4);
		assert_eq!(index.curvature("bc", 0.4), 0.0);
	}

	#[test]
	fn test_one_direction_is_straight() {
		let index = ReciprocalIndex::build(&[GraphLink::new("ab", "a", "b")]);
		assert!(!index.has_reciprocal("ab"));
		assert_eq!(index.curvature("ab", 0.4), 0.0);
	}

	#[test]
	fn test_parallel_links_are_not_reciprocal() {
		let index = ReciprocalIndex::build(&[
			GraphLink::new("ab1", "a", "b"),
			GraphLink::new("ab2", "a", "b"),
		]);
		assert!(!index.has_reciprocal("ab1"));
		assert!(!index.has_reciprocal("ab2"));
	}

	#[test]
	fn test_parallel_links_curve_once_reversed() {
		let index = ReciprocalIndex::build(&[
			GraphLink::new("ab1", "a", "b"),
			GraphLink::new("ab2", "a", "b"),
			GraphLink::new("ba", "b", "a"),
		]);
		assert!(index.has_reciprocal("ab1"));
		assert!(index.has_reciprocal("ab2"));
		assert!(index.has_reciprocal("ba"));
	}

	#[test]
	fn test_self_loop_counts_as_reciprocal() {
		let index = ReciprocalIndex::build(&[GraphLink::new("aa", "a", "a")]);
		assert!(index.has_reciprocal("aa"));
	}

	#[test]
	fn test_unknown_link_is_straight() {
		let index = ReciprocalIndex::default();
		assert_eq!(index.curvature("missing", 0.4), 0.0);
	}
}
