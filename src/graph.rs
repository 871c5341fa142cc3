//! The ownership graph: a deduplicated node set and an edge list built once
//! from the raw record snapshot, plus the degree metric that sizes owner
//! nodes.

use std::collections::{HashMap, HashSet};

use crate::data::OwnershipRecord;

/// What a node stands for. Businesses carry their classification tag;
/// owners carry nothing beyond their name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Business {
		/// Classification tag from the source record.
		class: String,
	},
	Owner,
}

impl NodeKind {
	/// True for owner nodes.
	pub fn is_owner(&self) -> bool {
		matches!(self, NodeKind::Owner)
	}

	/// Partition label used to group edges by their source: the business
	/// classification, or "Owner" when an owner name doubles as a business
	/// name and won the first-seen race.
	pub fn partition(&self) -> &str {
		match self {
			NodeKind::Business { class } => class,
			NodeKind::Owner => "Owner",
		}
	}
}

/// A graph vertex, keyed by name. The key space is shared between the two
/// kinds; the first record mentioning a name decides its kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
	pub name: String,
	pub kind: NodeKind,
}

/// A business→owner pairing, by node index. Parallel edges between the same
/// endpoints are kept as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: usize,
	pub target: usize,
}

/// The whole graph, built once and never mutated afterwards. Mutable
/// per-node state (positions, pins) lives in the layout simulation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnershipGraph {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
}

impl OwnershipGraph {
	/// Build the graph from the record snapshot.
	///
	/// Nodes are deduplicated by name in record order (business first, then
	/// its owners), first occurrence wins, including its kind, so a name
	/// classified differently later keeps its original tag. Edges are then
	/// emitted one per (business, owner) pair, in record order, without
	/// deduplication; pairs whose name fails the lookup are dropped
	/// silently, which cannot happen given the construction above but is
	/// filtered rather than unwrapped.
	pub fn from_records(records: &[OwnershipRecord]) -> Self {
		let mut nodes: Vec<GraphNode> = Vec::new();
		let mut index: HashMap<String, usize> = HashMap::new();

		for record in records {
			if !index.contains_key(&record.business) {
				index.insert(record.business.clone(), nodes.len());
				nodes.push(GraphNode {
					name: record.business.clone(),
					kind: NodeKind::Business {
						class: record.class.clone(),
					},
				});
			}
			for owner in &record.owners {
				if !index.contains_key(owner) {
					index.insert(owner.clone(), nodes.len());
					nodes.push(GraphNode {
						name: owner.clone(),
						kind: NodeKind::Owner,
					});
				}
			}
		}

		let mut edges = Vec::new();
		for record in records {
			let Some(&source) = index.get(&record.business) else {
				continue;
			};
			for owner in &record.owners {
				let Some(&target) = index.get(owner) else {
					continue;
				};
				edges.push(GraphEdge { source, target });
			}
		}

		Self { nodes, edges }
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	/// The node behind an index. Indices come from this graph's own edge
	/// list, so they are always in range.
	pub fn node(&self, idx: usize) -> &GraphNode {
		&self.nodes[idx]
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Number of distinct businesses connected to the given node by at
	/// least one edge. An owner linked twice to the same business (a
	/// duplicate ownership record) counts once.
	pub fn degree(&self, node: usize) -> usize {
		let sources: HashSet<&str> = self
			.edges
			.iter()
			.filter(|edge| edge.target == node)
			.map(|edge| self.nodes[edge.source].name.as_str())
			.collect();
		sources.len()
	}

	/// Partition label of an edge, taken from its source node's kind.
	pub fn edge_partition(&self, edge: &GraphEdge) -> &str {
		self.nodes[edge.source].kind.partition()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(business: &str, class: &str, owners: &[&str]) -> OwnershipRecord {
		OwnershipRecord {
			business: business.into(),
			class: class.into(),
			owners: owners.iter().map(|o| o.to_string()).collect(),
		}
	}

	fn names(graph: &OwnershipGraph) -> Vec<&str> {
		graph.nodes().iter().map(|n| n.name.as_str()).collect()
	}

	#[test]
	fn node_names_are_unique() {
		let graph = OwnershipGraph::from_records(&[
			record("Acme", "A", &["Alice", "Bob", "Alice"]),
			record("Beta", "B", &["Alice", "Acme"]),
			record("Acme", "B", &["Carol"]),
		]);

		let mut seen = HashSet::new();
		for node in graph.nodes() {
			assert!(seen.insert(node.name.as_str()), "duplicate node {}", node.name);
		}
	}

	#[test]
	fn one_edge_per_pair_in_record_order() {
		let records = [
			record("Acme", "A", &["Alice", "Bob"]),
			record("Beta", "B", &["Alice"]),
		];
		let graph = OwnershipGraph::from_records(&records);

		let expected: usize = records.iter().map(|r| r.owners.len()).sum();
		assert_eq!(graph.edges().len(), expected);

		let pairs: Vec<(&str, &str)> = graph
			.edges()
			.iter()
			.map(|e| (graph.node(e.source).name.as_str(), graph.node(e.target).name.as_str()))
			.collect();
		assert_eq!(
			pairs,
			vec![("Acme", "Alice"), ("Acme", "Bob"), ("Beta", "Alice")]
		);
	}

	#[test]
	fn reference_example() {
		let graph = OwnershipGraph::from_records(&[
			record("Acme", "A", &["Alice", "Bob"]),
			record("Beta", "B", &["Alice"]),
		]);

		assert_eq!(names(&graph), vec!["Acme", "Alice", "Bob", "Beta"]);
		assert_eq!(graph.edges().len(), 3);

		let alice = names(&graph).iter().position(|n| *n == "Alice").unwrap();
		let bob = names(&graph).iter().position(|n| *n == "Bob").unwrap();
		assert_eq!(graph.degree(alice), 2);
		assert_eq!(graph.degree(bob), 1);
	}

	#[test]
	fn degree_counts_distinct_businesses_not_edges() {
		// B1 appears twice via separate records: {B1, B1, B2} must be 2.
		let graph = OwnershipGraph::from_records(&[
			record("B1", "A", &["Alice"]),
			record("B1", "A", &["Alice"]),
			record("B2", "B", &["Alice"]),
		]);

		let alice = names(&graph).iter().position(|n| *n == "Alice").unwrap();
		assert_eq!(graph.edges().len(), 3);
		assert_eq!(graph.degree(alice), 2);
	}

	#[test]
	fn rebuild_is_idempotent() {
		let records = [
			record("Acme", "A", &["Alice", "Bob"]),
			record("Beta", "B", &["Alice", "Alice"]),
			record("Acme", "C", &["Carol"]),
		];
		assert_eq!(
			OwnershipGraph::from_records(&records),
			OwnershipGraph::from_records(&records)
		);
	}

	#[test]
	fn first_seen_classification_wins() {
		let graph = OwnershipGraph::from_records(&[
			record("Acme", "A", &[]),
			record("Acme", "B", &["Alice"]),
		]);

		assert_eq!(
			graph.node(0).kind,
			NodeKind::Business { class: "A".into() }
		);
		// The re-classified record still contributes its edge.
		assert_eq!(graph.edges().len(), 1);
	}

	#[test]
	fn owner_name_reused_as_business_keeps_owner_kind() {
		let graph = OwnershipGraph::from_records(&[
			record("Acme", "A", &["Beta"]),
			record("Beta", "B", &["Alice"]),
		]);

		let beta = names(&graph).iter().position(|n| *n == "Beta").unwrap();
		assert!(graph.node(beta).kind.is_owner());
		// Beta's own record still links it to Alice; the edge's partition
		// follows the node kind that won.
		let edge = graph.edges().last().unwrap();
		assert_eq!(graph.edge_partition(edge), "Owner");
	}

	#[test]
	fn duplicate_owner_within_a_record_keeps_parallel_edges() {
		let graph = OwnershipGraph::from_records(&[record("Acme", "A", &["Alice", "Alice"])]);

		assert_eq!(graph.len(), 2);
		assert_eq!(graph.edges().len(), 2);
		assert_eq!(graph.degree(1), 1);
	}

	#[test]
	fn business_owning_itself_yields_a_self_edge() {
		let graph = OwnershipGraph::from_records(&[record("Acme", "A", &["Acme"])]);

		assert_eq!(graph.len(), 1);
		assert_eq!(graph.edges(), &[GraphEdge { source: 0, target: 0 }]);
	}

	#[test]
	fn empty_input_builds_an_empty_graph() {
		let graph = OwnershipGraph::from_records(&[]);
		assert!(graph.is_empty());
		assert!(graph.edges().is_empty());
	}
}
