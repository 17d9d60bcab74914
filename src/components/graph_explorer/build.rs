use std::collections::HashSet;

use super::types::{GraphData, Link, LinkKind, Node, NodeKind};
use crate::api::CharacterRecord;

/// Builds the deduplicated node/link set for a batch of character records.
///
/// Character identity is trusted to be unique in the input and appended
/// unconditionally; keywords and primitives are deduplicated within their
/// own kind, with one link appended per reference either way.
pub fn build(characters: &[CharacterRecord]) -> GraphData {
	let mut graph = GraphData::default();
	let mut seen: HashSet<(NodeKind, String)> = HashSet::new();

	for record in characters {
		graph.nodes.push(Node {
			id: record.character.clone(),
			kind: NodeKind::Character,
			label: record.character.clone(),
			frame_number: record.frame_number,
			volume: record.volume,
			chapter: record.chapter,
		});

		for keyword in &record.keywords {
			if seen.insert((NodeKind::Keyword, keyword.clone())) {
				graph.nodes.push(attribute_node(keyword, NodeKind::Keyword));
			}
			graph.links.push(Link {
				source: record.character.clone(),
				target: keyword.clone(),
				kind: LinkKind::HasKeyword,
			});
		}

		for primitive in &record.primitive_elements {
			if seen.insert((NodeKind::Primitive, primitive.clone())) {
				graph
					.nodes
					.push(attribute_node(primitive, NodeKind::Primitive));
			}
			graph.links.push(Link {
				source: record.character.clone(),
				target: primitive.clone(),
				kind: LinkKind::HasPrimitive,
			});
		}
	}

	graph
}

fn attribute_node(id: &str, kind: NodeKind) -> Node {
	Node {
		id: id.to_string(),
		kind,
		label: id.to_string(),
		frame_number: None,
		volume: None,
		chapter: None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(character: &str, keywords: &[&str], primitives: &[&str]) -> CharacterRecord {
		CharacterRecord {
			character: character.to_string(),
			keywords: keywords.iter().map(|s| s.to_string()).collect(),
			primitive_elements: primitives.iter().map(|s| s.to_string()).collect(),
			..CharacterRecord::default()
		}
	}

	fn kinds(graph: &GraphData, kind: NodeKind) -> Vec<&str> {
		graph
			.nodes
			.iter()
			.filter(|n| n.kind == kind)
			.map(|n| n.id.as_str())
			.collect()
	}

	#[test]
	fn empty_input_builds_empty_graph() {
		let graph = build(&[]);
		assert!(graph.nodes.is_empty());
		assert!(graph.links.is_empty());
	}

	#[test]
	fn single_record_yields_three_nodes_and_two_links() {
		let graph = build(&[record("A", &["k1"], &["p1"])]);

		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(kinds(&graph, NodeKind::Character), vec!["A"]);
		assert_eq!(kinds(&graph, NodeKind::Keyword), vec!["k1"]);
		assert_eq!(kinds(&graph, NodeKind::Primitive), vec!["p1"]);

		assert_eq!(graph.links.len(), 2);
		assert_eq!(graph.links[0].kind, LinkKind::HasKeyword);
		assert_eq!(graph.links[0].target, "k1");
		assert_eq!(graph.links[1].kind, LinkKind::HasPrimitive);
		assert_eq!(graph.links[1].target, "p1");
	}

	#[test]
	fn shared_keyword_dedups_node_but_not_links() {
		let graph = build(&[record("A", &["k1"], &[]), record("B", &["k1"], &[])]);

		assert_eq!(kinds(&graph, NodeKind::Keyword), vec!["k1"]);
		assert_eq!(graph.links.len(), 2);
		assert_eq!(graph.links[0].source, "A");
		assert_eq!(graph.links[1].source, "B");
	}

	#[test]
	fn keyword_and_primitive_sharing_a_string_stay_distinct() {
		let graph = build(&[record("A", &["sun"], &["sun"])]);

		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(kinds(&graph, NodeKind::Keyword), vec!["sun"]);
		assert_eq!(kinds(&graph, NodeKind::Primitive), vec!["sun"]);
	}

	#[test]
	fn character_sharing_an_attribute_string_stays_distinct() {
		let graph = build(&[record("water", &["water"], &[])]);

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(kinds(&graph, NodeKind::Character), vec!["water"]);
		assert_eq!(kinds(&graph, NodeKind::Keyword), vec!["water"]);
	}

	#[test]
	fn every_link_resolves_to_existing_nodes() {
		let graph = build(&[
			record("A", &["k1", "k2"], &["p1"]),
			record("B", &["k1"], &["p1", "p2"]),
		]);

		for link in &graph.links {
			assert!(
				graph
					.nodes
					.iter()
					.any(|n| n.kind == NodeKind::Character && n.id == link.source),
				"unresolved source {}",
				link.source
			);
			assert!(
				graph
					.nodes
					.iter()
					.any(|n| n.kind == link.kind.target_kind() && n.id == link.target),
				"unresolved target {}",
				link.target
			);
		}
	}

	#[test]
	fn nodes_appear_in_record_order_with_new_attributes_after_their_character() {
		let graph = build(&[
			record("A", &["k1"], &["p1"]),
			record("B", &["k1", "k2"], &[]),
		]);

		let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["A", "k1", "p1", "B", "k2"]);
	}
}
