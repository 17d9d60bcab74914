//! The pre-shaped graph payload behind the network overview. The server
//! encodes each node's entity kind in a two-character id prefix; that is
//! decoded into a tagged record here, at the fetch boundary, so nothing
//! downstream slices strings.

use std::collections::HashMap;

use serde::Deserialize;

use crate::api::{self, ApiError};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphPayload {
	#[serde(default)]
	pub nodes: Vec<PayloadNode>,
	#[serde(default, alias = "links")]
	pub edges: Vec<PayloadEdge>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PayloadNode {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub color: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PayloadEdge {
	pub from: String,
	pub to: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
	Character,
	Primitive,
}

impl EntityKind {
	/// Splits a prefixed payload id into its kind and bare id: `c_` marks
	/// a character, any other prefix a primitive.
	pub fn decode(raw: &str) -> (Self, &str) {
		let kind = if raw.starts_with("c_") {
			EntityKind::Character
		} else {
			EntityKind::Primitive
		};
		(kind, raw.get(2..).unwrap_or(""))
	}

	pub fn route_segment(self) -> &'static str {
		match self {
			EntityKind::Character => "characters",
			EntityKind::Primitive => "primitives",
		}
	}

	fn fallback_color(self) -> &'static str {
		match self {
			EntityKind::Character => "#3498db",
			EntityKind::Primitive => "#e74c3c",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkNode {
	pub kind: EntityKind,
	pub id: String,
	pub label: String,
	pub title: Option<String>,
	pub color: String,
}

impl NetworkNode {
	pub fn detail_route(&self) -> String {
		format!("/{}/{}", self.kind.route_segment(), self.id)
	}
}

/// Already deduplicated server-side; edges are resolved to node indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkData {
	pub nodes: Vec<NetworkNode>,
	pub edges: Vec<(usize, usize)>,
}

/// Decodes the raw payload. Edges naming an unknown endpoint are dropped.
pub fn decode(payload: GraphPayload) -> NetworkData {
	let mut index: HashMap<String, usize> = HashMap::new();
	let nodes: Vec<NetworkNode> = payload
		.nodes
		.into_iter()
		.enumerate()
		.map(|(i, node)| {
			index.insert(node.id.clone(), i);
			let (kind, id) = EntityKind::decode(&node.id);
			NetworkNode {
				kind,
				id: id.to_string(),
				label: node.label,
				title: node.title,
				color: node
					.color
					.unwrap_or_else(|| kind.fallback_color().to_string()),
			}
		})
		.collect();

	let edges = payload
		.edges
		.iter()
		.filter_map(|edge| Some((*index.get(&edge.from)?, *index.get(&edge.to)?)))
		.collect();

	NetworkData { nodes, edges }
}

pub async fn load() -> Result<NetworkData, ApiError> {
	Ok(decode(api::get_json("/api/graph-data").await?))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn payload(json: &str) -> GraphPayload {
		serde_json::from_str(json).unwrap()
	}

	#[test]
	fn character_prefix_decodes_to_tagged_character() {
		let (kind, id) = EntityKind::decode("c_12");
		assert_eq!(kind, EntityKind::Character);
		assert_eq!(id, "12");
	}

	#[test]
	fn other_prefixes_decode_to_primitive() {
		let (kind, id) = EntityKind::decode("p_7");
		assert_eq!(kind, EntityKind::Primitive);
		assert_eq!(id, "7");
	}

	#[test]
	fn short_ids_decode_without_panicking() {
		let (kind, id) = EntityKind::decode("q");
		assert_eq!(kind, EntityKind::Primitive);
		assert_eq!(id, "");
	}

	#[test]
	fn detail_routes_are_scoped_by_kind() {
		let data = decode(payload(
			r#"{"nodes": [{"id": "c_3", "label": "水"}, {"id": "p_9", "label": "drop"}],
			    "edges": []}"#,
		));
		assert_eq!(data.nodes[0].detail_route(), "/characters/3");
		assert_eq!(data.nodes[1].detail_route(), "/primitives/9");
	}

	#[test]
	fn server_colors_win_over_kind_fallbacks() {
		let data = decode(payload(
			r##"{"nodes": [{"id": "c_1", "label": "a", "color": "#123456"},
			              {"id": "p_1", "label": "b"}],
			    "edges": []}"##,
		));
		assert_eq!(data.nodes[0].color, "#123456");
		assert_eq!(data.nodes[1].color, "#e74c3c");
	}

	#[test]
	fn edges_resolve_to_indices_and_accept_links_alias() {
		let data = decode(payload(
			r#"{"nodes": [{"id": "p_1", "label": "a"}, {"id": "c_1", "label": "b"}],
			    "links": [{"from": "p_1", "to": "c_1"}]}"#,
		));
		assert_eq!(data.edges, vec![(0, 1)]);
	}

	#[test]
	fn dangling_edges_are_dropped() {
		let data = decode(payload(
			r#"{"nodes": [{"id": "c_1", "label": "a"}],
			    "edges": [{"from": "c_1", "to": "c_999"}]}"#,
		));
		assert!(data.edges.is_empty());
	}
}
