use crate::api::number_or_na;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Character,
	Keyword,
	Primitive,
}

impl NodeKind {
	pub fn radius(self) -> f64 {
		match self {
			NodeKind::Character => 15.0,
			NodeKind::Keyword | NodeKind::Primitive => 10.0,
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			NodeKind::Character => "#ff6b6b",
			NodeKind::Keyword => "#4ecdc4",
			NodeKind::Primitive => "#ffd166",
		}
	}

	pub fn label_font(self) -> &'static str {
		match self {
			NodeKind::Character => "14px sans-serif",
			NodeKind::Keyword | NodeKind::Primitive => "10px sans-serif",
		}
	}
}

/// A rendered graph entity. Identity is the `(kind, id)` pair; a keyword
/// and a primitive may share the same string and stay distinct nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	pub frame_number: Option<u32>,
	pub volume: Option<u32>,
	pub chapter: Option<u32>,
}

impl Node {
	pub fn tooltip(&self) -> String {
		match self.kind {
			NodeKind::Character => format!(
				"{} (Frame {}, Vol {} Ch {})",
				self.label,
				number_or_na(self.frame_number),
				number_or_na(self.volume),
				number_or_na(self.chapter),
			),
			NodeKind::Keyword | NodeKind::Primitive => self.label.clone(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
	HasKeyword,
	HasPrimitive,
}

impl LinkKind {
	/// The node namespace a link's target resolves against.
	pub fn target_kind(self) -> NodeKind {
		match self {
			LinkKind::HasKeyword => NodeKind::Keyword,
			LinkKind::HasPrimitive => NodeKind::Primitive,
		}
	}
}

/// A character → attribute edge, by id. Rendered as an undirected segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub source: String,
	pub target: String,
	pub kind: LinkKind,
}

/// The deduplicated node/link set one batch of characters produces.
/// Rebuilt wholesale on every data refresh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<Node>,
	pub links: Vec<Link>,
}
