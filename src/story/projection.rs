//! Story paragraphs projected onto graph nodes and edges.

use super::{GlobalStyle, ImageStyle, Paragraph, VoiceStyle};

/// Horizontal distance between grid columns.
pub const COLUMN_SPACING: f64 = 340.0;
/// Vertical distance between grid rows.
pub const ROW_SPACING: f64 = 440.0;

/// Position in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

/// What a paragraph card renders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphView {
	/// Paragraph index in reading order.
	pub index: usize,
	/// Paragraph text.
	pub text: String,
	/// Current illustration.
	pub image_url: Option<String>,
	/// Prompt behind the illustration.
	pub image_prompt: Option<String>,
	/// Current narration.
	pub audio_url: Option<String>,
	/// Chosen image style.
	pub image_style: ImageStyle,
	/// Chosen voice style.
	pub voice_style: VoiceStyle,
	/// Cards (image and audio) are being generated.
	pub is_generating: bool,
	/// Image regeneration in flight.
	pub is_regenerating_image: bool,
	/// Audio regeneration in flight.
	pub is_regenerating_audio: bool,
}

impl ParagraphView {
	/// Copies media fields from `other`, keeping this view's styles and flags.
	pub fn take_media_from(&mut self, other: &ParagraphView) {
		self.image_url = other.image_url.clone();
		self.image_prompt = other.image_prompt.clone();
		self.audio_url = other.audio_url.clone();
	}

	/// Whether any media request for this paragraph is outstanding.
	pub fn is_busy(&self) -> bool {
		self.is_generating || self.is_regenerating_image || self.is_regenerating_audio
	}
}

/// One node per paragraph; the id is derived from the index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowNode {
	/// `p<index>`.
	pub id: String,
	/// Top-left corner of the card.
	pub position: Position,
	/// Card content.
	pub data: ParagraphView,
}

/// Directed, purely illustrative connection between two nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowEdge {
	/// Unique edge id.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
}

impl FlowEdge {
	/// Edge from `source` to `target` with an id derived from both.
	pub fn between(source: &str, target: &str) -> Self {
		Self {
			id: format!("e-{}-{}", source, target),
			source: source.to_string(),
			target: target.to_string(),
		}
	}
}

/// Node id for the paragraph at `index`.
pub fn node_id(index: usize) -> String {
	format!("p{}", index)
}

/// Index encoded in a node id.
pub fn node_index(id: &str) -> Option<usize> {
	id.strip_prefix('p')?.parse().ok()
}

/// Grid slot `index` for a grid `columns` wide.
pub fn grid_position(index: usize, columns: usize) -> Position {
	let columns = columns.max(1);
	Position {
		x: (index % columns) as f64 * COLUMN_SPACING,
		y: (index / columns) as f64 * ROW_SPACING,
	}
}

/// Projects `paragraphs` onto nodes laid out on a wrapping grid and a chain
/// of edges `p<i> -> p<i+1>`.
pub fn project(
	paragraphs: &[Paragraph],
	global: GlobalStyle,
	columns: usize,
) -> (Vec<FlowNode>, Vec<FlowEdge>) {
	let nodes: Vec<FlowNode> = paragraphs
		.iter()
		.enumerate()
		.map(|(index, paragraph)| FlowNode {
			id: node_id(index),
			position: grid_position(index, columns),
			data: ParagraphView {
				index,
				text: paragraph.text.clone(),
				image_url: paragraph.image_url.clone(),
				image_prompt: paragraph.image_prompt.clone(),
				audio_url: paragraph.audio_url.clone(),
				image_style: paragraph.image_style.unwrap_or(global.image),
				voice_style: paragraph.voice_style.unwrap_or(global.voice),
				..Default::default()
			},
		})
		.collect();
	let edges = chain_edges(&nodes);
	(nodes, edges)
}

/// Regenerates the reading-order chain from node order.
pub fn chain_edges(nodes: &[FlowNode]) -> Vec<FlowEdge> {
	nodes
		.windows(2)
		.map(|pair| FlowEdge::between(&pair[0].id, &pair[1].id))
		.collect()
}

/// Adds a user-drawn edge. Self-loops, duplicates and unknown endpoints are
/// refused; returns whether an edge was added.
pub fn connect(edges: &mut Vec<FlowEdge>, nodes: &[FlowNode], source: &str, target: &str) -> bool {
	let known = |id: &str| nodes.iter().any(|n| n.id == id);
	if source == target || !known(source) || !known(target) {
		return false;
	}
	if edges.iter().any(|e| e.source == source && e.target == target) {
		return false;
	}
	edges.push(FlowEdge::between(source, target));
	true
}

/// Applies a global style change to every node, returning the new array.
pub fn restyle_all(nodes: &[FlowNode], global: GlobalStyle) -> Vec<FlowNode> {
	nodes
		.iter()
		.cloned()
		.map(|mut node| {
			node.data.image_style = global.image;
			node.data.voice_style = global.voice;
			node
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn paragraphs(texts: &[&str]) -> Vec<Paragraph> {
		texts.iter().map(|t| Paragraph::new(*t)).collect()
	}

	#[test]
	fn three_paragraphs_give_a_two_edge_chain() {
		let (nodes, edges) = project(&paragraphs(&["a", "b", "c"]), GlobalStyle::default(), 3);
		assert_eq!(nodes.len(), 3);
		let pairs: Vec<_> = edges
			.iter()
			.map(|e| (e.source.as_str(), e.target.as_str()))
			.collect();
		assert_eq!(pairs, vec![("p0", "p1"), ("p1", "p2")]);
	}

	#[test]
	fn empty_story_projects_to_nothing() {
		let (nodes, edges) = project(&[], GlobalStyle::default(), 3);
		assert!(nodes.is_empty());
		assert!(edges.is_empty());
	}

	#[test]
	fn projection_is_deterministic() {
		let input = paragraphs(&["one", "two", "three", "four"]);
		let global = GlobalStyle {
			image: ImageStyle::Fantasy,
			voice: VoiceStyle::Calm,
		};
		assert_eq!(project(&input, global, 2), project(&input, global, 2));
	}

	#[test]
	fn grid_wraps_after_the_column_count() {
		let (nodes, _) = project(&paragraphs(&["a", "b", "c", "d"]), GlobalStyle::default(), 3);
		assert_eq!(nodes[2].position, Position { x: 2.0 * COLUMN_SPACING, y: 0.0 });
		assert_eq!(nodes[3].position, Position { x: 0.0, y: ROW_SPACING });
	}

	#[test]
	fn paragraph_styles_override_global_style() {
		let mut input = paragraphs(&["a", "b"]);
		input[1].image_style = Some(ImageStyle::Cartoon);
		let global = GlobalStyle {
			image: ImageStyle::Anime,
			voice: VoiceStyle::Cheerful,
		};
		let (nodes, _) = project(&input, global, 3);
		assert_eq!(nodes[0].data.image_style, ImageStyle::Anime);
		assert_eq!(nodes[1].data.image_style, ImageStyle::Cartoon);
		assert_eq!(nodes[1].data.voice_style, VoiceStyle::Cheerful);
	}

	#[test]
	fn connect_refuses_loops_duplicates_and_strangers() {
		let (nodes, mut edges) = project(&paragraphs(&["a", "b", "c"]), GlobalStyle::default(), 3);
		assert!(!connect(&mut edges, &nodes, "p1", "p1"));
		assert!(!connect(&mut edges, &nodes, "p0", "p1"));
		assert!(!connect(&mut edges, &nodes, "p0", "p9"));
		assert!(connect(&mut edges, &nodes, "p0", "p2"));
		assert_eq!(edges.len(), 3);
	}

	#[test]
	fn node_ids_round_trip_to_indices() {
		assert_eq!(node_index(&node_id(12)), Some(12));
		assert_eq!(node_index("paragraph-3"), None);
	}
}
