//! Live node array, edit history and the operations that touch both.

use leptos::prelude::*;
use log::{debug, info};

use super::layout;
use crate::story::history::{History, HistoryCommand};
use crate::story::projection::{self, FlowEdge, FlowNode, Position};
use crate::story::{GlobalStyle, ImageStyle, Paragraph, VoiceStyle};

/// A per-paragraph style choice made on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleChange {
	/// New image style.
	Image(ImageStyle),
	/// New voice style.
	Voice(VoiceStyle),
}

/// One undoable state of the editor: card positions and styles plus the
/// drawn links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorSnapshot {
	/// Cards as they were when the edit was recorded.
	pub nodes: Vec<FlowNode>,
	/// Links as they were when the edit was recorded.
	pub edges: Vec<FlowEdge>,
}

/// Reactive editor state shared through context. Every mutation of the node
/// array goes through `RwSignal::update`, so concurrent completions always
/// see the latest array.
#[derive(Clone, Copy)]
pub struct EditorState {
	/// Live cards.
	pub nodes: RwSignal<Vec<FlowNode>>,
	/// Live links between cards.
	pub edges: RwSignal<Vec<FlowEdge>>,
	/// Undo/redo log of recorded edits.
	pub history: RwSignal<History<EditorSnapshot>>,
	/// Style applied by the toolbar selects.
	pub global: RwSignal<GlobalStyle>,
	/// Source node of a connection being drawn.
	pub connecting: RwSignal<Option<String>>,
	/// Grid width used when projecting a story.
	pub columns: usize,
}

impl EditorState {
	/// Empty state laying stories out on `columns` columns.
	pub fn new(columns: usize) -> Self {
		Self {
			nodes: RwSignal::new(Vec::new()),
			edges: RwSignal::new(Vec::new()),
			history: RwSignal::new(History::default()),
			global: RwSignal::new(GlobalStyle::default()),
			connecting: RwSignal::new(None),
			columns,
		}
	}

	/// Replaces the session with a freshly loaded story.
	pub fn load(&self, paragraphs: &[Paragraph]) {
		let (nodes, edges) = projection::project(paragraphs, self.global.get_untracked(), self.columns);
		info!("editor loaded {} nodes, {} edges", nodes.len(), edges.len());
		self.history.update(|h| {
			h.reset(EditorSnapshot {
				nodes: nodes.clone(),
				edges: edges.clone(),
			})
		});
		self.nodes.set(nodes);
		self.edges.set(edges);
		self.connecting.set(None);
	}

	fn snapshot(&self) -> EditorSnapshot {
		EditorSnapshot {
			nodes: self.nodes.get_untracked(),
			edges: self.edges.get_untracked(),
		}
	}

	/// Commits the live cards and links as one undoable edit.
	pub fn record(&self) {
		let snapshot = self.snapshot();
		self.history.update(|h| h.record(snapshot));
	}

	/// Applies a card's style pick; records only when the style changed.
	pub fn change_style(&self, index: usize, change: StyleChange) {
		let mut changed = false;
		self.nodes.update(|nodes| changed = apply_style(nodes, index, change));
		if changed {
			debug!("paragraph {} style -> {:?}", index, change);
			self.record();
		}
	}

	/// Applies a new global style to every card as one edit.
	pub fn set_global(&self, global: GlobalStyle) {
		self.global.set(global);
		self.nodes
			.update(|nodes| *nodes = projection::restyle_all(nodes, global));
		self.record();
	}

	/// Moves a card without recording; drags record once on release.
	pub fn move_node(&self, id: &str, position: Position) {
		self.nodes.update(|nodes| {
			if let Some(node) = nodes.iter_mut().find(|n| n.id == id) {
				node.position = position;
			}
		});
	}

	/// Runs the force simulation over the current layout as one edit.
	pub fn relax_layout(&self) {
		let positions = self.nodes.with_untracked(|nodes| {
			self.edges
				.with_untracked(|edges| layout::relax(nodes, edges, layout::RELAX_STEPS))
		});
		self.nodes.update(|nodes| {
			for (node, position) in nodes.iter_mut().zip(positions) {
				node.position = position;
			}
		});
		self.record();
	}

	/// Starts drawing a connection from `source`.
	pub fn start_connect(&self, source: &str) {
		self.connecting.set(Some(source.to_string()));
	}

	/// Completes a pending connection at `target`; a no-op when none is
	/// pending. A new link is recorded as one edit.
	pub fn connect_to(&self, target: &str) {
		let Some(source) = self.connecting.get_untracked() else {
			return;
		};
		let added = self.nodes.with_untracked(|nodes| {
			let mut added = false;
			self.edges
				.update(|edges| added = projection::connect(edges, nodes, &source, target));
			added
		});
		debug!("connect {} -> {}: {}", source, target, added);
		self.connecting.set(None);
		if added {
			self.record();
		}
	}

	/// Resets the edges to the reading-order chain.
	pub fn reset_edges(&self) {
		let chain = self.nodes.with_untracked(|nodes| projection::chain_edges(nodes));
		if self.edges.with_untracked(|edges| *edges != chain) {
			self.edges.set(chain);
			self.record();
		}
	}

	/// Undoes or redoes one edit, keeping live media and in-flight flags.
	pub fn apply_history(&self, command: HistoryCommand) {
		let mut changed = false;
		self.history.update(|h| changed = h.apply(command));
		if !changed {
			debug!("{:?}: nothing to apply", command);
			return;
		}
		let snapshot = self.history.with_untracked(|h| h.present().clone());
		self.nodes.update(|live| *live = restore(snapshot.nodes, live));
		self.edges.set(snapshot.edges);
		debug!("{:?} applied", command);
	}
}

/// Sets one paragraph's style; returns whether anything changed.
pub fn apply_style(nodes: &mut [FlowNode], index: usize, change: StyleChange) -> bool {
	let Some(node) = nodes.iter_mut().find(|n| n.data.index == index) else {
		return false;
	};
	let data = &mut node.data;
	match change {
		StyleChange::Image(style) if data.image_style != style => data.image_style = style,
		StyleChange::Voice(style) if data.voice_style != style => data.voice_style = style,
		_ => return false,
	}
	true
}

/// Restores a history snapshot over the live array. Media and in-flight flags
/// are not edits, so they are taken from the live nodes.
pub fn restore(snapshot: Vec<FlowNode>, live: &[FlowNode]) -> Vec<FlowNode> {
	snapshot
		.into_iter()
		.map(|mut node| {
			if let Some(current) = live.iter().find(|n| n.id == node.id) {
				node.data.take_media_from(&current.data);
				node.data.is_generating = current.data.is_generating;
				node.data.is_regenerating_image = current.data.is_regenerating_image;
				node.data.is_regenerating_audio = current.data.is_regenerating_audio;
			}
			node
		})
		.collect()
}
