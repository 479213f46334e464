//! Node-graph editor: one draggable card per paragraph, linked in reading
//! order, with undo/redo and per-paragraph media actions.

mod card;
mod component;
mod dispatch;
mod layout;
mod minimap;
mod persist;
mod state;
mod viewport;

use leptos::prelude::*;

pub use component::StoryFlowEditor;
pub use state::StyleChange;

/// Handlers a card invokes, provided as context so cards need no props
/// beyond their id.
#[derive(Clone, Copy)]
pub struct EditorActions {
	/// Generates cards for a paragraph index.
	pub generate: Callback<usize>,
	/// Regenerates one paragraph's illustration.
	pub regenerate_image: Callback<usize>,
	/// Regenerates one paragraph's narration.
	pub regenerate_audio: Callback<usize>,
	/// Applies a style picked on a card.
	pub change_style: Callback<(usize, StyleChange)>,
	/// Node id and pointer client coordinates.
	pub begin_drag: Callback<(String, f64, f64)>,
}
