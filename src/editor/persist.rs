//! Saving per-paragraph styles before final rendering.

use log::info;

use crate::api::{ApiClient, ParagraphStyle, StyleUpdate};
use crate::error::StudioResult;
use crate::story::projection::FlowNode;

/// Server-rendered page shown after styles are saved.
pub const GENERATE_PAGE: &str = "/story/generate";

/// Collects every paragraph's styles, in paragraph order.
pub fn style_update(nodes: &[FlowNode]) -> StyleUpdate {
	let mut paragraphs: Vec<ParagraphStyle> = nodes
		.iter()
		.map(|node| ParagraphStyle {
			index: node.data.index,
			image_style: node.data.image_style,
			voice_style: node.data.voice_style,
		})
		.collect();
	paragraphs.sort_by_key(|p| p.index);
	StyleUpdate { paragraphs }
}

/// Posts the styles; the caller navigates on success. Nothing local changes,
/// so a failure needs no rollback.
pub async fn save_styles(api: &ApiClient, nodes: &[FlowNode]) -> StudioResult<()> {
	let update = style_update(nodes);
	api.update_style(&update).await?;
	info!("styles saved for {} paragraphs", update.paragraphs.len());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::story::projection::project;
	use crate::story::{GlobalStyle, ImageStyle, Paragraph, VoiceStyle};

	#[test]
	fn update_lists_each_paragraph_once_in_order() {
		let paragraphs: Vec<_> = ["a", "b", "c"].iter().map(|t| Paragraph::new(*t)).collect();
		let (mut nodes, _) = project(&paragraphs, GlobalStyle::default(), 3);
		nodes[2].data.image_style = ImageStyle::Watercolor;
		nodes[0].data.voice_style = VoiceStyle::Cheerful;
		nodes.swap(0, 2);

		let update = style_update(&nodes);
		let indices: Vec<_> = update.paragraphs.iter().map(|p| p.index).collect();
		assert_eq!(indices, vec![0, 1, 2]);
		assert_eq!(update.paragraphs[0].voice_style, VoiceStyle::Cheerful);
		assert_eq!(update.paragraphs[2].image_style, ImageStyle::Watercolor);
	}
}
