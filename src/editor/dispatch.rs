//! Fire-and-forget media requests for single paragraphs.
//!
//! Requests are neither retried nor de-duplicated: two triggers for the same
//! paragraph race, and whichever completes last decides the displayed media.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use super::state::EditorState;
use crate::api::{ApiClient, MediaKind, MediaRequest};
use crate::config::StudioConfig;
use crate::error::StudioResult;
use crate::story::projection::{FlowNode, ParagraphView};
use crate::story::stream::MediaResponse;

fn flag(data: &mut ParagraphView, kind: MediaKind) -> &mut bool {
	match kind {
		MediaKind::Cards => &mut data.is_generating,
		MediaKind::Image => &mut data.is_regenerating_image,
		MediaKind::Audio => &mut data.is_regenerating_audio,
	}
}

/// Raises the in-flight flag of paragraph `index` and builds its request.
pub fn begin(nodes: &mut [FlowNode], index: usize, kind: MediaKind) -> Option<MediaRequest> {
	let node = nodes.iter_mut().find(|n| n.data.index == index)?;
	*flag(&mut node.data, kind) = true;
	let style = match kind {
		MediaKind::Audio => node.data.voice_style.to_string(),
		MediaKind::Cards | MediaKind::Image => node.data.image_style.to_string(),
	};
	Some(MediaRequest {
		index,
		text: node.data.text.clone(),
		style,
	})
}

/// Clears the flag and, on success, merges the returned media. Failures
/// leave existing media untouched.
pub fn complete(
	nodes: &mut [FlowNode],
	index: usize,
	kind: MediaKind,
	result: &StudioResult<MediaResponse>,
) {
	let Some(node) = nodes.iter_mut().find(|n| n.data.index == index) else {
		return;
	};
	*flag(&mut node.data, kind) = false;
	let Ok(media) = result else {
		return;
	};
	let data = &mut node.data;
	if matches!(kind, MediaKind::Cards | MediaKind::Image) {
		if let Some(url) = &media.image_url {
			data.image_url = Some(url.clone());
		}
		if let Some(prompt) = &media.image_prompt {
			data.image_prompt = Some(prompt.clone());
		}
	}
	if matches!(kind, MediaKind::Cards | MediaKind::Audio) {
		if let Some(url) = &media.audio_url {
			data.audio_url = Some(url.clone());
		}
	}
}

/// Issues one media request for paragraph `index` in the background.
pub fn dispatch(state: EditorState, config: StudioConfig, kind: MediaKind, index: usize) {
	let mut request = None;
	state.nodes.update(|nodes| request = begin(nodes, index, kind));
	let Some(request) = request else {
		warn!("no paragraph {} to send {:?} for", index, kind);
		return;
	};
	spawn_local(async move {
		let result = ApiClient::new(config).media(kind, &request).await;
		match &result {
			Ok(media) if media.is_empty() => {
				warn!("{:?} for paragraph {} returned no media", kind, index)
			}
			Ok(_) => info!("{:?} ready for paragraph {}", kind, index),
			Err(err) => warn!("{:?} failed for paragraph {}: {}", kind, index, err),
		}
		state
			.nodes
			.update(|nodes| complete(nodes, index, kind, &result));
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::StudioError;
	use crate::story::projection::project;
	use crate::story::{GlobalStyle, Paragraph, VoiceStyle};

	fn nodes() -> Vec<FlowNode> {
		let mut first = Paragraph::new("The fox wakes.");
		first.image_url = Some("/old.png".into());
		first.image_prompt = Some("a sleepy fox".into());
		first.voice_style = Some(VoiceStyle::Calm);
		project(&[first, Paragraph::new("It runs.")], GlobalStyle::default(), 3).0
	}

	#[test]
	fn begin_flags_the_node_and_picks_the_matching_style() {
		let mut nodes = nodes();
		let request = begin(&mut nodes, 0, MediaKind::Audio).unwrap();
		assert!(nodes[0].data.is_regenerating_audio);
		assert!(!nodes[0].data.is_regenerating_image);
		assert_eq!(request.style, "calm");
		assert_eq!(request.text, "The fox wakes.");
		assert!(begin(&mut nodes, 5, MediaKind::Image).is_none());
	}

	#[test]
	fn failed_image_regeneration_keeps_old_media() {
		let mut nodes = nodes();
		begin(&mut nodes, 0, MediaKind::Image);
		complete(
			&mut nodes,
			0,
			MediaKind::Image,
			&Err(StudioError::Network("offline".into())),
		);
		assert!(!nodes[0].data.is_regenerating_image);
		assert_eq!(nodes[0].data.image_url.as_deref(), Some("/old.png"));
		assert_eq!(nodes[0].data.image_prompt.as_deref(), Some("a sleepy fox"));
	}

	#[test]
	fn successful_cards_merge_every_media_field() {
		let mut nodes = nodes();
		begin(&mut nodes, 1, MediaKind::Cards);
		let media = MediaResponse {
			image_url: Some("/new.png".into()),
			image_prompt: Some("a running fox".into()),
			audio_url: Some("/new.mp3".into()),
			..Default::default()
		};
		complete(&mut nodes, 1, MediaKind::Cards, &Ok(media));
		let data = &nodes[1].data;
		assert!(!data.is_generating);
		assert_eq!(data.image_url.as_deref(), Some("/new.png"));
		assert_eq!(data.audio_url.as_deref(), Some("/new.mp3"));
	}

	#[test]
	fn empty_success_clears_the_flag_and_keeps_media() {
		let mut nodes = nodes();
		begin(&mut nodes, 0, MediaKind::Image);
		let empty = MediaResponse {
			success: Some(true),
			..Default::default()
		};
		assert!(empty.is_empty());
		complete(&mut nodes, 0, MediaKind::Image, &Ok(empty));
		assert!(!nodes[0].data.is_regenerating_image);
		assert_eq!(nodes[0].data.image_url.as_deref(), Some("/old.png"));
	}

	#[test]
	fn audio_result_does_not_touch_the_image() {
		let mut nodes = nodes();
		let media = MediaResponse {
			image_url: Some("/ignored.png".into()),
			audio_url: Some("/voice.mp3".into()),
			..Default::default()
		};
		complete(&mut nodes, 0, MediaKind::Audio, &Ok(media));
		assert_eq!(nodes[0].data.image_url.as_deref(), Some("/old.png"));
		assert_eq!(nodes[0].data.audio_url.as_deref(), Some("/voice.mp3"));
	}
}
