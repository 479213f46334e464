//! Story session model and the pure logic built on it.

pub mod history;
pub mod pipeline;
pub mod projection;
pub mod stream;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Visual style applied when generating a paragraph's image.
#[derive(
	Clone,
	Copy,
	Debug,
	Default,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
	Display,
	EnumString,
	EnumIter,
	IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageStyle {
	/// Photographic rendering.
	#[default]
	Realistic,
	/// Painterly rendering.
	Artistic,
	/// Flat cartoon rendering.
	Cartoon,
	/// Fantasy illustration.
	Fantasy,
	/// Anime illustration.
	Anime,
	/// Watercolor painting.
	Watercolor,
}

/// Narration voice used when generating a paragraph's audio.
#[derive(
	Clone,
	Copy,
	Debug,
	Default,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
	Display,
	EnumString,
	EnumIter,
	IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoiceStyle {
	/// Plain narration.
	#[default]
	Neutral,
	/// Upbeat narration.
	Cheerful,
	/// Theatrical narration.
	Dramatic,
	/// Soft narration.
	Calm,
	/// Hushed narration.
	Mysterious,
}

/// Style applied to paragraphs that carry none of their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlobalStyle {
	/// Default image style.
	pub image: ImageStyle,
	/// Default voice style.
	pub voice: VoiceStyle,
}

/// One paragraph as delivered by the backend. Order within a story is the
/// reading order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
	/// Paragraph text.
	pub text: String,
	/// Generated illustration.
	#[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	/// Prompt the illustration was generated from.
	#[serde(default, alias = "imagePrompt", skip_serializing_if = "Option::is_none")]
	pub image_prompt: Option<String>,
	/// Generated narration.
	#[serde(default, alias = "audioUrl", skip_serializing_if = "Option::is_none")]
	pub audio_url: Option<String>,
	/// Explicit image style, if the user or backend picked one.
	#[serde(default, alias = "imageStyle", skip_serializing_if = "Option::is_none")]
	pub image_style: Option<ImageStyle>,
	/// Explicit voice style, if the user or backend picked one.
	#[serde(default, alias = "voiceStyle", skip_serializing_if = "Option::is_none")]
	pub voice_style: Option<VoiceStyle>,
}

impl Paragraph {
	/// Paragraph with text only.
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			..Default::default()
		}
	}
}
