//! Story prompt form and its validation rules.

use std::collections::BTreeMap;
use std::fmt;

use crate::story::{ImageStyle, VoiceStyle};

/// Bounds on the trimmed prompt length.
pub const PROMPT_LEN: std::ops::RangeInclusive<usize> = 10..=2000;
/// Longest accepted genre.
pub const GENRE_MAX: usize = 50;
/// Accepted paragraph counts.
pub const PARAGRAPHS: std::ops::RangeInclusive<u32> = 1..=20;

/// Form fields, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
	/// Story prompt.
	Prompt,
	/// Optional genre.
	Genre,
	/// Requested paragraph count.
	ParagraphCount,
}

impl Field {
	/// Form field name, also the wire name.
	pub fn name(self) -> &'static str {
		match self {
			Field::Prompt => "prompt",
			Field::Genre => "genre",
			Field::ParagraphCount => "num_paragraphs",
		}
	}
}

/// Per-field validation messages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormErrors(BTreeMap<Field, String>);

impl FormErrors {
	/// No field failed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Message for `field`, if it failed.
	pub fn get(&self, field: Field) -> Option<&str> {
		self.0.get(&field).map(String::as_str)
	}

	fn insert(&mut self, field: Field, message: impl Into<String>) {
		self.0.insert(field, message.into());
	}
}

impl fmt::Display for FormErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut first = true;
		for (field, message) in &self.0 {
			if !first {
				f.write_str("; ")?;
			}
			write!(f, "{}: {}", field.name(), message)?;
			first = false;
		}
		Ok(())
	}
}

/// Everything the create-story form submits.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryPrompt {
	/// What the story should be about.
	pub prompt: String,
	/// Free-form genre, may be empty.
	pub genre: String,
	/// Number of paragraphs to generate.
	pub paragraph_count: u32,
	/// Default image style.
	pub image_style: ImageStyle,
	/// Default voice style.
	pub voice_style: VoiceStyle,
}

impl Default for StoryPrompt {
	fn default() -> Self {
		Self {
			prompt: String::new(),
			genre: String::new(),
			paragraph_count: 5,
			image_style: ImageStyle::default(),
			voice_style: VoiceStyle::default(),
		}
	}
}

impl StoryPrompt {
	/// Checks every field, collecting all failures.
	pub fn validate(&self) -> Result<(), FormErrors> {
		let mut errors = FormErrors::default();
		let prompt_len = self.prompt.trim().chars().count();
		if prompt_len < *PROMPT_LEN.start() {
			errors.insert(
				Field::Prompt,
				format!("Prompt must be at least {} characters", PROMPT_LEN.start()),
			);
		} else if prompt_len > *PROMPT_LEN.end() {
			errors.insert(
				Field::Prompt,
				format!("Prompt must be at most {} characters", PROMPT_LEN.end()),
			);
		}
		if self.genre.trim().chars().count() > GENRE_MAX {
			errors.insert(
				Field::Genre,
				format!("Genre must be at most {} characters", GENRE_MAX),
			);
		}
		if !PARAGRAPHS.contains(&self.paragraph_count) {
			errors.insert(
				Field::ParagraphCount,
				format!(
					"Choose between {} and {} paragraphs",
					PARAGRAPHS.start(),
					PARAGRAPHS.end()
				),
			);
		}
		if errors.is_empty() { Ok(()) } else { Err(errors) }
	}

	/// Form-encoded fields for `/generate_story`.
	pub fn form_fields(&self) -> Vec<(&'static str, String)> {
		vec![
			(Field::Prompt.name(), self.prompt.trim().to_string()),
			(Field::Genre.name(), self.genre.trim().to_string()),
			(Field::ParagraphCount.name(), self.paragraph_count.to_string()),
			("image_style", self.image_style.to_string()),
			("voice_style", self.voice_style.to_string()),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn valid() -> StoryPrompt {
		StoryPrompt {
			prompt: "A lighthouse keeper befriends a storm".into(),
			..Default::default()
		}
	}

	#[test]
	fn valid_prompt_passes() {
		assert!(valid().validate().is_ok());
	}

	#[test]
	fn each_field_reports_its_own_error() {
		let form = StoryPrompt {
			prompt: "   short  ".into(),
			genre: "g".repeat(GENRE_MAX + 1),
			paragraph_count: 0,
			..Default::default()
		};
		let errors = form.validate().unwrap_err();
		assert!(errors.get(Field::Prompt).unwrap().contains("at least"));
		assert!(errors.get(Field::Genre).is_some());
		assert!(errors.get(Field::ParagraphCount).is_some());
	}

	#[test]
	fn overlong_prompt_is_rejected() {
		let form = StoryPrompt {
			prompt: "x".repeat(*PROMPT_LEN.end() + 1),
			..valid()
		};
		let errors = form.validate().unwrap_err();
		assert!(errors.get(Field::Prompt).unwrap().contains("at most"));
		assert_eq!(errors.get(Field::Genre), None);
	}

	#[test]
	fn form_fields_are_trimmed_and_named() {
		let form = StoryPrompt {
			genre: " noir ".into(),
			image_style: ImageStyle::Watercolor,
			..valid()
		};
		let fields = form.form_fields();
		assert!(fields.contains(&("genre", "noir".to_string())));
		assert!(fields.contains(&("image_style", "watercolor".to_string())));
		assert!(fields.contains(&("num_paragraphs", "5".to_string())));
	}
}
