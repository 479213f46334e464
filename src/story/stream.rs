//! Newline-delimited JSON progress events and media payloads.

use log::warn;
use serde::Deserialize;

use crate::error::{StudioError, StudioResult};

/// One line of the `/generate_story` stream.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
	/// Generation advanced.
	Progress {
		/// Percentage in `0..=100`.
		#[serde(default)]
		progress: f64,
		/// Human-readable step description.
		#[serde(default)]
		message: Option<String>,
	},
	/// Generation finished.
	Complete {
		/// Where to continue, usually `/story/edit`.
		#[serde(default)]
		redirect: Option<String>,
		/// Identifier of the new story.
		#[serde(default)]
		story_id: Option<String>,
	},
	/// Generation failed server-side.
	Error {
		/// Reason reported by the backend.
		#[serde(default)]
		message: String,
	},
}

/// Accumulates chunks and yields events for every complete line. Bytes are
/// buffered so multi-byte characters split across chunks survive.
#[derive(Debug, Default)]
pub struct LineBuffer {
	pending: Vec<u8>,
	skipped: usize,
}

impl LineBuffer {
	/// Creates an empty buffer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `chunk` and parses every line it completes. The unterminated
	/// tail stays buffered for the next chunk.
	pub fn push(&mut self, chunk: impl AsRef<[u8]>) -> Vec<ProgressEvent> {
		self.pending.extend_from_slice(chunk.as_ref());
		let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
			return Vec::new();
		};
		let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
		complete
			.split(|&b| b == b'\n')
			.filter_map(|line| self.parse_line(line))
			.collect()
	}

	/// Parses whatever is left once the stream has ended.
	pub fn finish(&mut self) -> Option<ProgressEvent> {
		let rest = std::mem::take(&mut self.pending);
		self.parse_line(&rest)
	}

	/// Number of malformed lines dropped so far.
	pub fn skipped(&self) -> usize {
		self.skipped
	}

	fn parse_line(&mut self, line: &[u8]) -> Option<ProgressEvent> {
		let line = line.trim_ascii();
		if line.is_empty() {
			return None;
		}
		match serde_json::from_slice(line) {
			Ok(event) => Some(event),
			Err(err) => {
				self.skipped += 1;
				warn!(
					"skipping malformed progress line ({}): {}",
					err,
					String::from_utf8_lossy(line)
				);
				None
			}
		}
	}
}

/// Body of the media endpoints.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MediaResponse {
	/// Explicit success flag, when the backend sends one.
	#[serde(default)]
	pub success: Option<bool>,
	/// New illustration.
	#[serde(default)]
	pub image_url: Option<String>,
	/// Prompt behind the new illustration.
	#[serde(default)]
	pub image_prompt: Option<String>,
	/// New narration.
	#[serde(default)]
	pub audio_url: Option<String>,
	/// Failure reason.
	#[serde(default)]
	pub error: Option<String>,
	/// Event tag of streamed bodies (`progress`, `complete`, `error`).
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Outcome word some endpoints send instead of `success`.
	#[serde(default)]
	pub status: Option<String>,
	/// Human-readable detail, carried by error events.
	#[serde(default)]
	pub message: Option<String>,
}

impl MediaResponse {
	fn absorb(&mut self, later: MediaResponse) {
		if later.success.is_some() {
			self.success = later.success;
		}
		if later.image_url.is_some() {
			self.image_url = later.image_url;
		}
		if later.image_prompt.is_some() {
			self.image_prompt = later.image_prompt;
		}
		if later.audio_url.is_some() {
			self.audio_url = later.audio_url;
		}
		if later.error.is_some() {
			self.error = later.error;
		}
		// an error event anywhere in the body decides the outcome
		if later.kind.is_some() && self.kind.as_deref() != Some("error") {
			self.kind = later.kind;
		}
		if later.status.is_some() && self.status.as_deref() != Some("error") {
			self.status = later.status;
		}
		if later.message.is_some() {
			self.message = later.message;
		}
	}

	/// Whether no media field was returned.
	pub fn is_empty(&self) -> bool {
		self.image_url.is_none() && self.image_prompt.is_none() && self.audio_url.is_none()
	}

	/// Turns a non-success payload into an error.
	pub fn into_result(self) -> StudioResult<MediaResponse> {
		if let Some(message) = &self.error {
			return Err(StudioError::Api(message.clone()));
		}
		let flagged_error = self.kind.as_deref() == Some("error")
			|| self.status.as_deref() == Some("error");
		if flagged_error || self.success == Some(false) {
			let message = self
				.message
				.clone()
				.unwrap_or_else(|| "media generation failed".into());
			return Err(StudioError::Api(message));
		}
		Ok(self)
	}
}

/// Parses a media body that is either one JSON object or a sequence of
/// newline-delimited objects; later objects override earlier fields.
pub fn parse_media_body(body: &str) -> StudioResult<MediaResponse> {
	if let Ok(single) = serde_json::from_str::<MediaResponse>(body.trim()) {
		return Ok(single);
	}
	let mut merged: Option<MediaResponse> = None;
	for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
		match serde_json::from_str::<MediaResponse>(line) {
			Ok(part) => merged.get_or_insert_with(MediaResponse::default).absorb(part),
			Err(err) => warn!("skipping malformed media line ({}): {}", err, line),
		}
	}
	merged.ok_or_else(|| StudioError::Decode("no JSON object in media response".into()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lines_split_across_chunks_are_reassembled() {
		let mut buffer = LineBuffer::new();
		assert!(buffer.push(r#"{"type":"progress","prog"#).is_empty());
		let events = buffer.push("ress\":40}\n{\"type\":\"complete\",\"redirect\":\"/story/edit\"}\n");
		assert_eq!(
			events,
			vec![
				ProgressEvent::Progress {
					progress: 40.0,
					message: None
				},
				ProgressEvent::Complete {
					redirect: Some("/story/edit".into()),
					story_id: None
				},
			]
		);
	}

	#[test]
	fn malformed_line_does_not_stop_later_lines() {
		let mut buffer = LineBuffer::new();
		let events = buffer.push(
			"{\"type\":\"progress\",\"progress\":10}\nnot json at all\n{\"type\":\"error\",\"message\":\"quota\"}\n",
		);
		assert_eq!(events.len(), 2);
		assert_eq!(
			events[1],
			ProgressEvent::Error {
				message: "quota".into()
			}
		);
		assert_eq!(buffer.skipped(), 1);
	}

	#[test]
	fn multibyte_characters_split_across_chunks_survive() {
		let line = "{\"type\":\"progress\",\"progress\":5,\"message\":\"Écriture\"}\n".as_bytes();
		let split = line.iter().position(|&b| b == 0xC3).unwrap() + 1;
		let mut buffer = LineBuffer::new();
		assert!(buffer.push(&line[..split]).is_empty());
		let events = buffer.push(&line[split..]);
		assert_eq!(
			events,
			vec![ProgressEvent::Progress {
				progress: 5.0,
				message: Some("Écriture".into())
			}]
		);
	}

	#[test]
	fn finish_flushes_an_unterminated_line() {
		let mut buffer = LineBuffer::new();
		assert!(buffer.push(r#"{"type":"complete"}"#).is_empty());
		assert_eq!(
			buffer.finish(),
			Some(ProgressEvent::Complete {
				redirect: None,
				story_id: None
			})
		);
		assert_eq!(buffer.finish(), None);
	}

	#[test]
	fn media_body_accepts_single_object() {
		let media =
			parse_media_body(r#"{"success":true,"image_url":"/a.png","image_prompt":"a fox"}"#)
				.unwrap();
		assert_eq!(media.image_url.as_deref(), Some("/a.png"));
		assert!(media.into_result().is_ok());
	}

	#[test]
	fn media_body_folds_streamed_objects() {
		let media = parse_media_body(
			"{\"image_url\":\"/a.png\"}\n{\"audio_url\":\"/a.mp3\"}\n{\"image_url\":\"/b.png\"}\n",
		)
		.unwrap();
		assert_eq!(media.image_url.as_deref(), Some("/b.png"));
		assert_eq!(media.audio_url.as_deref(), Some("/a.mp3"));
	}

	#[test]
	fn media_failure_payloads_become_errors() {
		let failed = parse_media_body(r#"{"success":false}"#).unwrap();
		assert!(failed.into_result().is_err());
		let with_error = parse_media_body(r#"{"error":"busy"}"#).unwrap();
		assert_eq!(with_error.into_result().unwrap_err().user_message(), "busy");
		assert!(parse_media_body("<html>").is_err());
	}

	#[test]
	fn streamed_error_event_fails_the_media_request() {
		let media = parse_media_body(
			"{\"type\":\"progress\",\"progress\":50}\n{\"type\":\"error\",\"message\":\"quota exceeded\"}\n",
		)
		.unwrap();
		let err = media.into_result().unwrap_err();
		assert_eq!(err.user_message(), "quota exceeded");

		let error_then_complete = parse_media_body(
			"{\"type\":\"error\",\"message\":\"quota exceeded\"}\n{\"type\":\"complete\"}\n",
		)
		.unwrap();
		assert!(error_then_complete.into_result().is_err());

		let by_status = parse_media_body(r#"{"status":"error","message":"no credits"}"#).unwrap();
		assert_eq!(by_status.into_result().unwrap_err().user_message(), "no credits");
	}

	#[test]
	fn progress_then_complete_with_media_succeeds() {
		let media = parse_media_body(
			"{\"type\":\"progress\",\"progress\":50}\n{\"type\":\"complete\",\"audio_url\":\"/a.mp3\"}\n",
		)
		.unwrap()
		.into_result()
		.unwrap();
		assert_eq!(media.audio_url.as_deref(), Some("/a.mp3"));
		assert!(!media.is_empty());
		assert!(MediaResponse::default().is_empty());
	}
}
