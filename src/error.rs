//! Crate-wide error type.

use thiserror::Error;

use crate::forms::FormErrors;

/// Generic banner text when the backend gave no usable message.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Everything that can fail between the UI and the story backend.
#[derive(Debug, Clone, Error)]
pub enum StudioError {
	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),
	/// The backend answered with a non-success status code.
	#[error("server returned {status}: {message}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Body text or the canonical reason.
		message: String,
	},
	/// The backend answered but reported a failure in its payload.
	#[error("{0}")]
	Api(String),
	/// A payload could not be decoded.
	#[error("invalid response: {0}")]
	Decode(String),
	/// A streamed body broke off or carried invalid bytes.
	#[error("stream error: {0}")]
	Stream(String),
	/// Form input failed validation.
	#[error("invalid input: {0}")]
	Validation(FormErrors),
	/// A browser API call failed.
	#[error("browser error: {0}")]
	Browser(String),
}

/// Result alias used across the crate.
pub type StudioResult<T> = Result<T, StudioError>;

impl StudioError {
	/// Text shown to the user in alerts and banners.
	pub fn user_message(&self) -> String {
		match self {
			StudioError::Api(message) if !message.trim().is_empty() => message.clone(),
			StudioError::Status { message, .. } if !message.trim().is_empty() => message.clone(),
			StudioError::Validation(errors) => errors.to_string(),
			_ => FALLBACK_MESSAGE.to_string(),
		}
	}

	pub(crate) fn browser(value: wasm_bindgen::JsValue) -> Self {
		StudioError::Browser(
			value
				.as_string()
				.unwrap_or_else(|| format!("{:?}", value)),
		)
	}
}

impl From<reqwest::Error> for StudioError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			StudioError::Decode(err.to_string())
		} else {
			StudioError::Network(err.to_string())
		}
	}
}

impl From<serde_json::Error> for StudioError {
	fn from(err: serde_json::Error) -> Self {
		StudioError::Decode(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn api_message_is_shown_verbatim() {
		let err = StudioError::Api("Story not found".into());
		assert_eq!(err.user_message(), "Story not found");
	}

	#[test]
	fn transport_failures_fall_back_to_generic_text() {
		assert_eq!(
			StudioError::Network("connection reset".into()).user_message(),
			FALLBACK_MESSAGE
		);
		assert_eq!(
			StudioError::Status {
				status: 502,
				message: "  ".into()
			}
			.user_message(),
			FALLBACK_MESSAGE
		);
	}
}
