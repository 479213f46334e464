//! HTTP client for the story backend.

use futures::stream::{self, LocalBoxStream, StreamExt};
use log::{debug, error, info};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};
use crate::forms::StoryPrompt;
use crate::story::stream::{LineBuffer, MediaResponse, ProgressEvent, parse_media_body};
use crate::story::{ImageStyle, Paragraph, VoiceStyle};

/// Stream of generation progress events.
pub type ProgressStream = LocalBoxStream<'static, StudioResult<ProgressEvent>>;

/// Which media endpoint to call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
	/// `/story/generate_cards`: image and audio together.
	Cards,
	/// `/story/regenerate_image`.
	Image,
	/// `/story/regenerate_audio`.
	Audio,
}

impl MediaKind {
	fn path(self) -> &'static str {
		match self {
			MediaKind::Cards => "/story/generate_cards",
			MediaKind::Image => "/story/regenerate_image",
			MediaKind::Audio => "/story/regenerate_audio",
		}
	}
}

/// Body of every media request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MediaRequest {
	/// Paragraph index.
	pub index: usize,
	/// Paragraph text.
	pub text: String,
	/// Image or voice style name, depending on the endpoint.
	pub style: String,
}

/// One paragraph's saved styles.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParagraphStyle {
	/// Paragraph index.
	pub index: usize,
	/// Image style.
	pub image_style: ImageStyle,
	/// Voice style.
	pub voice_style: VoiceStyle,
}

/// Body of `/story/update_style`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StyleUpdate {
	/// Styles in paragraph order.
	pub paragraphs: Vec<ParagraphStyle>,
}

/// Answer to a book upload.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UploadOutcome {
	/// Backend status word, e.g. `success` or `processing`.
	#[serde(default)]
	pub status: Option<String>,
	/// Page to continue on.
	#[serde(default)]
	pub redirect: Option<String>,
}

/// One page of a story.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StoryPage {
	/// Paragraphs on this page.
	#[serde(default)]
	pub paragraphs: Vec<Paragraph>,
	/// 1-based page number.
	#[serde(default = "first_page")]
	pub page: u32,
	/// Page count of the whole story.
	#[serde(default = "first_page")]
	pub total_pages: u32,
}

fn first_page() -> u32 {
	1
}

#[derive(Debug, Deserialize)]
struct Outcome {
	#[serde(default)]
	success: Option<bool>,
	#[serde(default)]
	status: Option<String>,
	#[serde(default)]
	redirect: Option<String>,
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	message: Option<String>,
}

/// Thin wrapper over `reqwest` rooted at the configured backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
	config: StudioConfig,
	client: reqwest::Client,
}

impl ApiClient {
	/// Client for the backend named in `config`.
	pub fn new(config: StudioConfig) -> Self {
		debug!("creating api client for {}", config.api_base);
		Self {
			config,
			client: reqwest::Client::new(),
		}
	}

	/// Starts story generation and returns its progress events.
	pub async fn generate_story(&self, prompt: &StoryPrompt) -> StudioResult<ProgressStream> {
		let url = self.config.endpoint("/generate_story");
		info!("requesting story generation at {}", url);
		let response = self
			.client
			.post(&url)
			.form(&prompt.form_fields())
			.send()
			.await
			.map_err(|e| log_failure(&url, e.into()))?;
		let response = ensure_success(&url, response).await?;

		let mut buffer = LineBuffer::new();
		let events = response
			.bytes_stream()
			.map(Some)
			.chain(stream::once(async { None }))
			.flat_map(move |chunk| {
				let items: Vec<StudioResult<ProgressEvent>> = match chunk {
					Some(Ok(bytes)) => buffer.push(&bytes).into_iter().map(Ok).collect(),
					Some(Err(e)) => vec![Err(StudioError::Stream(e.to_string()))],
					None => buffer.finish().into_iter().map(Ok).collect(),
				};
				stream::iter(items)
			});
		Ok(events.boxed_local())
	}

	/// Uploads a book file as multipart field `file`.
	pub async fn upload_book(&self, file_name: &str, bytes: Vec<u8>) -> StudioResult<UploadOutcome> {
		let url = self.config.endpoint("/story/upload");
		info!("uploading {} ({} bytes) to {}", file_name, bytes.len(), url);
		let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
		let response = self
			.client
			.post(&url)
			.multipart(form)
			.send()
			.await
			.map_err(|e| log_failure(&url, e.into()))?;
		let outcome: Outcome = read_json(&url, response).await?;
		if let Some(message) = outcome.error {
			return Err(log_failure(&url, StudioError::Api(message)));
		}
		Ok(UploadOutcome {
			status: outcome.status,
			redirect: outcome.redirect,
		})
	}

	/// Calls one of the media endpoints for a single paragraph.
	pub async fn media(&self, kind: MediaKind, request: &MediaRequest) -> StudioResult<MediaResponse> {
		let url = self.config.endpoint(kind.path());
		debug!("{:?} request for paragraph {}", kind, request.index);
		let response = self
			.client
			.post(&url)
			.json(request)
			.send()
			.await
			.map_err(|e| log_failure(&url, e.into()))?;
		let response = ensure_success(&url, response).await?;
		let body = response
			.text()
			.await
			.map_err(|e| log_failure(&url, e.into()))?;
		parse_media_body(&body)
			.and_then(MediaResponse::into_result)
			.map_err(|e| log_failure(&url, e))
	}

	/// Saves per-paragraph styles.
	pub async fn update_style(&self, update: &StyleUpdate) -> StudioResult<()> {
		let url = self.config.endpoint("/story/update_style");
		info!("saving styles for {} paragraphs", update.paragraphs.len());
		let response = self
			.client
			.post(&url)
			.json(update)
			.send()
			.await
			.map_err(|e| log_failure(&url, e.into()))?;
		let outcome: Outcome = read_json(&url, response).await?;
		match (outcome.error, outcome.success) {
			(Some(message), _) => Err(log_failure(&url, StudioError::Api(message))),
			(None, Some(false)) => Err(log_failure(
				&url,
				StudioError::Api(outcome.message.unwrap_or_default()),
			)),
			_ => Ok(()),
		}
	}

	/// Fetches page `page` (1-based) of the current story.
	pub async fn fetch_page(&self, page: u32) -> StudioResult<StoryPage> {
		let url = self.config.endpoint(&format!("/story/page/{}", page));
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| log_failure(&url, e.into()))?;
		read_json(&url, response).await
	}

	/// Fetches every page in order and concatenates the paragraphs.
	pub async fn load_story(&self) -> StudioResult<Vec<Paragraph>> {
		let first = self.fetch_page(1).await?;
		let total = first.total_pages.max(1);
		let mut paragraphs = first.paragraphs;
		for page in 2..=total {
			paragraphs.extend(self.fetch_page(page).await?.paragraphs);
		}
		info!("loaded {} paragraphs over {} pages", paragraphs.len(), total);
		Ok(paragraphs)
	}
}

fn log_failure(url: &str, err: StudioError) -> StudioError {
	error!("request to {} failed: {}", url, err);
	err
}

async fn ensure_success(url: &str, response: reqwest::Response) -> StudioResult<reqwest::Response> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}
	let body = response.text().await.unwrap_or_default();
	let message = serde_json::from_str::<Outcome>(&body)
		.ok()
		.and_then(|o| o.error.or(o.message))
		.unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
	Err(log_failure(
		url,
		StudioError::Status {
			status: status.as_u16(),
			message,
		},
	))
}

async fn read_json<T: serde::de::DeserializeOwned>(
	url: &str,
	response: reqwest::Response,
) -> StudioResult<T> {
	let response = ensure_success(url, response).await?;
	let body = response
		.text()
		.await
		.map_err(|e| log_failure(url, e.into()))?;
	serde_json::from_str(&body).map_err(|e| log_failure(url, e.into()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn style_update_serializes_to_the_wire_shape() {
		let update = StyleUpdate {
			paragraphs: vec![ParagraphStyle {
				index: 0,
				image_style: ImageStyle::Fantasy,
				voice_style: VoiceStyle::Dramatic,
			}],
		};
		assert_eq!(
			serde_json::to_value(&update).unwrap(),
			serde_json::json!({
				"paragraphs": [{"index": 0, "image_style": "fantasy", "voice_style": "dramatic"}]
			})
		);
	}

	#[test]
	fn story_page_defaults_to_a_single_page() {
		let page: StoryPage = serde_json::from_str(r#"{"paragraphs":[{"text":"Hi"}]}"#).unwrap();
		assert_eq!(page.page, 1);
		assert_eq!(page.total_pages, 1);
		assert_eq!(page.paragraphs[0].text, "Hi");
	}
}
