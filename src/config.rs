//! Build-time configuration with browser fallbacks.

use std::str::FromStr;

use log::Level;

const DEFAULT_API_BASE: &str = "http://localhost:5000";
const DEFAULT_GRID_COLUMNS: usize = 3;

/// Settings shared by every page, provided as context from [`crate::App`].
#[derive(Clone, Debug, PartialEq)]
pub struct StudioConfig {
	/// Origin of the story backend, without a trailing slash.
	pub api_base: String,
	/// Column count of the editor's initial grid layout.
	pub grid_columns: usize,
	/// Console log level.
	pub log_level: Level,
}

impl Default for StudioConfig {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.into(),
			grid_columns: DEFAULT_GRID_COLUMNS,
			log_level: Level::Debug,
		}
	}
}

impl StudioConfig {
	/// Reads `STORY_API_BASE`, `STORY_GRID_COLUMNS` and `STORY_LOG_LEVEL`
	/// baked in at compile time. The API base falls back to the page origin.
	pub fn load() -> Self {
		Self::from_values(
			option_env!("STORY_API_BASE")
				.map(str::to_string)
				.or_else(window_origin),
			option_env!("STORY_GRID_COLUMNS"),
			option_env!("STORY_LOG_LEVEL"),
		)
	}

	fn from_values(
		api_base: Option<String>,
		grid_columns: Option<&str>,
		log_level: Option<&str>,
	) -> Self {
		let defaults = Self::default();
		Self {
			api_base: api_base
				.map(|base| base.trim().trim_end_matches('/').to_string())
				.filter(|base| !base.is_empty())
				.unwrap_or(defaults.api_base),
			grid_columns: grid_columns
				.and_then(|raw| raw.trim().parse::<usize>().ok())
				.map(|n| n.max(1))
				.unwrap_or(defaults.grid_columns),
			log_level: log_level
				.and_then(|raw| Level::from_str(raw.trim()).ok())
				.unwrap_or(defaults.log_level),
		}
	}

	/// Absolute URL for a backend path such as `/story/upload`.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.api_base, path.trim_start_matches('/'))
	}
}

fn window_origin() -> Option<String> {
	web_sys::window().and_then(|w| w.location().origin().ok())
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[test]
	fn missing_values_use_defaults() {
		assert_eq!(StudioConfig::from_values(None, None, None), StudioConfig::default());
	}

	#[rstest]
	#[case(Some("4"), 4)]
	#[case(Some("0"), 1)]
	#[case(Some("many"), DEFAULT_GRID_COLUMNS)]
	#[case(None, DEFAULT_GRID_COLUMNS)]
	fn grid_columns_are_parsed_and_clamped(#[case] raw: Option<&str>, #[case] expected: usize) {
		assert_eq!(StudioConfig::from_values(None, raw, None).grid_columns, expected);
	}

	#[test]
	fn api_base_drops_trailing_slash() {
		let config =
			StudioConfig::from_values(Some("https://stories.example/".into()), None, Some("warn"));
		assert_eq!(config.api_base, "https://stories.example");
		assert_eq!(config.log_level, Level::Warn);
		assert_eq!(
			config.endpoint("/story/page/2"),
			"https://stories.example/story/page/2"
		);
	}
}
