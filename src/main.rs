use leptos::prelude::*;
use story_studio::config::StudioConfig;
use story_studio::{App, init_logging};

fn main() {
	let config = StudioConfig::load();
	init_logging(&config);
	mount_to_body(move || view! { <App config=config.clone() /> })
}
