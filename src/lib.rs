//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::info;

// Modules
pub mod api;
mod components;
pub mod config;
pub mod editor;
pub mod error;
pub mod forms;
mod nav;
mod pages;
pub mod story;

// Top-Level pages
use crate::components::ErrorFallback;
use crate::config::StudioConfig;
use crate::pages::create_story::CreateStory;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::story_flow::StoryFlow;
use crate::pages::upload_book::UploadBook;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(config: &StudioConfig) {
	let _ = console_log::init_with_level(config.log_level);
	console_error_panic_hook::set_once();
	info!("Logging initialized at {}", config.log_level);
}

/// An app router which renders the story pages and handles 404's
#[component]
pub fn App(config: StudioConfig) -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Story Studio" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<ErrorBoundary fallback=|errors| {
			view! { <ErrorFallback errors=errors title="Uh oh! Something went wrong!" /> }
		}>
			<Router>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/create-story") view=CreateStory />
					<Route path=path!("/upload-book") view=UploadBook />
					<Route path=path!("/story/flow") view=StoryFlow />
				</Routes>
			</Router>
		</ErrorBoundary>
	}
}
