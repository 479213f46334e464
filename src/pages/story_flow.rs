use leptos::prelude::*;

use crate::api::ApiClient;
use crate::components::ErrorFallback;
use crate::config::StudioConfig;
use crate::editor::StoryFlowEditor;

/// Loads the current story page by page and hands it to the editor.
#[component]
pub fn StoryFlow() -> impl IntoView {
	let config = use_context::<StudioConfig>().unwrap_or_default();
	let story = LocalResource::new(move || {
		let api = ApiClient::new(config.clone());
		async move { api.load_story().await }
	});

	view! {
		<main class="story-flow">
			<Suspense fallback=|| view! { <p class="loading">"Loading story..."</p> }>
				<ErrorBoundary fallback=|errors| {
					view! { <ErrorFallback errors=errors title="The story editor failed to load" /> }
				}>
					{move || Suspend::new(async move {
						story
							.await
							.map(|paragraphs| {
								view! { <StoryFlowEditor paragraphs=Signal::stored(paragraphs) /> }
							})
					})}
				</ErrorBoundary>
			</Suspense>
		</main>
	}
}
