use leptos::prelude::*;
use leptos_router::components::A;

/// Landing page with the two ways into a story.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<main class="home">
			<h1>"Story Studio"</h1>
			<p class="subtitle">
				"Turn a prompt or a book into an illustrated, narrated story."
			</p>
			<nav class="entry-points">
				<A href="/create-story">"Write from a prompt"</A>
				<A href="/upload-book">"Upload a book"</A>
				<A href="/story/flow">"Open the story editor"</A>
			</nav>
		</main>
	}
}
