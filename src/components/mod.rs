//! Small shared widgets.

use leptos::error::Errors;
use leptos::prelude::*;

use crate::nav;

/// Dismissible error banner.
#[component]
pub fn Alert(message: String, #[prop(into)] on_dismiss: Callback<()>) -> impl IntoView {
	view! {
		<div class="alert alert-error" role="alert">
			<span>{message}</span>
			<button class="alert-close" title="Dismiss" on:click=move |_| on_dismiss.run(())>
				"×"
			</button>
		</div>
	}
}

/// Horizontal progress bar with an optional status line.
#[component]
pub fn ProgressBar(
	#[prop(into)] percent: Signal<f64>,
	#[prop(into, optional)] message: Signal<Option<String>>,
) -> impl IntoView {
	view! {
		<div class="progress">
			<div
				class="progress-fill"
				style:width=move || format!("{:.0}%", percent.get().clamp(0.0, 100.0))
			/>
		</div>
		<p class="progress-message">{move || message.get()}</p>
	}
}

/// Static replacement for a failed subtree, with a reload button.
#[component]
pub fn ErrorFallback(errors: ArcRwSignal<Errors>, title: &'static str) -> impl IntoView {
	view! {
		<div class="error-fallback">
			<h2>{title}</h2>
			<ul>
				{move || {
					errors
						.get()
						.into_iter()
						.map(|(_, e)| view! { <li>{e.to_string()}</li> })
						.collect_view()
				}}
			</ul>
			<button on:click=|_| nav::reload()>"Reload"</button>
		</div>
	}
}
