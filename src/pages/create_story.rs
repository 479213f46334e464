use futures::StreamExt;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use strum::IntoEnumIterator;

use crate::api::ApiClient;
use crate::components::{Alert, ProgressBar};
use crate::config::StudioConfig;
use crate::forms::{Field, FormErrors, StoryPrompt};
use crate::nav::{self, EDIT_PAGE};
use crate::story::pipeline::Phase;
use crate::story::stream::ProgressEvent;
use crate::story::{ImageStyle, VoiceStyle};

async fn run_generation(api: ApiClient, prompt: StoryPrompt, phase: RwSignal<Phase>) {
	let mut events = match api.generate_story(&prompt).await {
		Ok(events) => events,
		Err(err) => {
			phase.update(|p| {
				p.fail(err.user_message());
			});
			return;
		}
	};
	while let Some(item) = events.next().await {
		match item {
			Ok(ProgressEvent::Progress { progress, message }) => phase.update(|p| {
				p.progress(progress, message);
			}),
			Ok(ProgressEvent::Complete { redirect, story_id }) => {
				info!("story {:?} generated", story_id);
				let target = redirect.unwrap_or_else(|| EDIT_PAGE.to_string());
				phase.update(|p| {
					p.complete(Some(target.clone()));
				});
				nav::leave_for(&target);
				return;
			}
			Ok(ProgressEvent::Error { message }) => {
				phase.update(|p| {
					p.fail(message);
				});
				return;
			}
			Err(err) => {
				phase.update(|p| {
					p.fail(err.user_message());
				});
				return;
			}
		}
	}
	warn!("generation stream ended without a completion event");
	phase.update(|p| {
		p.fail("Story generation ended unexpectedly.");
	});
}

/// Prompt form; submits to the generation stream and shows its progress.
#[component]
pub fn CreateStory() -> impl IntoView {
	let config = use_context::<StudioConfig>().unwrap_or_default();
	let prompt = RwSignal::new(String::new());
	let genre = RwSignal::new(String::new());
	let count = RwSignal::new(StoryPrompt::default().paragraph_count);
	let image_style = RwSignal::new(ImageStyle::default());
	let voice_style = RwSignal::new(VoiceStyle::default());
	let errors = RwSignal::new(FormErrors::default());
	let phase = RwSignal::new(Phase::Idle);

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		if phase.with_untracked(Phase::is_busy) {
			return;
		}
		let form = StoryPrompt {
			prompt: prompt.get_untracked(),
			genre: genre.get_untracked(),
			paragraph_count: count.get_untracked(),
			image_style: image_style.get_untracked(),
			voice_style: voice_style.get_untracked(),
		};
		if let Err(failed) = form.validate() {
			warn!("prompt form rejected: {}", failed);
			errors.set(failed);
			return;
		}
		errors.set(FormErrors::default());
		phase.update(|p| {
			p.reset();
			p.start();
		});
		spawn_local(run_generation(ApiClient::new(config.clone()), form, phase));
	};

	let field_error = move |field: Field| {
		move || {
			errors.with(|e| {
				e.get(field)
					.map(|message| view! { <span class="field-error">{message.to_string()}</span> })
			})
		}
	};
	let busy = move || phase.with(Phase::is_busy);

	view! {
		<main class="create-story">
			<h1>"Create a story"</h1>
			<form on:submit=on_submit>
				<label>
					"Prompt"
					<textarea
						name=Field::Prompt.name()
						rows="5"
						prop:value=move || prompt.get()
						on:input=move |ev| prompt.set(event_target_value(&ev))
					/>
					{field_error(Field::Prompt)}
				</label>
				<label>
					"Genre"
					<input
						type="text"
						name=Field::Genre.name()
						prop:value=move || genre.get()
						on:input=move |ev| genre.set(event_target_value(&ev))
					/>
					{field_error(Field::Genre)}
				</label>
				<label>
					"Paragraphs"
					<input
						type="number"
						name=Field::ParagraphCount.name()
						min="1"
						max="20"
						prop:value=move || count.get().to_string()
						on:input=move |ev| count.set(event_target_value(&ev).parse().unwrap_or(0))
					/>
					{field_error(Field::ParagraphCount)}
				</label>
				<label>
					"Image style"
					<select
						prop:value=move || image_style.get().to_string()
						on:change=move |ev| {
							if let Ok(style) = event_target_value(&ev).parse() {
								image_style.set(style);
							}
						}
					>
						{ImageStyle::iter()
							.map(|s| view! { <option value=s.to_string()>{s.to_string()}</option> })
							.collect_view()}
					</select>
				</label>
				<label>
					"Voice style"
					<select
						prop:value=move || voice_style.get().to_string()
						on:change=move |ev| {
							if let Ok(style) = event_target_value(&ev).parse() {
								voice_style.set(style);
							}
						}
					>
						{VoiceStyle::iter()
							.map(|s| view! { <option value=s.to_string()>{s.to_string()}</option> })
							.collect_view()}
					</select>
				</label>
				<button type="submit" disabled=busy>
					{move || if busy() { "Generating..." } else { "Generate story" }}
				</button>
			</form>

			<Show when=move || phase.with(|p| *p != Phase::Idle)>
				<ProgressBar
					percent=Signal::derive(move || phase.with(Phase::percent))
					message=Signal::derive(move || match phase.get() {
						Phase::Processing { message, .. } => message,
						Phase::Uploading => Some("Sending prompt".to_string()),
						Phase::Complete { .. } => Some("Done".to_string()),
						_ => None,
					})
				/>
			</Show>
			{move || match phase.get() {
				Phase::Error(message) => {
					Some(view! { <Alert message=message on_dismiss=Callback::new(move |_| phase.update(Phase::reset)) /> })
				}
				_ => None,
			}}
		</main>
	}
}
