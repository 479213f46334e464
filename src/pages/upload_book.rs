use js_sys::Uint8Array;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::api::ApiClient;
use crate::components::{Alert, ProgressBar};
use crate::config::StudioConfig;
use crate::error::{StudioError, StudioResult};
use crate::nav::{self, EDIT_PAGE};
use crate::story::pipeline::Phase;

/// Book formats the backend accepts.
const ACCEPTED: &str = ".txt,.pdf,.epub,.docx";

async fn read_file(file: &File) -> StudioResult<Vec<u8>> {
	let buffer = JsFuture::from(file.array_buffer())
		.await
		.map_err(StudioError::browser)?;
	Ok(Uint8Array::new(&buffer).to_vec())
}

async fn run_upload(api: ApiClient, file: File, phase: RwSignal<Phase>) {
	let name = file.name();
	let result = async {
		let bytes = read_file(&file).await?;
		api.upload_book(&name, bytes).await
	}
	.await;
	match result {
		Ok(outcome) => {
			let status = outcome.status.unwrap_or_else(|| "processing".into());
			phase.update(|p| {
				p.progress(90.0, Some(format!("Book {}", status)));
			});
			let target = outcome.redirect.unwrap_or_else(|| EDIT_PAGE.to_string());
			info!("upload of {} accepted, continuing at {}", name, target);
			phase.update(|p| {
				p.complete(Some(target.clone()));
			});
			nav::leave_for(&target);
		}
		Err(err) => phase.update(|p| {
			p.fail(err.user_message());
		}),
	}
}

/// Book upload form driving the idle/uploading/processing/complete flow.
#[component]
pub fn UploadBook() -> impl IntoView {
	let config = use_context::<StudioConfig>().unwrap_or_default();
	let input_ref = NodeRef::<leptos::html::Input>::new();
	let phase = RwSignal::new(Phase::Idle);
	let missing_file = RwSignal::new(false);

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		if phase.with_untracked(Phase::is_busy) {
			return;
		}
		let file = input_ref
			.get_untracked()
			.and_then(|input| input.files())
			.and_then(|files| files.get(0));
		let Some(file) = file else {
			missing_file.set(true);
			return;
		};
		missing_file.set(false);
		phase.update(|p| {
			p.reset();
			p.start();
		});
		spawn_local(run_upload(ApiClient::new(config.clone()), file, phase));
	};
	let busy = move || phase.with(Phase::is_busy);

	view! {
		<main class="upload-book">
			<h1>"Upload a book"</h1>
			<form on:submit=on_submit>
				<input type="file" accept=ACCEPTED node_ref=input_ref />
				<Show when=move || missing_file.get()>
					<span class="field-error">"Choose a file first"</span>
				</Show>
				<button type="submit" disabled=busy>
					{move || if busy() { "Uploading..." } else { "Upload" }}
				</button>
			</form>
			<Show when=move || phase.with(|p| *p != Phase::Idle)>
				<ProgressBar
					percent=Signal::derive(move || phase.with(Phase::percent))
					message=Signal::derive(move || match phase.get() {
						Phase::Uploading => Some("Uploading".to_string()),
						Phase::Processing { message, .. } => message,
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
