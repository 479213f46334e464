use leptos::prelude::*;
use strum::IntoEnumIterator;

use super::EditorActions;
use super::state::{EditorState, StyleChange};
use crate::story::{ImageStyle, VoiceStyle};

/// Rendered card width in graph units.
pub const CARD_WIDTH: f64 = 300.0;
/// Rendered card height in graph units.
pub const CARD_HEIGHT: f64 = 400.0;

/// One paragraph node. Reads its data by id so media and flag updates
/// re-render only this card.
#[component]
pub fn ParagraphCard(id: String) -> impl IntoView {
	let state = expect_context::<EditorState>();
	let actions = expect_context::<EditorActions>();
	let node = {
		let id = id.clone();
		Memo::new(move |_| {
			state
				.nodes
				.with(|nodes| nodes.iter().find(|n| n.id == id).cloned())
				.unwrap_or_default()
		})
	};
	let index = move || node.with(|n| n.data.index);
	let data = move || node.get().data;

	let drag_id = id.clone();
	let on_header_down = move |ev: leptos::ev::MouseEvent| {
		ev.stop_propagation();
		actions.begin_drag.run((
			drag_id.clone(),
			ev.client_x() as f64,
			ev.client_y() as f64,
		));
	};
	let (in_id, out_id) = (id.clone(), id.clone());
	let connecting_from = id.clone();

	view! {
		<div
			class="paragraph-card"
			class:busy=move || node.with(|n| n.data.is_busy())
			class:connect-source=move || state.connecting.get().as_deref() == Some(connecting_from.as_str())
			style:transform=move || node.with(|n| format!("translate({}px, {}px)", n.position.x, n.position.y))
			style:width=format!("{}px", CARD_WIDTH)
			on:mousedown=|ev| ev.stop_propagation()
		>
			<button
				class="handle handle-in"
				title="Connect here"
				on:click=move |_| state.connect_to(&in_id)
			/>
			<header class="card-header" on:mousedown=on_header_down>
				{move || format!("Paragraph {}", index() + 1)}
			</header>
			<p class="card-text">{move || data().text}</p>

			<div class="card-image">
				{move || match data().image_url {
					Some(url) => view! { <img src=url alt="Paragraph illustration" /> }.into_any(),
					None => view! { <div class="placeholder">"No image yet"</div> }.into_any(),
				}}
				{move || data().image_prompt.map(|prompt| view! { <small class="prompt">{prompt}</small> })}
			</div>
			{move || data().audio_url.map(|url| view! { <audio controls=true src=url /> })}

			<label>
				"Image style"
				<select
					prop:value=move || node.with(|n| n.data.image_style.to_string())
					on:change=move |ev| {
						if let Ok(style) = event_target_value(&ev).parse::<ImageStyle>() {
							actions.change_style.run((index(), StyleChange::Image(style)));
						}
					}
				>
					{ImageStyle::iter()
						.map(|style| view! { <option value=style.to_string()>{style.to_string()}</option> })
						.collect_view()}
				</select>
			</label>
			<label>
				"Voice style"
				<select
					prop:value=move || node.with(|n| n.data.voice_style.to_string())
					on:change=move |ev| {
						if let Ok(style) = event_target_value(&ev).parse::<VoiceStyle>() {
							actions.change_style.run((index(), StyleChange::Voice(style)));
						}
					}
				>
					{VoiceStyle::iter()
						.map(|style| view! { <option value=style.to_string()>{style.to_string()}</option> })
						.collect_view()}
				</select>
			</label>

			<div class="card-actions">
				<button
					disabled=move || node.with(|n| n.data.is_generating)
					on:click=move |_| actions.generate.run(index())
				>
					{move || if node.with(|n| n.data.is_generating) { "Generating..." } else { "Generate" }}
				</button>
				<button
					disabled=move || node.with(|n| n.data.is_regenerating_image)
					on:click=move |_| actions.regenerate_image.run(index())
				>
					"New image"
				</button>
				<button
					disabled=move || node.with(|n| n.data.is_regenerating_audio)
					on:click=move |_| actions.regenerate_audio.run(index())
				>
					"New audio"
				</button>
			</div>
			<button
				class="handle handle-out"
				title="Connect from here"
				on:click=move |_| state.start_connect(&out_id)
			/>
		</div>
	}
}
