use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;
use strum::IntoEnumIterator;
use web_sys::{MouseEvent, WheelEvent};

use super::card::{CARD_HEIGHT, CARD_WIDTH, ParagraphCard};
use super::dispatch::dispatch;
use super::minimap::MiniMap;
use super::persist::{GENERATE_PAGE, save_styles};
use super::state::{EditorState, StyleChange};
use super::viewport::{DragState, PanState, ViewTransform};
use super::EditorActions;
use crate::api::{ApiClient, MediaKind};
use crate::components::Alert;
use crate::config::StudioConfig;
use crate::nav;
use crate::story::history::{HistoryCommand, shortcut_for};
use crate::story::projection::Position;
use crate::story::{GlobalStyle, ImageStyle, Paragraph, VoiceStyle};

/// Cubic curve from the right edge of `source` to the left edge of `target`.
pub fn edge_path(source: Position, target: Position) -> String {
	let (x1, y1) = (source.x + CARD_WIDTH, source.y + CARD_HEIGHT / 2.0);
	let (x2, y2) = (target.x, target.y + CARD_HEIGHT / 2.0);
	let bend = ((x2 - x1).abs() / 2.0).max(60.0);
	format!(
		"M {} {} C {} {}, {} {}, {} {}",
		x1,
		y1,
		x1 + bend,
		y1,
		x2 - bend,
		y2,
		x2,
		y2
	)
}

/// Node-graph editor over one story's paragraphs.
#[component]
pub fn StoryFlowEditor(#[prop(into)] paragraphs: Signal<Vec<Paragraph>>) -> impl IntoView {
	let config = use_context::<StudioConfig>().unwrap_or_default();
	let state = EditorState::new(config.grid_columns);
	provide_context(state);

	Effect::new(move |_| paragraphs.with(|p| state.load(p)));

	let transform = RwSignal::new(ViewTransform::default());
	let viewport_size = RwSignal::new((0.0, 0.0));
	let drag = StoredValue::new(DragState::default());
	let pan = StoredValue::new(PanState::default());
	let viewport_ref = NodeRef::<leptos::html::Div>::new();

	let media = |kind: MediaKind, config: StudioConfig| {
		Callback::new(move |index: usize| dispatch(state, config.clone(), kind, index))
	};
	let actions = EditorActions {
		generate: media(MediaKind::Cards, config.clone()),
		regenerate_image: media(MediaKind::Image, config.clone()),
		regenerate_audio: media(MediaKind::Audio, config.clone()),
		change_style: Callback::new(move |(index, change): (usize, StyleChange)| {
			state.change_style(index, change)
		}),
		begin_drag: Callback::new(move |(id, x, y): (String, f64, f64)| {
			let node_start = state.nodes.with_untracked(|nodes| {
				nodes
					.iter()
					.find(|n| n.id == id)
					.map(|n| n.position)
					.unwrap_or_default()
			});
			drag.set_value(DragState {
				node_id: Some(id),
				start_x: x,
				start_y: y,
				node_start,
				moved: false,
			});
		}),
	};
	provide_context(actions);

	let keys = window_event_listener(ev::keydown, move |ev| {
		if let Some(command) = shortcut_for(&ev.key(), ev.ctrl_key(), ev.meta_key(), ev.shift_key()) {
			ev.prevent_default();
			state.apply_history(command);
		}
	});
	let measure = move || {
		if let Some(el) = viewport_ref.get_untracked() {
			viewport_size.set((el.client_width() as f64, el.client_height() as f64));
		}
	};
	let resize = window_event_listener(ev::resize, move |_| measure());
	Effect::new(move |_| {
		if viewport_ref.get().is_some() {
			measure();
		}
	});
	on_cleanup(move || {
		keys.remove();
		resize.remove();
	});

	let finish_drag = move || {
		let finished = drag.try_update_value(std::mem::take).unwrap_or_default();
		if finished.moved {
			debug!("drag of {:?} recorded", finished.node_id);
			state.record();
		}
		pan.update_value(|p| p.active = false);
	};

	let on_mousedown = move |ev: MouseEvent| {
		state.connecting.set(None);
		let t = transform.get_untracked();
		pan.set_value(PanState {
			active: true,
			start_x: ev.client_x() as f64,
			start_y: ev.client_y() as f64,
			transform_start_x: t.x,
			transform_start_y: t.y,
		});
	};

	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = (ev.client_x() as f64, ev.client_y() as f64);
		let k = transform.with_untracked(|t| t.k);
		let dragged = drag.with_value(|d| d.node_id.clone().map(|id| (id, d.target(x, y, k))));
		if let Some((id, position)) = dragged {
			state.move_node(&id, position);
			drag.update_value(|d| d.moved = true);
			return;
		}
		let p = pan.get_value();
		if p.active {
			transform.update(|t| {
				t.x = p.transform_start_x + (x - p.start_x);
				t.y = p.transform_start_y + (y - p.start_y);
			});
		}
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(el) = viewport_ref.get_untracked() else {
			return;
		};
		let rect = el.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		transform.update(|t| t.zoom_at(x, y, ev.delta_y()));
	};

	let saving = RwSignal::new(false);
	let save_error = RwSignal::new(None::<String>);
	let save_config = config.clone();
	let on_save = move |_| {
		saving.set(true);
		save_error.set(None);
		let api = ApiClient::new(save_config.clone());
		let nodes = state.nodes.get_untracked();
		spawn_local(async move {
			match save_styles(&api, &nodes).await {
				Ok(()) => nav::leave_for(GENERATE_PAGE),
				Err(err) => save_error.set(Some(err.user_message())),
			}
			saving.set(false);
		});
	};

	let edge_paths = move || {
		state.nodes.with(|nodes| {
			state.edges.with(|edges| {
				edges
					.iter()
					.filter_map(|edge| {
						let source = nodes.iter().find(|n| n.id == edge.source)?;
						let target = nodes.iter().find(|n| n.id == edge.target)?;
						Some((edge.id.clone(), edge_path(source.position, target.position)))
					})
					.collect::<Vec<_>>()
			})
		})
	};

	view! {
		<div class="flow-editor">
			<div class="flow-toolbar">
				<button
					disabled=move || !state.history.with(|h| h.can_undo())
					on:click=move |_| state.apply_history(HistoryCommand::Undo)
				>
					"Undo"
				</button>
				<button
					disabled=move || !state.history.with(|h| h.can_redo())
					on:click=move |_| state.apply_history(HistoryCommand::Redo)
				>
					"Redo"
				</button>
				<label>
					"All images"
					<select
						prop:value=move || state.global.with(|g| g.image.to_string())
						on:change=move |ev| {
							if let Ok(image) = event_target_value(&ev).parse::<ImageStyle>() {
								let global = state.global.get_untracked();
								state.set_global(GlobalStyle { image, ..global });
							}
						}
					>
						{ImageStyle::iter()
							.map(|s| view! { <option value=s.to_string()>{s.to_string()}</option> })
							.collect_view()}
					</select>
				</label>
				<label>
					"All voices"
					<select
						prop:value=move || state.global.with(|g| g.voice.to_string())
						on:change=move |ev| {
							if let Ok(voice) = event_target_value(&ev).parse::<VoiceStyle>() {
								let global = state.global.get_untracked();
								state.set_global(GlobalStyle { voice, ..global });
							}
						}
					>
						{VoiceStyle::iter()
							.map(|s| view! { <option value=s.to_string()>{s.to_string()}</option> })
							.collect_view()}
					</select>
				</label>
				<button on:click=move |_| state.relax_layout()>"Relax layout"</button>
				<button on:click=move |_| state.reset_edges()>"Reset links"</button>
				<button class="primary" disabled=move || saving.get() on:click=on_save>
					{move || if saving.get() { "Saving..." } else { "Save styles" }}
				</button>
			</div>
			{move || {
				save_error
					.get()
					.map(|message| {
						view! { <Alert message=message on_dismiss=Callback::new(move |_| save_error.set(None)) /> }
					})
			}}
			<div
				node_ref=viewport_ref
				class="flow-viewport"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=move |_| finish_drag()
				on:mouseleave=move |_| finish_drag()
				on:wheel=on_wheel
			>
				<div class="flow-layer" style:transform=move || transform.with(|t| t.css())>
					<svg class="flow-edges">
						<For
							each=edge_paths
							key=|(id, path)| (id.clone(), path.clone())
							children=|(_, path)| view! { <path d=path /> }
						/>
					</svg>
					<For
						each=move || state.nodes.with(|nodes| nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>())
						key=|id| id.clone()
						children=|id| view! { <ParagraphCard id=id /> }
					/>
				</div>
			</div>
			<MiniMap transform=transform viewport=viewport_size />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn edge_runs_from_right_edge_to_left_edge() {
		let path = edge_path(Position { x: 0.0, y: 0.0 }, Position { x: 340.0, y: 0.0 });
		assert!(path.starts_with(&format!("M {} {}", CARD_WIDTH, CARD_HEIGHT / 2.0)));
		assert!(path.ends_with(&format!("340 {}", CARD_HEIGHT / 2.0)));
	}
}
