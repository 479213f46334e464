use leptos::prelude::*;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::card::{CARD_HEIGHT, CARD_WIDTH};
use super::state::EditorState;
use super::viewport::ViewTransform;
use crate::story::ImageStyle;
use crate::story::projection::{FlowEdge, FlowNode};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Minimap canvas width in pixels.
pub const MINIMAP_WIDTH: f64 = 220.0;
/// Minimap canvas height in pixels.
pub const MINIMAP_HEIGHT: f64 = 150.0;
const PADDING: f64 = 8.0;

fn style_color(style: ImageStyle) -> &'static str {
	COLORS[style as usize % COLORS.len()]
}

/// Maps graph space onto the minimap canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MiniMapFrame {
	/// Canvas pixels per graph unit.
	pub scale: f64,
	/// Left edge of the card bounding box.
	pub min_x: f64,
	/// Top edge of the card bounding box.
	pub min_y: f64,
}

impl MiniMapFrame {
	/// Fits the bounding box of all cards into a `width` x `height` canvas.
	pub fn fit(nodes: &[FlowNode], width: f64, height: f64) -> Self {
		if nodes.is_empty() {
			return Self {
				scale: 1.0,
				min_x: 0.0,
				min_y: 0.0,
			};
		}
		let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
		let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
		for node in nodes {
			min_x = min_x.min(node.position.x);
			min_y = min_y.min(node.position.y);
			max_x = max_x.max(node.position.x + CARD_WIDTH);
			max_y = max_y.max(node.position.y + CARD_HEIGHT);
		}
		let scale = ((width - 2.0 * PADDING) / (max_x - min_x))
			.min((height - 2.0 * PADDING) / (max_y - min_y));
		Self {
			scale,
			min_x,
			min_y,
		}
	}

	/// Graph point to canvas pixels.
	pub fn to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
		(
			PADDING + (x - self.min_x) * self.scale,
			PADDING + (y - self.min_y) * self.scale,
		)
	}

	/// Canvas pixels back to a graph point.
	pub fn to_graph(&self, cx: f64, cy: f64) -> (f64, f64) {
		(
			self.min_x + (cx - PADDING) / self.scale,
			self.min_y + (cy - PADDING) / self.scale,
		)
	}
}

fn render(
	ctx: &CanvasRenderingContext2d,
	nodes: &[FlowNode],
	edges: &[FlowEdge],
	transform: &ViewTransform,
	viewport: (f64, f64),
) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, MINIMAP_WIDTH, MINIMAP_HEIGHT);
	let frame = MiniMapFrame::fit(nodes, MINIMAP_WIDTH, MINIMAP_HEIGHT);
	let center = |id: &str| {
		nodes.iter().find(|n| n.id == id).map(|n| {
			frame.to_canvas(
				n.position.x + CARD_WIDTH / 2.0,
				n.position.y + CARD_HEIGHT / 2.0,
			)
		})
	};

	ctx.set_stroke_style_str("rgba(100, 180, 255, 0.6)");
	ctx.set_line_width(1.0);
	for edge in edges {
		if let (Some((x1, y1)), Some((x2, y2))) = (center(&edge.source), center(&edge.target)) {
			ctx.begin_path();
			ctx.move_to(x1, y1);
			ctx.line_to(x2, y2);
			ctx.stroke();
		}
	}

	for node in nodes {
		let (x, y) = frame.to_canvas(node.position.x, node.position.y);
		ctx.set_global_alpha(if node.data.is_busy() { 0.5 } else { 1.0 });
		ctx.set_fill_style_str(style_color(node.data.image_style));
		ctx.fill_rect(x, y, CARD_WIDTH * frame.scale, CARD_HEIGHT * frame.scale);
	}
	ctx.set_global_alpha(1.0);

	let (gx0, gy0) = transform.screen_to_graph(0.0, 0.0);
	let (gx1, gy1) = transform.screen_to_graph(viewport.0, viewport.1);
	let (x0, y0) = frame.to_canvas(gx0, gy0);
	let (x1, y1) = frame.to_canvas(gx1, gy1);
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
	ctx.stroke_rect(x0, y0, x1 - x0, y1 - y0);
}

/// Overview of every card with the visible area outlined. Clicking centers
/// the editor viewport on the clicked point.
#[component]
pub fn MiniMap(transform: RwSignal<ViewTransform>, viewport: RwSignal<(f64, f64)>) -> impl IntoView {
	let state = expect_context::<EditorState>();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx,
			_ => {
				warn!("minimap canvas has no 2d context");
				return;
			}
		};
		let Ok(ctx) = ctx.dyn_into::<CanvasRenderingContext2d>() else {
			return;
		};
		let t = transform.get();
		let size = viewport.get();
		state.nodes.with(|nodes| {
			state
				.edges
				.with(|edges| render(&ctx, nodes, edges, &t, size))
		});
	});

	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let rect = canvas.get_bounding_client_rect();
		let (cx, cy) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		let frame = state
			.nodes
			.with_untracked(|nodes| MiniMapFrame::fit(nodes, MINIMAP_WIDTH, MINIMAP_HEIGHT));
		let (gx, gy) = frame.to_graph(cx, cy);
		let (vw, vh) = viewport.get_untracked();
		transform.update(|t| t.center_on(gx, gy, vw / 2.0, vh / 2.0));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="flow-minimap"
			width=MINIMAP_WIDTH.to_string()
			height=MINIMAP_HEIGHT.to_string()
			on:click=on_click
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::story::projection::project;
	use crate::story::{GlobalStyle, Paragraph};

	#[test]
	fn frame_fits_all_cards_inside_the_canvas() {
		let paragraphs: Vec<_> = (0..7).map(|i| Paragraph::new(i.to_string())).collect();
		let (nodes, _) = project(&paragraphs, GlobalStyle::default(), 3);
		let frame = MiniMapFrame::fit(&nodes, MINIMAP_WIDTH, MINIMAP_HEIGHT);
		for node in &nodes {
			let (x, y) = frame.to_canvas(node.position.x + CARD_WIDTH, node.position.y + CARD_HEIGHT);
			assert!(x <= MINIMAP_WIDTH - PADDING + 1e-9);
			assert!(y <= MINIMAP_HEIGHT - PADDING + 1e-9);
		}
		let (gx, gy) = frame.to_graph(PADDING, PADDING);
		assert!(gx.abs() < 1e-9 && gy.abs() < 1e-9);
	}
}
