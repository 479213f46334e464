//! Pan, zoom and drag bookkeeping for the editor surface.

use crate::story::projection::Position;

/// Zoom limits of the editor viewport.
pub const ZOOM_RANGE: (f64, f64) = (0.1, 10.0);

/// Screen offset and scale applied to the card layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal offset in screen pixels.
	pub x: f64,
	/// Vertical offset in screen pixels.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 40.0,
			y: 40.0,
			k: 0.8,
		}
	}
}

impl ViewTransform {
	/// Graph coordinates under the screen point `(sx, sy)`.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zooms by one wheel notch around the screen point `(sx, sy)`.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.k * factor).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Pans so that graph point `(gx, gy)` sits at the screen point `(sx, sy)`.
	pub fn center_on(&mut self, gx: f64, gy: f64, sx: f64, sy: f64) {
		self.x = sx - gx * self.k;
		self.y = sy - gy * self.k;
	}

	/// CSS `transform` value for the card layer.
	pub fn css(&self) -> String {
		format!("translate({}px, {}px) scale({})", self.x, self.y, self.k)
	}
}

/// Card drag in progress.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Dragged card, `None` when idle.
	pub node_id: Option<String>,
	/// Pointer x at drag start.
	pub start_x: f64,
	/// Pointer y at drag start.
	pub start_y: f64,
	/// Card position at drag start.
	pub node_start: Position,
	/// Whether the pointer moved since the press.
	pub moved: bool,
}

impl DragState {
	/// Graph position of the dragged node for the pointer at `(x, y)`.
	pub fn target(&self, x: f64, y: f64, k: f64) -> Position {
		Position {
			x: self.node_start.x + (x - self.start_x) / k,
			y: self.node_start.y + (y - self.start_y) / k,
		}
	}
}

/// Background pan in progress.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether the background is being dragged.
	pub active: bool,
	/// Pointer x at pan start.
	pub start_x: f64,
	/// Pointer y at pan start.
	pub start_y: f64,
	/// Transform x at pan start.
	pub transform_start_x: f64,
	/// Transform y at pan start.
	pub transform_start_y: f64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zoom_keeps_the_pointer_fixed() {
		let mut t = ViewTransform {
			x: 10.0,
			y: 20.0,
			k: 1.0,
		};
		let before = t.screen_to_graph(200.0, 150.0);
		t.zoom_at(200.0, 150.0, -1.0);
		let after = t.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
		assert!(t.k > 1.0);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut t = ViewTransform::default();
		for _ in 0..200 {
			t.zoom_at(0.0, 0.0, 1.0);
		}
		assert_eq!(t.k, ZOOM_RANGE.0);
	}

	#[test]
	fn drag_target_scales_with_zoom() {
		let drag = DragState {
			node_id: Some("p0".into()),
			start_x: 100.0,
			start_y: 100.0,
			node_start: Position { x: 0.0, y: 0.0 },
			moved: false,
		};
		assert_eq!(drag.target(150.0, 80.0, 0.5), Position { x: 100.0, y: -40.0 });
	}
}
