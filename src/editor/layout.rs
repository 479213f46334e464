//! Force-directed relaxation of the card layout.

use std::collections::HashMap;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::story::projection::{FlowEdge, FlowNode, Position};

/// Graph units per simulation unit; cards are far larger than force_graph's
/// default node scale.
const SCALE: f64 = 20.0;
const STEP: f32 = 0.016;
/// Simulation steps run by one "relax layout" action.
pub const RELAX_STEPS: usize = 240;

/// Runs the simulation seeded from the current positions and returns the new
/// position of every node, in input order. The first node stays anchored so
/// the story start does not drift.
pub fn relax(nodes: &[FlowNode], edges: &[FlowEdge], steps: usize) -> Vec<Position> {
	if nodes.is_empty() {
		return Vec::new();
	}
	let mut graph: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	let mut id_to_idx = HashMap::new();
	for (i, node) in nodes.iter().enumerate() {
		let idx = graph.add_node(NodeData {
			x: (node.position.x / SCALE) as f32,
			y: (node.position.y / SCALE) as f32,
			mass: 10.0,
			is_anchor: i == 0,
			user_data: i,
		});
		id_to_idx.insert(node.id.as_str(), idx);
	}
	for edge in edges {
		if let (Some(&src), Some(&tgt)) = (
			id_to_idx.get(edge.source.as_str()),
			id_to_idx.get(edge.target.as_str()),
		) {
			graph.add_edge(src, tgt, EdgeData::default());
		}
	}

	for _ in 0..steps {
		graph.update(STEP);
	}

	let mut positions: Vec<Position> = nodes.iter().map(|n| n.position).collect();
	graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64 * SCALE, node.y() as f64 * SCALE);
		if x.is_finite() && y.is_finite() {
			positions[node.data.user_data] = Position { x, y };
		}
	});
	positions
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::story::projection::project;
	use crate::story::{GlobalStyle, Paragraph};

	#[test]
	fn empty_graph_relaxes_to_nothing() {
		assert!(relax(&[], &[], RELAX_STEPS).is_empty());
	}

	#[test]
	fn every_node_gets_a_finite_position_and_the_first_stays_put() {
		let paragraphs: Vec<_> = (0..6).map(|i| Paragraph::new(format!("p{}", i))).collect();
		let (nodes, edges) = project(&paragraphs, GlobalStyle::default(), 3);
		let positions = relax(&nodes, &edges, RELAX_STEPS);
		assert_eq!(positions.len(), nodes.len());
		assert!(positions.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
		assert!((positions[0].x - nodes[0].position.x).abs() < 1e-3);
		assert!((positions[0].y - nodes[0].position.y).abs() < 1e-3);
	}
}
