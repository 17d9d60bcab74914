use std::collections::HashSet;
use std::f64::consts::PI;

use super::data::NetworkData;
use crate::components::simulation::{Body, Simulation, SimulationParams, Spring};

pub const NODE_RADIUS: f64 = 18.0;
const CLICK_SLOP: f64 = 3.0;
const SPAWN_RADIUS: f64 = 200.0;
const STABILIZE_TICKS: usize = 1000;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Copy, Debug)]
struct Press {
	x: f64,
	y: f64,
	node: Option<usize>,
	transform_x: f64,
	transform_y: f64,
	moved: bool,
}

pub struct NetworkState {
	pub data: NetworkData,
	pub simulation: Simulation,
	pub transform: ViewTransform,
	pub hover: Option<usize>,
	pub neighbors: HashSet<usize>,
	press: Option<Press>,
	pub width: f64,
	pub height: f64,
}

impl NetworkState {
	pub fn new(data: NetworkData, width: f64, height: f64) -> Self {
		let count = data.nodes.len().max(1);
		let bodies = (0..data.nodes.len())
			.map(|i| {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				Body {
					x: width / 2.0 + SPAWN_RADIUS * angle.cos(),
					y: height / 2.0 + SPAWN_RADIUS * angle.sin(),
					..Body::default()
				}
			})
			.collect();
		let springs: Vec<Spring> = data
			.edges
			.iter()
			.map(|&(source, target)| Spring { source, target })
			.collect();

		// long-range layout: strong repulsion, soft long springs
		let params = SimulationParams {
			link_distance: 150.0,
			link_strength: Some(0.02),
			charge_strength: -10000.0,
			center: (width / 2.0, height / 2.0),
			..SimulationParams::default()
		};
		let mut simulation = Simulation::new(bodies, &springs, params);
		simulation.stabilize(STABILIZE_TICKS);
		if simulation.is_running() {
			log::debug!(
				"network layout still hot after {STABILIZE_TICKS} ticks (alpha {:.3})",
				simulation.alpha()
			);
		}

		Self {
			data,
			simulation,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			hover: None,
			neighbors: HashSet::new(),
			press: None,
			width,
			height,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for (i, body) in self.simulation.bodies().iter().enumerate() {
			let dx = body.x - gx;
			let dy = body.y - gy;
			if (dx * dx + dy * dy).sqrt() < NODE_RADIUS {
				found = Some(i);
			}
		}
		found
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover == node {
			return;
		}
		self.hover = node;
		self.neighbors.clear();
		if let Some(idx) = node {
			for &(source, target) in &self.data.edges {
				if source == idx {
					self.neighbors.insert(target);
				} else if target == idx {
					self.neighbors.insert(source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover == Some(idx) || self.neighbors.contains(&idx)
	}

	pub fn edge_highlighted(&self, source: usize, target: usize) -> bool {
		match self.hover {
			Some(hovered) => source == hovered || target == hovered,
			None => false,
		}
	}

	pub fn begin_press(&mut self, x: f64, y: f64) {
		self.press = Some(Press {
			x,
			y,
			node: self.node_at_position(x, y),
			transform_x: self.transform.x,
			transform_y: self.transform.y,
			moved: false,
		});
	}

	/// Pans when the press started on the background, tracks hover
	/// otherwise.
	pub fn move_pointer(&mut self, x: f64, y: f64) {
		match self.press {
			Some(ref mut press) => {
				if (x - press.x).hypot(y - press.y) > CLICK_SLOP {
					press.moved = true;
				}
				if press.node.is_none() {
					self.transform.x = press.transform_x + (x - press.x);
					self.transform.y = press.transform_y + (y - press.y);
				}
			}
			None => {
				let hit = self.node_at_position(x, y);
				self.set_hover(hit);
			}
		}
	}

	/// Ends the gesture; returns the pressed node when it was a click.
	pub fn end_press(&mut self) -> Option<usize> {
		let press = self.press.take()?;
		if press.moved { None } else { press.node }
	}

	pub fn cancel_press(&mut self) {
		self.press = None;
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.transform.x += dx;
		self.transform.y += dy;
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn zoom(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	/// Fits the whole graph into the viewport with a small margin.
	pub fn fit(&mut self) {
		let bodies = self.simulation.bodies();
		if bodies.is_empty() {
			self.transform = ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			};
			return;
		}
		let mut min_x = f64::INFINITY;
		let mut min_y = f64::INFINITY;
		let mut max_x = f64::NEG_INFINITY;
		let mut max_y = f64::NEG_INFINITY;
		for body in bodies {
			min_x = min_x.min(body.x - NODE_RADIUS);
			min_y = min_y.min(body.y - NODE_RADIUS);
			max_x = max_x.max(body.x + NODE_RADIUS);
			max_y = max_y.max(body.y + NODE_RADIUS);
		}
		let span_x = (max_x - min_x).max(1.0);
		let span_y = (max_y - min_y).max(1.0);
		let k = ((self.width / span_x).min(self.height / span_y) * 0.9).clamp(MIN_ZOOM, MAX_ZOOM);
		self.transform.k = k;
		self.transform.x = self.width / 2.0 - (min_x + max_x) / 2.0 * k;
		self.transform.y = self.height / 2.0 - (min_y + max_y) / 2.0 * k;
	}
}

#[cfg(test)]
mod tests {
	use super::super::data::{EntityKind, NetworkNode};
	use super::*;

	fn node(kind: EntityKind, id: &str) -> NetworkNode {
		NetworkNode {
			kind,
			id: id.to_string(),
			label: id.to_string(),
			title: None,
			color: "#123456".to_string(),
		}
	}

	fn state() -> NetworkState {
		let data = NetworkData {
			nodes: vec![
				node(EntityKind::Character, "1"),
				node(EntityKind::Primitive, "2"),
				node(EntityKind::Primitive, "3"),
			],
			edges: vec![(0, 1)],
		};
		NetworkState::new(data, 800.0, 600.0)
	}

	#[test]
	fn construction_stabilizes_the_layout() {
		let s = state();
		assert!(!s.simulation.is_running());
	}

	#[test]
	fn hover_marks_neighbors_across_edge_direction() {
		let mut s = state();
		s.set_hover(Some(1));
		assert!(s.is_highlighted(0));
		assert!(s.is_highlighted(1));
		assert!(!s.is_highlighted(2));
		assert!(s.edge_highlighted(0, 1));

		s.set_hover(None);
		assert!(!s.is_highlighted(0));
		assert!(!s.edge_highlighted(0, 1));
	}

	#[test]
	fn background_press_pans_and_is_not_a_click() {
		let mut s = state();
		// far corner, outside every node
		s.begin_press(1.0, 1.0);
		s.move_pointer(41.0, 31.0);
		assert_eq!(s.transform.x, 40.0);
		assert_eq!(s.transform.y, 30.0);
		assert_eq!(s.end_press(), None);
	}

	#[test]
	fn node_press_without_movement_is_a_click() {
		let mut s = state();
		let (x, y) = s.simulation.position(2);
		s.begin_press(x, y);
		assert_eq!(s.end_press(), Some(2));
	}

	#[test]
	fn zoom_at_keeps_the_anchor_point_fixed() {
		let mut s = state();
		let anchor = (200.0, 120.0);
		let before = s.screen_to_graph(anchor.0, anchor.1);
		s.zoom_at(anchor.0, anchor.1, 1.5);
		let after = s.screen_to_graph(anchor.0, anchor.1);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn fit_brings_every_node_on_screen() {
		let mut s = state();
		s.pan_by(5000.0, -4000.0);
		s.fit();
		for body in s.simulation.bodies() {
			let sx = body.x * s.transform.k + s.transform.x;
			let sy = body.y * s.transform.k + s.transform.y;
			assert!(sx > 0.0 && sx < s.width, "x off screen: {sx}");
			assert!(sy > 0.0 && sy < s.height, "y off screen: {sy}");
		}
	}
}
