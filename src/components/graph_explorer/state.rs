use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::{GraphData, Node, NodeKind};
use crate::components::simulation::{Body, HEAT_TARGET, Simulation, SimulationParams, Spring};

// releases within this distance of the press count as clicks
const CLICK_SLOP: f64 = 3.0;
const SPAWN_RADIUS: f64 = 100.0;

/// Pointer gesture state. A gesture starts pinned on a node and either
/// stays within the click slop (dispatched as a click on release) or
/// becomes a drag that ends by releasing the pin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragPhase {
	#[default]
	Idle,
	Active {
		node: usize,
		start_x: f64,
		start_y: f64,
		moved: bool,
	},
}

pub struct ExplorerState {
	pub nodes: Vec<Node>,
	pub springs: Vec<Spring>,
	pub simulation: Simulation,
	pub drag: DragPhase,
	pub hover: Option<usize>,
	pub width: f64,
	pub height: f64,
}

impl ExplorerState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut index: HashMap<(NodeKind, &str), usize> = HashMap::new();
		for (i, node) in data.nodes.iter().enumerate() {
			index.insert((node.kind, node.id.as_str()), i);
		}

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

		// links resolve against the namespace their kind names, so a
		// keyword and a primitive sharing a string cannot collide
		let springs: Vec<Spring> = data
			.links
			.iter()
			.filter_map(|link| {
				let source = *index.get(&(NodeKind::Character, link.source.as_str()))?;
				let target = *index.get(&(link.kind.target_kind(), link.target.as_str()))?;
				Some(Spring { source, target })
			})
			.collect();

		let params = SimulationParams {
			center: (width / 2.0, height / 2.0),
			..SimulationParams::default()
		};
		let simulation = Simulation::new(bodies, &springs, params);

		Self {
			nodes: data.nodes.clone(),
			springs,
			simulation,
			drag: DragPhase::default(),
			hover: None,
			width,
			height,
		}
	}

	pub fn tick(&mut self) {
		self.simulation.tick();
	}

	pub fn node(&self, idx: usize) -> Option<&Node> {
		self.nodes.get(idx)
	}

	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		let mut found = None;
		for (i, (node, body)) in self.nodes.iter().zip(self.simulation.bodies()).enumerate() {
			let dx = body.x - x;
			let dy = body.y - y;
			if (dx * dx + dy * dy).sqrt() < node.kind.radius() {
				found = Some(i);
			}
		}
		found
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hover = node;
	}

	/// Pins the node at its current position and heats the layout. A
	/// gesture arriving while another is active is ignored and does not
	/// re-heat.
	pub fn begin_drag(&mut self, node: usize, x: f64, y: f64) {
		if self.drag != DragPhase::Idle || node >= self.nodes.len() {
			return;
		}
		let (px, py) = self.simulation.position(node);
		self.simulation.pin(node, px, py);
		if self.simulation.alpha_target() < HEAT_TARGET {
			self.simulation.set_alpha_target(HEAT_TARGET);
			self.simulation.restart();
		}
		self.drag = DragPhase::Active {
			node,
			start_x: x,
			start_y: y,
			moved: false,
		};
	}

	/// Moves the pin to the pointer; the next tick holds the node there.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		if let DragPhase::Active {
			node,
			start_x,
			start_y,
			moved,
		} = self.drag
		{
			self.simulation.pin(node, x, y);
			self.drag = DragPhase::Active {
				node,
				start_x,
				start_y,
				moved: moved || (x - start_x).hypot(y - start_y) > CLICK_SLOP,
			};
		}
	}

	/// Releases the pin and lets the layout cool toward rest. Returns the
	/// node index when the gesture never left the click slop.
	pub fn end_drag(&mut self) -> Option<usize> {
		let DragPhase::Active { node, moved, .. } = self.drag else {
			return None;
		};
		self.simulation.unpin(node);
		self.simulation.set_alpha_target(0.0);
		self.drag = DragPhase::Idle;
		(!moved).then_some(node)
	}
}

#[cfg(test)]
mod tests {
	use super::super::build::build;
	use super::*;
	use crate::api::CharacterRecord;

	fn state() -> ExplorerState {
		let records = [CharacterRecord {
			character: "A".to_string(),
			keywords: vec!["k1".to_string()],
			primitive_elements: vec!["p1".to_string()],
			..CharacterRecord::default()
		}];
		ExplorerState::new(&build(&records), 800.0, 600.0)
	}

	#[test]
	fn links_resolve_to_spring_endpoints() {
		let s = state();
		assert_eq!(s.springs.len(), 2);
		assert_eq!(s.springs[0].source, 0);
		assert_eq!(s.springs[0].target, 1);
		assert_eq!(s.springs[1].target, 2);
	}

	#[test]
	fn drag_start_pins_and_heats() {
		let mut s = state();
		let (x, y) = s.simulation.position(0);
		s.begin_drag(0, x, y);

		assert_eq!(s.simulation.alpha_target(), HEAT_TARGET);
		for _ in 0..10 {
			s.tick();
		}
		assert_eq!(s.simulation.position(0), (x, y));
	}

	#[test]
	fn reentrant_drag_is_ignored() {
		let mut s = state();
		let (x, y) = s.simulation.position(0);
		s.begin_drag(0, x, y);
		s.simulation.set_alpha_target(0.1);
		s.begin_drag(1, 0.0, 0.0);

		assert_eq!(s.simulation.alpha_target(), 0.1, "second gesture re-heated");
		assert!(matches!(s.drag, DragPhase::Active { node: 0, .. }));
	}

	#[test]
	fn drag_move_repins_at_pointer() {
		let mut s = state();
		let (x, y) = s.simulation.position(0);
		s.begin_drag(0, x, y);
		s.drag_to(200.0, 150.0);
		s.tick();

		assert_eq!(s.simulation.position(0), (200.0, 150.0));
	}

	#[test]
	fn drag_end_unpins_and_cools() {
		let mut s = state();
		let (x, y) = s.simulation.position(0);
		s.begin_drag(0, x, y);
		s.drag_to(200.0, 150.0);
		s.tick();

		assert_eq!(s.end_drag(), None, "a moved gesture is not a click");
		assert_eq!(s.simulation.alpha_target(), 0.0);
		assert_eq!(s.drag, DragPhase::Idle);

		s.tick();
		assert_ne!(s.simulation.position(0), (200.0, 150.0));
	}

	#[test]
	fn stationary_gesture_dispatches_a_click() {
		let mut s = state();
		let (x, y) = s.simulation.position(0);
		s.begin_drag(0, x, y);
		s.drag_to(x + 1.0, y + 1.0);

		assert_eq!(s.end_drag(), Some(0));
	}

	#[test]
	fn hit_test_uses_kind_radius() {
		let s = state();
		let (x, y) = s.simulation.position(0);
		assert_eq!(s.node_at_position(x + 12.0, y), Some(0));

		let (kx, ky) = s.simulation.position(1);
		assert_eq!(s.node_at_position(kx + 12.0, ky), None);
		assert_eq!(s.node_at_position(kx + 8.0, ky), Some(1));
	}
}
