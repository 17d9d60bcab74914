//! Force-directed layout: link springs, many-body repulsion and a
//! positional centering force, driven by a decaying energy level.

const ALPHA_MIN: f64 = 0.001;
// 1 - 0.001^(1/300): energy reaches rest in roughly 300 ticks
const ALPHA_DECAY: f64 = 0.0228;
const VELOCITY_DECAY: f64 = 0.6;

/// Energy target applied while a drag gesture is heating the layout.
pub const HEAT_TARGET: f64 = 0.3;

/// A simulated point mass. `fx`/`fy` override the corresponding axis:
/// while set, the body sits exactly at the pin and does not integrate.
#[derive(Clone, Debug, Default)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

/// A spring between two bodies, by index.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
	pub source: usize,
	pub target: usize,
}

#[derive(Clone, Debug)]
pub struct SimulationParams {
	/// Rest separation for linked bodies.
	pub link_distance: f64,
	/// Fixed spring constant, or `None` for the degree-based default.
	pub link_strength: Option<f64>,
	/// Pairwise repulsion when negative, attraction when positive.
	pub charge_strength: f64,
	/// Point the whole layout is recentered on.
	pub center: (f64, f64),
	pub center_strength: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			link_distance: 100.0,
			link_strength: None,
			charge_strength: -200.0,
			center: (0.0, 0.0),
			center_strength: 1.0,
		}
	}
}

#[derive(Clone, Debug)]
struct ResolvedSpring {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

pub struct Simulation {
	bodies: Vec<Body>,
	springs: Vec<ResolvedSpring>,
	params: SimulationParams,
	alpha: f64,
	alpha_target: f64,
	running: bool,
}

impl Simulation {
	pub fn new(bodies: Vec<Body>, springs: &[Spring], params: SimulationParams) -> Self {
		let mut degree = vec![0usize; bodies.len()];
		for spring in springs {
			degree[spring.source] += 1;
			degree[spring.target] += 1;
		}
		let springs = springs
			.iter()
			.map(|spring| {
				let ds = degree[spring.source] as f64;
				let dt = degree[spring.target] as f64;
				ResolvedSpring {
					source: spring.source,
					target: spring.target,
					strength: params
						.link_strength
						.unwrap_or_else(|| 1.0 / ds.min(dt).max(1.0)),
					bias: ds / (ds + dt).max(1.0),
				}
			})
			.collect();

		Self {
			bodies,
			springs,
			params,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
		}
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn position(&self, idx: usize) -> (f64, f64) {
		let body = &self.bodies[idx];
		(body.x, body.y)
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Sets the energy level the simulation decays toward. Raising it does
	/// not wake a resting simulation by itself; pair with [`restart`].
	///
	/// [`restart`]: Simulation::restart
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn restart(&mut self) {
		self.running = true;
	}

	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = Some(x);
			body.fy = Some(y);
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.fx = None;
			body.fy = None;
		}
	}

	/// Advances the layout one step. Does nothing once the energy has
	/// decayed past rest with a zero target; a nonzero target keeps the
	/// layout hot indefinitely.
	pub fn tick(&mut self) {
		if !self.running || self.bodies.is_empty() {
			return;
		}
		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;

		self.apply_springs();
		self.apply_charge();
		self.apply_center();
		self.integrate();

		if self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN {
			self.running = false;
		}
	}

	/// Runs the layout to rest before it is first shown, bounded by
	/// `max_ticks`.
	pub fn stabilize(&mut self, max_ticks: usize) {
		for _ in 0..max_ticks {
			if !self.running {
				break;
			}
			self.tick();
		}
	}

	fn apply_springs(&mut self) {
		for i in 0..self.springs.len() {
			let spring = self.springs[i].clone();
			let source = &self.bodies[spring.source];
			let target = &self.bodies[spring.target];
			let mut dx = (target.x + target.vx) - (source.x + source.vx);
			let mut dy = (target.y + target.vy) - (source.y + source.vy);
			if dx == 0.0 && dy == 0.0 {
				// nudge coincident endpoints apart deterministically
				dx = 1e-6 * (spring.source as f64 + 1.0);
				dy = 1e-6;
			}
			let len = (dx * dx + dy * dy).sqrt();
			let pull = (len - self.params.link_distance) / len * self.alpha * spring.strength;
			let fx = dx * pull;
			let fy = dy * pull;
			self.bodies[spring.target].vx -= fx * spring.bias;
			self.bodies[spring.target].vy -= fy * spring.bias;
			self.bodies[spring.source].vx += fx * (1.0 - spring.bias);
			self.bodies[spring.source].vy += fy * (1.0 - spring.bias);
		}
	}

	fn apply_charge(&mut self) {
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = self.bodies[j].x - self.bodies[i].x;
				let dy = self.bodies[j].y - self.bodies[i].y;
				let d2 = (dx * dx + dy * dy).max(1.0);
				let w = self.params.charge_strength * self.alpha / d2;
				let (wx, wy) = (dx * w, dy * w);
				self.bodies[i].vx += wx;
				self.bodies[i].vy += wy;
				self.bodies[j].vx -= wx;
				self.bodies[j].vy -= wy;
			}
		}
	}

	fn apply_center(&mut self) {
		let n = self.bodies.len() as f64;
		let mut sx = 0.0;
		let mut sy = 0.0;
		for body in &self.bodies {
			sx += body.x;
			sy += body.y;
		}
		let (cx, cy) = self.params.center;
		let dx = (sx / n - cx) * self.params.center_strength;
		let dy = (sy / n - cy) * self.params.center_strength;
		for body in &mut self.bodies {
			body.x -= dx;
			body.y -= dy;
		}
	}

	fn integrate(&mut self) {
		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= VELOCITY_DECAY;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= VELOCITY_DECAY;
					body.y += body.vy;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pair() -> Simulation {
		let bodies = vec![
			Body {
				x: 0.0,
				y: 0.0,
				..Body::default()
			},
			Body {
				x: 10.0,
				y: 0.0,
				..Body::default()
			},
		];
		let springs = [Spring {
			source: 0,
			target: 1,
		}];
		Simulation::new(bodies, &springs, SimulationParams::default())
	}

	#[test]
	fn pinned_body_holds_exact_position() {
		let mut sim = pair();
		sim.pin(0, 42.0, -7.0);
		for _ in 0..25 {
			sim.tick();
		}
		assert_eq!(sim.position(0), (42.0, -7.0));
	}

	#[test]
	fn unpinned_body_moves_under_force() {
		let mut sim = pair();
		sim.pin(0, 42.0, -7.0);
		sim.tick();
		sim.unpin(0);
		sim.tick();
		assert_ne!(sim.position(0), (42.0, -7.0));
	}

	#[test]
	fn close_bodies_repel() {
		let mut sim = pair();
		sim.tick();
		let (ax, _) = sim.position(0);
		let (bx, _) = sim.position(1);
		assert!(bx - ax > 10.0, "separation did not grow: {ax} {bx}");
	}

	#[test]
	fn layout_recenters_on_configured_point() {
		let bodies = vec![
			Body {
				x: 500.0,
				y: 500.0,
				..Body::default()
			},
			Body {
				x: 520.0,
				y: 510.0,
				..Body::default()
			},
		];
		let params = SimulationParams {
			center: (100.0, 100.0),
			..SimulationParams::default()
		};
		let mut sim = Simulation::new(bodies, &[], params);
		sim.tick();
		let (ax, ay) = sim.position(0);
		let (bx, by) = sim.position(1);
		assert!(((ax + bx) / 2.0 - 100.0).abs() < 1.0);
		assert!(((ay + by) / 2.0 - 100.0).abs() < 1.0);
	}

	#[test]
	fn energy_decays_to_rest() {
		let mut sim = pair();
		sim.stabilize(1000);
		assert!(!sim.is_running());
		let before = sim.position(0);
		sim.tick();
		assert_eq!(sim.position(0), before);
	}

	#[test]
	fn heating_holds_energy_near_target() {
		let mut sim = pair();
		sim.set_alpha_target(HEAT_TARGET);
		sim.restart();
		for _ in 0..500 {
			sim.tick();
		}
		assert!(sim.is_running());
		assert!((sim.alpha() - HEAT_TARGET).abs() < 0.01);
	}

	#[test]
	fn cooling_decays_gradually_not_instantly() {
		let mut sim = pair();
		sim.set_alpha_target(HEAT_TARGET);
		for _ in 0..500 {
			sim.tick();
		}
		sim.set_alpha_target(0.0);
		sim.tick();
		assert!(sim.alpha() > 0.2, "energy snapped to rest: {}", sim.alpha());
		assert!(sim.alpha() < HEAT_TARGET);
		sim.stabilize(1000);
		assert!(!sim.is_running());
	}

	#[test]
	fn resting_layout_reheats_on_restart() {
		let mut sim = pair();
		sim.stabilize(1000);
		assert!(!sim.is_running());
		sim.set_alpha_target(HEAT_TARGET);
		sim.restart();
		for _ in 0..200 {
			sim.tick();
		}
		assert!(sim.is_running());
		assert!(sim.alpha() > 0.2);
	}
}
