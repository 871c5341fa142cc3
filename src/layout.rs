//! Force-directed layout for the ownership graph.
//!
//! A small simulation with the usual ingredients: many-body charge
//! repulsion (tuned per node kind), link springs partitioned by the class
//! of each edge's source so partitions can be tuned independently,
//! iterated collision avoidance, viewport centering, and an alpha cooling
//! schedule. Dragged nodes are pinned through fixed coordinates which
//! override integration until released.

use std::collections::HashMap;
use std::f32::consts::PI;

use crate::graph::{NodeKind, OwnershipGraph};

/// Attraction tuning for one edge partition.
#[derive(Clone, Copy, Debug)]
pub struct LinkParams {
	/// Rest length of the spring.
	pub distance: f32,
	/// Relative strength of the spring.
	pub strength: f32,
}

/// Layout tunables. All values are compile-time constants of the chosen
/// variant; there is no runtime configuration surface.
#[derive(Clone, Debug)]
pub struct LayoutParams {
	/// Charge strength for owner nodes (negative repels).
	pub charge_owner: f32,
	/// Charge strength for business nodes.
	pub charge_business: f32,
	/// Spring tuning applied to every partition without an override.
	pub link: LinkParams,
	/// Per-partition spring overrides, keyed by the source node's class.
	pub link_overrides: HashMap<String, LinkParams>,
	/// Collision radius around every node. Zero disables collisions.
	pub collide_radius: f32,
	/// Collision relaxation passes per tick.
	pub collide_iterations: usize,
	/// Cooling floor: the simulation settles once alpha sinks below this.
	pub alpha_min: f32,
	/// Per-tick interpolation rate of alpha toward its target.
	pub alpha_decay: f32,
	/// Per-tick velocity loss, in [0, 1).
	pub velocity_decay: f32,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			charge_owner: -90.0,
			charge_business: -40.0,
			link: LinkParams {
				distance: 90.0,
				strength: 2.0,
			},
			link_overrides: HashMap::new(),
			collide_radius: 8.0,
			collide_iterations: 4,
			alpha_min: 0.001,
			alpha_decay: 0.025,
			velocity_decay: 0.4,
		}
	}
}

impl LayoutParams {
	fn link_params(&self, partition: &str) -> LinkParams {
		self.link_overrides
			.get(partition)
			.copied()
			.unwrap_or(self.link)
	}

	fn charge(&self, kind: &NodeKind) -> f32 {
		if kind.is_owner() {
			self.charge_owner
		} else {
			self.charge_business
		}
	}
}

/// Per-node physics state. `fx`/`fy` are the two independent pinned
/// coordinates: while set, they override the integrated position.
struct Body {
	x: f32,
	y: f32,
	vx: f32,
	vy: f32,
	fx: Option<f32>,
	fy: Option<f32>,
	charge: f32,
}

/// One edge's spring, resolved against its partition's tuning. `bias` is
/// the share of each correction pushed onto the target, weighted by the
/// endpoints' incident-edge counts so well-connected nodes move less.
struct Spring {
	source: usize,
	target: usize,
	distance: f32,
	strength: f32,
	bias: f32,
}

/// The running layout. Owns all mutable per-node state; the graph itself
/// stays immutable outside.
pub struct Simulation {
	bodies: Vec<Body>,
	springs: Vec<Spring>,
	params: LayoutParams,
	center: (f32, f32),
	alpha: f32,
	alpha_target: f32,
}

impl Simulation {
	/// Build a simulation over the graph, seeding node positions on a
	/// circle around the viewport center.
	pub fn new(graph: &OwnershipGraph, params: LayoutParams, width: f32, height: f32) -> Self {
		let n = graph.len();
		let center = (width / 2.0, height / 2.0);

		let bodies = graph
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let angle = (i as f32) * 2.0 * PI / n.max(1) as f32;
				Body {
					x: center.0 + 100.0 * angle.cos(),
					y: center.1 + 100.0 * angle.sin(),
					vx: 0.0,
					vy: 0.0,
					fx: None,
					fy: None,
					charge: params.charge(&node.kind),
				}
			})
			.collect();

		let mut incident = vec![0usize; n];
		for edge in graph.edges() {
			incident[edge.source] += 1;
			incident[edge.target] += 1;
		}
		let springs = graph
			.edges()
			.iter()
			.map(|edge| {
				let link = params.link_params(graph.edge_partition(edge));
				Spring {
					source: edge.source,
					target: edge.target,
					distance: link.distance,
					strength: link.strength,
					bias: incident[edge.source] as f32
						/ (incident[edge.source] + incident[edge.target]) as f32,
				}
			})
			.collect();

		Self {
			bodies,
			springs,
			params,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
		}
	}

	/// Advance one step. Forces accumulate into velocities, positions
	/// integrate afterwards, and pinned coordinates are applied last so a
	/// pinned node is never moved by physics. Does nothing once settled.
	pub fn tick(&mut self) {
		if self.settled() {
			return;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

		self.apply_springs();
		self.apply_charge();
		self.apply_center();
		for _ in 0..self.params.collide_iterations {
			self.apply_collisions();
		}
		self.integrate();
	}

	/// Whether the cooling schedule has run out. The caller stops stepping
	/// but may keep drawing; raising the alpha target resumes stepping.
	pub fn settled(&self) -> bool {
		self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min
	}

	/// Current cooling temperature.
	pub fn alpha(&self) -> f32 {
		self.alpha
	}

	/// Retarget the cooling schedule. Drag start nudges this up so the
	/// layout relaxes around the moved node; drag end restores zero.
	pub fn set_alpha_target(&mut self, target: f32) {
		self.alpha_target = target;
	}

	/// Pin a node to fixed coordinates, suspending physics for it.
	pub fn pin(&mut self, idx: usize, x: f32, y: f32) {
		let body = &mut self.bodies[idx];
		body.fx = Some(x);
		body.fy = Some(y);
	}

	/// Release a pinned node back to the physics.
	pub fn unpin(&mut self, idx: usize) {
		let body = &mut self.bodies[idx];
		body.fx = None;
		body.fy = None;
	}

	pub fn position(&self, idx: usize) -> (f32, f32) {
		(self.bodies[idx].x, self.bodies[idx].y)
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	fn apply_springs(&mut self) {
		for spring in &self.springs {
			let (s, t) = (spring.source, spring.target);
			if s == t {
				// Self edges are zero-length; they exert no force.
				continue;
			}
			let dx = (self.bodies[t].x + self.bodies[t].vx)
				- (self.bodies[s].x + self.bodies[s].vx);
			let dy = (self.bodies[t].y + self.bodies[t].vy)
				- (self.bodies[s].y + self.bodies[s].vy);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < f32::EPSILON {
				continue;
			}
			let l = (dist - spring.distance) / dist * self.alpha * spring.strength;
			let (cx, cy) = (dx * l, dy * l);
			self.bodies[t].vx -= cx * spring.bias;
			self.bodies[t].vy -= cy * spring.bias;
			self.bodies[s].vx += cx * (1.0 - spring.bias);
			self.bodies[s].vy += cy * (1.0 - spring.bias);
		}
	}

	fn apply_charge(&mut self) {
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = self.bodies[j].x - self.bodies[i].x;
				let dy = self.bodies[j].y - self.bodies[i].y;
				let d2 = (dx * dx + dy * dy).max(1.0);
				let w = self.alpha / d2;
				let (ci, cj) = (self.bodies[i].charge, self.bodies[j].charge);
				self.bodies[i].vx += dx * cj * w;
				self.bodies[i].vy += dy * cj * w;
				self.bodies[j].vx -= dx * ci * w;
				self.bodies[j].vy -= dy * ci * w;
			}
		}
	}

	// Recenter the mean position on the viewport center. Positions move
	// directly; pinned nodes snap back during integration.
	fn apply_center(&mut self) {
		let n = self.bodies.len();
		if n == 0 {
			return;
		}
		let (mut sx, mut sy) = (0.0, 0.0);
		for body in &self.bodies {
			sx += body.x;
			sy += body.y;
		}
		let sx = sx / n as f32 - self.center.0;
		let sy = sy / n as f32 - self.center.1;
		for body in &mut self.bodies {
			body.x -= sx;
			body.y -= sy;
		}
	}

	fn apply_collisions(&mut self) {
		let radius = self.params.collide_radius;
		if radius <= 0.0 {
			return;
		}
		let clearance = 2.0 * radius;
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = (self.bodies[i].x + self.bodies[i].vx)
					- (self.bodies[j].x + self.bodies[j].vx);
				let dy = (self.bodies[i].y + self.bodies[i].vy)
					- (self.bodies[j].y + self.bodies[j].vy);
				let d2 = dx * dx + dy * dy;
				if d2 >= clearance * clearance {
					continue;
				}
				let dist = d2.sqrt();
				if dist < f32::EPSILON {
					continue;
				}
				// Equal radii: split the separation evenly.
				let push = (clearance - dist) / dist * 0.5;
				let (cx, cy) = (dx * push, dy * push);
				self.bodies[i].vx += cx;
				self.bodies[i].vy += cy;
				self.bodies[j].vx -= cx;
				self.bodies[j].vy -= cy;
			}
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.params.velocity_decay;
		for body in &mut self.bodies {
			if let Some(fx) = body.fx {
				body.x = fx;
				body.vx = 0.0;
			} else {
				body.vx *= keep;
				body.x += body.vx;
			}
			if let Some(fy) = body.fy {
				body.y = fy;
				body.vy = 0.0;
			} else {
				body.vy *= keep;
				body.y += body.vy;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::OwnershipRecord;

	fn record(business: &str, class: &str, owners: &[&str]) -> OwnershipRecord {
		OwnershipRecord {
			business: business.into(),
			class: class.into(),
			owners: owners.iter().map(|o| o.to_string()).collect(),
		}
	}

	fn linked_pair() -> OwnershipGraph {
		OwnershipGraph::from_records(&[record("Acme", "A", &["Alice"])])
	}

	fn unlinked_pair() -> OwnershipGraph {
		OwnershipGraph::from_records(&[record("Acme", "A", &[]), record("Beta", "B", &[])])
	}

	fn quiet_params() -> LayoutParams {
		LayoutParams {
			charge_owner: 0.0,
			charge_business: 0.0,
			collide_radius: 0.0,
			..LayoutParams::default()
		}
	}

	fn distance(sim: &Simulation, a: usize, b: usize) -> f32 {
		let (ax, ay) = sim.position(a);
		let (bx, by) = sim.position(b);
		((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
	}

	#[test]
	fn pinned_node_is_never_moved_by_physics() {
		let graph = linked_pair();
		let mut sim = Simulation::new(&graph, LayoutParams::default(), 800.0, 600.0);

		sim.pin(0, 10.0, 20.0);
		for _ in 0..50 {
			sim.tick();
		}
		assert_eq!(sim.position(0), (10.0, 20.0));
	}

	#[test]
	fn released_node_resumes_within_one_step() {
		let graph = linked_pair();
		let mut sim = Simulation::new(&graph, LayoutParams::default(), 800.0, 600.0);

		sim.pin(0, 10.0, 20.0);
		for _ in 0..5 {
			sim.tick();
		}
		sim.unpin(0);
		sim.set_alpha_target(0.1);
		sim.tick();
		assert_ne!(sim.position(0), (10.0, 20.0));
	}

	#[test]
	fn charge_pushes_unlinked_nodes_apart() {
		let graph = unlinked_pair();
		let mut sim = Simulation::new(&graph, LayoutParams::default(), 800.0, 600.0);

		let before = distance(&sim, 0, 1);
		for _ in 0..100 {
			sim.tick();
		}
		assert!(distance(&sim, 0, 1) > before);
	}

	#[test]
	fn springs_pull_linked_nodes_toward_the_rest_length() {
		let graph = linked_pair();
		let mut params = quiet_params();
		params.link.strength = 0.3;
		let mut sim = Simulation::new(&graph, params, 800.0, 600.0);

		// Seeded diametrically opposite: 200 apart, rest length 90.
		assert!((distance(&sim, 0, 1) - 200.0).abs() < 1.0);
		for _ in 0..400 {
			sim.tick();
		}
		assert!((distance(&sim, 0, 1) - 90.0).abs() < 25.0);
	}

	#[test]
	fn link_overrides_tune_one_partition() {
		let graph = linked_pair();
		let mut params = quiet_params();
		params.link.strength = 0.3;
		params.link_overrides.insert(
			"A".into(),
			LinkParams {
				distance: 40.0,
				strength: 0.3,
			},
		);
		let mut sim = Simulation::new(&graph, params, 800.0, 600.0);

		for _ in 0..400 {
			sim.tick();
		}
		assert!((distance(&sim, 0, 1) - 40.0).abs() < 25.0);
	}

	#[test]
	fn collisions_separate_overlapping_nodes() {
		let graph = unlinked_pair();
		let params = LayoutParams {
			charge_owner: 0.0,
			charge_business: 0.0,
			..LayoutParams::default()
		};
		let mut sim = Simulation::new(&graph, params, 800.0, 600.0);

		sim.pin(0, 400.0, 300.0);
		sim.pin(1, 405.0, 300.0);
		sim.tick();
		sim.unpin(0);
		sim.unpin(1);
		for _ in 0..50 {
			sim.tick();
		}
		// Collision radius 8 wants at least 16 of clearance.
		assert!(distance(&sim, 0, 1) > 15.0);
	}

	#[test]
	fn cooling_settles_the_simulation() {
		let graph = linked_pair();
		let mut sim = Simulation::new(&graph, LayoutParams::default(), 800.0, 600.0);

		assert!(!sim.settled());
		for _ in 0..400 {
			sim.tick();
		}
		assert!(sim.settled());
	}

	#[test]
	fn raising_the_alpha_target_restarts_a_settled_simulation() {
		let graph = linked_pair();
		let mut sim = Simulation::new(&graph, LayoutParams::default(), 800.0, 600.0);
		for _ in 0..400 {
			sim.tick();
		}
		assert!(sim.settled());

		sim.set_alpha_target(0.1);
		assert!(!sim.settled());
		let before = sim.alpha();
		sim.tick();
		assert!(sim.alpha() > before);

		// Dropping the target lets it cool back down.
		sim.set_alpha_target(0.0);
		for _ in 0..400 {
			sim.tick();
		}
		assert!(sim.settled());
	}

	#[test]
	fn self_edges_are_inert() {
		let graph = OwnershipGraph::from_records(&[record("Acme", "A", &["Acme"])]);
		let mut sim = Simulation::new(&graph, LayoutParams::default(), 800.0, 600.0);

		for _ in 0..50 {
			sim.tick();
		}
		let (x, y) = sim.position(0);
		assert!(x.is_finite() && y.is_finite());
	}

	#[test]
	fn empty_graph_ticks_without_panic() {
		let graph = OwnershipGraph::from_records(&[]);
		let mut sim = Simulation::new(&graph, LayoutParams::default(), 800.0, 600.0);
		sim.tick();
		assert!(sim.is_empty());
	}
}
