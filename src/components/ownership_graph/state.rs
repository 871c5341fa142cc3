use crate::graph::{NodeKind, OwnershipGraph};
use crate::layout::{LayoutParams, Simulation};

/// Smallest radius an owner circle may render at, no matter its degree.
pub const MIN_OWNER_RADIUS: f64 = 3.0;
/// Owner radius per distinct connected business.
pub const OWNER_RADIUS_PER_BUSINESS: f64 = 2.0;
/// Side length of a business square.
pub const BUSINESS_SIZE: f64 = 6.0;
/// Minimum pick distance for drag, in world space.
pub const HIT_RADIUS: f64 = 12.0;
/// Zoom scale extent.
pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 2.0;
/// Cooling target while a node is being dragged.
pub const DRAG_ALPHA_TARGET: f32 = 0.1;

/// Radius of an owner circle: scales with the number of distinct businesses
/// it is linked to, floored to stay visible.
pub fn owner_radius(degree: usize) -> f64 {
	(OWNER_RADIUS_PER_BUSINESS * degree as f64).max(MIN_OWNER_RADIUS)
}

/// Precomputed render facts for one node. Degree never changes once the
/// edge set is fixed, so it is derived once here rather than per frame.
#[derive(Clone, Debug)]
pub struct NodeSprite {
	pub label: String,
	pub kind: NodeKind,
	pub radius: f64,
	pub degree: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Everything the canvas needs per frame: the immutable graph, the running
/// simulation, the sprites, and the view/gesture state.
pub struct GraphCanvasState {
	pub graph: OwnershipGraph,
	pub sim: Simulation,
	pub sprites: Vec<NodeSprite>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
}

impl GraphCanvasState {
	pub fn new(graph: OwnershipGraph, width: f64, height: f64) -> Self {
		let sim = Simulation::new(&graph, LayoutParams::default(), width as f32, height as f32);
		let sprites = graph
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let degree = graph.degree(i);
				let radius = if node.kind.is_owner() {
					owner_radius(degree)
				} else {
					BUSINESS_SIZE / 2.0
				};
				NodeSprite {
					label: node.name.clone(),
					kind: node.kind.clone(),
					radius,
					degree,
				}
			})
			.collect();

		Self {
			graph,
			sim,
			sprites,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
		}
	}

	/// Step the simulation unless it has settled. Rendering continues
	/// either way.
	pub fn tick(&mut self) {
		if !self.sim.settled() {
			self.sim.tick();
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under the screen position, if any. Large owner circles
	/// are pickable across their whole area; everything else falls back to
	/// the minimum hit radius.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for (idx, sprite) in self.sprites.iter().enumerate() {
			let (x, y) = self.sim.position(idx);
			let (dx, dy) = (x as f64 - gx, y as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < sprite.radius.max(HIT_RADIUS) {
				found = Some(idx);
			}
		}
		found
	}

	/// Clamp a prospective zoom scale to the allowed extent.
	pub fn clamp_zoom(k: f64) -> f64 {
		k.clamp(ZOOM_MIN, ZOOM_MAX)
	}
}
