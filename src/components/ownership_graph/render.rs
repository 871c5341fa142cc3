use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::GraphCanvasState;
use crate::graph::NodeKind;

const BACKGROUND: &str = "#ffffff";
const EDGE_STROKE: &str = "rgba(153, 153, 153, 0.6)";
const OWNER_FILL: &str = "orange";
const CLASS_A_FILL: &str = "blue";
const BUSINESS_FILL: &str = "black";
const LABEL_FILL: &str = "black";
const LABEL_FONT: &str = "7px sans-serif";

/// Draw one frame: edges underneath, then shapes and labels, all in world
/// space under the pan/zoom transform.
pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(EDGE_STROKE);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	for edge in state.graph.edges() {
		// Self edges are zero-length; move+line collapses to nothing.
		let (x1, y1) = state.sim.position(edge.source);
		let (x2, y2) = state.sim.position(edge.target);
		ctx.move_to(x1 as f64, y1 as f64);
		ctx.line_to(x2 as f64, y2 as f64);
	}
	ctx.stroke();
}

fn draw_nodes(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_font(LABEL_FONT);
	for (idx, sprite) in state.sprites.iter().enumerate() {
		let (x, y) = state.sim.position(idx);
		let (x, y) = (x as f64, y as f64);

		match &sprite.kind {
			NodeKind::Owner => {
				ctx.set_fill_style_str(OWNER_FILL);
				ctx.begin_path();
				let _ = ctx.arc(x, y, sprite.radius, 0.0, 2.0 * PI);
				ctx.fill();

				ctx.set_fill_style_str(LABEL_FILL);
				let _ = ctx.fill_text(&sprite.label, x + 4.0, y + 3.0);
				let _ = ctx.fill_text(&format!("Count: {}", sprite.degree), x + 6.0, y + 16.0);
			}
			NodeKind::Business { class } => {
				let fill = if class == "A" { CLASS_A_FILL } else { BUSINESS_FILL };
				ctx.set_fill_style_str(fill);
				let half = sprite.radius;
				ctx.fill_rect(x - half, y - half, half * 2.0, half * 2.0);

				ctx.set_fill_style_str(LABEL_FILL);
				let _ = ctx.fill_text(&sprite.label, x, y + 3.0);
			}
		}
	}
}
