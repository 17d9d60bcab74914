use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{NODE_RADIUS, NetworkState};

const EDGE_COLOR: &str = "#848484";
const EDGE_HIGHLIGHT: &str = "#1B5E20";
const ARROW_SIZE: f64 = 6.0;

pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_title(state, ctx);
}

fn draw_edges(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let bodies = state.simulation.bodies();
	let k = state.transform.k;

	for &(source, target) in &state.data.edges {
		let a = &bodies[source];
		let b = &bodies[target];
		let dx = b.x - a.x;
		let dy = b.y - a.y;
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let color = if state.edge_highlighted(source, target) {
			EDGE_HIGHLIGHT
		} else {
			EDGE_COLOR
		};

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(1.0 / k);
		ctx.begin_path();
		ctx.move_to(a.x + ux * NODE_RADIUS, a.y + uy * NODE_RADIUS);
		ctx.line_to(
			b.x - ux * (NODE_RADIUS + ARROW_SIZE),
			b.y - uy * (NODE_RADIUS + ARROW_SIZE),
		);
		ctx.stroke();

		// arrowhead at the target end
		let (tip_x, tip_y) = (b.x - ux * NODE_RADIUS, b.y - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
		let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
		ctx.set_fill_style_str(color);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for (i, (node, body)) in state
		.data
		.nodes
		.iter()
		.zip(state.simulation.bodies())
		.enumerate()
	{
		ctx.begin_path();
		let _ = ctx.arc(body.x, body.y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.color);
		ctx.fill();

		ctx.set_line_width(2.0);
		ctx.set_stroke_style_str(if state.is_highlighted(i) {
			EDGE_HIGHLIGHT
		} else {
			"rgba(0, 0, 0, 0.35)"
		});
		ctx.stroke();

		ctx.set_fill_style_str("#ffffff");
		ctx.set_font("18px Arial");
		let _ = ctx.fill_text(&node.label, body.x, body.y);
	}

	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
}

// hovered node's title, pinned to the corner so zooming cannot hide it
fn draw_title(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	let Some(title) = state
		.hover
		.and_then(|idx| state.data.nodes.get(idx))
		.and_then(|node| node.title.as_deref())
	else {
		return;
	};
	ctx.set_fill_style_str("rgba(0, 0, 0, 0.75)");
	ctx.set_font("14px Arial");
	let _ = ctx.fill_text(title, 12.0, state.height - 12.0);
}
