use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ExplorerState;

pub fn render(state: &ExplorerState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#fafafa");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	draw_tooltip(state, ctx);
}

fn draw_links(state: &ExplorerState, ctx: &CanvasRenderingContext2d) {
	let bodies = state.simulation.bodies();
	ctx.set_stroke_style_str("rgba(153, 153, 153, 0.6)");
	ctx.set_line_width(1.0);
	for spring in &state.springs {
		let source = &bodies[spring.source];
		let target = &bodies[spring.target];
		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.line_to(target.x, target.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &ExplorerState, ctx: &CanvasRenderingContext2d) {
	for (node, body) in state.nodes.iter().zip(state.simulation.bodies()) {
		ctx.begin_path();
		let _ = ctx.arc(body.x, body.y, node.kind.radius(), 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.kind.color());
		ctx.fill();

		ctx.set_fill_style_str("#333333");
		ctx.set_font(node.kind.label_font());
		let _ = ctx.fill_text(&node.label, body.x + 15.0, body.y + 4.0);
	}
}

fn draw_tooltip(state: &ExplorerState, ctx: &CanvasRenderingContext2d) {
	let Some(idx) = state.hover else {
		return;
	};
	let (Some(node), Some(body)) = (state.nodes.get(idx), state.simulation.bodies().get(idx))
	else {
		return;
	};
	ctx.set_fill_style_str("rgba(0, 0, 0, 0.75)");
	ctx.set_font("12px sans-serif");
	let _ = ctx.fill_text(&node.tooltip(), body.x + 12.0, body.y - 12.0);
}
