use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::state::{DragPhase, ExplorerState};
use super::types::{GraphData, NodeKind};

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Canvas hosting the force-directed character graph. Dragging pins a
/// node under the pointer; a click on a character fires
/// `on_character_select`, a click on a keyword or primitive fires
/// `on_attribute_select` with the node id as the search term.
#[component]
pub fn GraphCanvas(
	data: GraphData,
	#[prop(into)] on_character_select: Callback<String>,
	#[prop(into)] on_attribute_select: Callback<String>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ExplorerState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	// flipped on unmount so the frame loop stops driving a dead canvas
	let alive = Arc::new(AtomicBool::new(true));
	let (state_init, animate_init, alive_anim) = (state.clone(), animate.clone(), alive.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let (w, h) = (
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		*state_init.borrow_mut() = Some(ExplorerState::new(&data, w, h));

		if animate_init.borrow().is_some() {
			return;
		}
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let (state_anim, animate_inner, alive_inner) =
			(state_init.clone(), animate_init.clone(), alive_anim.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_inner.load(Ordering::Relaxed) {
				state_anim.borrow_mut().take();
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = web_sys::window()
				.unwrap()
				.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// the canvas is remounted on every wholesale graph rebuild, so each
	// instance's frame loop has to die with it
	on_cleanup({
		let alive = alive.clone();
		move || alive.store(false, Ordering::Relaxed)
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.begin_drag(idx, x, y);
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag == DragPhase::Idle {
				let hit = s.node_at_position(x, y);
				s.set_hover(hit);
			} else {
				s.drag_to(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = state_mu.borrow_mut().as_mut().and_then(|s| s.end_drag());
		let Some(idx) = clicked else {
			return;
		};
		let target = state_mu
			.borrow()
			.as_ref()
			.and_then(|s| s.node(idx).map(|n| (n.kind, n.id.clone())));
		if let Some((kind, id)) = target {
			match kind {
				NodeKind::Character => on_character_select.run(id),
				NodeKind::Keyword | NodeKind::Primitive => on_attribute_select.run(id),
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			let _ = s.end_drag();
			s.set_hover(None);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block; cursor: grab;"
		/>
	}
}
