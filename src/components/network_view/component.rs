use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::data::NetworkData;
use super::render;
use super::state::NetworkState;

const PAN_STEP: f64 = 60.0;
const ZOOM_STEP: f64 = 1.2;

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn navigate_to(route: &str) {
	if let Some(window) = web_sys::window() {
		if let Err(err) = window.location().set_href(route) {
			log::error!("Navigation to {route} failed: {err:?}");
		}
	}
}

/// Physics-based overview of the whole character/primitive network.
/// Clicking a node navigates to its detail page; the view pans, zooms
/// and fits via mouse, keyboard (arrows, `+`/`-`, `0`) or the overlay
/// buttons.
#[component]
pub fn NetworkCanvas(
	data: NetworkData,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<NetworkState>>> = Rc::new(RefCell::new(None));
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
					.unwrap_or(800.0)
			}),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		*state_init.borrow_mut() = Some(NetworkState::new(data.clone(), w, h));

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
				s.simulation.tick();
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

	on_cleanup({
		let alive = alive.clone();
		move || alive.store(false, Ordering::Relaxed)
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.begin_press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.move_pointer(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = state_mu.borrow_mut().as_mut().and_then(|s| s.end_press());
		let Some(idx) = clicked else {
			return;
		};
		let route = state_mu
			.borrow()
			.as_ref()
			.and_then(|s| s.data.nodes.get(idx).map(|n| n.detail_route()));
		if let Some(route) = route {
			navigate_to(&route);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel_press();
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 {
				1.0 / ZOOM_STEP
			} else {
				ZOOM_STEP
			};
			s.zoom_at(x, y, factor);
		}
	};

	let state_kb = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		let mut guard = state_kb.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		let handled = match ev.key().as_str() {
			"ArrowUp" => {
				s.pan_by(0.0, PAN_STEP);
				true
			}
			"ArrowDown" => {
				s.pan_by(0.0, -PAN_STEP);
				true
			}
			"ArrowLeft" => {
				s.pan_by(PAN_STEP, 0.0);
				true
			}
			"ArrowRight" => {
				s.pan_by(-PAN_STEP, 0.0);
				true
			}
			"+" | "=" => {
				s.zoom(ZOOM_STEP);
				true
			}
			"-" | "_" => {
				s.zoom(1.0 / ZOOM_STEP);
				true
			}
			"0" => {
				s.fit();
				true
			}
			_ => false,
		};
		drop(guard);
		if handled {
			ev.prevent_default();
		}
	};

	let nav_button = |label: &'static str, action: Box<dyn Fn()>| {
		view! {
			<button type="button" on:click=move |_| action()>
				{label}
			</button>
		}
	};
	let (s1, s2, s3, s4, s5, s6, s7) = (
		state.clone(),
		state.clone(),
		state.clone(),
		state.clone(),
		state.clone(),
		state.clone(),
		state.clone(),
	);

	view! {
		<div
			class="network-view"
			style="position: relative; outline: none;"
			tabindex="0"
			on:keydown=on_keydown
		>
			<canvas
				node_ref=canvas_ref
				class="network-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: pointer;"
			/>
			<div
				class="network-controls"
				style="position: absolute; top: 8px; right: 8px; display: flex; gap: 4px;"
			>
				{nav_button(
					"\u{25c0}",
					Box::new(move || {
						if let Some(ref mut s) = *s1.borrow_mut() {
							s.pan_by(PAN_STEP, 0.0);
						}
					}),
				)}
				{nav_button(
					"\u{25b6}",
					Box::new(move || {
						if let Some(ref mut s) = *s2.borrow_mut() {
							s.pan_by(-PAN_STEP, 0.0);
						}
					}),
				)}
				{nav_button(
					"\u{25b2}",
					Box::new(move || {
						if let Some(ref mut s) = *s3.borrow_mut() {
							s.pan_by(0.0, PAN_STEP);
						}
					}),
				)}
				{nav_button(
					"\u{25bc}",
					Box::new(move || {
						if let Some(ref mut s) = *s4.borrow_mut() {
							s.pan_by(0.0, -PAN_STEP);
						}
					}),
				)}
				{nav_button(
					"+",
					Box::new(move || {
						if let Some(ref mut s) = *s5.borrow_mut() {
							s.zoom(ZOOM_STEP);
						}
					}),
				)}
				{nav_button(
					"\u{2212}",
					Box::new(move || {
						if let Some(ref mut s) = *s6.borrow_mut() {
							s.zoom(1.0 / ZOOM_STEP);
						}
					}),
				)}
				{nav_button(
					"\u{2302}",
					Box::new(move || {
						if let Some(ref mut s) = *s7.borrow_mut() {
							s.fit();
						}
					}),
				)}
			</div>
		</div>
	}
}
