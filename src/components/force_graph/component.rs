//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming and activation. An animation
//! loop runs via `requestAnimationFrame`, stepping the view state and renderer
//! each frame. Search and category filter panels sit on top of the canvas.
//!
//! Each mounted component owns exactly one [`ForceGraphState`]. New data is
//! swapped into it (disposing the old simulation first) rather than starting
//! a second loop, and unmounting cancels the pending frame, removes the resize
//! listener and disposes the simulation.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::filter::CategoryOption;
use super::layout::LayoutConfig;
use super::render;
use super::search::SearchHit;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::{GraphData, NodeId};
use crate::links::DEFAULT_BASE_ROUTE;

/// Frames longer than this (tab in background) are clamped.
const MAX_FRAME_SECONDS: f64 = 0.1;

/// Bundles graph view state with its visual theme.
struct GraphContext {
	state: ForceGraphState,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type ResizeCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Everything the frame loop and listeners keep alive. Dropping it tears the
/// view down.
struct GraphView {
	context: SharedContext,
	animate: FrameCallback,
	resize: ResizeCallback,
	frame: Rc<Cell<i32>>,
}

impl Drop for GraphView {
	fn drop(&mut self) {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(self.frame.get());
			if let Some(cb) = self.resize.borrow_mut().take() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
		if let Ok(mut context) = self.context.try_borrow_mut() {
			if let Some(c) = context.as_mut() {
				c.state.dispose();
			}
		}
		debug!("graph: view torn down");
	}
}

/// Requests from the overlay panels, applied to the view state by an effect.
#[derive(Clone, Debug)]
enum PanelCommand {
	Toggle(String),
	SetAll(bool),
	Select(NodeId),
	ZoomIn,
	ZoomOut,
	Fit,
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

/// Pointer position relative to the canvas.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Default activation: open the page.
fn navigate_to_page(slug: &str) {
	let href = format!("{DEFAULT_BASE_ROUTE}{slug}");
	match web_sys::window().map(|w| w.location().set_href(&href)) {
		Some(Ok(())) => info!("graph: opening {}", href),
		_ => warn!("graph: could not navigate to {}", href),
	}
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal. The component sizes itself
/// to its parent container by default; set `fullscreen = true` to fill the
/// viewport and resize automatically with the window. Explicit `width`/`height`
/// override automatic sizing.
///
/// Clicking a node calls `on_node_activated` with its slug, or navigates to
/// `/pages/<slug>` when no callback is given. `enable_search` shows the search
/// and category filter panels; the zoom and fit controls are always drawn.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] layout: Option<LayoutConfig>,
	#[prop(default = true)] enable_search: bool,
	#[prop(optional, into)] on_node_activated: Option<Callback<String>>,
	#[prop(optional, into)] on_search_opened: Option<Callback<()>>,
	#[prop(optional, into)] on_search_closed: Option<Callback<()>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: ResizeCallback = Rc::new(RefCell::new(None));
	let frame = Rc::new(Cell::new(0));

	let options = RwSignal::new(Vec::<CategoryOption>::new());
	let query = RwSignal::new(String::new());
	let results = RwSignal::new(Vec::<SearchHit>::new());
	let search_open = RwSignal::new(false);
	let command = RwSignal::new(None::<PanelCommand>);

	let view_handle = StoredValue::new_local(GraphView {
		context: context.clone(),
		animate: animate.clone(),
		resize: resize_cb.clone(),
		frame: frame.clone(),
	});
	on_cleanup(move || view_handle.dispose());

	let (context_init, animate_init, resize_cb_init, frame_init) =
		(context.clone(), animate.clone(), resize_cb.clone(), frame.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let data = data.get();

		// Already mounted: swap the data into the running view.
		if let Some(c) = context_init.borrow_mut().as_mut() {
			c.state.replace_data(data);
			options.set(c.state.category_options());
			results.set(c.state.search(&query.get_untracked()));
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("graph: no window, not rendering");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
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
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|o| o.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("graph: 2d canvas context unavailable");
			return;
		};

		let state = ForceGraphState::new(data, w, h, layout.clone().unwrap_or_default());
		options.set(state.category_options());
		results.set(state.search(&query.get_untracked()));
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			theme: Theme::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(c) = context_resize.borrow_mut().as_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(cb) = resize_cb_init.borrow().as_ref() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let context_anim = context_init.clone();
		let animate_weak: Weak<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
			Rc::downgrade(&animate_init);
		let frame_anim = frame_init.clone();
		let mut last_frame: Option<f64> = None;
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			let dt = last_frame
				.map(|last| ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_SECONDS))
				.unwrap_or(0.0);
			last_frame = Some(now);
			if let Some(c) = context_anim.borrow_mut().as_mut() {
				if c.state.is_disposed() {
					return;
				}
				c.state.tick(dt);
				render::render(&c.state, &ctx, &c.theme);
			}
			let Some(animate) = animate_weak.upgrade() else {
				return;
			};
			if let (Some(cb), Some(win)) = (animate.borrow().as_ref(), web_sys::window()) {
				if let Ok(handle) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
					frame_anim.set(handle);
				}
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			if let Ok(handle) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_init.set(handle);
			}
		}
	});

	let context_cmd = context.clone();
	Effect::new(move |_| {
		let Some(cmd) = command.get() else {
			return;
		};
		let mut guard = context_cmd.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return;
		};
		match cmd {
			PanelCommand::Toggle(name) => {
				c.state.toggle_category(&name);
			}
			PanelCommand::SetAll(active) => c.state.set_all_categories(active),
			PanelCommand::Select(id) => {
				c.state.select_search_result(&id);
			}
			PanelCommand::ZoomIn => c.state.zoom_in(),
			PanelCommand::ZoomOut => c.state.zoom_out(),
			PanelCommand::Fit => c.state.fit_view(),
		}
		options.set(c.state.category_options());
		results.set(c.state.search(&query.get_untracked()));
	});

	let context_search = context.clone();
	Effect::new(move |_| {
		let q = query.get();
		if let Some(c) = context_search.borrow().as_ref() {
			results.set(c.state.search(&q));
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(c) = context_md.borrow_mut().as_mut() {
			c.state.pointer_down(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(c) = context_mm.borrow_mut().as_mut() {
			c.state.pointer_move(x, y);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let activated = context_mu
			.borrow_mut()
			.as_mut()
			.and_then(|c| c.state.pointer_up());
		if let Some(slug) = activated {
			match on_node_activated {
				Some(cb) => cb.run(slug),
				None => navigate_to_page(&slug),
			}
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(c) = context_ml.borrow_mut().as_mut() {
			c.state.pointer_leave();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(c) = context_wh.borrow_mut().as_mut() {
			c.state.wheel(x, y, ev.delta_y());
		}
	};

	let set_search_open = move |open: bool| {
		if search_open.get_untracked() == open {
			return;
		}
		search_open.set(open);
		let cb = if open { on_search_opened } else { on_search_closed };
		if let Some(cb) = cb {
			cb.run(());
		}
	};

	let search_panel = enable_search.then(|| {
		view! {
			<div class="graph-search">
				<button
					class="graph-search-toggle"
					on:click=move |_| set_search_open(!search_open.get_untracked())
				>
					"Search"
				</button>
				<Show when=move || search_open.get()>
					<input
						type="search"
						class="graph-search-input"
						placeholder="Search pages..."
						prop:value=move || query.get()
						on:input=move |ev| query.set(event_target_value(&ev))
					/>
					<ul class="graph-search-results">
						{move || {
							let hits = results.get();
							if hits.is_empty() {
								view! { <li class="graph-search-empty">"No results found."</li> }
									.into_any()
							} else {
								hits.into_iter()
									.map(|hit| {
										let id = hit.id.clone();
										view! {
											<li>
												<button on:click=move |_| {
													command.set(Some(PanelCommand::Select(id.clone())));
													set_search_open(false);
												}>{hit.label}</button>
											</li>
										}
									})
									.collect_view()
									.into_any()
							}
						}}
					</ul>
				</Show>
			</div>
		}
	});

	let filter_panel = enable_search.then(|| {
		view! {
			<div class="graph-filter">
				<button on:click=move |_| command.set(Some(PanelCommand::SetAll(true)))>
					"All"
				</button>
				<button on:click=move |_| command.set(Some(PanelCommand::SetAll(false)))>
					"None"
				</button>
				<For
					each=move || options.get()
					key=|option| (option.name.clone(), option.active)
					children=move |option: CategoryOption| {
						let name = option.name.clone();
						view! {
							<label class="graph-filter-option">
								<input
									type="checkbox"
									prop:checked=option.active
									on:change=move |_| {
										command.set(Some(PanelCommand::Toggle(name.clone())))
									}
								/>
								<span
									class="graph-filter-swatch"
									style=format!("background-color: {};", option.color)
								></span>
								{option.name}
							</label>
						}
					}
				/>
			</div>
		}
	});

	let controls = view! {
		<div class="graph-controls">
			<button title="Zoom in" on:click=move |_| command.set(Some(PanelCommand::ZoomIn))>
				"+"
			</button>
			<button title="Zoom out" on:click=move |_| command.set(Some(PanelCommand::ZoomOut))>
				"-"
			</button>
			<button title="Fit view" on:click=move |_| command.set(Some(PanelCommand::Fit))>
				"Fit"
			</button>
		</div>
	};

	view! {
		<div class="constellation-graph" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-panels">
				{search_panel}
				{filter_panel}
			</div>
			{controls}
		</div>
	}
}
