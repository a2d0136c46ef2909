//! constellation-graph: force-directed graph of a knowledge base's pages.
//!
//! Pages are nodes, internal `[text](/pages/<slug>)` links between them are
//! edges. The crate extracts those links when content is authored
//! ([`links`]), assembles graph data from page/category/link relations
//! ([`data`]), and renders it as an interactive WASM canvas with a
//! deterministic force layout, hover highlighting, category filtering and
//! search ([`components::force_graph`]).

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlScriptElement};

pub mod components;
pub mod data;
pub mod error;
pub mod links;
pub mod store;

pub use components::force_graph::{
	ForceGraphCanvas, ForceGraphState, GraphData, GraphEdge, GraphNode, LayoutConfig,
};
pub use data::{JsonSource, RelationSource, Relations};
pub use error::{GraphError, StoreError};
pub use links::{LinkExtractor, LinkStore, extract_link_slugs, relink_page};

/// Script element holding the page/category/link relations as JSON.
const GRAPH_DATA_ID: &str = "graph-data";
/// Optional script element holding layout overrides as JSON.
const GRAPH_CONFIG_ID: &str = "graph-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("constellation-graph: logging initialized");
}

fn document() -> Result<Document, GraphError> {
	web_sys::window()
		.and_then(|w| w.document())
		.ok_or(GraphError::MissingElement("document"))
}

fn script_element(id: &'static str) -> Result<HtmlScriptElement, GraphError> {
	document()?
		.get_element_by_id(id)
		.and_then(|e| e.dyn_into::<HtmlScriptElement>().ok())
		.ok_or(GraphError::MissingElement(id))
}

/// Load graph data from the `graph-data` script element.
///
/// Expected format: JSON with `{ pages, categories, links }`. A
/// `data-center-page` (page id) or `data-center-slug` attribute on the element
/// selects that page's neighborhood instead of the full graph. Any failure
/// yields an empty graph.
pub fn load_graph_data() -> GraphData {
	let script = match script_element(GRAPH_DATA_ID) {
		Ok(script) => script,
		Err(e) => {
			warn!("constellation-graph: {}", e);
			return GraphData::default();
		}
	};
	let json = script.text().unwrap_or_default();
	let source = JsonSource(&json);

	if let Some(page_id) = script.get_attribute("data-center-page") {
		data::load_neighborhood(&source, &page_id)
	} else if let Some(slug) = script.get_attribute("data-center-slug") {
		data::load_neighborhood_by_slug(&source, &slug)
	} else {
		data::load_full_graph(&source)
	}
}

/// Parse layout overrides; fields left out keep their defaults.
pub fn parse_layout_config(json: &str) -> Result<LayoutConfig, GraphError> {
	Ok(serde_json::from_str(json)?)
}

/// Layout config from the optional `graph-config` script element.
fn load_layout_config() -> LayoutConfig {
	let Ok(script) = script_element(GRAPH_CONFIG_ID) else {
		debug!("constellation-graph: no layout config, using defaults");
		return LayoutConfig::default();
	};
	let json = script.text().unwrap_or_default();
	parse_layout_config(&json).unwrap_or_else(|e| {
		warn!("constellation-graph: ignoring layout config: {}", e);
		LayoutConfig::default()
	})
}

/// Main application component.
/// Loads graph data from DOM and renders the force-directed visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data();
	let layout = load_layout_config();
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Knowledge Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphCanvas data=graph_signal fullscreen=true layout=layout />
			<div class="graph-overlay">
				<h1>"Knowledge Graph"</h1>
				<p class="subtitle">
					"Click a page to open it. Drag nodes to reposition. Scroll to zoom."
				</p>
			</div>
		</div>
	}
}
