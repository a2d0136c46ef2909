//! Force-directed knowledge-base graph component.
//!
//! Renders an interactive force-directed graph on an HTML canvas with:
//! - A deterministic force layout that settles before the first paint
//! - Node dragging (pin, then re-settle on release), pan and zoom
//! - Hover highlighting of a node's neighborhood
//! - Category filtering and label search
//!
//! The pure parts (layout, highlight, filter, search, viewport, state) have no
//! DOM dependency and are tested natively; `component` and `render` bind them
//! to the browser.
//!
//! # Example
//!
//! ```ignore
//! use constellation_graph::{ForceGraphCanvas, GraphData, GraphEdge, GraphNode};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "1".into(), label: "Arrays".into(), slug: "arrays".into(), .. },
//!         GraphNode { id: "2".into(), label: "Sorting".into(), slug: "sorting".into(), .. },
//!     ],
//!     edges: vec![GraphEdge::new("1", "2")],
//! };
//!
//! view! { <ForceGraphCanvas data=data fullscreen=true /> }
//! ```

mod component;
pub mod filter;
pub mod highlight;
pub mod layout;
mod render;
pub mod scale;
pub mod search;
pub mod state;
pub mod theme;
mod types;
pub mod viewport;

pub use component::ForceGraphCanvas;
pub use layout::{LayoutConfig, Point, Simulation};
pub use state::ForceGraphState;
pub use theme::Theme;
pub use types::{GraphData, GraphEdge, GraphNode, NodeId};
