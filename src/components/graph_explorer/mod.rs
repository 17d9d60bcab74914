mod build;
mod component;
mod render;
mod state;
mod types;

pub use build::build;
pub use component::GraphCanvas;
pub use types::GraphData;
