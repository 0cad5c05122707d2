pub mod grid;
pub mod loader;
pub mod naming;

pub use grid::PixelGrid;
pub use loader::*;
pub use naming::*;
