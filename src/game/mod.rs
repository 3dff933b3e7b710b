mod cell;
pub use cell::*;
mod grid;
pub use grid::*;
mod game;
pub use game::*;
mod moves;
pub use moves::*;
mod hazard;
pub use hazard::*;
mod voronoi;
pub use voronoi::*;
