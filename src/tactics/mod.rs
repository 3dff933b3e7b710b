//! Adjacent head threats and multi turn trapping maneuvers.

mod kiss;
pub use kiss::*;
mod position;
pub use position::*;
