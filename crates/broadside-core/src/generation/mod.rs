//! Generation - the standard ship layout and starting crew

mod crew;
mod ship;

pub use crew::*;
pub use ship::*;
