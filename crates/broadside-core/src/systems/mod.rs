//! Systems - logic that operates on components, run by the engine in a fixed
//! per-tick order

mod assignment;
mod combat;
mod crew;
mod crisis;
mod economy;
mod events;
mod movement;
mod outcome;
mod stations;

pub use assignment::*;
pub use combat::*;
pub use crew::*;
pub use crisis::*;
pub use economy::*;
pub use events::*;
pub use movement::*;
pub use outcome::*;
pub use stations::*;
