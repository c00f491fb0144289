//! Component definitions for the battle ECS.
//!
//! Components are plain data attached to entities. Behaviour that spans
//! entities lives in systems.

mod common;
mod crew;
mod crisis;
mod station;

pub use common::*;
pub use crew::*;
pub use crisis::*;
pub use station::*;
