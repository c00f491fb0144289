//! Broadside Core - Naval Battle Crew Simulation Engine
//!
//! A deterministic, tick-driven simulation of a sailing warship in action:
//! crew are assigned to gun, powder, surgery and damage-control stations,
//! the ship trades broadsides with an enemy, and fires and floods break out
//! below decks unless someone fights them.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Crew members, stations, crises
//! - **Components**: Pure data attached to entities (Position, CrewMember, Station, Crisis)
//! - **Systems**: Logic that runs in a fixed order each tick against the world
//!   and the ship economy (hull, enemy hull, powder)
//!
//! Nothing in the engine draws or reads input. Collaborators issue commands
//! (`assign_crew`, `unassign_crew`, `drop_crew`), drain [`systems::BattleEvent`]s
//! and read a [`snapshot::BattleSnapshot`].
//!
//! # Example
//!
//! ```rust,no_run
//! use broadside_core::prelude::*;
//!
//! let mut engine = BattleEngine::standard(BattleConfig::default());
//!
//! // Man the first gun
//! let gun = engine.stations()[0];
//! for crew in engine.crew()[..2].to_vec() {
//!     engine.assign_crew(crew, AssignTarget::Station(gun));
//! }
//!
//! // Run the battle
//! while !engine.is_over() {
//!     engine.update(1000.0 / 60.0); // 60 FPS
//!     for event in engine.drain_events() {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod snapshot;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::BattleConfig;
    pub use crate::engine::BattleEngine;
    pub use crate::error::{AssignError, ConfigError};
    pub use crate::snapshot::BattleSnapshot;
    pub use crate::systems::{BattleEvent, DefeatReason, Outcome};
}
