#![forbid(unsafe_code)]

//! Core game logic for Botica, a life-of-an-apothecary game set in
//! 1680s Mexico City.
//!
//! This crate provides:
//! - Domain types (actions, resources, patients, treatment records)
//! - Resource rules (energy, health, meals, sleep, warnings)
//! - The turn engine that applies those rules to a player's state
//! - Procedural treatment histories drawn from a period knowledge base
//! - Persistence for the CLI (player state, per-patient journals)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod resources;
pub mod engine;
pub mod symptoms;
pub mod knowledge;
pub mod treatment;
pub mod state;
pub mod journal;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use resources::{ResourceLimits, ResourceManager};
pub use engine::{eat_meal, perform_action, sleep, ActionReport, MealReport, SleepReport};
pub use symptoms::extract_symptoms;
pub use knowledge::{get_default_knowledge, KnowledgeBase};
pub use treatment::{add_player_treatment, weighted_random, TreatmentGenerator};
pub use journal::{JsonlJournal, TreatmentSink};
