//! Core data models for the cricket ledger.

mod ids;
mod match_record;
mod overs;
mod player;
mod stats;
mod validation;

pub use ids::*;
pub use match_record::*;
pub use overs::*;
pub use player::*;
pub use stats::*;
pub use validation::*;
