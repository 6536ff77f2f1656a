pub mod analytics;
pub mod players;
pub mod stats;
