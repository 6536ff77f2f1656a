//! # Cricket Ledger
//!
//! A small ledger for informal cricket matches: a roster of players, one
//! record per player per match, and career statistics derived on demand.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, match records, overs, statistics)
//! - **calculate**: Pure statistics engine over record snapshots
//! - **storage**: Record stores (in-memory and JSONL on disk)
//! - **service**: Read paths joining the store and the engine
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod service;
pub mod storage;

pub use models::*;
