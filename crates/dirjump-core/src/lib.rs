//! dirjump-core - history ranking and selection engine
//!
//! This crate provides the durable visit/shortcut store, the frecency
//! ranking and subsequence match engines, and the pure selection state
//! machine that drives the interactive picker. It performs no terminal I/O;
//! frontends feed it events and render its window snapshots.

pub mod config;
mod error;
pub mod frecency;
pub mod matcher;
pub mod path_utils;
pub mod selection;
pub mod store;
pub mod types;

pub use config::{Colors, Config, PruneConfig};
pub use error::{Error, Result};
pub use matcher::MatchScore;
pub use selection::{SelectEvent, SelectionState, Transition, View};
pub use store::{ImportReport, PruneStats, Store, StoreHealth};
pub use types::{Candidate, Origin, Shortcut, VisitRecord};
