//! Eligibility and ranking engine for the university program finder.
//!
//! A student profile is checked against a static subject-group rule table, scored against
//! every program offering in a small in-memory catalog, then filtered and sorted for display.

pub mod catalog;
pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
