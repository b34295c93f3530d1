//! State module for tracking per-URL progress
//!
//! Every URL taken from the backlog walks a small state machine from
//! `Pending` to exactly one terminal state.

mod url_state;

pub use url_state::{UrlState, UrlTracker};
