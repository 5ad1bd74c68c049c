//! Flowkey - premium entitlement service for the Quantum Flow Planner
//!
//! Redeems pre-shared premium codes into signed, expiring bearer tokens and
//! verifies tokens the planner stored earlier. There is no database: a token
//! is verified from its own bytes plus the shared signing secret.

pub mod app;
pub mod codes;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod state;
pub mod token;
