//! Indie Fantrax domain logic.
//!
//! This crate has zero internal dependencies so the database layer, the
//! posting pipeline and the HTTP API can all share it:
//!
//! - [`announcement`] -- channel message formatting.
//! - [`schedule`] -- weekly posting calendar arithmetic.
//! - [`submission`] -- validation of submitted recommendations.
//! - [`clock`] -- injectable wall clock.

pub mod announcement;
pub mod clock;
pub mod error;
pub mod schedule;
pub mod submission;
pub mod types;
