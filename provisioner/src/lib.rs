//! Provisioning engine for PostgreSQL teaching databases.
//!
//! The engine consumes profiles from the `profile-catalog` crate and a set
//! of connection settings, then creates each profile's database, resets its
//! tables, and loads JSON fixtures in dependency order. Each fixture record
//! is inserted in its own transaction so one bad row never blocks the rest;
//! failures are classified and counted into a structured report instead of
//! aborting the run.

pub mod cli;
pub mod engine;
pub mod error;
pub mod report;
pub mod settings;
