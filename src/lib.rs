//! Hierarchical to-do list backend.
//!
//! Users own lists, lists own tasks, and tasks nest up to five levels deep.
//! The `tree` module holds the hierarchy rules over flat records, `db` is the
//! SQLite store that applies them transactionally, and `api` exposes them over
//! HTTP.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod tree;
pub mod types;
