//! Domain types, errors, and form validation for the task board.
//!
//! This crate has no I/O. The `db` crate persists what it defines and the
//! `api` crate renders it.

pub mod accounts;
pub mod error;
pub mod forms;
pub mod projects;
pub mod tasks;
pub mod types;
