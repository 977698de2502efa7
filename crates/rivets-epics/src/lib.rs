//! Rivets epics - closure eligibility for epics in a rivets issue database.
//!
//! An epic is eligible for closure once it has at least one child and every
//! child is closed. This crate answers that question over a read-only store:
//!
//! - [`epics::EligibilityEvaluator::list_eligible_epics`]: open epics with
//!   child counts and eligibility
//! - [`epics::ContainmentGraph::parent_epics`]: direct parent epics of an issue
//! - [`epics::EligibilityEvaluator::is_eligible`]: single-epic check
//! - [`epics::cascade`]: caller-driven cascade after closing an issue
//!
//! Storage is abstracted behind [`storage::ReadExecutor`]; the bundled
//! implementation is [`storage::sqlite::SqliteExecutor`].

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod context;
pub mod domain;
pub mod epics;
pub mod error;
pub mod storage;

// Public CLI module (needed by binary)
pub mod app;
pub mod cli;
pub mod output;
