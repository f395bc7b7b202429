//! Core library for the workbook-compare command line application.
//!
//! Two versions of a workbook ("current" and "previous") go in, one
//! comparison report comes out. IO adapters live under [`io`], the in-memory
//! sheet representation in [`model`], the table comparators in [`compare`],
//! report layout in [`report`], and the run orchestration under [`sync`].

pub mod compare;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod report;
pub mod sync;

pub use config::CompareConfig;
pub use error::{Result, ToolError};
