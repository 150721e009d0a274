//! gobackup configuration resolution library
//!
//! This module exports the resolution engine and its inspection helpers.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
