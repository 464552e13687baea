//! loghaul terminal dashboard
//!
//! Acquired records are shown newest first in a list beside the detail of the
//! selected record, filterable by origin and level from the keyboard.

#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod events;
pub mod ui;
