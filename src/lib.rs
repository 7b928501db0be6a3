//! Library crate for userposts-dashboard.
//!
//! This crate exposes the building blocks of the TUI:
//! - Remote directory model and HTTP client (`api`)
//! - Fetch error taxonomy and user-facing messages (`error`)
//! - Filter/sort engine for the users list (`search`)
//! - Dashboard state machine, loaders and the event loop (`app`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userposts-dashboard` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod search;
pub mod ui;

pub use error::{FetchError, Result};
