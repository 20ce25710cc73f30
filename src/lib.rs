//! Player season statistics dashboard.
//!
//! The [`data`] module holds the reusable engine (loading, filtering, league
//! counts, scatter data); [`app`] and [`ui`] render it with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
