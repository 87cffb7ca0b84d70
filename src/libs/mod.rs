//! Core library modules.
//!
//! The timing core is [`timer`], [`recorder`] and [`aggregate`], working over
//! the [`store::LogStore`] contract with an injected [`clock::Clock`]. The
//! rest is host plumbing: configuration, storage selection, output and export.

pub mod aggregate;
pub mod area;
pub mod backend;
pub mod clock;
pub mod config;
pub mod csv_store;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod formatter;
pub mod logging;
pub mod messages;
pub mod recorder;
pub mod session;
pub mod store;
pub mod timer;
pub mod tracker;
pub mod view;
