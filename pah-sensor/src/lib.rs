//! Core types and API client for PurpleAir sensor history.
//!
//! The `api` feature pulls in `reqwest`/`tokio` for the history client;
//! without it the crate only loads configuration, sensor lists and decodes
//! history responses.

pub mod config;
pub mod error;
#[cfg(feature = "api")]
pub mod history;
pub mod observation;
pub mod sensor_list;
