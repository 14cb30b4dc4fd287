//! Client core for citizen issue reporting.
//!
//! A citizen picks a problem category, photographs the issue and submits
//! it; the photo is compressed, checked by a vision classifier and pinned to
//! the device position before a report may be created. Administrators move
//! reports through Pending, In-Progress and Resolved, and the reporting
//! citizen confirms or rejects each fix.
//!
//! Rendering is left to the embedding application. The document store,
//! identity provider, vision model and geolocation are reached through the
//! traits in [`store`], [`session::auth`], [`triage`] and [`geo`].

pub mod config;
pub mod error;
pub mod geo;
pub mod imaging;
pub mod model;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod triage;
pub mod views;
pub mod workflow;

pub use config::Config;
pub use error::{Error, Result};
