//! Terminal tools for listing and controlling Home Assistant lights and
//! thermostats over the hub's REST API.

pub mod attribute;
pub mod cli;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod lights;
pub mod table;
pub mod thermostat;

#[cfg(test)]
mod testing;

pub use client::{HomeAssistantClient, Hub};
pub use config::HomeAssistantConfig;
pub use error::{ConfigError, Error, HubError};

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    /// The hub has no entities of the requested domain.
    NoEntities,
    /// Entities exist but none matched the state filter.
    NoMatches,
}
