//! Typed building blocks for Discord slash commands and message components.
//!
//! The crate covers the full interaction round trip:
//!
//! - [`types`] models commands, components, and interactions with the
//!   API's structural rules enforced at construction and parse time.
//! - [`route`] assembles interaction endpoint URLs with ordering checked
//!   by the type of each segment.
//! - [`http`] is the REST transport for command registration and
//!   interaction responses.
//! - [`registry`] maps incoming interactions to async handlers with
//!   before/after hooks.
//! - [`presets`] loads named component layouts from TOML documents.

pub mod http;
pub mod presets;
pub mod registry;
pub mod route;
pub mod types;

pub use http::{HttpClient, HttpError};
pub use presets::{PresetError, PresetRegistry};
pub use registry::{
    CommandContext, CommandRegistry, DispatchOutcome, HandlerError, InvokeError,
    RegisteredCommand, RegistryError,
};
pub use route::{Route, RouteError};
pub use types::{
    ApplicationCommand, Component, Interaction, InteractionResponse, ModelError, Snowflake,
};
