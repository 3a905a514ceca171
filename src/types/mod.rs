//! Typed representations of Discord interaction API objects.
//!
//! These mirror the Discord API docs so that gateway payloads and REST
//! responses never leak `serde_json::Value` into application code. Every
//! model (de)serializes to exactly the wire shape Discord documents: unset
//! optional fields produce no JSON keys, and structural invariants (which
//! option types may carry choices, which button styles may carry a URL,
//! what an action row may contain) are enforced at construction — a value
//! you can hold is a value Discord will accept.

use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod builders;
pub mod command;
pub mod component;
pub mod interaction;
pub mod snowflake;

// ---------------------------------------------------------------------------
// Convenience re-exports
// ---------------------------------------------------------------------------
// The rest of the crate does `use crate::types::*` so we re-export the most
// commonly used items here.

pub use self::builders::{
    action_row, button, link_button, select_menu, ApplicationCommandBuilder, ButtonBuilder,
    CommandOptionBuilder,
};
pub use self::command::{
    ApplicationCommand, ApplicationCommandOption, ApplicationCommandOptionType, ChoiceValue,
    CommandOptionChoice,
};
pub use self::component::{
    ActionRow, Button, ButtonStyle, Component, ComponentType, Emoji, SelectMenu, SelectOption,
};
pub use self::interaction::{
    CommandData, CommandDataOption, Interaction, InteractionMember, InteractionResponse,
    InteractionResponseData, InteractionResponseFlags, InteractionResponseType, InteractionType,
    PartialUser,
};
pub use self::snowflake::Snowflake;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error raised when a model cannot be parsed from JSON or when construction
/// would violate a documented API constraint.
///
/// Parse and invariant errors are local and fatal to the single object being
/// built; they are never silently defaulted away.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A JSON payload did not match the model's wire shape. The message
    /// names both the offending field and the model type.
    #[error("failed to parse {kind}: {source}")]
    Parse {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A model could not be serialized. Practically unreachable for these
    /// types, but propagated rather than swallowed.
    #[error("failed to serialize {kind}: {source}")]
    Serialize {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A `type` discriminator on the wire did not match the model being
    /// deserialized.
    #[error("expected component type {expected:?}, got {got}")]
    UnexpectedComponentType { expected: ComponentType, got: u64 },

    /// Only String and Integer options can carry `choices`.
    #[error("options of type {kind:?} cannot carry choices")]
    ChoicesNotAllowed { kind: ApplicationCommandOptionType },

    /// Only SubCommand and SubCommandGroup options can carry nested `options`.
    #[error("options of type {kind:?} cannot carry nested options")]
    NestedOptionsNotAllowed { kind: ApplicationCommandOptionType },

    /// A button can carry `custom_id` or `url`, never both.
    #[error("a button cannot carry both `custom_id` and `url`")]
    ButtonCustomIdAndUrl,

    /// Link-style buttons are identified by their URL, not a `custom_id`.
    #[error("a button with style Link cannot carry a `custom_id`")]
    LinkButtonWithCustomId,

    /// Only Link-style buttons may carry a `url`.
    #[error("a button with style {style:?} cannot carry a `url`")]
    UrlWithoutLinkStyle { style: ButtonStyle },

    /// A Link-style button without a URL points nowhere.
    #[error("a button with style Link requires a `url`")]
    LinkButtonMissingUrl,

    /// Action rows hold one kind of child: all buttons or all select menus.
    #[error("action row already holds {expected:?} children, cannot add {got:?}")]
    MixedActionRow {
        expected: ComponentType,
        got: ComponentType,
    },

    /// Action rows cannot nest.
    #[error("an action row cannot contain another action row")]
    NestedActionRow,

    /// An interaction data option carries either a leaf `value` or nested
    /// `options`, never both.
    #[error("interaction option `{name}` carries both a value and nested options")]
    ValueAndNestedOptions { name: String },
}

// ---------------------------------------------------------------------------
// JsonModel
// ---------------------------------------------------------------------------

/// Bidirectional JSON conversion for model types.
///
/// A thin wrapper over serde that tags errors with the model's type name, so
/// a missing field fails with "failed to parse ApplicationCommand: missing
/// field `name`" rather than a bare serde message.
pub trait JsonModel: Serialize + DeserializeOwned {
    /// Type name used in error messages.
    const KIND: &'static str;

    /// Parse the model from a JSON value.
    fn from_json(value: serde_json::Value) -> Result<Self, ModelError> {
        serde_json::from_value(value).map_err(|source| ModelError::Parse {
            kind: Self::KIND,
            source,
        })
    }

    /// Convert the model to a JSON value.
    fn to_json(&self) -> Result<serde_json::Value, ModelError> {
        serde_json::to_value(self).map_err(|source| ModelError::Serialize {
            kind: Self::KIND,
            source,
        })
    }
}

macro_rules! impl_json_model {
    ($($ty:ty => $kind:literal),+ $(,)?) => {
        $(impl JsonModel for $ty {
            const KIND: &'static str = $kind;
        })+
    };
}

impl_json_model! {
    ApplicationCommand => "ApplicationCommand",
    ApplicationCommandOption => "ApplicationCommandOption",
    CommandOptionChoice => "CommandOptionChoice",
    Component => "Component",
    ActionRow => "ActionRow",
    Button => "Button",
    SelectMenu => "SelectMenu",
    SelectOption => "SelectOption",
    Emoji => "Emoji",
    Interaction => "Interaction",
    CommandData => "CommandData",
    CommandDataOption => "CommandDataOption",
    InteractionResponse => "InteractionResponse",
    InteractionResponseData => "InteractionResponseData",
}
