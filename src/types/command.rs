//! Application command (slash command) definitions.
//!
//! <https://discord.com/developers/docs/interactions/slash-commands#applicationcommand>
//!
//! Option invariants are enforced at construction and at deserialization:
//! `choices` only on String/Integer options, nested `options` only on
//! SubCommand/SubCommandGroup. Use [`CommandOptionBuilder`] from
//! [`crate::types::builders`] to assemble options ergonomically.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::{ModelError, Snowflake};

// ---------------------------------------------------------------------------
// ApplicationCommandOptionType
// ---------------------------------------------------------------------------

/// The type of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ApplicationCommandOptionType {
    SubCommand = 1,
    SubCommandGroup = 2,
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
}

impl ApplicationCommandOptionType {
    /// Lenient lookup from a raw discriminator, for callers that want to
    /// probe a value without a serde error.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::SubCommand),
            2 => Some(Self::SubCommandGroup),
            3 => Some(Self::String),
            4 => Some(Self::Integer),
            5 => Some(Self::Boolean),
            6 => Some(Self::User),
            7 => Some(Self::Channel),
            8 => Some(Self::Role),
            _ => None,
        }
    }

    /// Whether options of this type may carry `choices`.
    pub fn supports_choices(self) -> bool {
        matches!(self, Self::String | Self::Integer)
    }

    /// Whether options of this type may carry nested `options`.
    pub fn supports_nested_options(self) -> bool {
        matches!(self, Self::SubCommand | Self::SubCommandGroup)
    }
}

// ---------------------------------------------------------------------------
// CommandOptionChoice
// ---------------------------------------------------------------------------

/// A predefined value the user can pick for a String or Integer option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOptionChoice {
    pub name: String,
    pub value: ChoiceValue,
}

impl CommandOptionChoice {
    pub fn new(name: impl Into<String>, value: impl Into<ChoiceValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A choice value, string or integer depending on the option type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    String(String),
    Integer(i64),
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

// ---------------------------------------------------------------------------
// ApplicationCommandOption
// ---------------------------------------------------------------------------

/// A single parameter (or subcommand) of an application command.
///
/// Fields are private so the choice/nesting rules hold for every value that
/// exists; construct via [`ApplicationCommandOption::new`] or the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCommandOption", into = "RawCommandOption")]
pub struct ApplicationCommandOption {
    kind: ApplicationCommandOptionType,
    name: String,
    description: String,
    default: bool,
    required: bool,
    choices: Vec<CommandOptionChoice>,
    options: Vec<ApplicationCommandOption>,
}

impl ApplicationCommandOption {
    /// Create an option, validating choice and nesting rules for `kind`.
    pub fn new(
        kind: ApplicationCommandOptionType,
        name: impl Into<String>,
        description: impl Into<String>,
        default: bool,
        required: bool,
        choices: Vec<CommandOptionChoice>,
        options: Vec<ApplicationCommandOption>,
    ) -> Result<Self, ModelError> {
        if !choices.is_empty() && !kind.supports_choices() {
            return Err(ModelError::ChoicesNotAllowed { kind });
        }
        if !options.is_empty() && !kind.supports_nested_options() {
            return Err(ModelError::NestedOptionsNotAllowed { kind });
        }
        Ok(Self {
            kind,
            name: name.into(),
            description: description.into(),
            default,
            required,
            choices,
            options,
        })
    }

    pub fn kind(&self) -> ApplicationCommandOptionType {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_default(&self) -> bool {
        self.default
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn choices(&self) -> &[CommandOptionChoice] {
        &self.choices
    }

    pub fn options(&self) -> &[ApplicationCommandOption] {
        &self.options
    }
}

/// Wire shape of an option. Unset fields produce no keys.
#[derive(Serialize, Deserialize)]
struct RawCommandOption {
    #[serde(rename = "type")]
    kind: ApplicationCommandOptionType,
    name: String,
    description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    default: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    choices: Vec<CommandOptionChoice>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<ApplicationCommandOption>,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl TryFrom<RawCommandOption> for ApplicationCommandOption {
    type Error = ModelError;

    fn try_from(raw: RawCommandOption) -> Result<Self, Self::Error> {
        Self::new(
            raw.kind,
            raw.name,
            raw.description,
            raw.default,
            raw.required,
            raw.choices,
            raw.options,
        )
    }
}

impl From<ApplicationCommandOption> for RawCommandOption {
    fn from(option: ApplicationCommandOption) -> Self {
        Self {
            kind: option.kind,
            name: option.name,
            description: option.description,
            default: option.default,
            required: option.required,
            choices: option.choices,
            options: option.options,
        }
    }
}

// ---------------------------------------------------------------------------
// ApplicationCommand
// ---------------------------------------------------------------------------

/// A slash command definition, global or guild-scoped.
///
/// `id` and `application_id` are assigned by Discord on registration and
/// absent on locally built commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ApplicationCommandOption>,
}

impl ApplicationCommand {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            application_id: None,
            guild_id: None,
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Whether the command is scoped to a single guild.
    pub fn is_guild_command(&self) -> bool {
        self.guild_id.is_some()
    }

    /// Whether Discord has assigned this command an ID yet.
    pub fn is_registered(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JsonModel;
    use serde_json::json;

    fn string_option() -> ApplicationCommandOption {
        ApplicationCommandOption::new(
            ApplicationCommandOptionType::String,
            "flavor",
            "Pick a flavor",
            false,
            true,
            vec![
                CommandOptionChoice::new("Vanilla", "vanilla"),
                CommandOptionChoice::new("Chocolate", "chocolate"),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn option_serializes_without_unset_fields() {
        let option = ApplicationCommandOption::new(
            ApplicationCommandOptionType::Boolean,
            "loud",
            "Shout the reply",
            false,
            false,
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        let value = option.to_json().unwrap();
        assert_eq!(
            value,
            json!({"type": 5, "name": "loud", "description": "Shout the reply"})
        );
    }

    #[test]
    fn choices_rejected_on_boolean_option() {
        let err = ApplicationCommandOption::new(
            ApplicationCommandOptionType::Boolean,
            "loud",
            "Shout the reply",
            false,
            false,
            vec![CommandOptionChoice::new("Yes", 1)],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::ChoicesNotAllowed { .. }));
    }

    #[test]
    fn nested_options_rejected_on_string_option() {
        let err = ApplicationCommandOption::new(
            ApplicationCommandOptionType::String,
            "outer",
            "Outer",
            false,
            false,
            Vec::new(),
            vec![string_option()],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::NestedOptionsNotAllowed { .. }));
    }

    #[test]
    fn invalid_wire_payload_rejected_on_parse() {
        // choices on a User option
        let err = ApplicationCommandOption::from_json(json!({
            "type": 6,
            "name": "target",
            "description": "Who",
            "choices": [{"name": "Me", "value": "me"}],
        }))
        .unwrap_err();
        assert!(err.to_string().contains("ApplicationCommandOption"));
    }

    #[test]
    fn command_round_trips() {
        let mut command = ApplicationCommand::new("order", "Order ice cream");
        command.options.push(string_option());
        let value = command.to_json().unwrap();
        assert_eq!(
            value,
            json!({
                "name": "order",
                "description": "Order ice cream",
                "options": [{
                    "type": 3,
                    "name": "flavor",
                    "description": "Pick a flavor",
                    "required": true,
                    "choices": [
                        {"name": "Vanilla", "value": "vanilla"},
                        {"name": "Chocolate", "value": "chocolate"},
                    ],
                }],
            })
        );
        let back = ApplicationCommand::from_json(value).unwrap();
        assert_eq!(back, command);
        assert!(!back.is_registered());
        assert!(!back.is_guild_command());
    }

    #[test]
    fn registered_command_parses_ids() {
        let command = ApplicationCommand::from_json(json!({
            "id": "5",
            "application_id": "10",
            "guild_id": "20",
            "name": "hello",
            "description": "Say hello",
        }))
        .unwrap();
        assert_eq!(command.id, Some(Snowflake::new(5)));
        assert!(command.is_registered());
        assert!(command.is_guild_command());
    }

    #[test]
    fn option_type_lenient_lookup() {
        assert_eq!(
            ApplicationCommandOptionType::from_value(8),
            Some(ApplicationCommandOptionType::Role)
        );
        assert_eq!(ApplicationCommandOptionType::from_value(9), None);
    }
}
