//! Incoming interactions and outgoing interaction responses.
//!
//! <https://discord.com/developers/docs/interactions/slash-commands#interaction>
//!
//! An [`Interaction`] is what Discord delivers when a user invokes a slash
//! command (or pings the endpoint); an [`InteractionResponse`] is what the
//! application sends back within the three second window.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::{Component, ModelError, Snowflake};

// ---------------------------------------------------------------------------
// InteractionType
// ---------------------------------------------------------------------------

/// Why Discord delivered this interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum InteractionType {
    /// A liveness check on the interactions endpoint.
    Ping = 1,
    /// A user invoked a slash command.
    ApplicationCommand = 2,
}

impl InteractionType {
    /// Lenient lookup from a raw discriminator.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Ping),
            2 => Some(Self::ApplicationCommand),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

/// A user (or the sender of a webhook) reduced to what interactions carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialUser {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Guild member data attached to interactions invoked inside a guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionMember {
    pub user: PartialUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Snowflake>,
}

/// An incoming interaction.
///
/// `member` is set for guild invocations, `user` for DM invocations; the two
/// are unified by [`Interaction::member_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<InteractionMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PartialUser>,
    pub token: String,
    #[serde(default = "default_version")]
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CommandData>,
}

fn default_version() -> u8 {
    1
}

impl Interaction {
    /// The ID of the invoking user, whether the interaction arrived from a
    /// guild (`member`) or a DM (`user`).
    pub fn member_id(&self) -> Option<Snowflake> {
        self.member
            .as_ref()
            .map(|member| member.user.id)
            .or_else(|| self.user.as_ref().map(|user| user.id))
    }

    pub fn is_ping(&self) -> bool {
        self.kind == InteractionType::Ping
    }
}

// ---------------------------------------------------------------------------
// CommandData
// ---------------------------------------------------------------------------

/// The payload of an ApplicationCommand interaction: which command was
/// invoked and with what arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandData {
    pub id: Snowflake,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandDataOption>,
}

impl CommandData {
    /// Depth-first search for a named argument, descending through
    /// subcommand groups.
    pub fn argument(&self, name: &str) -> Option<&CommandDataOption> {
        fn walk<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a CommandDataOption> {
            for option in options {
                if option.name() == name {
                    return Some(option);
                }
                if let Some(found) = walk(option.options(), name) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.options, name)
    }
}

/// One supplied argument, or one level of subcommand nesting.
///
/// Leaf options carry a `value`; SubCommand/SubCommandGroup levels carry
/// nested `options`. Never both, enforced at construction and parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataOption", into = "RawDataOption")]
pub struct CommandDataOption {
    name: String,
    value: Option<serde_json::Value>,
    options: Vec<CommandDataOption>,
}

impl CommandDataOption {
    /// A leaf argument with a value.
    pub fn new_value(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            options: Vec::new(),
        }
    }

    /// A subcommand or group level holding nested options.
    pub fn new_group(name: impl Into<String>, options: Vec<CommandDataOption>) -> Self {
        Self {
            name: name.into(),
            value: None,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        self.value.as_ref()
    }

    pub fn options(&self) -> &[CommandDataOption] {
        &self.options
    }

    /// The value as a string, when the argument is a string.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(serde_json::Value::as_str)
    }

    /// The value as an integer, when the argument is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_ref().and_then(serde_json::Value::as_i64)
    }
}

#[derive(Serialize, Deserialize)]
struct RawDataOption {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<CommandDataOption>,
}

impl TryFrom<RawDataOption> for CommandDataOption {
    type Error = ModelError;

    fn try_from(raw: RawDataOption) -> Result<Self, Self::Error> {
        if raw.value.is_some() && !raw.options.is_empty() {
            return Err(ModelError::ValueAndNestedOptions { name: raw.name });
        }
        Ok(Self {
            name: raw.name,
            value: raw.value,
            options: raw.options,
        })
    }
}

impl From<CommandDataOption> for RawDataOption {
    fn from(option: CommandDataOption) -> Self {
        Self {
            name: option.name,
            value: option.value,
            options: option.options,
        }
    }
}

// ---------------------------------------------------------------------------
// InteractionResponse
// ---------------------------------------------------------------------------

/// How the application answers an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum InteractionResponseType {
    /// Answer a Ping.
    Pong = 1,
    /// Acknowledge receipt; no message, the invocation stays hidden.
    Acknowledge = 2,
    /// Send a message without showing the invocation.
    ChannelMessage = 3,
    /// Send a message, showing the invocation above it.
    ChannelMessageWithSource = 4,
    /// Acknowledge and show the invocation; respond later via webhook.
    AcknowledgeWithSource = 5,
}

impl InteractionResponseType {
    /// Lenient lookup from a raw discriminator.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Pong),
            2 => Some(Self::Acknowledge),
            3 => Some(Self::ChannelMessage),
            4 => Some(Self::ChannelMessageWithSource),
            5 => Some(Self::AcknowledgeWithSource),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Message flags valid on an interaction response.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InteractionResponseFlags: u64 {
        const CROSSPOSTED = 1;
        const IS_CROSSPOST = 1 << 1;
        const SUPPRESS_EMBEDS = 1 << 2;
        const SOURCE_MESSAGE_DELETED = 1 << 3;
        const URGENT = 1 << 4;
        /// Only the invoking user sees the response.
        const EPHEMERAL = 1 << 6;
    }
}

impl Serialize for InteractionResponseFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for InteractionResponseFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Unknown bits are dropped rather than rejected; Discord adds flags
        // without versioning the field.
        let bits = u64::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

/// The message body of a response, absent for Pong/Acknowledge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InteractionResponseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<InteractionResponseFlags>,
}

/// A complete interaction response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: InteractionResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionResponseData>,
}

impl InteractionResponse {
    /// The answer to a Ping.
    pub fn pong() -> Self {
        Self {
            kind: InteractionResponseType::Pong,
            data: None,
        }
    }

    /// Acknowledge and show the invocation, to be followed up via webhook.
    pub fn acknowledge() -> Self {
        Self {
            kind: InteractionResponseType::AcknowledgeWithSource,
            data: None,
        }
    }

    /// A plain message shown with its invocation.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(InteractionResponseData {
                content: Some(content.into()),
                components: None,
                flags: None,
            }),
        }
    }

    /// A message only the invoking user sees.
    pub fn ephemeral_message(content: impl Into<String>) -> Self {
        Self {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(InteractionResponseData {
                content: Some(content.into()),
                components: None,
                flags: Some(InteractionResponseFlags::EPHEMERAL),
            }),
        }
    }

    /// Attach component rows to the response.
    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.data.get_or_insert_with(Default::default).components = Some(components);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JsonModel;
    use serde_json::json;

    #[test]
    fn parses_command_invocation() {
        let interaction = Interaction::from_json(json!({
            "type": 2,
            "id": "1",
            "guild_id": "2",
            "channel_id": "3",
            "token": "tok",
            "member": {"user": {"id": "4"}},
            "data": {"id": "5", "name": "hello"},
        }))
        .unwrap();
        assert_eq!(interaction.id, Snowflake::new(1));
        assert_eq!(interaction.kind, InteractionType::ApplicationCommand);
        assert_eq!(interaction.guild_id, Some(Snowflake::new(2)));
        assert_eq!(interaction.member_id(), Some(Snowflake::new(4)));
        assert_eq!(interaction.version, 1);
        let data = interaction.data.unwrap();
        assert_eq!(data.id, Snowflake::new(5));
        assert_eq!(data.name, "hello");
    }

    #[test]
    fn member_id_falls_back_to_dm_user() {
        let interaction = Interaction::from_json(json!({
            "type": 2,
            "id": "1",
            "token": "tok",
            "user": {"id": "9", "username": "someone"},
            "data": {"id": "5", "name": "hello"},
        }))
        .unwrap();
        assert_eq!(interaction.member_id(), Some(Snowflake::new(9)));
    }

    #[test]
    fn ping_parses_without_data() {
        let interaction = Interaction::from_json(json!({
            "type": 1,
            "id": "1",
            "token": "tok",
        }))
        .unwrap();
        assert!(interaction.is_ping());
        assert!(interaction.data.is_none());
        assert_eq!(interaction.member_id(), None);
    }

    #[test]
    fn argument_lookup_descends_subcommands() {
        let data = CommandData {
            id: Snowflake::new(5),
            name: "order".to_owned(),
            options: vec![CommandDataOption::new_group(
                "icecream",
                vec![CommandDataOption::new_value("flavor", "vanilla")],
            )],
        };
        assert_eq!(data.argument("flavor").unwrap().as_str(), Some("vanilla"));
        assert!(data.argument("topping").is_none());
    }

    #[test]
    fn option_rejects_value_and_nested_options_together() {
        let err = CommandDataOption::from_json(json!({
            "name": "bad",
            "value": "x",
            "options": [{"name": "inner", "value": 1}],
        }))
        .unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn ephemeral_flag_serializes_as_64() {
        let response = InteractionResponse::ephemeral_message("just for you");
        let value = response.to_json().unwrap();
        assert_eq!(value["type"], 4);
        assert_eq!(value["data"]["flags"], 64);
    }

    #[test]
    fn pong_serializes_without_data() {
        let value = InteractionResponse::pong().to_json().unwrap();
        assert_eq!(value, json!({"type": 1}));
    }

    #[test]
    fn unknown_flag_bits_are_dropped() {
        let flags: InteractionResponseFlags = serde_json::from_str("65600").unwrap();
        assert_eq!(flags, InteractionResponseFlags::EPHEMERAL);
    }
}
