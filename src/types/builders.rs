//! Fluent construction of commands and components.
//!
//! The builders layer convenience over the validated constructors in
//! [`command`](super::command) and [`component`](super::component); they
//! never bypass the invariants those modules enforce.

use super::command::{
    ApplicationCommand, ApplicationCommandOption, ApplicationCommandOptionType, ChoiceValue,
    CommandOptionChoice,
};
use super::component::{
    ActionRow, Button, ButtonStyle, Component, Emoji, SelectMenu, SelectOption,
};
use super::{ModelError, Snowflake};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Builds an [`ApplicationCommand`] definition.
#[derive(Debug, Clone)]
pub struct ApplicationCommandBuilder {
    inner: ApplicationCommand,
}

impl ApplicationCommandBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            inner: ApplicationCommand::new(name, description),
        }
    }

    /// Scope the command to a guild.
    pub fn guild(mut self, guild_id: impl Into<Snowflake>) -> Self {
        self.inner.guild_id = Some(guild_id.into());
        self
    }

    pub fn application_id(mut self, application_id: impl Into<Snowflake>) -> Self {
        self.inner.application_id = Some(application_id.into());
        self
    }

    pub fn option(mut self, option: ApplicationCommandOption) -> Self {
        self.inner.options.push(option);
        self
    }

    pub fn build(self) -> ApplicationCommand {
        self.inner
    }
}

/// Builds an [`ApplicationCommandOption`], deferring validation to `build`.
#[derive(Debug, Clone)]
pub struct CommandOptionBuilder {
    kind: ApplicationCommandOptionType,
    name: String,
    description: String,
    default: bool,
    required: bool,
    choices: Vec<CommandOptionChoice>,
    options: Vec<ApplicationCommandOption>,
}

impl CommandOptionBuilder {
    pub fn new(
        kind: ApplicationCommandOptionType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            default: false,
            required: false,
            choices: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn default_option(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn choice(mut self, name: impl Into<String>, value: impl Into<ChoiceValue>) -> Self {
        self.choices.push(CommandOptionChoice::new(name, value));
        self
    }

    pub fn option(mut self, option: ApplicationCommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Validate and build. Fails when choices or nested options are not
    /// allowed for the option's type.
    pub fn build(self) -> Result<ApplicationCommandOption, ModelError> {
        ApplicationCommandOption::new(
            self.kind,
            self.name,
            self.description,
            self.default,
            self.required,
            self.choices,
            self.options,
        )
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Builds a [`Button`], deferring style validation to `build`.
#[derive(Debug, Clone)]
pub struct ButtonBuilder {
    style: ButtonStyle,
    label: Option<String>,
    emoji: Option<Emoji>,
    custom_id: Option<String>,
    url: Option<String>,
    disabled: bool,
}

impl ButtonBuilder {
    pub fn new(style: ButtonStyle) -> Self {
        Self {
            style,
            label: None,
            emoji: None,
            custom_id: None,
            url: None,
            disabled: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn emoji(mut self, emoji: Emoji) -> Self {
        self.emoji = Some(emoji);
        self
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn build(self) -> Result<Button, ModelError> {
        Button::from_parts(
            self.style,
            self.label,
            self.emoji,
            self.custom_id,
            self.url,
            self.disabled,
        )
    }
}

/// A labeled button with a `custom_id`, ready to drop into a row.
pub fn button(
    style: ButtonStyle,
    label: impl Into<String>,
    custom_id: impl Into<String>,
) -> Result<Component, ModelError> {
    ButtonBuilder::new(style)
        .label(label)
        .custom_id(custom_id)
        .build()
        .map(Component::from)
}

/// A Link-style button pointing at a URL.
pub fn link_button(label: impl Into<String>, url: impl Into<String>) -> Result<Component, ModelError> {
    ButtonBuilder::new(ButtonStyle::Link)
        .label(label)
        .url(url)
        .build()
        .map(Component::from)
}

/// A select menu with the given options.
pub fn select_menu(custom_id: impl Into<String>, options: Vec<SelectOption>) -> Component {
    SelectMenu::new(custom_id, options).into()
}

/// A top-level action row holding `children`.
pub fn action_row(children: Vec<Component>) -> Result<Component, ModelError> {
    ActionRow::new(children).map(Component::from)
}
