//! Component presets loaded from TOML documents.
//!
//! A preset document declares named buttons, select options, select menus,
//! and action rows, so message layouts live in config instead of code.
//! Children may be declared inline or referenced by name, and a reference
//! may point at a component a *later* document declares. The registry keeps
//! the declarations and rebuilds every select menu and action row after
//! each load, so a parent only ever exposes fully resolved children, in
//! declared order, no matter how declarations are split across documents.
//! Only [`PresetRegistry::finalize`] turns leftover dangling references
//! into an error.
//!
//! ```toml
//! [[buttons]]
//! name = "confirm"
//! style = "green"
//! label = "Confirm"
//! custom_id = "confirm"
//!
//! [[action_rows]]
//! name = "confirm_row"
//! buttons = [{ ref = "confirm" }]
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::types::{
    ActionRow, Button, ButtonStyle, Component, Emoji, SelectMenu, SelectOption,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The component kinds a preset document can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Button,
    SelectOption,
    SelectMenu,
    ActionRow,
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Button => "button",
            Self::SelectOption => "select option",
            Self::SelectMenu => "select menu",
            Self::ActionRow => "action row",
        })
    }
}

/// Error raised while loading or finalizing preset documents.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    /// The document is not valid TOML or does not match the schema.
    #[error("invalid preset document: {0}")]
    Toml(#[from] toml::de::Error),

    /// A button declared a style name that does not exist.
    #[error("button `{name}` declares unknown style `{style}`")]
    UnknownStyle { name: String, style: String },

    /// A declaration parsed but violates a component invariant.
    #[error("invalid {kind} `{name}`: {source}")]
    InvalidComponent {
        kind: PresetKind,
        name: String,
        #[source]
        source: crate::types::ModelError,
    },

    /// References still dangling at finalize time.
    #[error("unresolved preset references: {0:?}")]
    UnresolvedReferences(Vec<String>),

    /// Declarations whose children all resolved but that violate a
    /// component invariant, e.g. a row referencing both a button and a
    /// select menu.
    #[error("invalid preset declarations: {0:?}")]
    InvalidDeclarations(Vec<String>),
}

// ---------------------------------------------------------------------------
// Document schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PresetDocument {
    #[serde(default)]
    buttons: Vec<ButtonDecl>,
    #[serde(default)]
    select_options: Vec<SelectOptionDecl>,
    #[serde(default)]
    selects: Vec<SelectDecl>,
    #[serde(default)]
    action_rows: Vec<ActionRowDecl>,
}

/// A style by numeric value or by name (including the color aliases).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StyleDecl {
    Value(u8),
    Name(String),
}

impl StyleDecl {
    fn resolve(&self, button: &str) -> Result<ButtonStyle, PresetError> {
        let style = match self {
            Self::Value(value) => ButtonStyle::from_value(*value),
            Self::Name(name) => ButtonStyle::from_name(name),
        };
        style.ok_or_else(|| PresetError::UnknownStyle {
            name: button.to_owned(),
            style: match self {
                Self::Value(value) => value.to_string(),
                Self::Name(name) => name.clone(),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct ButtonDecl {
    name: String,
    style: StyleDecl,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    emoji: Option<String>,
    #[serde(default)]
    custom_id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    disabled: bool,
}

impl ButtonDecl {
    fn build(&self) -> Result<Button, PresetError> {
        let style = self.style.resolve(&self.name)?;
        Button::from_parts(
            style,
            self.label.clone(),
            self.emoji.clone().map(Emoji::unicode),
            self.custom_id.clone(),
            self.url.clone(),
            self.disabled,
        )
        .map_err(|source| PresetError::InvalidComponent {
            kind: PresetKind::Button,
            name: self.name.clone(),
            source,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SelectOptionDecl {
    name: String,
    label: String,
    value: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default: bool,
}

impl SelectOptionDecl {
    fn build(&self) -> SelectOption {
        SelectOption {
            label: self.label.clone(),
            value: self.value.clone(),
            description: self.description.clone(),
            emoji: None,
            default: self.default,
        }
    }
}

/// A child declared inline or referencing a named component.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChildDecl<T> {
    Reference {
        #[serde(rename = "ref")]
        reference: String,
    },
    Inline(T),
}

#[derive(Debug, Deserialize)]
struct SelectDecl {
    name: String,
    custom_id: String,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    min_values: Option<u8>,
    #[serde(default)]
    max_values: Option<u8>,
    #[serde(default)]
    options: Vec<ChildDecl<SelectOptionDecl>>,
}

#[derive(Debug, Deserialize)]
struct ActionRowDecl {
    name: String,
    #[serde(default)]
    buttons: Vec<ChildDecl<ButtonDecl>>,
    #[serde(default)]
    selects: Vec<ChildDecl<String>>,
}

// ---------------------------------------------------------------------------
// Retained declarations
// ---------------------------------------------------------------------------
// Selects and rows are kept as specs and rebuilt after every load: a parent
// is materialized only once every child it names exists, so a later document
// can supply a child without leaving stale copies behind, and children land
// at their declared positions.

#[derive(Debug, Clone)]
enum OptionChild {
    Inline(SelectOption),
    Ref(String),
}

#[derive(Debug, Clone)]
struct SelectSpec {
    custom_id: String,
    placeholder: Option<String>,
    min_values: Option<u8>,
    max_values: Option<u8>,
    children: Vec<OptionChild>,
}

#[derive(Debug, Clone)]
enum RowChild {
    Button(Button),
    ButtonRef(String),
    SelectRef(String),
}

#[derive(Debug, Clone)]
struct RowSpec {
    children: Vec<RowChild>,
}

// ---------------------------------------------------------------------------
// PresetRegistry
// ---------------------------------------------------------------------------

/// Named components collected from one or more preset documents.
///
/// Later declarations under an existing name replace the earlier one, with a
/// warning.
#[derive(Debug, Default)]
pub struct PresetRegistry {
    buttons: HashMap<String, Button>,
    select_options: HashMap<String, SelectOption>,
    select_specs: HashMap<String, SelectSpec>,
    row_specs: HashMap<String, RowSpec>,
    selects: HashMap<String, SelectMenu>,
    action_rows: HashMap<String, ActionRow>,
    unresolved: Vec<String>,
    invalid: Vec<String>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML preset document, merge its declarations, and rebuild
    /// every select menu and action row from the declarations collected so
    /// far.
    pub fn load_document(&mut self, text: &str) -> Result<(), PresetError> {
        let document: PresetDocument = toml::from_str(text)?;

        for decl in &document.buttons {
            let button = decl.build()?;
            if self.buttons.insert(decl.name.clone(), button).is_some() {
                warn!(name = %decl.name, "replacing button preset");
            }
        }
        for decl in &document.select_options {
            if self
                .select_options
                .insert(decl.name.clone(), decl.build())
                .is_some()
            {
                warn!(name = %decl.name, "replacing select option preset");
            }
        }
        for decl in document.selects {
            let children = decl
                .options
                .into_iter()
                .map(|child| match child {
                    ChildDecl::Inline(option) => OptionChild::Inline(option.build()),
                    ChildDecl::Reference { reference } => OptionChild::Ref(reference),
                })
                .collect();
            let spec = SelectSpec {
                custom_id: decl.custom_id,
                placeholder: decl.placeholder,
                min_values: decl.min_values,
                max_values: decl.max_values,
                children,
            };
            if self.select_specs.insert(decl.name.clone(), spec).is_some() {
                warn!(name = %decl.name, "replacing select preset");
            }
        }
        for decl in document.action_rows {
            // Inline buttons are validated eagerly; only references defer.
            let mut children = Vec::new();
            for child in &decl.buttons {
                children.push(match child {
                    ChildDecl::Inline(button) => RowChild::Button(button.build()?),
                    ChildDecl::Reference { reference } => RowChild::ButtonRef(reference.clone()),
                });
            }
            for child in &decl.selects {
                let reference = match child {
                    ChildDecl::Inline(name) | ChildDecl::Reference { reference: name } => name,
                };
                children.push(RowChild::SelectRef(reference.clone()));
            }
            let spec = RowSpec { children };
            if self.row_specs.insert(decl.name.clone(), spec).is_some() {
                warn!(name = %decl.name, "replacing action row preset");
            }
        }

        self.rebuild();
        Ok(())
    }

    /// Rematerialize selects and rows from their declarations. A parent
    /// with a dangling reference stays unmaterialized; a parent whose
    /// resolved children violate an invariant is recorded for `finalize`.
    fn rebuild(&mut self) {
        let mut selects = HashMap::new();
        let mut unresolved = Vec::new();
        let mut invalid = Vec::new();

        for (name, spec) in &self.select_specs {
            let mut options = Vec::new();
            let mut complete = true;
            for child in &spec.children {
                match child {
                    OptionChild::Inline(option) => options.push(option.clone()),
                    OptionChild::Ref(reference) => match self.select_options.get(reference) {
                        Some(option) => options.push(option.clone()),
                        None => {
                            complete = false;
                            unresolved
                                .push(format!("option `{reference}` referenced by select `{name}`"));
                        }
                    },
                }
            }
            if complete {
                let mut menu = SelectMenu::new(spec.custom_id.clone(), options);
                menu.placeholder = spec.placeholder.clone();
                menu.min_values = spec.min_values;
                menu.max_values = spec.max_values;
                selects.insert(name.clone(), menu);
            }
        }

        let mut action_rows = HashMap::new();
        for (name, spec) in &self.row_specs {
            let mut children = Vec::new();
            let mut complete = true;
            for child in &spec.children {
                match child {
                    RowChild::Button(button) => children.push(Component::Button(button.clone())),
                    RowChild::ButtonRef(reference) => match self.buttons.get(reference) {
                        Some(button) => children.push(Component::Button(button.clone())),
                        None => {
                            complete = false;
                            unresolved.push(format!(
                                "button `{reference}` referenced by action row `{name}`"
                            ));
                        }
                    },
                    // A select counts as resolved only once materialized, so
                    // a row never embeds a select still missing options.
                    RowChild::SelectRef(reference) => match selects.get(reference) {
                        Some(menu) => children.push(Component::SelectMenu(menu.clone())),
                        None => {
                            complete = false;
                            unresolved.push(format!(
                                "select `{reference}` referenced by action row `{name}`"
                            ));
                        }
                    },
                }
            }
            if !complete {
                continue;
            }
            match ActionRow::new(children) {
                Ok(row) => {
                    debug!(name = %name, "materialized action row preset");
                    action_rows.insert(name.clone(), row);
                }
                Err(error) => {
                    warn!(name = %name, %error, "action row preset is invalid");
                    invalid.push(format!("action row `{name}`: {error}"));
                }
            }
        }

        for entry in &unresolved {
            warn!(reference = %entry, "preset reference still unresolved");
        }

        self.selects = selects;
        self.action_rows = action_rows;
        self.unresolved = unresolved;
        self.invalid = invalid;
    }

    /// Human-readable descriptions of references still waiting for their
    /// target.
    pub fn unresolved(&self) -> Vec<String> {
        self.unresolved.clone()
    }

    /// Assert that every reference resolved and every declaration produced
    /// a valid component. Call after the last document.
    pub fn finalize(&self) -> Result<(), PresetError> {
        if !self.unresolved.is_empty() {
            return Err(PresetError::UnresolvedReferences(self.unresolved.clone()));
        }
        if !self.invalid.is_empty() {
            return Err(PresetError::InvalidDeclarations(self.invalid.clone()));
        }
        Ok(())
    }

    pub fn button(&self, name: &str) -> Option<&Button> {
        self.buttons.get(name)
    }

    pub fn select_option(&self, name: &str) -> Option<&SelectOption> {
        self.select_options.get(name)
    }

    pub fn select(&self, name: &str) -> Option<&SelectMenu> {
        self.selects.get(name)
    }

    pub fn action_row(&self, name: &str) -> Option<&ActionRow> {
        self.action_rows.get(name)
    }

    /// Find the named button whose `custom_id` matches, e.g. to pair an
    /// incoming component interaction with its preset.
    pub fn button_by_custom_id(&self, custom_id: &str) -> Option<(&str, &Button)> {
        self.buttons
            .iter()
            .find(|(_, button)| button.custom_id() == Some(custom_id))
            .map(|(name, button)| (name.as_str(), button))
    }
}
