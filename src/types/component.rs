//! Message components: action rows, buttons, and select menus.
//!
//! <https://discord.com/developers/docs/interactions/message-components>
//!
//! Discord distinguishes component kinds with an integer `type` field, so
//! [`Component`] carries a hand-written `Deserialize` that dispatches on the
//! discriminator. Buttons and action rows enforce their structural rules at
//! construction: a button holds `custom_id` or `url` according to its style,
//! and a row holds children of a single kind.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::{ModelError, Snowflake};

// ---------------------------------------------------------------------------
// ComponentType
// ---------------------------------------------------------------------------

/// The integer discriminator Discord puts on every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ComponentType {
    ActionRow = 1,
    Button = 2,
    SelectMenu = 3,
}

impl ComponentType {
    /// Lenient lookup from a raw discriminator.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::ActionRow),
            2 => Some(Self::Button),
            3 => Some(Self::SelectMenu),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ButtonStyle
// ---------------------------------------------------------------------------

/// Button appearance and behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ButtonStyle {
    Primary = 1,
    Secondary = 2,
    Success = 3,
    Danger = 4,
    Link = 5,
}

impl ButtonStyle {
    /// Lenient lookup from a raw discriminator.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Primary),
            2 => Some(Self::Secondary),
            3 => Some(Self::Success),
            4 => Some(Self::Danger),
            5 => Some(Self::Link),
            _ => None,
        }
    }

    /// Lookup by name, including the common color aliases (`blurple`,
    /// `grey`/`gray`, `green`, `red`, `url`). Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "primary" | "blurple" => Some(Self::Primary),
            "secondary" | "grey" | "gray" => Some(Self::Secondary),
            "success" | "green" => Some(Self::Success),
            "danger" | "red" => Some(Self::Danger),
            "link" | "url" => Some(Self::Link),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Emoji
// ---------------------------------------------------------------------------

/// A partial emoji attached to a button or select option. Custom emoji carry
/// an `id`, unicode emoji only a `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub animated: bool,
}

impl Emoji {
    /// A plain unicode emoji.
    pub fn unicode(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            animated: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A clickable button.
///
/// Style rules, checked at construction and deserialization:
/// a button never carries both `custom_id` and `url`; Link buttons require a
/// `url` and forbid a `custom_id`; every other style forbids a `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawButton", into = "RawButton")]
pub struct Button {
    style: ButtonStyle,
    label: Option<String>,
    emoji: Option<Emoji>,
    custom_id: Option<String>,
    url: Option<String>,
    disabled: bool,
}

impl Button {
    pub(crate) fn from_parts(
        style: ButtonStyle,
        label: Option<String>,
        emoji: Option<Emoji>,
        custom_id: Option<String>,
        url: Option<String>,
        disabled: bool,
    ) -> Result<Self, ModelError> {
        if custom_id.is_some() && url.is_some() {
            return Err(ModelError::ButtonCustomIdAndUrl);
        }
        if style == ButtonStyle::Link {
            if custom_id.is_some() {
                return Err(ModelError::LinkButtonWithCustomId);
            }
            if url.is_none() {
                return Err(ModelError::LinkButtonMissingUrl);
            }
        } else if url.is_some() {
            return Err(ModelError::UrlWithoutLinkStyle { style });
        }
        Ok(Self {
            style,
            label,
            emoji,
            custom_id,
            url,
            disabled,
        })
    }

    pub fn style(&self) -> ButtonStyle {
        self.style
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn emoji(&self) -> Option<&Emoji> {
        self.emoji.as_ref()
    }

    pub fn custom_id(&self) -> Option<&str> {
        self.custom_id.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[derive(Serialize, Deserialize)]
struct RawButton {
    #[serde(rename = "type")]
    kind: u64,
    style: ButtonStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emoji: Option<Emoji>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    disabled: bool,
}

impl TryFrom<RawButton> for Button {
    type Error = ModelError;

    fn try_from(raw: RawButton) -> Result<Self, Self::Error> {
        if raw.kind != ComponentType::Button as u64 {
            return Err(ModelError::UnexpectedComponentType {
                expected: ComponentType::Button,
                got: raw.kind,
            });
        }
        Self::from_parts(
            raw.style,
            raw.label,
            raw.emoji,
            raw.custom_id,
            raw.url,
            raw.disabled,
        )
    }
}

impl From<Button> for RawButton {
    fn from(button: Button) -> Self {
        Self {
            kind: ComponentType::Button as u64,
            style: button.style,
            label: button.label,
            emoji: button.emoji,
            custom_id: button.custom_id,
            url: button.url,
            disabled: button.disabled,
        }
    }
}

// ---------------------------------------------------------------------------
// SelectMenu
// ---------------------------------------------------------------------------

/// One entry of a select menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
            emoji: None,
            default: false,
        }
    }
}

/// A dropdown menu. Must live alone in its action row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSelectMenu", into = "RawSelectMenu")]
pub struct SelectMenu {
    pub custom_id: String,
    pub options: Vec<SelectOption>,
    pub placeholder: Option<String>,
    pub min_values: Option<u8>,
    pub max_values: Option<u8>,
    pub disabled: bool,
}

impl SelectMenu {
    pub fn new(custom_id: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            custom_id: custom_id.into(),
            options,
            placeholder: None,
            min_values: None,
            max_values: None,
            disabled: false,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawSelectMenu {
    #[serde(rename = "type")]
    kind: u64,
    custom_id: String,
    #[serde(default)]
    options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_values: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_values: Option<u8>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    disabled: bool,
}

impl TryFrom<RawSelectMenu> for SelectMenu {
    type Error = ModelError;

    fn try_from(raw: RawSelectMenu) -> Result<Self, Self::Error> {
        if raw.kind != ComponentType::SelectMenu as u64 {
            return Err(ModelError::UnexpectedComponentType {
                expected: ComponentType::SelectMenu,
                got: raw.kind,
            });
        }
        Ok(Self {
            custom_id: raw.custom_id,
            options: raw.options,
            placeholder: raw.placeholder,
            min_values: raw.min_values,
            max_values: raw.max_values,
            disabled: raw.disabled,
        })
    }
}

impl From<SelectMenu> for RawSelectMenu {
    fn from(menu: SelectMenu) -> Self {
        Self {
            kind: ComponentType::SelectMenu as u64,
            custom_id: menu.custom_id,
            options: menu.options,
            placeholder: menu.placeholder,
            min_values: menu.min_values,
            max_values: menu.max_values,
            disabled: menu.disabled,
        }
    }
}

// ---------------------------------------------------------------------------
// ActionRow
// ---------------------------------------------------------------------------

/// A top-level container of components.
///
/// Rows never nest, and all children of a row are the same kind (all buttons
/// or all select menus). Both rules hold for every value you can obtain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawActionRow", into = "RawActionRow")]
pub struct ActionRow {
    components: Vec<Component>,
}

impl ActionRow {
    /// An empty row. Populate it with [`ActionRow::push`].
    pub fn empty() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Build a row from children, enforcing homogeneity.
    pub fn new(children: Vec<Component>) -> Result<Self, ModelError> {
        let mut row = Self::empty();
        for child in children {
            row.push(child)?;
        }
        Ok(row)
    }

    /// Append a child, rejecting nested rows and mixed child kinds.
    pub fn push(&mut self, component: Component) -> Result<(), ModelError> {
        if component.kind() == ComponentType::ActionRow {
            return Err(ModelError::NestedActionRow);
        }
        if let Some(first) = self.components.first() {
            if first.kind() != component.kind() {
                return Err(ModelError::MixedActionRow {
                    expected: first.kind(),
                    got: component.kind(),
                });
            }
        }
        self.components.push(component);
        Ok(())
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct RawActionRow {
    #[serde(rename = "type")]
    kind: u64,
    #[serde(default)]
    components: Vec<Component>,
}

impl TryFrom<RawActionRow> for ActionRow {
    type Error = ModelError;

    fn try_from(raw: RawActionRow) -> Result<Self, Self::Error> {
        if raw.kind != ComponentType::ActionRow as u64 {
            return Err(ModelError::UnexpectedComponentType {
                expected: ComponentType::ActionRow,
                got: raw.kind,
            });
        }
        Self::new(raw.components)
    }
}

impl From<ActionRow> for RawActionRow {
    fn from(row: ActionRow) -> Self {
        Self {
            kind: ComponentType::ActionRow as u64,
            components: row.components,
        }
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Any message component, dispatched on the wire `type` discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    ActionRow(ActionRow),
    Button(Button),
    SelectMenu(SelectMenu),
}

impl Component {
    pub fn kind(&self) -> ComponentType {
        match self {
            Self::ActionRow(_) => ComponentType::ActionRow,
            Self::Button(_) => ComponentType::Button,
            Self::SelectMenu(_) => ComponentType::SelectMenu,
        }
    }

    /// The `custom_id` of an interactive component, if it has one.
    pub fn custom_id(&self) -> Option<&str> {
        match self {
            Self::ActionRow(_) => None,
            Self::Button(button) => button.custom_id(),
            Self::SelectMenu(menu) => Some(&menu.custom_id),
        }
    }
}

impl From<ActionRow> for Component {
    fn from(row: ActionRow) -> Self {
        Self::ActionRow(row)
    }
}

impl From<Button> for Component {
    fn from(button: Button) -> Self {
        Self::Button(button)
    }
}

impl From<SelectMenu> for Component {
    fn from(menu: SelectMenu) -> Self {
        Self::SelectMenu(menu)
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::ActionRow(row) => row.serialize(serializer),
            Self::Button(button) => button.serialize(serializer),
            Self::SelectMenu(menu) => menu.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Component {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let discriminator = value
            .get("type")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| D::Error::custom("component is missing an integer `type` field"))?;
        let kind = u8::try_from(discriminator)
            .ok()
            .and_then(ComponentType::from_value)
            .ok_or_else(|| D::Error::custom(format!("unknown component type {discriminator}")))?;
        let component = match kind {
            ComponentType::ActionRow => {
                ActionRow::deserialize(value).map(Self::ActionRow)
            }
            ComponentType::Button => Button::deserialize(value).map(Self::Button),
            ComponentType::SelectMenu => SelectMenu::deserialize(value).map(Self::SelectMenu),
        };
        component.map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JsonModel;
    use serde_json::json;

    #[test]
    fn danger_button_serializes_to_exact_wire_shape() {
        let button = Button::from_parts(
            ButtonStyle::Danger,
            Some("X".to_owned()),
            None,
            Some("c1".to_owned()),
            None,
            false,
        )
        .unwrap();
        let json = serde_json::to_string(&button).unwrap();
        assert_eq!(json, r#"{"type":2,"style":4,"label":"X","custom_id":"c1"}"#);
    }

    #[test]
    fn button_rejects_custom_id_and_url_together() {
        let err = Button::from_parts(
            ButtonStyle::Primary,
            None,
            None,
            Some("c1".to_owned()),
            Some("https://example.com".to_owned()),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::ButtonCustomIdAndUrl));
    }

    #[test]
    fn link_button_requires_url() {
        let err =
            Button::from_parts(ButtonStyle::Link, Some("Docs".to_owned()), None, None, None, false)
                .unwrap_err();
        assert!(matches!(err, ModelError::LinkButtonMissingUrl));
    }

    #[test]
    fn non_link_button_rejects_url() {
        let err = Button::from_parts(
            ButtonStyle::Success,
            None,
            None,
            None,
            Some("https://example.com".to_owned()),
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::UrlWithoutLinkStyle {
                style: ButtonStyle::Success
            }
        ));
    }

    #[test]
    fn invalid_button_payload_rejected_on_parse() {
        let result = Button::from_json(json!({
            "type": 2,
            "style": 5,
            "label": "Broken",
            "custom_id": "c1",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn style_aliases_resolve() {
        assert_eq!(ButtonStyle::from_name("Blurple"), Some(ButtonStyle::Primary));
        assert_eq!(ButtonStyle::from_name("grey"), Some(ButtonStyle::Secondary));
        assert_eq!(ButtonStyle::from_name("gray"), Some(ButtonStyle::Secondary));
        assert_eq!(ButtonStyle::from_name("URL"), Some(ButtonStyle::Link));
        assert_eq!(ButtonStyle::from_name("mauve"), None);
    }

    #[test]
    fn component_dispatches_on_type_discriminator() {
        let component: Component = serde_json::from_value(json!({
            "type": 3,
            "custom_id": "picker",
            "options": [{"label": "A", "value": "a"}],
        }))
        .unwrap();
        assert_eq!(component.kind(), ComponentType::SelectMenu);
        assert_eq!(component.custom_id(), Some("picker"));
    }

    #[test]
    fn unknown_component_type_rejected() {
        let result = serde_json::from_value::<Component>(json!({"type": 9, "custom_id": "x"}));
        assert!(result.is_err());
    }

    fn test_button(custom_id: &str) -> Component {
        Button::from_parts(
            ButtonStyle::Primary,
            Some("Go".to_owned()),
            None,
            Some(custom_id.to_owned()),
            None,
            false,
        )
        .unwrap()
        .into()
    }

    #[test]
    fn action_row_rejects_mixed_children() {
        let mut row = ActionRow::empty();
        row.push(test_button("b1")).unwrap();
        let err = row
            .push(SelectMenu::new("picker", vec![SelectOption::new("A", "a")]).into())
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::MixedActionRow {
                expected: ComponentType::Button,
                got: ComponentType::SelectMenu,
            }
        ));
    }

    #[test]
    fn action_row_rejects_nesting() {
        let mut row = ActionRow::empty();
        let err = row.push(ActionRow::empty().into()).unwrap_err();
        assert!(matches!(err, ModelError::NestedActionRow));
    }

    #[test]
    fn action_row_round_trips_with_children() {
        let row = ActionRow::new(vec![test_button("b1"), test_button("b2")]).unwrap();
        let value = row.to_json().unwrap();
        assert_eq!(value["type"], 1);
        assert_eq!(value["components"].as_array().unwrap().len(), 2);
        let back = ActionRow::from_json(value).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn mixed_row_rejected_on_parse() {
        let result = ActionRow::from_json(json!({
            "type": 1,
            "components": [
                {"type": 2, "style": 1, "label": "Go", "custom_id": "b1"},
                {"type": 3, "custom_id": "picker", "options": [{"label": "A", "value": "a"}]},
            ],
        }));
        assert!(result.is_err());
    }
}
