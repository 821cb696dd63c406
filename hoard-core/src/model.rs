use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// The type used for primary keys on the server.
pub type PrimaryKey = u32;

/// The signed-in user, as returned by `/users/current`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: PrimaryKey,
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A save game owned by the user. Every list belongs to exactly one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: PrimaryKey,
    pub user_id: PrimaryKey,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewGame {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatedGame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The two families of lists a game has. They behave the same, but live
/// under different resources and inventory items carry a unit weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Inventory,
    Shopping,
}

#[derive(Debug, Error)]
#[error("Unknown list kind \"{0}\", expected \"inventory\" or \"shopping\"")]
pub struct UnknownListKind(String);

impl ListKind {
    /// The resource lists of this kind live under, e.g. `/shopping_lists/4`
    pub fn lists_resource(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory_lists",
            Self::Shopping => "shopping_lists",
        }
    }

    /// The resource items of this kind live under
    pub fn items_resource(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory_list_items",
            Self::Shopping => "shopping_list_items",
        }
    }

    /// The key request bodies nest list attributes under
    pub fn list_model(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory_list",
            Self::Shopping => "shopping_list",
        }
    }

    /// The key request bodies nest item attributes under
    pub fn item_model(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory_list_item",
            Self::Shopping => "shopping_list_item",
        }
    }

    /// Name used in user-facing messages
    pub fn human_name(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory list",
            Self::Shopping => "shopping list",
        }
    }

    /// First words of error messages that count as validation errors when creating an item.
    pub fn item_create_attributes(&self) -> &'static [&'static str] {
        match self {
            Self::Inventory => &["Description", "Quantity", "Notes", "Unit"],
            Self::Shopping => &["Description", "Quantity", "Notes"],
        }
    }

    /// First words of error messages that count as validation errors when updating an item.
    pub fn item_update_attributes(&self) -> &'static [&'static str] {
        match self {
            Self::Inventory => &["Quantity", "Notes", "Unit"],
            Self::Shopping => &["Quantity", "Notes"],
        }
    }
}

impl Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Inventory => "inventory",
            Self::Shopping => "shopping",
        };

        f.write_str(name)
    }
}

impl FromStr for ListKind {
    type Err = UnknownListKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inventory" => Ok(Self::Inventory),
            "shopping" => Ok(Self::Shopping),
            other => Err(UnknownListKind(other.to_string())),
        }
    }
}

/// A list of items. Either a regular list the user created, or the
/// aggregate list of its game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: PrimaryKey,
    pub game_id: PrimaryKey,
    pub title: String,
    #[serde(default)]
    pub aggregate: bool,
    #[serde(default)]
    pub list_items: Vec<ListItem>,
}

impl List {
    /// Returns the item matching the description, if any
    pub fn item_by_description(&self, description: &str) -> Option<&ListItem> {
        self.list_items.iter().find(|i| i.matches(description))
    }

    /// Returns the item with the given id, if any
    pub fn item(&self, item_id: PrimaryKey) -> Option<&ListItem> {
        self.list_items.iter().find(|i| i.id == item_id)
    }

    /// Replaces the item matching the given one's description in place,
    /// or puts it at the top of the list if there is no match.
    pub fn upsert_item(&mut self, item: ListItem) {
        let existing = self
            .list_items
            .iter()
            .position(|i| i.matches(&item.description));

        match existing {
            Some(index) => self.list_items[index] = item,
            None => self.list_items.insert(0, item),
        }
    }

    /// Removes the item with the given id
    pub fn remove_item(&mut self, item_id: PrimaryKey) -> Option<ListItem> {
        let index = self.list_items.iter().position(|i| i.id == item_id)?;
        Some(self.list_items.remove(index))
    }

    /// Removes the item matching the description
    pub fn remove_matching(&mut self, description: &str) -> Option<ListItem> {
        let index = self
            .list_items
            .iter()
            .position(|i| i.matches(description))?;

        Some(self.list_items.remove(index))
    }
}

/// An entry on a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: PrimaryKey,
    pub list_id: PrimaryKey,
    pub description: String,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
    /// Only present on inventory items
    #[serde(
        default,
        deserialize_with = "deserialize_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_weight: Option<f64>,
}

impl ListItem {
    /// Whether this item is the same logical item as one with the given description
    pub fn matches(&self, description: &str) -> bool {
        descriptions_match(&self.description, description)
    }
}

/// Items are matched across lists by description, ignoring case.
pub fn descriptions_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Attributes sent when creating or editing an item. Absent fields are left
/// untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_weight: Option<f64>,
}

impl ItemAttributes {
    /// Attributes for a new item
    pub fn new(description: impl Into<String>, quantity: u32) -> Self {
        Self {
            description: Some(description.into()),
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    /// Attributes that only change the quantity
    pub fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_unit_weight(mut self, unit_weight: f64) -> Self {
        self.unit_weight = Some(unit_weight);
        self
    }
}

// Decimal columns may be serialized as strings
fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(f64),
        Text(String),
    }

    match Option::<Decimal>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Decimal::Number(n)) => Ok(Some(n)),
        Some(Decimal::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
