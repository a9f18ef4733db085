//! Room records and the entities nested inside them.
//!
//! A room lives inside its parent project document; none of these types has
//! a store identity of its own.

use serde::{Deserialize, Serialize};

use crate::collection::{Collection, Identified};
use crate::error::CoreError;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Room type
// ---------------------------------------------------------------------------

/// The kind of space a room record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[default]
    #[serde(alias = "Living Room")]
    LivingRoom,
    Kitchen,
    #[serde(alias = "Master Bedroom")]
    MasterBedroom,
    #[serde(alias = "Guest Bedroom")]
    GuestBedroom,
    Bathroom,
    #[serde(alias = "Dining Room")]
    DiningRoom,
    Study,
    Balcony,
    Other,
}

impl RoomType {
    pub const ALL: [RoomType; 9] = [
        Self::LivingRoom,
        Self::Kitchen,
        Self::MasterBedroom,
        Self::GuestBedroom,
        Self::Bathroom,
        Self::DiningRoom,
        Self::Study,
        Self::Balcony,
        Self::Other,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::LivingRoom => "Living Room",
            Self::Kitchen => "Kitchen",
            Self::MasterBedroom => "Master Bedroom",
            Self::GuestBedroom => "Guest Bedroom",
            Self::Bathroom => "Bathroom",
            Self::DiningRoom => "Dining Room",
            Self::Study => "Study",
            Self::Balcony => "Balcony",
            Self::Other => "Other",
        }
    }
}

// ---------------------------------------------------------------------------
// Floor
// ---------------------------------------------------------------------------

/// Standard floor labels, ordered from the lowest basement upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Floor {
    #[serde(rename = "B2")]
    B2,
    #[serde(rename = "B1")]
    B1,
    #[default]
    #[serde(rename = "1F")]
    F1,
    #[serde(rename = "2F")]
    F2,
    #[serde(rename = "3F")]
    F3,
    #[serde(rename = "4F")]
    F4,
    #[serde(rename = "5F")]
    F5,
    #[serde(rename = "6F")]
    F6,
    #[serde(rename = "7F")]
    F7,
    #[serde(rename = "8F")]
    F8,
    #[serde(rename = "9F")]
    F9,
    #[serde(rename = "10F")]
    F10,
}

impl Floor {
    pub const ALL: [Floor; 12] = [
        Self::B2,
        Self::B1,
        Self::F1,
        Self::F2,
        Self::F3,
        Self::F4,
        Self::F5,
        Self::F6,
        Self::F7,
        Self::F8,
        Self::F9,
        Self::F10,
    ];

    /// Floor code as entered and displayed, e.g. `"B1"` or `"3F"`.
    pub fn code(self) -> &'static str {
        match self {
            Self::B2 => "B2",
            Self::B1 => "B1",
            Self::F1 => "1F",
            Self::F2 => "2F",
            Self::F3 => "3F",
            Self::F4 => "4F",
            Self::F5 => "5F",
            Self::F6 => "6F",
            Self::F7 => "7F",
            Self::F8 => "8F",
            Self::F9 => "9F",
            Self::F10 => "10F",
        }
    }

    /// Parse a floor code.
    pub fn from_code(code: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|f| f.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid floor '{code}'. Must be one of: {}",
                    Self::ALL.map(Floor::code).join(", ")
                ))
            })
    }

    pub fn is_basement(self) -> bool {
        matches!(self, Self::B2 | Self::B1)
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// How strongly a room's requirements should be honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Longer explanation shown next to the priority selector.
    pub fn description(self) -> &'static str {
        match self {
            Self::High => "Must be satisfied",
            Self::Medium => "Satisfy where possible",
            Self::Low => "Adjust to budget",
        }
    }
}

// ---------------------------------------------------------------------------
// Nested entities
// ---------------------------------------------------------------------------

/// A single free-text requirement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: EntityId,
    pub text: String,
}

impl Identified for Requirement {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Which of a room's two line item lists an operation targets.
///
/// Furniture and decorations share one shape and one editing flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Furniture,
    Decoration,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Furniture => "furniture",
            Self::Decoration => "decoration",
        }
    }
}

/// A furniture or decoration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Inline data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Product or reference link; always carries a scheme once committed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Nice-to-have rather than essential.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl Identified for LineItem {
    fn id(&self) -> EntityId {
        self.id
    }
}

pub type FurnitureItem = LineItem;
pub type DecorationItem = LineItem;

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// One space within a project and everything the client wants in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    #[serde(default)]
    pub floor: Floor,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub requirements: Collection<Requirement>,
    #[serde(default)]
    pub furniture: Collection<LineItem>,
    #[serde(default)]
    pub decorations: Collection<LineItem>,
    /// Reference images as inline data URLs.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Room {
    /// A blank room with a fresh identity and default type, floor and priority.
    pub fn new() -> Self {
        Self {
            id: EntityId::generate(),
            room_type: RoomType::default(),
            floor: Floor::default(),
            description: String::new(),
            priority: Priority::default(),
            requirements: Collection::new(),
            furniture: Collection::new(),
            decorations: Collection::new(),
            images: Vec::new(),
        }
    }

    pub fn items(&self, kind: ItemKind) -> &Collection<LineItem> {
        match kind {
            ItemKind::Furniture => &self.furniture,
            ItemKind::Decoration => &self.decorations,
        }
    }

    pub fn items_mut(&mut self, kind: ItemKind) -> &mut Collection<LineItem> {
        match kind {
            ItemKind::Furniture => &mut self.furniture,
            ItemKind::Decoration => &mut self.decorations,
        }
    }

    /// Whether anything beyond type, floor and priority has been filled in.
    pub fn has_content(&self) -> bool {
        !self.requirements.is_empty()
            || !self.furniture.is_empty()
            || !self.decorations.is_empty()
            || !self.images.is_empty()
            || !self.description.trim().is_empty()
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

impl Identified for Room {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Partial update for a room's scalar fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<Floor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl RoomPatch {
    pub fn apply(self, room: &mut Room) {
        if let Some(room_type) = self.room_type {
            room.room_type = room_type;
        }
        if let Some(floor) = self.floor {
            room.floor = floor;
        }
        if let Some(description) = self.description {
            room.description = description;
        }
        if let Some(priority) = self.priority {
            room.priority = priority;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_codes_round_trip_through_serde() {
        for floor in Floor::ALL {
            let json = serde_json::to_value(floor).unwrap();
            assert_eq!(json, floor.code());
            let back: Floor = serde_json::from_value(json).unwrap();
            assert_eq!(back, floor);
        }
    }

    #[test]
    fn floor_order_runs_from_basement_up() {
        assert!(Floor::B2 < Floor::B1);
        assert!(Floor::B1 < Floor::F1);
        assert!(Floor::F9 < Floor::F10);
        assert_eq!(Floor::from_code("10f").unwrap(), Floor::F10);
        assert!(Floor::from_code("11F").is_err());
    }

    #[test]
    fn missing_floor_defaults_to_ground_floor() {
        let json = serde_json::json!({
            "id": EntityId::generate(),
            "type": "kitchen",
            "priority": "Low",
        });
        let room: Room = serde_json::from_value(json).unwrap();
        assert_eq!(room.floor, Floor::F1);
        assert!(room.requirements.is_empty());
        assert!(room.images.is_empty());
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let json = serde_json::json!({
            "id": EntityId::generate(),
            "type": "kitchen",
            "priority": "Urgent",
        });
        assert!(serde_json::from_value::<Room>(json).is_err());
    }

    #[test]
    fn room_type_accepts_display_label_alias() {
        let ty: RoomType = serde_json::from_value(serde_json::json!("Living Room")).unwrap();
        assert_eq!(ty, RoomType::LivingRoom);
        assert_eq!(serde_json::to_value(ty).unwrap(), "living_room");
    }

    #[test]
    fn line_item_omits_absent_fields() {
        let item = LineItem {
            id: EntityId::generate(),
            name: "Sofa".into(),
            description: None,
            image: None,
            url: None,
            optional: false,
        };
        let json = serde_json::to_value(&item).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("id"));
        assert!(obj.contains_key("name"));
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut room = Room::new();
        room.description = "bright".into();

        RoomPatch {
            priority: Some(Priority::High),
            ..Default::default()
        }
        .apply(&mut room);

        assert_eq!(room.priority, Priority::High);
        assert_eq!(room.description, "bright");
        assert_eq!(room.room_type, RoomType::LivingRoom);
    }

    #[test]
    fn blank_room_has_no_content() {
        let mut room = Room::new();
        assert!(!room.has_content());
        room.description = "   ".into();
        assert!(!room.has_content());
        room.images.push("data:image/jpeg;base64,AA==".into());
        assert!(room.has_content());
    }
}
