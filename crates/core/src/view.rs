//! Read-only view models for project listings and briefings.
//!
//! [`BriefingView::build`] turns a project into display data once (rooms
//! sorted and grouped by floor, priority tallies, per-room content flags);
//! a [`LayoutRenderer`] then arranges that data as a grid, a single column or
//! a dashboard with a detail panel.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::project::{Project, ProjectStatus};
use crate::room::{Floor, LineItem, Priority, Room, RoomType};
use crate::types::{EntityId, ProjectId};

/// Shown on a project card when no location was entered.
pub const UNSPECIFIED_LOCATION: &str = "Location not specified";

/// Default number of columns for the grid layout.
pub const DEFAULT_GRID_COLUMNS: usize = 2;

// ---------------------------------------------------------------------------
// Project cards
// ---------------------------------------------------------------------------

/// Summary card in the project list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    pub id: ProjectId,
    pub title: String,
    pub status: ProjectStatus,
    pub status_label: &'static str,
    pub location: String,
    pub size: f64,
    pub created_on: NaiveDate,
    pub room_count: usize,
}

impl ProjectCard {
    pub fn from_project(project: &Project) -> Self {
        let location = if project.location.trim().is_empty() {
            UNSPECIFIED_LOCATION.to_string()
        } else {
            project.location.clone()
        };
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            status: project.status,
            status_label: project.status.label(),
            location,
            size: project.size,
            created_on: project.created_at.date_naive(),
            room_count: project.rooms.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Briefing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemCard {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub optional: bool,
}

impl From<&LineItem> for ItemCard {
    fn from(item: &LineItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            image: item.image.clone(),
            url: item.url.clone(),
            optional: item.optional,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomCard {
    pub room_id: EntityId,
    pub room_type: RoomType,
    pub type_label: &'static str,
    pub floor: &'static str,
    pub priority: Priority,
    pub has_content: bool,
    pub description: String,
    pub requirements: Vec<String>,
    pub furniture: Vec<ItemCard>,
    pub decorations: Vec<ItemCard>,
    pub images: Vec<String>,
}

impl From<&Room> for RoomCard {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id,
            room_type: room.room_type,
            type_label: room.room_type.label(),
            floor: room.floor.code(),
            priority: room.priority,
            has_content: room.has_content(),
            description: room.description.clone(),
            requirements: room.requirements.iter().map(|r| r.text.clone()).collect(),
            furniture: room.furniture.iter().map(ItemCard::from).collect(),
            decorations: room.decorations.iter().map(ItemCard::from).collect(),
            images: room.images.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorGroup {
    pub floor: &'static str,
    pub basement: bool,
    pub rooms: Vec<RoomCard>,
}

/// Display data for one project's rooms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BriefingView {
    pub project_id: ProjectId,
    pub title: String,
    pub room_count: usize,
    pub priorities: PriorityCounts,
    /// Floors in building order (basements first); rooms keep their entry
    /// order within a floor.
    pub floors: Vec<FloorGroup>,
}

impl BriefingView {
    pub fn build(project: &Project) -> Self {
        let mut rooms: Vec<&Room> = project.rooms.iter().collect();
        rooms.sort_by_key(|r| r.floor);

        let floors: Vec<FloorGroup> = rooms
            .chunk_by(|a, b| a.floor == b.floor)
            .map(|group| floor_group(group[0].floor, group))
            .collect();

        let mut priorities = PriorityCounts::default();
        for room in project.rooms.iter() {
            match room.priority {
                Priority::High => priorities.high += 1,
                Priority::Medium => priorities.medium += 1,
                Priority::Low => priorities.low += 1,
            }
        }

        Self {
            project_id: project.id.clone(),
            title: project.title.clone(),
            room_count: project.rooms.len(),
            priorities,
            floors,
        }
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &RoomCard> {
        self.floors.iter().flat_map(|f| f.rooms.iter())
    }
}

fn floor_group(floor: Floor, rooms: &[&Room]) -> FloorGroup {
    FloorGroup {
        floor: floor.code(),
        basement: floor.is_basement(),
        rooms: rooms.iter().map(|r| RoomCard::from(*r)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

/// One entry of the dashboard's room index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSummary {
    pub room_id: EntityId,
    pub type_label: &'static str,
    pub floor: &'static str,
    pub priority: Priority,
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSection {
    pub floor: &'static str,
    pub rows: Vec<Vec<RoomCard>>,
}

/// A briefing arranged for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum LayoutPlan {
    Grid {
        columns: usize,
        sections: Vec<GridSection>,
    },
    Column {
        sections: Vec<FloorGroup>,
    },
    Dashboard {
        index: Vec<RoomSummary>,
        detail: Option<RoomCard>,
    },
}

pub trait LayoutRenderer {
    fn arrange(&self, view: &BriefingView) -> LayoutPlan;
}

pub struct GridLayout {
    pub columns: usize,
}

impl LayoutRenderer for GridLayout {
    fn arrange(&self, view: &BriefingView) -> LayoutPlan {
        let columns = self.columns.max(1);
        LayoutPlan::Grid {
            columns,
            sections: view
                .floors
                .iter()
                .map(|group| GridSection {
                    floor: group.floor,
                    rows: group.rooms.chunks(columns).map(<[RoomCard]>::to_vec).collect(),
                })
                .collect(),
        }
    }
}

pub struct ColumnLayout;

impl LayoutRenderer for ColumnLayout {
    fn arrange(&self, view: &BriefingView) -> LayoutPlan {
        LayoutPlan::Column {
            sections: view.floors.clone(),
        }
    }
}

/// Room index plus one room in the detail panel: the selected room if given
/// and present, else the first room with content, else the first room.
pub struct DashboardLayout {
    pub selected: Option<EntityId>,
}

impl LayoutRenderer for DashboardLayout {
    fn arrange(&self, view: &BriefingView) -> LayoutPlan {
        let index = view
            .rooms()
            .map(|card| RoomSummary {
                room_id: card.room_id,
                type_label: card.type_label,
                floor: card.floor,
                priority: card.priority,
                item_count: card.furniture.len() + card.decorations.len(),
            })
            .collect();

        let detail = self
            .selected
            .and_then(|id| view.rooms().find(|c| c.room_id == id))
            .or_else(|| view.rooms().find(|c| c.has_content))
            .or_else(|| view.rooms().next())
            .cloned();

        LayoutPlan::Dashboard { index, detail }
    }
}

/// Layout choice as named in requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Grid,
    Column,
    Dashboard,
}

impl Layout {
    pub fn renderer(self, selected: Option<EntityId>) -> Box<dyn LayoutRenderer + Send> {
        match self {
            Self::Grid => Box::new(GridLayout {
                columns: DEFAULT_GRID_COLUMNS,
            }),
            Self::Column => Box::new(ColumnLayout),
            Self::Dashboard => Box::new(DashboardLayout { selected }),
        }
    }
}

impl FromStr for Layout {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(Self::Grid),
            "column" => Ok(Self::Column),
            "dashboard" => Ok(Self::Dashboard),
            other => Err(CoreError::Validation(format!(
                "Invalid layout '{other}'. Must be one of: grid, column, dashboard"
            ))),
        }
    }
}
