//! Snapshot records for the three polled entity families, plus the
//! identity, placement and slot vocabulary the reconciler works in.

use crate::decode::Record;
use crate::product::Product;
use serde::Serialize;
use std::fmt;

mod machine;
mod robot;
mod zone;

pub use machine::{machine_grid_cell, GridCell, LightData, MachineSnapshot};
pub use robot::{robot_team_color, FinishedTask, RobotPosition, RobotSnapshot, RobotZone};
pub use zone::{zone_id_to_name, ZoneSnapshot};


/// Entity family, one per polled endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Machine,
    Robot,
    Zone,
}

impl Family {
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Machine => "machine",
            Family::Robot => "robot",
            Family::Zone => "zone",
        }
    }

    /// Path segment under the backend URL and default sprite folder
    pub fn collection(&self) -> &'static str {
        match self {
            Family::Machine => "machines",
            Family::Robot => "robots",
            Family::Zone => "zones",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable key correlating a snapshot entity with its visual across ticks.
///
/// The family is part of the key, so machines, robots and zones can share
/// one store without colliding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "family", content = "id", rename_all = "lowercase")]
pub enum IdentityKey {
    Machine(String),
    Robot(String),
    Zone(i64),
}

impl IdentityKey {
    pub fn family(&self) -> Family {
        match self {
            IdentityKey::Machine(_) => Family::Machine,
            IdentityKey::Robot(_) => Family::Robot,
            IdentityKey::Zone(_) => Family::Zone,
        }
    }

    /// Identifier without the family prefix
    pub fn id(&self) -> String {
        match self {
            IdentityKey::Machine(name) | IdentityKey::Robot(name) => name.clone(),
            IdentityKey::Zone(id) => id.to_string(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Machine(name) => write!(f, "machine:{}", name),
            IdentityKey::Robot(name) => write!(f, "robot:{}", name),
            IdentityKey::Zone(id) => write!(f, "zone:{}", id),
        }
    }
}

/// World position; `z` orders the layers (zones behind machines behind robots)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Target placement of a root visual
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Placement {
    pub position: Position,

    /// Rotation about the view axis in degrees; `None` for unrotated families
    pub rotation: Option<f32>,
}

/// Offset of a child visual relative to its parent root
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Named attachment point that holds zero or one product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSlot {
    OnBelt,
    AtIn,
    AtOut,
    Held,
}

/// Slots of a machine, in processing order
pub const MACHINE_SLOTS: [ProductSlot; 3] =
    [ProductSlot::OnBelt, ProductSlot::AtIn, ProductSlot::AtOut];

/// Slots of a robot, in processing order
pub const ROBOT_SLOTS: [ProductSlot; 1] = [ProductSlot::Held];

impl ProductSlot {
    pub fn name(&self) -> &'static str {
        match self {
            ProductSlot::OnBelt => "on-belt",
            ProductSlot::AtIn => "at-in",
            ProductSlot::AtOut => "at-out",
            ProductSlot::Held => "held",
        }
    }

    /// Fixed position of the slot's product relative to the owning root
    pub fn local_offset(&self) -> Offset {
        match self {
            ProductSlot::OnBelt => Offset::new(0.5, 0.0),
            ProductSlot::AtIn => Offset::new(0.0, 0.3),
            ProductSlot::AtOut => Offset::new(0.0, -0.3),
            ProductSlot::Held => Offset::new(-0.3, 0.0),
        }
    }
}

impl fmt::Display for ProductSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Child key for a slot. Child keys are scoped to their parent root, so
/// the slot name alone is unique.
pub fn slot_child_name(slot: ProductSlot) -> String {
    slot.name().to_string()
}

/// One decoded element of a family's snapshot.
///
/// Implementors decide how a record is keyed, where it sits, which sprite
/// represents it and which product slots it carries.
pub trait SnapshotEntity: Sized {
    const FAMILY: Family;

    /// Build from a loosely-typed JSON object. Never fails: absent or
    /// malformed fields take their defaults.
    fn from_record(record: &Record) -> Self;

    fn identity_key(&self) -> IdentityKey;

    fn placement(&self) -> Placement;

    /// Sprite name within the family's sprite folder
    fn sprite_name(&self) -> String;

    fn root_scale(&self) -> f32 {
        0.8
    }

    /// Product slots in processing order, with their current contents
    fn slots(&self) -> Vec<(ProductSlot, Option<&Product>)> {
        Vec::new()
    }
}
