use super::{Family, IdentityKey, Placement, Position, ProductSlot, SnapshotEntity};
use crate::decode::{
    field_i64, field_list, field_nested, field_string, lenient_bool, lenient_f32, lenient_i64, Record,
};
use crate::product::Product;
use serde::Deserialize;

/// Depth layer for robot sprites (in front of machines)
const ROBOT_DEPTH: f32 = -2.0;

/// Robot telemetry pose
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RobotPosition {
    #[serde(default, deserialize_with = "lenient_f32")]
    pub x: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub y: f32,
    /// Heading in degrees, counter-clockwise in backend coordinates
    #[serde(default, deserialize_with = "lenient_f32")]
    pub orientation: f32,
}

/// Zone reference attached to a robot (current or home zone)
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RobotZone {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub zone_id: i64,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub x: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub y: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinishedTask {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub task_id: i64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub successful: bool,
}

/// Robot record from the `/robots` endpoint
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RobotSnapshot {
    pub robot_name: String,
    pub team_name: Option<String>,
    pub jersey_number: i64,
    pub team_color: i64,
    pub position: RobotPosition,
    pub current_zone: Option<RobotZone>,
    pub home_zone: Option<RobotZone>,
    pub held_product: Option<Product>,
    pub future_product: Option<Product>,
    pub input_output_lock: Option<String>,
    pub finished_tasks: Vec<FinishedTask>,
}

/// Sprite color name for a team color code: 0 is cyan, anything else magenta
pub fn robot_team_color(team_color: i64) -> &'static str {
    if team_color == 0 {
        "CYAN"
    } else {
        "MAGENTA"
    }
}

impl SnapshotEntity for RobotSnapshot {
    const FAMILY: Family = Family::Robot;

    fn from_record(record: &Record) -> Self {
        Self {
            robot_name: field_string(record, "RobotName").unwrap_or_default(),
            team_name: field_string(record, "TeamName"),
            jersey_number: field_i64(record, "JerseyNumber").unwrap_or_default(),
            team_color: field_i64(record, "TeamColor").unwrap_or_default(),
            position: field_nested(record, "Position").unwrap_or_default(),
            current_zone: field_nested(record, "CurrentZone"),
            home_zone: field_nested(record, "HomeZone"),
            held_product: field_nested(record, "HeldProduct"),
            future_product: field_nested(record, "FutureProduct"),
            input_output_lock: field_string(record, "inputOutputLock"),
            finished_tasks: field_list(record, "FinishedTasks"),
        }
    }

    fn identity_key(&self) -> IdentityKey {
        IdentityKey::Robot(self.robot_name.clone())
    }

    fn placement(&self) -> Placement {
        // Backend headings run the other way round, and sprites face up
        Placement {
            position: Position::new(self.position.x, self.position.y, ROBOT_DEPTH),
            rotation: Some(360.0 - self.position.orientation - 90.0),
        }
    }

    fn sprite_name(&self) -> String {
        format!(
            "robot-{}{}",
            robot_team_color(self.team_color),
            self.jersey_number
        )
    }

    fn slots(&self) -> Vec<(ProductSlot, Option<&Product>)> {
        vec![(ProductSlot::Held, self.held_product.as_ref())]
    }
}
