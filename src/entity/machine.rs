use super::{
    Family, IdentityKey, Placement, Position, ProductSlot, SnapshotEntity, MACHINE_SLOTS,
};
use crate::decode::{
    field_bool, field_f32, field_i64, field_nested, field_string, lenient_bool, lenient_i64, Record,
};
use crate::product::Product;
use serde::Deserialize;

/// Machine zone codes at or above this value lie in the mirrored half
const MIRRORED_ZONE_THRESHOLD: i64 = 1000;

/// Depth layer for machine sprites
const MACHINE_DEPTH: f32 = -1.0;

/// Signal light state on a machine
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LightData {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub light_color: i64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub light_on: bool,
}

/// Machine record from the `/machines` endpoint
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MachineSnapshot {
    pub name: String,
    pub has_tag: bool,
    /// Encoded grid zone, see [`machine_grid_cell`]
    pub zone: i64,
    /// Facing in degrees
    pub rotation: f32,
    pub red_light: Option<LightData>,
    pub green_light: Option<LightData>,
    pub yellow_light: Option<LightData>,
    pub task_description: Option<String>,
    pub product_on_belt: Option<Product>,
    pub product_at_in: Option<Product>,
    pub product_at_out: Option<Product>,
}

/// Grid cell derived from a machine zone code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub x: i64,
    pub y: i64,
    pub mirrored: bool,
}

impl GridCell {
    /// Centre of the cell in world units
    pub fn center(&self) -> (f32, f32) {
        let x = if self.mirrored {
            self.x as f32 + 0.5
        } else {
            self.x as f32 - 0.5
        };
        (x, self.y as f32 - 0.5)
    }
}

/// Project a zone code onto the layout grid.
///
/// The last digit is the row, the digit before it the column. Codes of
/// 1000 and above belong to the mirrored half, where the column is negated.
///
/// ```
/// use floorwatch::entity::machine_grid_cell;
///
/// let cell = machine_grid_cell(1023);
/// assert_eq!((cell.x, cell.y, cell.mirrored), (-2, 3, true));
/// ```
pub fn machine_grid_cell(zone: i64) -> GridCell {
    let y = zone % 10;
    let column = (zone / 10) % 10;
    let mirrored = zone >= MIRRORED_ZONE_THRESHOLD;

    GridCell {
        x: if mirrored { -column } else { column },
        y,
        mirrored,
    }
}

impl SnapshotEntity for MachineSnapshot {
    const FAMILY: Family = Family::Machine;

    fn from_record(record: &Record) -> Self {
        Self {
            name: field_string(record, "Name").unwrap_or_default(),
            has_tag: field_bool(record, "HasTag").unwrap_or_default(),
            zone: field_i64(record, "Zone").unwrap_or_default(),
            rotation: field_f32(record, "Rotation").unwrap_or_default(),
            red_light: field_nested(record, "RedLight"),
            green_light: field_nested(record, "GreenLight"),
            yellow_light: field_nested(record, "YellowLight"),
            task_description: field_string(record, "TaskDescription"),
            product_on_belt: field_nested(record, "ProductOnBelt"),
            product_at_in: field_nested(record, "ProductAtIn"),
            product_at_out: field_nested(record, "ProductAtOut"),
        }
    }

    fn identity_key(&self) -> IdentityKey {
        IdentityKey::Machine(self.name.clone())
    }

    fn placement(&self) -> Placement {
        let (x, y) = machine_grid_cell(self.zone).center();
        Placement {
            position: Position::new(x, y, MACHINE_DEPTH),
            rotation: Some(self.rotation - 90.0),
        }
    }

    fn sprite_name(&self) -> String {
        self.name.clone()
    }

    fn slots(&self) -> Vec<(ProductSlot, Option<&Product>)> {
        MACHINE_SLOTS
            .iter()
            .map(|&slot| {
                let product = match slot {
                    ProductSlot::OnBelt => self.product_on_belt.as_ref(),
                    ProductSlot::AtIn => self.product_at_in.as_ref(),
                    ProductSlot::AtOut => self.product_at_out.as_ref(),
                    ProductSlot::Held => None,
                };
                (slot, product)
            })
            .collect()
    }
}
