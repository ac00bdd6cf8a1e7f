use super::{Family, IdentityKey, Placement, Position, SnapshotEntity};
use crate::decode::{field_f32, field_i64, Record};

/// Zone ids strictly above this value are machine-side zones
const MACHINE_ZONE_THRESHOLD: i64 = 1000;

/// Zone record from the `/zones` endpoint
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneSnapshot {
    pub zone_id: i64,
    pub x: f32,
    pub y: f32,
}

/// Asset name for a zone: `M_Z` or `C_Z` followed by the last two digits.
///
/// ```
/// use floorwatch::entity::zone_id_to_name;
///
/// assert_eq!(zone_id_to_name(23), "C_Z23");
/// assert_eq!(zone_id_to_name(1007), "M_Z07");
/// ```
pub fn zone_id_to_name(zone_id: i64) -> String {
    let prefix = if zone_id > MACHINE_ZONE_THRESHOLD {
        "M_"
    } else {
        "C_"
    };
    format!("{}Z{:02}", prefix, zone_id.rem_euclid(100))
}

impl SnapshotEntity for ZoneSnapshot {
    const FAMILY: Family = Family::Zone;

    fn from_record(record: &Record) -> Self {
        Self {
            zone_id: field_i64(record, "ZoneId").unwrap_or_default(),
            x: field_f32(record, "X").unwrap_or_default(),
            y: field_f32(record, "Y").unwrap_or_default(),
        }
    }

    fn identity_key(&self) -> IdentityKey {
        IdentityKey::Zone(self.zone_id)
    }

    fn placement(&self) -> Placement {
        Placement {
            position: Position::new(self.x, self.y, 0.0),
            rotation: None,
        }
    }

    fn sprite_name(&self) -> String {
        zone_id_to_name(self.zone_id)
    }

    fn root_scale(&self) -> f32 {
        1.0
    }
}
