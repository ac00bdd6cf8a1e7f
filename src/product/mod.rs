use crate::decode::{coerce_i64, lenient_default, lenient_i64, lenient_list, lenient_option};
use serde::{Deserialize, Deserializer};
use serde_json::Value;


/// Token used when a base or ring color is not part of the known palette
pub const UNKNOWN_COLOR: &str = "UNKNOWN";

/// Resolve a wire color to its numeric code.
///
/// The backend sends either the enum code or its name ("BASE_RED" or
/// "RED"). Unrecognized names, `null` and other shapes resolve to 0, which
/// no palette uses.
fn color_code(value: &Value, prefix: &str, names: &[&str]) -> i64 {
    if let Value::String(name) = value {
        let upper = name.trim().to_uppercase();
        let bare = upper.strip_prefix(prefix).unwrap_or(upper.as_str());
        if let Some(index) = names.iter().position(|candidate| *candidate == bare) {
            return index as i64 + 1;
        }
    }
    coerce_i64(value).unwrap_or(0)
}

/// Base color of a product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseColor {
    Red,
    Black,
    Silver,
    Clear,
    Unknown(i64),
}

const BASE_NAMES: [&str; 4] = ["RED", "BLACK", "SILVER", "CLEAR"];

impl BaseColor {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => BaseColor::Red,
            2 => BaseColor::Black,
            3 => BaseColor::Silver,
            4 => BaseColor::Clear,
            other => BaseColor::Unknown(other),
        }
    }

    /// Palette name, or `None` for codes outside the palette
    pub fn name(&self) -> Option<&'static str> {
        match self {
            BaseColor::Red => Some("RED"),
            BaseColor::Black => Some("BLACK"),
            BaseColor::Silver => Some("SILVER"),
            BaseColor::Clear => Some("CLEAR"),
            BaseColor::Unknown(_) => None,
        }
    }
}

impl Default for BaseColor {
    fn default() -> Self {
        BaseColor::Unknown(0)
    }
}

impl<'de> Deserialize<'de> for BaseColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer)
            .map(|value| Self::from_code(color_code(&value, "BASE_", &BASE_NAMES)))
    }
}

/// Ring color of a product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingColor {
    Blue,
    Green,
    Orange,
    Yellow,
    Unknown(i64),
}

const RING_NAMES: [&str; 4] = ["BLUE", "GREEN", "ORANGE", "YELLOW"];

impl RingColor {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => RingColor::Blue,
            2 => RingColor::Green,
            3 => RingColor::Orange,
            4 => RingColor::Yellow,
            other => RingColor::Unknown(other),
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            RingColor::Blue => Some("BLUE"),
            RingColor::Green => Some("GREEN"),
            RingColor::Orange => Some("ORANGE"),
            RingColor::Yellow => Some("YELLOW"),
            RingColor::Unknown(_) => None,
        }
    }
}

impl Default for RingColor {
    fn default() -> Self {
        RingColor::Unknown(0)
    }
}

impl<'de> Deserialize<'de> for RingColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer)
            .map(|value| Self::from_code(color_code(&value, "RING_", &RING_NAMES)))
    }
}

/// Cap color of a product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CapColor {
    Black,
    Grey,
    Unknown(i64),
}

const CAP_NAMES: [&str; 2] = ["BLACK", "GREY"];

impl CapColor {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => CapColor::Black,
            2 => CapColor::Grey,
            other => CapColor::Unknown(other),
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            CapColor::Black => Some("BLACK"),
            CapColor::Grey => Some("GREY"),
            CapColor::Unknown(_) => None,
        }
    }
}

impl Default for CapColor {
    fn default() -> Self {
        CapColor::Unknown(0)
    }
}

impl<'de> Deserialize<'de> for CapColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer)
            .map(|value| Self::from_code(color_code(&value, "CAP_", &CAP_NAMES)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Base {
    #[serde(rename = "BaseColor", default)]
    pub color: BaseColor,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Ring {
    #[serde(rename = "RingColor", default)]
    pub color: RingColor,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Cap {
    #[serde(rename = "CapColor", default)]
    pub color: CapColor,
}

/// Workpiece carried by a machine slot or a robot.
///
/// `id` and `ring_count` are informational; what the product looks like is
/// decided entirely by [`Product::visual_identity`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Product {
    #[serde(rename = "ID", default, deserialize_with = "lenient_i64")]
    pub id: i64,

    #[serde(rename = "RingCount", default, deserialize_with = "lenient_i64")]
    pub ring_count: i64,

    #[serde(rename = "Base", default, deserialize_with = "lenient_default")]
    pub base: Base,

    #[serde(rename = "Cap", default, deserialize_with = "lenient_option")]
    pub cap: Option<Cap>,

    #[serde(rename = "RingList", default, deserialize_with = "lenient_list")]
    pub rings: Vec<Ring>,
}

/// Attribute tuple that fully determines a product's sprite
pub type VisualIdentity = (BaseColor, Vec<RingColor>, Option<CapColor>);

impl Product {
    pub fn visual_identity(&self) -> VisualIdentity {
        (
            self.base.color,
            self.rings.iter().map(|ring| ring.color).collect(),
            self.cap.as_ref().map(|cap| cap.color),
        )
    }

    pub fn sprite_key(&self) -> String {
        compose_key(self)
    }
}

/// Compose the sprite key for a product.
///
/// Format: `BASE_<base>[-RING_<ring>]*[-CAP_<cap>]`, rings in stored order.
/// Unknown base/ring colors become `UNKNOWN`; an unknown cap color drops
/// the cap suffix entirely.
///
/// # Examples
///
/// ```
/// use floorwatch::product::{compose_key, Base, BaseColor, Product, Ring, RingColor};
///
/// let product = Product {
///     base: Base { color: BaseColor::Red },
///     rings: vec![Ring { color: RingColor::Blue }],
///     ..Default::default()
/// };
/// assert_eq!(compose_key(&product), "BASE_RED-RING_BLUE");
/// ```
pub fn compose_key(product: &Product) -> String {
    let mut key = format!(
        "BASE_{}",
        product.base.color.name().unwrap_or(UNKNOWN_COLOR)
    );

    for ring in &product.rings {
        key.push_str("-RING_");
        key.push_str(ring.color.name().unwrap_or(UNKNOWN_COLOR));
    }

    if let Some(cap) = product.cap.as_ref().and_then(|cap| cap.color.name()) {
        key.push_str("-CAP_");
        key.push_str(cap);
    }

    key
}
