use crate::entity::{IdentityKey, Offset, Placement};
use serde::Serialize;

/// Instruction for the visual entity store, produced by one reconciliation pass
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VisualAction {
    /// Materialize a root visual for a newly seen entity
    CreateRoot {
        key: IdentityKey,
        sprite_path: String,
        placement: Placement,
        scale: f32,
    },

    /// Refresh an existing root's placement (emitted every tick)
    MoveRoot {
        key: IdentityKey,
        placement: Placement,
    },

    /// Attach a product visual to a root's slot
    AttachChild {
        key: IdentityKey,
        child: String,
        sprite_path: String,
        local_offset: Offset,
        scale: f32,
        render_above_parent: bool,
    },

    /// Refresh an attached child's offset; the sprite is left as is
    RepositionChild {
        key: IdentityKey,
        child: String,
        local_offset: Offset,
    },

    RemoveChild {
        key: IdentityKey,
        child: String,
    },

    /// Non-fatal problem, e.g. an asset that could not be resolved
    Warn { message: String },
}

impl VisualAction {
    pub fn is_warning(&self) -> bool {
        matches!(self, VisualAction::Warn { .. })
    }
}
