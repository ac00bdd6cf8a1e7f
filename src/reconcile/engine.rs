use crate::assets::{asset_path, AssetResolver};
use crate::entity::{slot_child_name, Family, IdentityKey, ProductSlot, SnapshotEntity};
use crate::product::{compose_key, Product};
use crate::reconcile::action::VisualAction;
use crate::reconcile::known::KnownVisuals;
use tracing::{debug, warn};

/// Scale of product sprites relative to their parent
pub const CHILD_SCALE: f32 = 0.6;

/// Diffs decoded snapshots against the visuals already materialized.
///
/// Stateless apart from its folders; the memory of what exists lives in the
/// `KnownVisuals` passed to each call.
#[derive(Clone, Debug)]
pub struct Reconciler {
    family_folder: String,
    product_folder: String,
}

impl Reconciler {
    pub fn new(family_folder: impl Into<String>, product_folder: impl Into<String>) -> Self {
        Self {
            family_folder: family_folder.into(),
            product_folder: product_folder.into(),
        }
    }

    /// Default folders for a family (`machines`, `robots`, `zones`, with
    /// products under `workpieces`)
    pub fn for_family(family: Family) -> Self {
        Self::new(family.collection(), "workpieces")
    }

    /// Run one reconciliation pass.
    ///
    /// Entities are handled in snapshot order and slots in declared order.
    /// `known` is updated to reflect exactly the roots and children the
    /// returned actions create or remove. Entities missing from `snapshot`
    /// are left alone.
    pub fn reconcile<E: SnapshotEntity>(
        &self,
        snapshot: &[E],
        known: &mut KnownVisuals,
        assets: &dyn AssetResolver,
    ) -> Vec<VisualAction> {
        let mut actions = Vec::new();

        for entity in snapshot {
            let key = entity.identity_key();
            let placement = entity.placement();

            if known.contains(&key) {
                actions.push(VisualAction::MoveRoot {
                    key: key.clone(),
                    placement,
                });
            } else {
                let sprite_path = asset_path(&self.family_folder, &entity.sprite_name());
                if assets.resolve(&sprite_path).is_none() {
                    actions.push(missing_sprite(E::FAMILY.as_str(), &key, &sprite_path));
                    continue;
                }

                debug!(key = %key, sprite = %sprite_path, "Creating root visual");
                actions.push(VisualAction::CreateRoot {
                    key: key.clone(),
                    sprite_path,
                    placement,
                    scale: entity.root_scale(),
                });
                known.insert_root(key.clone());
            }

            for (slot, product) in entity.slots() {
                self.reconcile_slot(&key, slot, product, known, assets, &mut actions);
            }
        }

        actions
    }

    fn reconcile_slot(
        &self,
        key: &IdentityKey,
        slot: ProductSlot,
        product: Option<&Product>,
        known: &mut KnownVisuals,
        assets: &dyn AssetResolver,
        actions: &mut Vec<VisualAction>,
    ) {
        let child = slot_child_name(slot);
        let attached = known
            .get(key)
            .map(|visual| visual.has_child(&child))
            .unwrap_or(false);

        match (product, attached) {
            (Some(product), false) => {
                let sprite_path = asset_path(&self.product_folder, &compose_key(product));
                if assets.resolve(&sprite_path).is_none() {
                    actions.push(missing_sprite("product", key, &sprite_path));
                    return;
                }

                debug!(key = %key, child = %child, sprite = %sprite_path, "Attaching product");
                known.record_child(key, &child, &sprite_path);
                actions.push(VisualAction::AttachChild {
                    key: key.clone(),
                    child,
                    sprite_path,
                    local_offset: slot.local_offset(),
                    scale: CHILD_SCALE,
                    render_above_parent: true,
                });
            }
            (Some(_), true) => {
                actions.push(VisualAction::RepositionChild {
                    key: key.clone(),
                    child,
                    local_offset: slot.local_offset(),
                });
            }
            (None, true) => {
                debug!(key = %key, child = %child, "Removing product");
                known.forget_child(key, &child);
                actions.push(VisualAction::RemoveChild {
                    key: key.clone(),
                    child,
                });
            }
            (None, false) => {}
        }
    }
}

fn missing_sprite(kind: &str, key: &IdentityKey, path: &str) -> VisualAction {
    let message = format!("Sprite for {} {} not found at path: {}", kind, key.id(), path);
    warn!(key = %key, path = %path, "{}", message);
    VisualAction::Warn { message }
}
