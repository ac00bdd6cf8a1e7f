//! Visual entity store.
//!
//! The reconciler never touches visuals directly; it emits
//! [`VisualAction`]s that a [`VisualStore`] carries out. [`SceneGraph`] is
//! the in-memory store used by the binary and the tests.

use crate::entity::{IdentityKey, Offset, Placement};
use crate::reconcile::VisualAction;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

mod framing;

pub use framing::{fit_view, Bounds, ViewFit, ViewFramer};


/// Capability to create and mutate visuals, keyed by entity identity
pub trait VisualStore: Send {
    fn create_root(&mut self, key: &IdentityKey, sprite_path: &str, placement: Placement, scale: f32);

    fn move_root(&mut self, key: &IdentityKey, placement: Placement);

    fn attach_child(
        &mut self,
        key: &IdentityKey,
        child: &str,
        sprite_path: &str,
        local_offset: Offset,
        scale: f32,
        render_above_parent: bool,
    );

    fn reposition_child(&mut self, key: &IdentityKey, child: &str, local_offset: Offset);

    fn remove_child(&mut self, key: &IdentityKey, child: &str);

    /// Carry out one action; warnings are ignored
    fn apply(&mut self, action: &VisualAction) {
        match action {
            VisualAction::CreateRoot {
                key,
                sprite_path,
                placement,
                scale,
            } => self.create_root(key, sprite_path, *placement, *scale),
            VisualAction::MoveRoot { key, placement } => self.move_root(key, *placement),
            VisualAction::AttachChild {
                key,
                child,
                sprite_path,
                local_offset,
                scale,
                render_above_parent,
            } => self.attach_child(
                key,
                child,
                sprite_path,
                *local_offset,
                *scale,
                *render_above_parent,
            ),
            VisualAction::RepositionChild {
                key,
                child,
                local_offset,
            } => self.reposition_child(key, child, *local_offset),
            VisualAction::RemoveChild { key, child } => self.remove_child(key, child),
            VisualAction::Warn { message } => debug!("{}", message),
        }
    }

    fn apply_all(&mut self, actions: &[VisualAction]) {
        for action in actions {
            self.apply(action);
        }
    }
}

/// Product visual attached to a root
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChildNode {
    pub sprite_path: String,
    pub local_offset: Offset,
    pub scale: f32,
    pub render_above_parent: bool,
}

/// Root visual for one entity
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneNode {
    pub sprite_path: String,
    pub placement: Placement,
    pub scale: f32,
    pub children: BTreeMap<String, ChildNode>,
}

impl SceneNode {
    /// Combined bounds of the root sprite and its children
    pub fn bounds(&self) -> Bounds {
        let position = self.placement.position;
        let mut bounds = Bounds::square(position.x, position.y, self.scale);
        for child in self.children.values() {
            bounds.encapsulate(&Bounds::square(
                position.x + child.local_offset.x,
                position.y + child.local_offset.y,
                child.scale,
            ));
        }
        bounds
    }
}

/// In-memory visual store
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<IdentityKey, SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &IdentityKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of attached product visuals across all roots
    pub fn child_count(&self) -> usize {
        self.nodes.values().map(|node| node.children.len()).sum()
    }

    /// Bounds covering every sprite, or `None` for an empty scene
    pub fn bounds(&self) -> Option<Bounds> {
        let mut nodes = self.nodes.values();
        let mut bounds = nodes.next()?.bounds();
        for node in nodes {
            bounds.encapsulate(&node.bounds());
        }
        Some(bounds)
    }

    fn node_mut(&mut self, key: &IdentityKey, operation: &str) -> Option<&mut SceneNode> {
        let node = self.nodes.get_mut(key);
        if node.is_none() {
            warn!(key = %key, operation, "No visual for key");
        }
        node
    }
}

impl VisualStore for SceneGraph {
    fn create_root(&mut self, key: &IdentityKey, sprite_path: &str, placement: Placement, scale: f32) {
        if self.nodes.contains_key(key) {
            warn!(key = %key, "Visual already exists, ignoring create");
            return;
        }

        debug!(key = %key, sprite = sprite_path, "Created visual");
        self.nodes.insert(
            key.clone(),
            SceneNode {
                sprite_path: sprite_path.to_string(),
                placement,
                scale,
                children: BTreeMap::new(),
            },
        );
    }

    fn move_root(&mut self, key: &IdentityKey, placement: Placement) {
        if let Some(node) = self.node_mut(key, "move") {
            node.placement = placement;
        }
    }

    fn attach_child(
        &mut self,
        key: &IdentityKey,
        child: &str,
        sprite_path: &str,
        local_offset: Offset,
        scale: f32,
        render_above_parent: bool,
    ) {
        if let Some(node) = self.node_mut(key, "attach") {
            node.children.insert(
                child.to_string(),
                ChildNode {
                    sprite_path: sprite_path.to_string(),
                    local_offset,
                    scale,
                    render_above_parent,
                },
            );
        }
    }

    fn reposition_child(&mut self, key: &IdentityKey, child: &str, local_offset: Offset) {
        if let Some(node) = self.node_mut(key, "reposition") {
            match node.children.get_mut(child) {
                Some(child_node) => child_node.local_offset = local_offset,
                None => warn!(key = %key, child, "No child visual to reposition"),
            }
        }
    }

    fn remove_child(&mut self, key: &IdentityKey, child: &str) {
        if let Some(node) = self.node_mut(key, "remove") {
            if node.children.remove(child).is_none() {
                warn!(key = %key, child, "No child visual to remove");
            }
        }
    }
}
