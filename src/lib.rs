// Configuration loading and environment overrides
pub mod config;

// Product model and sprite key composition
pub mod product;

// Tolerant JSON snapshot decoding
pub mod decode;

// Snapshot records, identity keys and placement projections
pub mod entity;

// Sprite asset lookup
pub mod assets;

// Snapshot-to-visual reconciliation
pub mod reconcile;

// Visual entity store and view framing
pub mod scene;

// Per-family HTTP polling
pub mod poller;

pub use entity::{Family, IdentityKey, SnapshotEntity};
pub use product::{compose_key, Product};
pub use reconcile::{KnownVisuals, Reconciler, VisualAction};
pub use scene::{SceneGraph, VisualStore};
