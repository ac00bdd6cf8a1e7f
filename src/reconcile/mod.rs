// Snapshot-to-visual reconciliation

mod action;
mod engine;
mod known;

pub use action::VisualAction;
pub use engine::Reconciler;
pub use known::{KnownVisual, KnownVisuals};

#[cfg(test)]
mod tests;
