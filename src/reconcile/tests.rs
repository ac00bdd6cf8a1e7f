use super::*;
use crate::assets::AssetCatalog;
use crate::entity::{
    IdentityKey, MachineSnapshot, Offset, RobotPosition, RobotSnapshot, ZoneSnapshot,
};
use crate::product::{Base, BaseColor, Product, Ring, RingColor};

fn product(base: BaseColor, rings: &[RingColor]) -> Product {
    Product {
        base: Base { color: base },
        rings: rings.iter().map(|&color| Ring { color }).collect(),
        ..Default::default()
    }
}

fn robot(name: &str, held: Option<Product>) -> RobotSnapshot {
    RobotSnapshot {
        robot_name: name.to_string(),
        jersey_number: 1,
        team_color: 0,
        position: RobotPosition {
            x: 1.0,
            y: 2.0,
            orientation: 0.0,
        },
        held_product: held,
        ..Default::default()
    }
}

fn catalog(paths: &[&str]) -> AssetCatalog {
    let mut catalog = AssetCatalog::new();
    for path in paths {
        catalog.insert(*path);
    }
    catalog
}

fn robot_key(name: &str) -> IdentityKey {
    IdentityKey::Robot(name.to_string())
}

#[test]
fn test_first_sighting_creates_root_and_attaches_held_product() {
    let reconciler = Reconciler::new("robots", "workpieces");
    let assets = catalog(&[
        "robots/robot-CYAN1",
        "workpieces/BASE_RED-RING_BLUE-RING_GREEN",
    ]);
    let mut known = KnownVisuals::new();
    let held = product(BaseColor::Red, &[RingColor::Blue, RingColor::Green]);

    let actions = reconciler.reconcile(&[robot("R1", Some(held))], &mut known, &assets);

    assert_eq!(actions.len(), 2);
    match &actions[0] {
        VisualAction::CreateRoot {
            key,
            sprite_path,
            placement,
            scale,
        } => {
            assert_eq!(key, &robot_key("R1"));
            assert_eq!(sprite_path, "robots/robot-CYAN1");
            assert_eq!(placement.position.x, 1.0);
            assert_eq!(placement.position.y, 2.0);
            assert_eq!(placement.rotation, Some(270.0));
            assert_eq!(*scale, 0.8);
        }
        other => panic!("expected CreateRoot, got {:?}", other),
    }
    assert_eq!(
        actions[1],
        VisualAction::AttachChild {
            key: robot_key("R1"),
            child: "held".to_string(),
            sprite_path: "workpieces/BASE_RED-RING_BLUE-RING_GREEN".to_string(),
            local_offset: Offset::new(-0.3, 0.0),
            scale: 0.6,
            render_above_parent: true,
        }
    );

    let visual = known.get(&robot_key("R1")).unwrap();
    assert_eq!(
        visual.attached.get("held").map(String::as_str),
        Some("workpieces/BASE_RED-RING_BLUE-RING_GREEN")
    );
}

#[test]
fn test_repeated_snapshot_only_moves_and_repositions() {
    let reconciler = Reconciler::new("robots", "workpieces");
    let assets = catalog(&["robots/robot-CYAN1", "workpieces/BASE_RED"]);
    let mut known = KnownVisuals::new();
    let snapshot = vec![robot("R1", Some(product(BaseColor::Red, &[])))];

    reconciler.reconcile(&snapshot, &mut known, &assets);
    let second = reconciler.reconcile(&snapshot, &mut known, &assets);
    let third = reconciler.reconcile(&snapshot, &mut known, &assets);

    assert_eq!(second, third);
    assert_eq!(second.len(), 2);
    assert!(matches!(second[0], VisualAction::MoveRoot { .. }));
    assert!(matches!(second[1], VisualAction::RepositionChild { .. }));
    assert!(second.iter().all(|action| !matches!(
        action,
        VisualAction::CreateRoot { .. } | VisualAction::AttachChild { .. }
    )));
}

#[test]
fn test_dropped_product_removes_child_exactly_once() {
    let reconciler = Reconciler::new("robots", "workpieces");
    let assets = catalog(&["robots/robot-CYAN1", "workpieces/BASE_RED"]);
    let mut known = KnownVisuals::new();

    reconciler.reconcile(
        &[robot("R1", Some(product(BaseColor::Red, &[])))],
        &mut known,
        &assets,
    );

    let empty_handed = vec![robot("R1", None)];
    let actions = reconciler.reconcile(&empty_handed, &mut known, &assets);
    let removals: Vec<_> = actions
        .iter()
        .filter(|action| matches!(action, VisualAction::RemoveChild { .. }))
        .collect();
    assert_eq!(removals.len(), 1);
    assert_eq!(
        removals[0],
        &VisualAction::RemoveChild {
            key: robot_key("R1"),
            child: "held".to_string(),
        }
    );
    assert!(!known.get(&robot_key("R1")).unwrap().has_child("held"));

    let actions = reconciler.reconcile(&empty_handed, &mut known, &assets);
    assert_eq!(actions.len(), 1);
    assert!(matches!(actions[0], VisualAction::MoveRoot { .. }));
}

#[test]
fn test_missing_root_sprite_warns_and_skips_slots() {
    let reconciler = Reconciler::new("robots", "workpieces");
    let assets = catalog(&["workpieces/BASE_RED"]);
    let mut known = KnownVisuals::new();

    let actions = reconciler.reconcile(
        &[robot("R1", Some(product(BaseColor::Red, &[])))],
        &mut known,
        &assets,
    );

    assert_eq!(
        actions,
        vec![VisualAction::Warn {
            message: "Sprite for robot R1 not found at path: robots/robot-CYAN1".to_string(),
        }]
    );
    assert!(known.is_empty());
}

#[test]
fn test_missing_root_sprite_does_not_stop_other_entities() {
    let reconciler = Reconciler::new("robots", "workpieces");
    let assets = catalog(&["robots/robot-MAGENTA2"]);
    let mut known = KnownVisuals::new();

    let mut second = robot("R2", None);
    second.team_color = 1;
    second.jersey_number = 2;

    let actions = reconciler.reconcile(&[robot("R1", None), second], &mut known, &assets);

    assert_eq!(actions.len(), 2);
    assert!(actions[0].is_warning());
    assert!(matches!(&actions[1], VisualAction::CreateRoot { key, .. } if key == &robot_key("R2")));
    assert!(!known.contains(&robot_key("R1")));
    assert!(known.contains(&robot_key("R2")));
}

#[test]
fn test_missing_product_sprite_is_retried_next_tick() {
    let reconciler = Reconciler::new("robots", "workpieces");
    let mut assets = catalog(&["robots/robot-CYAN1"]);
    let mut known = KnownVisuals::new();
    let snapshot = vec![robot("R1", Some(product(BaseColor::Black, &[RingColor::Yellow])))];

    let actions = reconciler.reconcile(&snapshot, &mut known, &assets);
    assert_eq!(actions.len(), 2);
    assert!(matches!(actions[0], VisualAction::CreateRoot { .. }));
    assert_eq!(
        actions[1],
        VisualAction::Warn {
            message: "Sprite for product R1 not found at path: workpieces/BASE_BLACK-RING_YELLOW"
                .to_string(),
        }
    );
    assert!(!known.get(&robot_key("R1")).unwrap().has_child("held"));

    assets.insert("workpieces/BASE_BLACK-RING_YELLOW");
    let actions = reconciler.reconcile(&snapshot, &mut known, &assets);
    assert_eq!(actions.len(), 2);
    assert!(matches!(actions[0], VisualAction::MoveRoot { .. }));
    assert!(matches!(&actions[1], VisualAction::AttachChild { child, .. } if child == "held"));
}

#[test]
fn test_changed_product_keeps_attached_sprite() {
    let reconciler = Reconciler::new("robots", "workpieces");
    let assets = catalog(&[
        "robots/robot-CYAN1",
        "workpieces/BASE_RED",
        "workpieces/BASE_SILVER",
    ]);
    let mut known = KnownVisuals::new();

    reconciler.reconcile(
        &[robot("R1", Some(product(BaseColor::Red, &[])))],
        &mut known,
        &assets,
    );
    let actions = reconciler.reconcile(
        &[robot("R1", Some(product(BaseColor::Silver, &[])))],
        &mut known,
        &assets,
    );

    assert!(matches!(actions[1], VisualAction::RepositionChild { .. }));
    let visual = known.get(&robot_key("R1")).unwrap();
    assert_eq!(
        visual.attached.get("held").map(String::as_str),
        Some("workpieces/BASE_RED")
    );
}

#[test]
fn test_machine_slots_processed_in_declared_order() {
    let reconciler = Reconciler::new("machines", "workpieces");
    let assets = catalog(&[
        "machines/C-CS1",
        "workpieces/BASE_RED",
        "workpieces/BASE_BLACK",
        "workpieces/BASE_CLEAR",
    ]);
    let mut known = KnownVisuals::new();
    let machine = MachineSnapshot {
        name: "C-CS1".to_string(),
        zone: 23,
        product_at_out: Some(product(BaseColor::Clear, &[])),
        product_on_belt: Some(product(BaseColor::Red, &[])),
        product_at_in: Some(product(BaseColor::Black, &[])),
        ..Default::default()
    };

    let actions = reconciler.reconcile(&[machine], &mut known, &assets);

    let attached: Vec<(String, String, Offset)> = actions
        .iter()
        .filter_map(|action| match action {
            VisualAction::AttachChild {
                child,
                sprite_path,
                local_offset,
                ..
            } => Some((child.clone(), sprite_path.clone(), *local_offset)),
            _ => None,
        })
        .collect();
    assert_eq!(
        attached,
        vec![
            (
                "on-belt".to_string(),
                "workpieces/BASE_RED".to_string(),
                Offset::new(0.5, 0.0)
            ),
            (
                "at-in".to_string(),
                "workpieces/BASE_BLACK".to_string(),
                Offset::new(0.0, 0.3)
            ),
            (
                "at-out".to_string(),
                "workpieces/BASE_CLEAR".to_string(),
                Offset::new(0.0, -0.3)
            ),
        ]
    );
}

#[test]
fn test_zones_create_once_and_never_attach() {
    let reconciler = Reconciler::for_family(crate::entity::Family::Zone);
    let assets = catalog(&["zones/C_Z23", "zones/M_Z07"]);
    let mut known = KnownVisuals::new();
    let zones = vec![
        ZoneSnapshot {
            zone_id: 23,
            x: 2.5,
            y: 3.5,
        },
        ZoneSnapshot {
            zone_id: 1007,
            x: -0.5,
            y: 7.5,
        },
    ];

    let first = reconciler.reconcile(&zones, &mut known, &assets);
    assert_eq!(first.len(), 2);
    match &first[1] {
        VisualAction::CreateRoot {
            sprite_path, scale, ..
        } => {
            assert_eq!(sprite_path, "zones/M_Z07");
            assert_eq!(*scale, 1.0);
        }
        other => panic!("expected CreateRoot, got {:?}", other),
    }

    let second = reconciler.reconcile(&zones, &mut known, &assets);
    assert!(second
        .iter()
        .all(|action| matches!(action, VisualAction::MoveRoot { .. })));
}

#[test]
fn test_absent_entity_is_not_removed() {
    let reconciler = Reconciler::new("robots", "workpieces");
    let assets = catalog(&["robots/robot-CYAN1"]);
    let mut known = KnownVisuals::new();

    reconciler.reconcile(&[robot("R1", None)], &mut known, &assets);
    let actions = reconciler.reconcile::<RobotSnapshot>(&[], &mut known, &assets);

    assert!(actions.is_empty());
    assert!(known.contains(&robot_key("R1")));
}

#[test]
fn test_reappearing_entity_moves_instead_of_recreating() {
    let reconciler = Reconciler::new("robots", "workpieces");
    let assets = catalog(&["robots/robot-CYAN1"]);
    let mut known = KnownVisuals::new();

    reconciler.reconcile(&[robot("R1", None)], &mut known, &assets);
    reconciler.reconcile::<RobotSnapshot>(&[], &mut known, &assets);
    let actions = reconciler.reconcile(&[robot("R1", None)], &mut known, &assets);

    assert_eq!(actions.len(), 1);
    assert!(matches!(actions[0], VisualAction::MoveRoot { .. }));
    assert_eq!(known.len(), 1);
}

#[test]
fn test_empty_folder_uses_bare_names() {
    let reconciler = Reconciler::new("", "");
    let assets = catalog(&["robot-CYAN1", "BASE_RED"]);
    let mut known = KnownVisuals::new();

    let actions = reconciler.reconcile(
        &[robot("R1", Some(product(BaseColor::Red, &[])))],
        &mut known,
        &assets,
    );

    assert!(matches!(&actions[0], VisualAction::CreateRoot { sprite_path, .. } if sprite_path == "robot-CYAN1"));
    assert!(matches!(&actions[1], VisualAction::AttachChild { sprite_path, .. } if sprite_path == "BASE_RED"));
}
