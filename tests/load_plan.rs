use container_load_planner::aggregate::aggregate;
use container_load_planner::catalog::{ContainerKind, catalog};
use container_load_planner::model::{Item, RawItem};
use container_load_planner::normalizer::normalize_items;
use container_load_planner::placement::{PlacementConfig, place_items};
use container_load_planner::planner::plan_load;
use container_load_planner::selector::select_container;
use container_load_planner::types::{CM3_PER_M3, Dimensional};

const EPSILON: f64 = 1e-6;

fn manifest() -> Vec<RawItem> {
    let mut fragile = RawItem::from_text("Glassware", ("60", "40", "35.5"), "12", "11");
    fragile.fragile = true;
    vec![
        RawItem::from_text("Pallet", ("120", "80", "100"), "300", "4"),
        fragile,
        RawItem::from_text("", ("33.3 cm", "21.7", "18.2"), "4 kg", "7 pcs"),
        RawItem::from_text("Typo", ("50", "4O", "30"), "20", "1"),
        RawItem::from_text("No quantity", ("50", "40", "30"), "20", ""),
        RawItem::from_text("Skipped", ("50", "40", "30"), "20", "0"),
    ]
}

#[test]
fn two_crate_scenario_end_to_end() {
    let raw = vec![RawItem::from_text("Crate", ("50", "40", "30"), "20", "2")];
    let plan = plan_load(&raw, Some("20ft Standard"), PlacementConfig::default());

    assert!((plan.totals.total_volume_m3 - 0.12).abs() < EPSILON);
    assert!((plan.totals.total_weight_kg - 40.0).abs() < EPSILON);

    let suggested = plan.selection.container().expect("20ft should fit");
    assert_eq!(suggested.kind, ContainerKind::TwentyFootStandard);
    assert!((plan.selection.remaining_volume() - 27.88).abs() < EPSILON);
    assert!((plan.selection.remaining_weight() - 27_960.0).abs() < EPSILON);

    let units = &plan.placement.units;
    assert_eq!(units.len(), 2);
    assert_eq!(units[1].center.x - units[0].center.x, 55.0);
    assert_eq!(units[0].center.y, 15.0);
    assert_eq!(units[0].center.z, units[1].center.z);
    assert_eq!(units[0].bounding_box().min.x, -284.5);
}

#[test]
fn unit_count_matches_valid_quantities() {
    let normalized = normalize_items(&manifest());
    // "4O" has a numeric prefix of 4; only the empty quantity is dropped
    assert_eq!(normalized.dropped, 1);

    let expected: u32 = normalized.items.iter().map(|i| i.quantity).sum();
    let envelope = ContainerKind::FortyFootHighCube.container_type().envelope;
    let plan = place_items(&normalized.items, envelope);
    assert_eq!(plan.units.len(), expected as usize);
}

#[test]
fn placed_volume_matches_total_volume() {
    let items = normalize_items(&manifest()).items;
    let totals = aggregate(&items);

    for container in catalog() {
        let plan = place_items(&items, container.envelope);
        let placed: f64 = plan.units.iter().map(|u| u.volume_cm3()).sum();
        let expected = totals.total_volume_m3 * CM3_PER_M3;
        assert!(
            (placed - expected).abs() <= expected * 1e-9,
            "placed {} vs expected {}",
            placed,
            expected
        );
    }
}

#[test]
fn placement_runs_are_identical() {
    let first = plan_load(&manifest(), Some("45ft High Cube"), PlacementConfig::default());
    let second = plan_load(&manifest(), Some("45ft High Cube"), PlacementConfig::default());
    assert_eq!(first.placement, second.placement);
    assert_eq!(
        serde_json::to_string(&first.placement.units).unwrap(),
        serde_json::to_string(&second.placement.units).unwrap()
    );
}

#[test]
fn eighty_cubic_meters_overflow_every_container() {
    let items = vec![Item::new("Bulk", (200.0, 200.0, 200.0), 100.0, 10)];
    let totals = aggregate(&items);
    assert!((totals.total_volume_m3 - 80.0).abs() < EPSILON);

    let selection = select_container(&totals, catalog());
    assert!(selection.is_overflow());
    assert!(selection.container().is_none());
    assert_eq!(selection.remaining_volume(), 0.0);
    assert_eq!(selection.remaining_weight(), 0.0);
}

#[test]
fn non_numeric_weight_excludes_the_item() {
    let raw = vec![
        RawItem::from_text("Good", ("50", "40", "30"), "20", "2"),
        RawItem::from_text("Bad", ("100", "100", "100"), "abc", "3"),
    ];
    let plan = plan_load(&raw, None, PlacementConfig::default());

    assert_eq!(plan.dropped_items, 1);
    assert_eq!(plan.items.len(), 1);
    assert!((plan.totals.total_weight_kg - 40.0).abs() < EPSILON);
    assert!((plan.totals.total_volume_m3 - 0.12).abs() < EPSILON);
    assert_eq!(plan.placement.units.len(), 2);
}

#[test]
fn undersized_manual_choice_stacks_past_the_roof() {
    // 300 pallets: the selector overflows, placement still lays out every unit
    let raw = vec![RawItem::from_text("Pallet", ("120", "80", "100"), "300", "300")];
    let plan = plan_load(&raw, Some("20ft Standard"), PlacementConfig::default());

    assert!(plan.selection.is_overflow());
    assert_eq!(plan.placement.units.len(), 300);
    assert!(plan.placement.summary.units_above_roof > 0);
    let highest = plan
        .placement
        .units
        .iter()
        .map(|u| u.bounding_box().top())
        .fold(0.0, f64::max);
    assert!(highest > plan.placement_container.envelope.height);
}
