//! Property/fuzz-style invariants for the dock tree.
//!
//! Random streams of frame additions, removals, drops, state changes and
//! gripper moves run against the public model API; after every step the
//! tree must validate, hold exactly one content element, and lay out
//! deterministically inside the pane.

use panekit_core::{CompassDirection, Point, Rect, Size};
use panekit_dock::{
    CONTENT_ID, DockElementKind, DockablePaneModel, DockablePaneSnapshot, PaneGeometry,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state >> 11
    }

    fn range(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = u64::from((max - min) as u32) + 1;
        min + (self.next_u64() % span) as i32
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn direction(&mut self) -> CompassDirection {
        CompassDirection::ALL[self.choose_index(4)]
    }
}

fn frame_ids(model: &DockablePaneModel) -> Vec<String> {
    model
        .tree()
        .frames()
        .map(|(_, element, _)| element.id.clone())
        .collect()
}

fn assert_tree_invariants(model: &DockablePaneModel) {
    let tree = model.tree();
    tree.validate().expect("dock tree must stay valid");
    let contents = tree
        .nodes()
        .filter(|(_, element)| matches!(element.kind, DockElementKind::Content))
        .count();
    assert_eq!(contents, 1, "exactly one content element");
    for (node, element) in tree.nodes() {
        if node != tree.root() {
            if let DockElementKind::Container(container) = &element.kind {
                assert!(
                    container.children.len() >= 2,
                    "container {:?} has {} children",
                    element.id,
                    container.children.len()
                );
            }
        }
    }
    for (node, _, _) in tree.frames() {
        assert!(tree.is_attached(node), "frames stay attached between operations");
    }
}

fn assert_layout_determinism_and_bounds(model: &mut DockablePaneModel, area: Rect) {
    let geometry = PaneGeometry::new(area);
    let first = model.layout_container(&geometry).expect("layout").clone();
    let second = model.layout_container(&geometry).expect("layout").clone();
    assert_eq!(first, second, "layout must be idempotent");

    let inner = first.inner;
    for (id, rect) in &first.bounds {
        if rect.is_empty() {
            continue;
        }
        assert!(rect.x >= inner.x, "{id} starts left of inner bounds");
        assert!(rect.y >= inner.y, "{id} starts above inner bounds");
        assert!(rect.right() <= inner.right(), "{id} ends right of inner bounds");
        assert!(rect.bottom() <= inner.bottom(), "{id} ends below inner bounds");
    }
    assert!(
        first.bounds_of(CONTENT_ID).is_some(),
        "content always has bounds"
    );
}

fn step(model: &mut DockablePaneModel, rng: &mut Lcg, sequence: usize) {
    let frames = frame_ids(model);
    let op = if frames.is_empty() { 0 } else { rng.range(0, 9) };
    match op {
        0 | 1 => {
            let size = Size::new(rng.range(0, 400), rng.range(0, 300));
            let direction = rng.direction();
            model
                .add_frame(format!("f{sequence}"), direction, size)
                .expect("add frame");
        }
        2 => {
            let id = &frames[rng.choose_index(frames.len())];
            model.remove_frame(id).expect("remove frame");
        }
        3 | 4 | 5 => {
            let id = &frames[rng.choose_index(frames.len())];
            model.dock(id).expect("dock before dragging");
            let payload = model.create_drag_payload(id).expect("payload");
            let outer = model.layout().outer;
            let point = Point::new(
                rng.range(outer.x, outer.right().max(outer.x + 1) - 1),
                rng.range(outer.y, outer.bottom().max(outer.y + 1) - 1),
            );
            let preview = model.drop_data(&payload, point).expect("drop data");
            let placed = model.drop(&payload, point).expect("drop");
            assert_eq!(placed, preview.is_some());
            if placed {
                assert!(model.frame(id).expect("frame").is_docked());
            }
        }
        6 => {
            let id = &frames[rng.choose_index(frames.len())];
            match rng.range(0, 5) {
                0 => model.minimize(id).expect("minimize"),
                1 => model.close(id).expect("close"),
                2 => {
                    model.minimize(id).expect("minimize");
                    model.preview(id).expect("preview");
                }
                3 => model.set_maximized(id, true).expect("maximize"),
                4 => model.restore(id).expect("restore"),
                _ => model.float(id, Rect::new(10, 10, 200, 100)).expect("float"),
            }
        }
        _ => {
            let areas = model.layout().resize_areas.clone();
            if !areas.is_empty() {
                let data = areas[rng.choose_index(areas.len())];
                model
                    .apply_resize(&data, rng.range(-300, 300))
                    .expect("resize");
            }
        }
    }
}

fn run_sequence(seed: u64, steps: usize) -> DockablePaneModel {
    let mut model = DockablePaneModel::default();
    let mut rng = Lcg::new(seed);
    for sequence in 0..steps {
        let area = Rect::new(0, 0, rng.range(64, 1600), rng.range(64, 1200));
        assert_layout_determinism_and_bounds(&mut model, area);
        step(&mut model, &mut rng, sequence);
        assert_tree_invariants(&model);
    }
    model
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn dock_random_operation_sequences_preserve_invariants(
        seed in any::<u64>(),
        steps in 10usize..100,
    ) {
        let model = run_sequence(seed, steps);
        assert_tree_invariants(&model);
    }

    #[test]
    fn dock_snapshots_restore_identical_structure(
        seed in any::<u64>(),
        steps in 5usize..60,
    ) {
        let model = run_sequence(seed, steps);
        let snapshot = model.to_snapshot().expect("snapshot");
        let json = snapshot.to_json().expect("json");
        let decoded = DockablePaneSnapshot::from_json(&json).expect("decode");
        let restored = DockablePaneModel::from_snapshot(model.config().clone(), &decoded)
            .expect("restore");
        prop_assert_eq!(restored.to_snapshot().expect("snapshot"), snapshot);
        for id in frame_ids(&model) {
            prop_assert_eq!(restored.frame_position(&id), model.frame_position(&id));
        }
    }
}

#[test]
fn dock_fuzz_seed_corpus_preserves_invariants() {
    let seeds = [0_u64, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, u64::MAX];
    for seed in seeds {
        let model = run_sequence(seed, 150);
        assert_tree_invariants(&model);
    }
}
