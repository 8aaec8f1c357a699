//! Property tests: random action sequences never break document structure.

use proptest::prelude::*;
use studio_core::geometry::Alignment;
use studio_core::{
    reduce, Action, Document, Editor, EditorConfig, ElementDraft, ElementId, ElementKind,
    ElementPatch, Outcome, ReorderTarget, SequentialIds, Transform, TransformPatch,
};

fn arb_id() -> impl Strategy<Value = ElementId> {
    (1u8..12).prop_map(|n| ElementId::new(format!("el-{n}")))
}

fn arb_ids() -> impl Strategy<Value = Vec<ElementId>> {
    prop::collection::vec(arb_id(), 0..4)
}

fn arb_kind() -> impl Strategy<Value = ElementKind> {
    prop_oneof![
        (0.0f32..8.0).prop_map(|corner_radius| ElementKind::Rectangle { corner_radius }),
        Just(ElementKind::Ellipse),
        Just(ElementKind::Clock {
            format: "HH:mm".to_string(),
            show_seconds: false,
        }),
    ]
}

/// Sizes including collapsed extents.
fn arb_extent() -> impl Strategy<Value = f32> {
    prop_oneof![1 => Just(0.0f32), 4 => 1.0f32..80.0]
}

fn arb_transform_patch() -> impl Strategy<Value = TransformPatch> {
    (
        prop::option::of(-50.0f32..300.0),
        prop::option::of(-50.0f32..300.0),
        prop::option::of(arb_extent()),
        prop::option::of(arb_extent()),
    )
        .prop_map(|(x, y, width, height)| TransformPatch {
            x,
            y,
            width,
            height,
            ..TransformPatch::default()
        })
}

fn arb_alignment() -> impl Strategy<Value = Alignment> {
    prop_oneof![
        Just(Alignment::Left),
        Just(Alignment::Center),
        Just(Alignment::Right),
        Just(Alignment::Top),
        Just(Alignment::Middle),
        Just(Alignment::Bottom),
    ]
}

fn arb_reorder() -> impl Strategy<Value = ReorderTarget> {
    prop_oneof![
        Just(ReorderTarget::Front),
        Just(ReorderTarget::Back),
        Just(ReorderTarget::Forward),
        Just(ReorderTarget::Backward),
        (0usize..6).prop_map(ReorderTarget::Index),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (arb_kind(), -50.0f32..300.0, -50.0f32..300.0, arb_extent(), arb_extent())
            .prop_map(|(kind, x, y, w, h)| Action::Add {
                draft: ElementDraft::new(kind).with_transform(Transform::new(x, y, w, h)),
            }),
        2 => (arb_ids(), -40.0f32..40.0, -40.0f32..40.0)
            .prop_map(|(ids, dx, dy)| Action::Move { ids, dx, dy }),
        2 => (arb_id(), arb_transform_patch()).prop_map(|(id, transform)| Action::Update {
            id,
            patch: ElementPatch {
                transform: Some(transform),
                ..ElementPatch::default()
            },
        }),
        1 => (arb_ids(), 1.0f32..120.0, 1.0f32..120.0)
            .prop_map(|(ids, width, height)| Action::Resize { ids, width, height, x: None, y: None }),
        1 => arb_ids().prop_map(|ids| Action::Delete { ids }),
        2 => arb_ids().prop_map(|ids| Action::Group { ids }),
        1 => arb_id().prop_map(|id| Action::Ungroup { id }),
        1 => (arb_id(), arb_reorder()).prop_map(|(id, target)| Action::Reorder { id, target }),
        1 => (arb_ids(), arb_alignment()).prop_map(|(ids, alignment)| Action::Align { ids, alignment }),
        1 => arb_ids().prop_map(|ids| Action::Duplicate { ids }),
        1 => arb_ids().prop_map(|ids| Action::Copy { ids }),
        1 => arb_ids().prop_map(|ids| Action::Cut { ids }),
        1 => Just(Action::Paste),
        1 => (arb_ids(), any::<bool>()).prop_map(|(ids, additive)| Action::Select { ids, additive }),
        1 => Just(Action::ToggleSnapToGrid),
        2 => Just(Action::Undo),
        1 => Just(Action::Redo),
    ]
}

proptest! {
    #[test]
    fn prop_random_actions_preserve_invariants(
        actions in prop::collection::vec(arb_action(), 0..40)
    ) {
        let mut editor = Editor::with_ids(&EditorConfig::default(), SequentialIds::default());
        for action in actions {
            editor.dispatch(action);
            let doc = editor.document();
            prop_assert!(
                doc.check_invariants().is_ok(),
                "invariants broken: {:?}",
                doc.check_invariants()
            );
            for id in doc.selected_ids() {
                prop_assert!(doc.element(id).is_some(), "selection holds missing id {}", id);
            }
        }
    }

    #[test]
    fn prop_unchanged_outcome_means_no_commit(
        actions in prop::collection::vec(arb_action(), 0..30)
    ) {
        let mut editor = Editor::with_ids(&EditorConfig::default(), SequentialIds::default());
        for action in actions {
            let len_before = editor.document().history().len();
            let index_before = editor.document().history_index();
            let outcome = editor.dispatch(action);
            let doc = editor.document();
            match outcome {
                Outcome::Committed => prop_assert_eq!(doc.history_index(), index_before + 1),
                Outcome::Unchanged | Outcome::Transient => {
                    prop_assert_eq!(doc.history_index(), index_before);
                    prop_assert_eq!(doc.history().len(), len_before);
                }
                Outcome::Restored => {}
            }
        }
    }

    #[test]
    fn prop_reduce_never_mutates_input(
        setup in prop::collection::vec(arb_action(), 0..15),
        action in arb_action()
    ) {
        let mut ids = SequentialIds::default();
        let mut doc = Document::default();
        for step in setup {
            doc = reduce(&doc, step, &mut ids);
        }
        let before = doc.clone();
        let _next = reduce(&doc, action, &mut ids);
        prop_assert_eq!(doc, before);
    }

    #[test]
    fn prop_group_then_ungroup_restores_positions(
        rects in prop::collection::vec((-100.0f32..100.0, -100.0f32..100.0), 2..6)
    ) {
        let mut editor = Editor::with_ids(&EditorConfig::default(), SequentialIds::default());
        for (x, y) in &rects {
            editor.dispatch(Action::Add {
                draft: ElementDraft::new(ElementKind::Ellipse)
                    .with_transform(Transform::new(*x, *y, 10.0, 10.0)),
            });
        }
        let ids = editor.document().element_order().to_vec();
        let before: Vec<_> = ids
            .iter()
            .filter_map(|id| editor.document().absolute_bounds(id))
            .collect();

        editor.dispatch(Action::Group { ids: ids.clone() });
        let group_id = editor.document().selected_ids()[0].clone();
        editor.dispatch(Action::Ungroup { id: group_id });

        for (id, original) in ids.iter().zip(&before) {
            let after = editor.document().absolute_bounds(id);
            prop_assert!(after.is_some_and(|r| r.approx_eq(original)));
        }
    }
}

#[test]
fn test_undo_to_start_empties_document() {
    let mut editor = Editor::with_ids(&EditorConfig::default(), SequentialIds::default());
    let initial = editor.document().clone();
    for x in [0.0, 20.0, 40.0] {
        editor.dispatch(Action::Add {
            draft: ElementDraft::new(ElementKind::Ellipse)
                .with_transform(Transform::new(x, 0.0, 10.0, 10.0)),
        });
    }
    while editor.document().history().can_undo() {
        editor.dispatch(Action::Undo);
    }
    assert_eq!(editor.document().elements(), initial.elements());
    assert_eq!(editor.document().history_index(), 0);
    assert_eq!(editor.document().history().len(), 4);
}
