use super::*;
use crate::kernel::editor::Editor;
use crate::kernel::mirror::support::{uri, Fixture};
use crate::kernel::services::ports::{CodeWidget, EditorGroup, TextModel};
use crate::models::{EndOfLine, Position};
use serde_json::json;

const A: &str = "main.file:///a.ts";

async fn opened() -> Fixture {
    let fx = Fixture::new(&["main", "side"]);
    fx.open("main", "file:///a.ts").await;
    fx
}

#[tokio::test]
async fn get_editor_resolves_only_live_editor_like_targets() {
    let fx = opened().await;

    assert!(fx.mirror.get_editor(A).is_some());
    assert!(fx.mirror.get_editor("main.file:///b.ts").is_none());
    assert!(fx.mirror.get_editor("side.file:///a.ts").is_none());
    assert!(fx.mirror.get_editor("nowhere.file:///a.ts").is_none());
    assert!(fx.mirror.get_editor("main").is_none());

    let group = fx.workbench.group("main").unwrap();
    group.open_component(&uri("file:///a.ts"), "preview");
    assert!(fx.mirror.get_editor(A).is_none());
}

#[tokio::test]
async fn get_editor_rejects_disposed_editors() {
    let fx = opened().await;

    fx.workbench.group("main").unwrap().code_editor().dispose();

    assert!(fx.mirror.get_editor(A).is_none());
}

#[tokio::test]
async fn close_editor_closes_the_group_resource() {
    let fx = opened().await;

    fx.mirror.close_editor("main.file:///b.ts");
    assert!(fx.mirror.get_editor(A).is_some());

    fx.mirror.close_editor(A);
    assert!(fx.mirror.get_editor(A).is_none());
    assert!(fx.workbench.group("main").unwrap().current_resource().is_none());
}

#[tokio::test]
async fn reveal_range_defaults_the_reveal_kind() {
    let fx = opened().await;
    let widget = fx.workbench.group("main").unwrap().code_widget();
    let range = Range::new(2, 1, 2, 5);

    fx.mirror.reveal_range(A, range, None);
    fx.mirror.reveal_range(A, range, Some(RevealKind::AtTop));
    fx.mirror.reveal_range("main.file:///gone.ts", range, None);

    assert_eq!(
        widget.reveals(),
        vec![(range, RevealKind::Default), (range, RevealKind::AtTop)]
    );
}

#[tokio::test]
async fn decoration_types_apply_and_clear_through_the_mirror() {
    let fx = opened().await;
    let widget = fx.workbench.group("main").unwrap().code_widget();
    let options: DecorationRenderOptions =
        serde_json::from_value(json!({ "backgroundColor": "yellow" })).unwrap();

    fx.mirror.create_text_editor_decoration_type("find", options);
    fx.mirror.apply_decoration(
        A,
        "find",
        &[DecorationApplyOptions::range(Range::new(1, 7, 1, 8))],
    );
    assert_eq!(widget.decorations().len(), 1);
    assert_eq!(
        widget.decorations()[0].options.get("backgroundColor"),
        Some(&json!("yellow"))
    );

    fx.mirror.delete_text_editor_decoration_type("find");
    assert!(widget.decorations().is_empty());
    assert!(fx.collection.decorations().is_empty());

    fx.mirror.delete_text_editor_decoration_type("find");
}

#[tokio::test]
async fn insert_snippet_falls_back_to_configured_undo_stops() {
    let fx = Fixture::with_snippet_defaults(
        &["main"],
        UndoStopOptions {
            undo_stop_before: false,
            undo_stop_after: false,
        },
    );
    fx.open("main", "file:///b.ts").await;
    let id = "main.file:///b.ts";
    let widget = fx.workbench.group("main").unwrap().code_widget();

    fx.mirror
        .insert_snippet(id, "// ${1:note}\n", &[Range::new(1, 1, 1, 1)], None);
    assert_eq!(widget.undo_stops(), 0);
    assert_eq!(fx.text("file:///b.ts"), "// note\nexport {};\n");

    fx.mirror.insert_snippet(
        id,
        "x",
        &[Range::new(1, 1, 1, 1)],
        Some(UndoStopOptions::default()),
    );
    assert_eq!(widget.undo_stops(), 2);
}

#[tokio::test]
async fn apply_edits_checks_the_document_version() {
    let fx = opened().await;
    let widget = fx.workbench.group("main").unwrap().code_widget();
    let version = fx.store.get(&uri("file:///a.ts")).unwrap().version_id();
    let edits = vec![SingleEditOperation::replace(Range::new(1, 7, 1, 8), "x")];

    let stale = fx
        .mirror
        .apply_edits(A, version + 1, &edits, ApplyEditsOptions::default());
    assert_eq!(
        stale,
        Err(MirrorError::StaleVersion {
            id: A.to_string(),
            expected: version + 1,
            actual: version,
        })
    );
    assert_eq!(fx.text("file:///a.ts"), "const a = 1;\nconst b = 2;\n");
    assert!(widget.edit_sources().is_empty());

    fx.mirror
        .apply_edits(
            A,
            version,
            &edits,
            ApplyEditsOptions {
                set_end_of_line: None,
                undo_stop_before: true,
                undo_stop_after: false,
            },
        )
        .unwrap();
    assert_eq!(fx.text("file:///a.ts"), "const x = 1;\nconst b = 2;\n");
    assert_eq!(widget.edit_sources(), vec![EDIT_SOURCE.to_string()]);
    assert_eq!(widget.undo_stops(), 1);
}

#[tokio::test]
async fn apply_edits_can_switch_line_endings() {
    let fx = opened().await;
    let version = fx.store.get(&uri("file:///a.ts")).unwrap().version_id();

    fx.mirror
        .apply_edits(
            A,
            version,
            &[SingleEditOperation::delete(Range::new(2, 1, 3, 1))],
            ApplyEditsOptions {
                set_end_of_line: Some(EndOfLine::CrLf),
                ..ApplyEditsOptions::default()
            },
        )
        .unwrap();

    assert_eq!(fx.text("file:///a.ts"), "const a = 1;\r\n");
}

#[tokio::test]
async fn apply_edits_reports_unknown_editors() {
    let fx = opened().await;

    let err = fx
        .mirror
        .apply_edits("side.file:///a.ts", 1, &[], ApplyEditsOptions::default())
        .unwrap_err();

    assert_eq!(err.kind(), "unresolvedTarget");
}

#[tokio::test]
async fn open_resource_returns_the_new_editor_id() {
    let fx = opened().await;

    let id = fx
        .mirror
        .open_resource(
            &uri("file:///b.ts"),
            ResourceOpenOptions {
                force_open_type: Some(OpenType::Component("image".into())),
                group_index: Some(1),
                focus: true,
                ..ResourceOpenOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(id, "side.file:///b.ts");
    let side = fx.workbench.group("side").unwrap();
    assert_eq!(side.current_open_type(), Some(OpenType::Code));
    assert_eq!(fx.workbench.active_group().unwrap().name(), "side");
    assert!(fx.mirror.get_editor(&id).is_some());
}

#[tokio::test]
async fn open_resource_with_range_selects_it() {
    let fx = opened().await;
    let range = Range::new(2, 7, 2, 8);

    let id = fx
        .mirror
        .open_resource(
            &uri("file:///a.ts"),
            ResourceOpenOptions {
                range: Some(range),
                ..ResourceOpenOptions::default()
            },
        )
        .await
        .unwrap();

    let editor = fx.mirror.get_editor(&id).unwrap();
    assert_eq!(editor.selections(), vec![Selection::from_range(range)]);
}

#[tokio::test]
async fn open_resource_fails_for_missing_documents() {
    let fx = opened().await;

    let err = fx
        .mirror
        .open_resource(&uri("file:///missing.ts"), ResourceOpenOptions::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        MirrorError::OpenFailed {
            uri: "file:///missing.ts".to_string()
        }
    );
    assert_eq!(err.to_string(), "editor open uri file:///missing.ts failed");
    assert!(fx.mirror.get_editor(A).is_some());
}

#[tokio::test]
async fn set_selections_moves_the_cursor_or_reports_the_id() {
    let fx = opened().await;
    let selection = Selection::new(Position::new(2, 13), Position::new(2, 1));

    fx.mirror.set_selections(A, &[selection]).unwrap();
    let widget = fx.workbench.group("main").unwrap().code_widget();
    assert_eq!(widget.selections(), vec![selection]);

    let err = fx
        .mirror
        .set_selections("main.file:///b.ts", &[selection])
        .unwrap_err();
    assert_eq!(
        err,
        MirrorError::UnresolvedTarget {
            id: "main.file:///b.ts".to_string()
        }
    );
}

#[tokio::test]
async fn superseded_open_leaves_the_id_on_the_bound_document() {
    let fx = Fixture::new(&["main"]);
    let group = fx.workbench.group("main").unwrap();
    let a = uri("file:///a.ts");
    let b = uri("file:///b.ts");
    let gate = fx.gates.gate(&a);

    let (first, second) = tokio::join!(group.open_code(&a, None), async {
        let result = group.open_code(&b, None).await;
        let _ = gate.send(());
        result
    });
    assert!(first.is_ok());
    assert!(second.is_ok());

    assert_eq!(group.current_resource().map(|r| r.uri), Some(b.clone()));
    assert!(fx.mirror.get_editor(A).is_none());
    assert!(fx.mirror.get_editor("main.file:///b.ts").is_some());

    let version = fx.store.get(&b).unwrap().version_id();
    let err = fx
        .mirror
        .apply_edits(
            A,
            version,
            &[SingleEditOperation::replace(Range::new(1, 1, 1, 7), "import")],
            ApplyEditsOptions::default(),
        )
        .unwrap_err();
    assert_eq!(err.kind(), "unresolvedTarget");
    assert_eq!(fx.text("file:///b.ts"), "export {};\n");
    assert_eq!(fx.text("file:///a.ts"), "const a = 1;\nconst b = 2;\n");
}

#[tokio::test]
async fn superseded_open_resource_reports_open_failed() {
    let fx = Fixture::new(&["main"]);
    let gate = fx.gates.gate(&uri("file:///a.ts"));

    let a_uri = uri("file:///a.ts");
    let (first, second) = tokio::join!(
        fx.mirror
            .open_resource(&a_uri, ResourceOpenOptions::default()),
        async {
            let result = fx
                .mirror
                .open_resource(&uri("file:///b.ts"), ResourceOpenOptions::default())
                .await;
            let _ = gate.send(());
            result
        }
    );

    assert_eq!(
        first,
        Err(MirrorError::OpenFailed {
            uri: "file:///a.ts".to_string()
        })
    );
    assert_eq!(second.unwrap(), "main.file:///b.ts");
}

#[tokio::test]
async fn get_editor_requires_the_editor_to_hold_the_group_resource() {
    let fx = opened().await;
    let editor = fx.workbench.group("main").unwrap().code_editor();

    editor.open(&uri("file:///b.ts"), None).await.unwrap();

    assert!(fx.mirror.get_editor(A).is_none());
}

#[tokio::test]
async fn apply_edits_rejects_overlapping_ranges_whole() {
    let fx = opened().await;
    let widget = fx.workbench.group("main").unwrap().code_widget();
    let version = fx.store.get(&uri("file:///a.ts")).unwrap().version_id();
    let edits = vec![
        SingleEditOperation::delete(Range::new(1, 1, 1, 13)),
        SingleEditOperation::delete(Range::new(1, 6, 1, 7)),
    ];

    let err = fx
        .mirror
        .apply_edits(
            A,
            version,
            &edits,
            ApplyEditsOptions {
                set_end_of_line: Some(EndOfLine::CrLf),
                undo_stop_before: true,
                undo_stop_after: true,
            },
        )
        .unwrap_err();

    assert_eq!(err, MirrorError::EditsRejected { id: A.to_string() });
    assert_eq!(err.kind(), "editsRejected");
    assert_eq!(fx.text("file:///a.ts"), "const a = 1;\nconst b = 2;\n");
    assert_eq!(
        fx.store.get(&uri("file:///a.ts")).unwrap().version_id(),
        version
    );
    assert_eq!(widget.undo_stops(), 0);
    assert!(widget.edit_sources().is_empty());
}

#[tokio::test]
async fn apply_edits_fails_when_the_widget_has_no_model() {
    let fx = opened().await;
    let widget = fx.workbench.group("main").unwrap().code_widget();
    let version = fx.store.get(&uri("file:///a.ts")).unwrap().version_id();
    widget.set_model(None);

    let err = fx
        .mirror
        .apply_edits(
            A,
            version,
            &[SingleEditOperation::replace(Range::new(1, 7, 1, 8), "x")],
            ApplyEditsOptions::default(),
        )
        .unwrap_err();

    assert_eq!(err, MirrorError::EditsRejected { id: A.to_string() });
    assert_eq!(fx.text("file:///a.ts"), "const a = 1;\nconst b = 2;\n");
}

#[tokio::test]
async fn insert_snippet_with_overlapping_ranges_inserts_nothing() {
    let fx = opened().await;
    let widget = fx.workbench.group("main").unwrap().code_widget();

    fx.mirror.insert_snippet(
        A,
        "x",
        &[Range::new(1, 1, 1, 6), Range::new(1, 3, 1, 8)],
        Some(UndoStopOptions::default()),
    );

    assert_eq!(fx.text("file:///a.ts"), "const a = 1;\nconst b = 2;\n");
    assert_eq!(widget.undo_stops(), 0);
}
