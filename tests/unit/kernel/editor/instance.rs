use super::*;
use crate::kernel::editor::gated::GatedProvider;
use crate::kernel::editor::{DecorationCollection, EditorCollection};
use crate::kernel::services::adapters::{MemoryCodeWidget, MemoryDocumentStore};
use crate::models::{DecorationRenderOptions, Position, TextModelOptions, ViewOptions};

fn uri(s: &str) -> Uri {
    Uri::parse(s).unwrap()
}

fn setup() -> (Rc<GatedProvider>, EditorCollection, Rc<MemoryCodeWidget>, Rc<EditorInstance>) {
    let store = Rc::new(MemoryDocumentStore::new(TextModelOptions::default()));
    let provider = Rc::new(GatedProvider::new(store));
    provider.inner.insert(&uri("file:///a.ts"), "alpha\nbeta\ngamma\n");
    provider.inner.insert(&uri("file:///b.ts"), "one\ntwo\n");
    let collection = EditorCollection::new(provider.clone(), DecorationCollection::new());
    let widget = MemoryCodeWidget::new(ViewOptions::default());
    let editor = collection.create_code_editor(widget.clone());
    (provider, collection, widget, editor)
}

#[tokio::test]
async fn open_binds_model_and_reports_cursor() {
    let (_provider, collection, widget, editor) = setup();
    let statuses = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let statuses = Rc::clone(&statuses);
        editor.on_cursor_position_changed(move |s| statuses.borrow_mut().push(*s))
    };

    editor.open(&uri("file:///a.ts"), None).await.unwrap();

    assert_eq!(editor.current_uri(), Some(uri("file:///a.ts")));
    assert_eq!(
        widget.model().map(|m| m.uri()),
        Some(uri("file:///a.ts"))
    );
    assert_eq!(
        *statuses.borrow(),
        vec![CursorStatus {
            position: Some(Position::new(1, 1)),
            selection_length: 0,
        }]
    );
    assert!(collection.contains(editor.id()));
}

#[tokio::test]
async fn open_missing_resource_keeps_previous_document() {
    let (_provider, _collection, widget, editor) = setup();
    editor.open(&uri("file:///a.ts"), None).await.unwrap();

    let err = editor
        .open(&uri("file:///missing.ts"), None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        MirrorError::ResourceNotFound {
            uri: uri("file:///missing.ts"),
            side: None,
        }
    );
    assert_eq!(editor.current_uri(), Some(uri("file:///a.ts")));
    assert_eq!(widget.model().map(|m| m.uri()), Some(uri("file:///a.ts")));
}

#[tokio::test]
async fn view_state_survives_a_round_trip() {
    let (_provider, _collection, widget, editor) = setup();
    let a = uri("file:///a.ts");
    let b = uri("file:///b.ts");

    editor.open(&a, None).await.unwrap();
    widget.select(
        &[Selection::new(Position::new(2, 1), Position::new(2, 4))],
        "keyboard",
    );
    widget.scroll_to(2);
    let left_behind = widget.save_view_state();

    editor.open(&b, None).await.unwrap();
    assert_eq!(widget.scroll_top(), 0);
    widget.select(&[Selection::caret(Position::new(2, 2))], "mouse");

    editor.open(&a, None).await.unwrap();
    assert_eq!(widget.save_view_state(), left_behind);
    assert_eq!(editor.view_state_for(&b).map(|s| s.selections), Some(vec![Selection::caret(Position::new(2, 2))]));
}

#[tokio::test]
async fn open_with_range_reveals_and_selects() {
    let (_provider, _collection, widget, editor) = setup();
    let range = Range::new(3, 1, 3, 6);

    editor.open(&uri("file:///a.ts"), Some(range)).await.unwrap();

    assert_eq!(widget.reveals(), vec![(range, RevealKind::InCenter)]);
    assert_eq!(widget.selections(), vec![Selection::from_range(range)]);
}

#[tokio::test]
async fn selection_length_counts_selected_chars() {
    let (_provider, _collection, widget, editor) = setup();
    editor.open(&uri("file:///a.ts"), None).await.unwrap();
    let last = Rc::new(Cell::new(None));
    let _sub = {
        let last = Rc::clone(&last);
        editor.on_cursor_position_changed(move |s| last.set(Some(*s)))
    };

    widget.select(
        &[Selection::new(Position::new(1, 2), Position::new(2, 3))],
        "mouse",
    );

    assert_eq!(
        last.get(),
        Some(CursorStatus {
            position: Some(Position::new(2, 3)),
            selection_length: "lpha\nbe".chars().count(),
        })
    );
}

#[tokio::test]
async fn later_open_wins_over_slower_earlier_open() {
    let (provider, _collection, widget, editor) = setup();
    let a = uri("file:///a.ts");
    let b = uri("file:///b.ts");
    let gate = provider.gate(&a);

    let (first, second) = tokio::join!(editor.open(&a, None), async {
        let result = editor.open(&b, None).await;
        let _ = gate.send(());
        result
    });

    assert_eq!(first.unwrap(), OpenOutcome::Superseded);
    assert_eq!(second.unwrap(), OpenOutcome::Bound);
    assert_eq!(editor.current_uri(), Some(b.clone()));
    assert_eq!(widget.model().map(|m| m.uri()), Some(b));
}

#[tokio::test]
async fn save_without_document_returns_false() {
    let (provider, _collection, _widget, editor) = setup();
    assert!(!editor.save().await);

    let a = uri("file:///a.ts");
    editor.open(&a, None).await.unwrap();
    provider.inner.insert(&a, "changed");
    assert!(provider.inner.get(&a).unwrap().dirty());
    assert!(editor.save().await);
    assert!(!provider.inner.get(&a).unwrap().dirty());
}

#[tokio::test]
async fn dispose_is_idempotent_and_silences_the_editor() {
    let (_provider, collection, widget, editor) = setup();
    collection
        .decorations()
        .create_text_editor_decoration_type("hl", DecorationRenderOptions::default());
    editor.open(&uri("file:///a.ts"), None).await.unwrap();
    editor.apply_decoration("hl", &[DecorationApplyOptions::range(Range::new(1, 1, 1, 3))]);
    assert_eq!(widget.decorations().len(), 1);

    let removals = Rc::new(Cell::new(0));
    let _sub = {
        let removals = Rc::clone(&removals);
        collection.on_did_change_editors(move |e| removals.set(removals.get() + e.removed.len()))
    };

    editor.dispose();
    editor.dispose();

    assert!(editor.is_disposed());
    assert!(widget.is_disposed());
    assert!(!collection.contains(editor.id()));
    assert_eq!(removals.get(), 1);
    assert!(editor.view_state_for(&uri("file:///a.ts")).is_some());

    editor.apply_decoration("hl", &[DecorationApplyOptions::range(Range::new(1, 1, 1, 3))]);
    editor.insert_snippet("x", &[], UndoStopOptions::default());
    assert!(widget.decorations().is_empty());
    assert_eq!(widget.undo_stops(), 0);
}

#[tokio::test]
async fn insert_snippet_selects_ranges_then_inserts() {
    let (provider, _collection, widget, editor) = setup();
    let a = uri("file:///a.ts");
    editor.open(&a, None).await.unwrap();

    editor.insert_snippet(
        "${1:delta}$0",
        &[Range::new(2, 1, 2, 5)],
        UndoStopOptions::default(),
    );

    assert_eq!(provider.inner.get(&a).unwrap().text(), "alpha\ndelta\ngamma\n");
    assert!(widget.is_focused());
    assert_eq!(widget.undo_stops(), 2);
}
