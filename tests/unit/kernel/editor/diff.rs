use super::*;
use crate::kernel::editor::gated::GatedProvider;
use crate::kernel::editor::EditorCollection;
use crate::kernel::services::adapters::{MemoryDiffWidget, MemoryDocumentStore};
use crate::models::{DecorationRenderOptions, Selection, TextModelOptions, ViewOptions};

fn uri(s: &str) -> Uri {
    Uri::parse(s).unwrap()
}

fn setup() -> (EditorCollection, Rc<MemoryDiffWidget>, Rc<DiffEditorInstance>) {
    let store = Rc::new(MemoryDocumentStore::new(TextModelOptions::default()));
    store.insert(&uri("file:///old.ts"), "let a = 1;\n");
    store.insert(&uri("file:///new.ts"), "let a = 2;\n");
    store.insert(&uri("file:///other.ts"), "other\n");
    let collection = EditorCollection::new(store, DecorationCollection::new());
    let widget = MemoryDiffWidget::new(ViewOptions::default());
    let diff = collection.create_diff_editor(widget.clone());
    (collection, widget, diff)
}

#[test]
fn both_sides_are_registered() {
    let (collection, widget, diff) = setup();

    assert_eq!(collection.len(), 2);
    assert_eq!(diff.original_editor().id(), widget.original().id());
    assert_eq!(diff.modified_editor().id(), widget.modified().id());
    assert_eq!(diff.original_editor().side(), DiffSide::Original);
    assert!(collection.contains(diff.modified_editor().id()));
}

#[tokio::test]
async fn compare_binds_both_models_at_once() {
    let (_collection, widget, diff) = setup();

    diff.compare(&uri("file:///old.ts"), &uri("file:///new.ts"))
        .await
        .unwrap();

    assert_eq!(widget.model_sets(), 1);
    assert_eq!(
        diff.original_editor().current_uri(),
        Some(uri("file:///old.ts"))
    );
    assert_eq!(
        diff.modified_editor().current_uri(),
        Some(uri("file:///new.ts"))
    );
    assert_eq!(
        widget.modified().model().map(|m| m.uri()),
        Some(uri("file:///new.ts"))
    );
    assert_eq!(
        diff.original_model().map(|m| m.get_text(None)),
        Some("let a = 1;\n".to_string())
    );
}

#[tokio::test]
async fn failed_side_binds_nothing() {
    let (_collection, widget, diff) = setup();
    diff.compare(&uri("file:///old.ts"), &uri("file:///new.ts"))
        .await
        .unwrap();

    let err = diff
        .compare(&uri("file:///other.ts"), &uri("file:///gone.ts"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        MirrorError::ResourceNotFound {
            uri: uri("file:///gone.ts"),
            side: Some(DiffSide::Modified),
        }
    );
    assert!(err.to_string().contains("modified"));

    let err = diff
        .compare(&uri("file:///gone.ts"), &uri("file:///other.ts"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("original"));

    assert_eq!(widget.model_sets(), 1);
    assert_eq!(
        diff.original_editor().current_uri(),
        Some(uri("file:///old.ts"))
    );
    assert_eq!(
        widget.original().model().map(|m| m.uri()),
        Some(uri("file:///old.ts"))
    );
}

#[tokio::test]
async fn later_compare_wins_over_slower_earlier_compare() {
    let store = Rc::new(MemoryDocumentStore::new(TextModelOptions::default()));
    store.insert(&uri("file:///old.ts"), "let a = 1;\n");
    store.insert(&uri("file:///new.ts"), "let a = 2;\n");
    store.insert(&uri("file:///other.ts"), "other\n");
    let provider = Rc::new(GatedProvider::new(store));
    let collection = EditorCollection::new(provider.clone(), DecorationCollection::new());
    let widget = MemoryDiffWidget::new(ViewOptions::default());
    let diff = collection.create_diff_editor(widget.clone());
    let gate = provider.gate(&uri("file:///new.ts"));

    let (old_uri, new_uri) = (uri("file:///old.ts"), uri("file:///new.ts"));
    let (first, second) = tokio::join!(
        diff.compare(&old_uri, &new_uri),
        async {
            let result = diff
                .compare(&uri("file:///other.ts"), &uri("file:///old.ts"))
                .await;
            let _ = gate.send(());
            result
        }
    );

    assert_eq!(first.unwrap(), OpenOutcome::Superseded);
    assert_eq!(second.unwrap(), OpenOutcome::Bound);
    assert_eq!(widget.model_sets(), 1);
    assert_eq!(
        diff.original_editor().current_uri(),
        Some(uri("file:///other.ts"))
    );
    assert_eq!(
        diff.modified_editor().current_uri(),
        Some(uri("file:///old.ts"))
    );
    assert_eq!(
        widget.modified().model().map(|m| m.uri()),
        Some(uri("file:///old.ts"))
    );
}

#[tokio::test]
async fn side_editors_drive_their_own_sub_view() {
    let (collection, widget, diff) = setup();
    collection
        .decorations()
        .create_text_editor_decoration_type("hl", DecorationRenderOptions::default());
    diff.compare(&uri("file:///old.ts"), &uri("file:///new.ts"))
        .await
        .unwrap();

    let modified = diff.modified_editor();
    modified.set_selection(Selection::from_range(Range::new(1, 5, 1, 6)));
    modified.apply_decoration(
        "hl",
        &[DecorationApplyOptions::range(Range::new(1, 9, 1, 10))],
    );

    assert_eq!(
        widget.modified().selections(),
        vec![Selection::from_range(Range::new(1, 5, 1, 6))]
    );
    assert_eq!(widget.original().selections(), vec![Selection::default()]);
    assert_eq!(widget.modified().decorations().len(), 1);
    assert!(widget.original().decorations().is_empty());
}

#[tokio::test]
async fn dispose_removes_both_sides_once() {
    let (collection, widget, diff) = setup();
    diff.compare(&uri("file:///old.ts"), &uri("file:///new.ts"))
        .await
        .unwrap();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let changes = Rc::clone(&changes);
        collection.on_did_change_editors(move |e| changes.borrow_mut().push(e.clone()))
    };

    diff.dispose();
    diff.dispose();

    assert!(diff.is_disposed());
    assert!(diff.modified_editor().is_disposed());
    assert!(widget.is_disposed());
    assert!(collection.is_empty());
    assert_eq!(changes.borrow().len(), 1);
    assert_eq!(changes.borrow()[0].removed.len(), 2);

    diff.compare(&uri("file:///other.ts"), &uri("file:///other.ts"))
        .await
        .unwrap();
    assert_eq!(widget.model_sets(), 1);
}
