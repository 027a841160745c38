use super::*;
use crate::kernel::mirror::protocol::Response;
use crate::kernel::services::adapters::MemoryDocumentStore;
use crate::kernel::services::ports::Settings;
use crate::kernel::services::EditorServiceHost;
use crate::models::{TextModelOptions, Uri};
use serde_json::{json, Value};

#[test]
fn test_proxy_sends_notifications_as_lines() {
    let (proxy, mut rx) = JsonLineProxy::channel();

    proxy.accept_change(ChangeSet::activated(None));
    proxy.accept_properties_change(PropertiesChange::new("main.file:///a.ts"));

    let first: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
    assert_eq!(
        first,
        json!({ "method": "acceptChange", "params": { "actived": null } })
    );
    let second: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
    assert_eq!(second["method"], json!("acceptPropertiesChange"));
    assert_eq!(second["params"]["id"], json!("main.file:///a.ts"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_closed_channel_is_not_fatal() {
    let (proxy, rx) = JsonLineProxy::channel();
    drop(rx);

    proxy.accept_change(ChangeSet::activated(None));
}

#[tokio::test]
async fn test_write_lines_until_senders_are_gone() {
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send("one".to_string()).unwrap();
    tx.send("two".to_string()).unwrap();
    drop(tx);

    let mut out = Vec::new();
    write_lines(rx, &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "one\ntwo\n");
}

#[tokio::test]
async fn test_serve_answers_every_request() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let (proxy, mut rx) = JsonLineProxy::channel();
            let tx = proxy.sender();
            let documents = Rc::new(MemoryDocumentStore::new(TextModelOptions::default()));
            documents.insert(&Uri::parse("file:///a.ts").unwrap(), "hello\n");
            let host =
                EditorServiceHost::with_documents(Settings::default(), documents, Rc::new(proxy));

            let input = format!(
                "{}\n\n{}\nnot json\n",
                json!({ "id": 1, "method": "openResource", "params": { "uri": "file:///a.ts" } }),
                json!({ "id": 2, "method": "setSelections", "params": { "id": "main.file:///b.ts", "selections": [] } }),
            );
            serve(Rc::clone(host.mirror()), input.as_bytes(), tx)
                .await
                .unwrap();

            let mut responses = Vec::new();
            for _ in 0..3 {
                let line = rx.recv().await.unwrap();
                responses.push(serde_json::from_str::<Response>(&line).unwrap());
            }
            responses.sort_by_key(|r| r.id);

            assert_eq!(responses[0].id, None);
            assert_eq!(responses[0].error.as_ref().unwrap().kind, "protocol");
            assert_eq!(responses[1].result, Some(json!("main.file:///a.ts")));
            assert_eq!(
                responses[2].error.as_ref().unwrap().kind,
                "unresolvedTarget"
            );
        })
        .await;
}
