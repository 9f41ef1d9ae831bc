use std::sync::Arc;

use serde_json::json;

use opensled_http::RemoteStore;
use opensled_store::{IterItem, IterOptions, KeyPath, Registry, Tensor, Value};

/// Serve the facade on an ephemeral port; the service task dies with the
/// runtime. Returns the server address and the database directory.
async fn start_service() -> (String, tempfile::TempDir) {
    let registry = Arc::new(Registry::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(opensled_http::serve(listener, registry));
    (format!("http://{addr}/"), tempfile::tempdir().unwrap())
}

fn db_path(dir: &tempfile::TempDir) -> String {
    dir.path().to_str().unwrap().to_string()
}

#[tokio::test]
async fn point_operations_round_trip() {
    let (uri, dir) = start_service().await;
    let path = db_path(&dir);

    tokio::task::spawn_blocking(move || {
        let store = RemoteStore::connect(&uri, path).unwrap();

        assert_eq!(store.get(&KeyPath::from("key")).unwrap(), None);

        store
            .put(&KeyPath::from("key"), &Value::from("value_string1"))
            .unwrap();
        assert_eq!(
            store.get(&KeyPath::from("key")).unwrap(),
            Some(Value::from("value_string1"))
        );

        store.delete(&KeyPath::from("key")).unwrap();
        assert_eq!(store.get(&KeyPath::from("key")).unwrap(), None);
        assert_eq!(store.len().unwrap(), 0);

        // Deleting a missing key is fine remotely too.
        store.delete(&KeyPath::from("key")).unwrap();
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn every_value_kind_crosses_the_boundary() {
    let (uri, dir) = start_service().await;
    let path = db_path(&dir);

    tokio::task::spawn_blocking(move || {
        let store = RemoteStore::connect(&uri, path).unwrap();
        let tensor = Tensor::from_elems(vec![3], &[1i32, -2, 3]).unwrap();
        let values = [
            Value::from(&b"value_bytes1"[..]),
            Value::from(-100000000000000000000000000i128),
            Value::from("hola"),
            Value::Json(json!({"key1": 10.5, "key2": [1, 2, {"key3": -1}]})),
            Value::from(tensor),
        ];
        for (i, value) in values.iter().enumerate() {
            let key = KeyPath::from(format!("k{}", i));
            store.put(&key, value).unwrap();
            assert_eq!(store.get(&key).unwrap().as_ref(), Some(value));
        }
        assert_eq!(store.len().unwrap(), values.len());
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn prefixed_iteration_and_counting() {
    let (uri, dir) = start_service().await;
    let path = db_path(&dir);

    tokio::task::spawn_blocking(move || {
        let store = RemoteStore::connect(&uri, path).unwrap();
        store
            .put(&KeyPath::value(["b", "k1"]), &Value::from("v1"))
            .unwrap();
        store
            .put(&KeyPath::value(["b", "k2"]), &Value::from("v3"))
            .unwrap();
        store
            .put(&KeyPath::value(["c", "k4"]), &Value::from("v2"))
            .unwrap();

        // Ordered pairs over the whole store.
        assert_eq!(
            store.iter(&IterOptions::default()).unwrap(),
            vec![
                IterItem::Pair("bk1".to_string(), Value::from("v1")),
                IterItem::Pair("bk2".to_string(), Value::from("v3")),
                IterItem::Pair("ck4".to_string(), Value::from("v2")),
            ]
        );

        // prefixes are consumed and stripped from yielded keys.
        assert_eq!(
            store
                .iter(&IterOptions::new().with_prefixes(["b"]))
                .unwrap(),
            vec![
                IterItem::Pair("k1".to_string(), Value::from("v1")),
                IterItem::Pair("k2".to_string(), Value::from("v3")),
            ]
        );

        // starting_by narrows but stays in yielded keys.
        assert_eq!(
            store
                .iter(&IterOptions::new().with_starting_by(["b"]).keys_only())
                .unwrap(),
            vec![
                IterItem::Key("bk1".to_string()),
                IterItem::Key("bk2".to_string()),
            ]
        );

        assert_eq!(
            store
                .count(&IterOptions::new().with_prefixes(["b"]))
                .unwrap(),
            2
        );
        assert_eq!(store.len().unwrap(), 3);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn sub_store_scopes_all_operations() {
    let (uri, dir) = start_service().await;
    let path = db_path(&dir);

    tokio::task::spawn_blocking(move || {
        let store = RemoteStore::connect(&uri, path).unwrap();
        store
            .put(&KeyPath::value(["p", "k1"]), &Value::from("v1"))
            .unwrap();
        store
            .put(&KeyPath::value(["q", "k2"]), &Value::from("v2"))
            .unwrap();

        let sub = store.sub_store(&KeyPath::sub_store(["p"])).unwrap();
        assert_eq!(
            sub.get(&KeyPath::from("k1")).unwrap(),
            Some(Value::from("v1"))
        );
        assert_eq!(sub.len().unwrap(), 1);
        assert_eq!(
            sub.iter(&IterOptions::default()).unwrap(),
            vec![IterItem::Pair("k1".to_string(), Value::from("v1"))]
        );

        // Writes through the sub-store land under the prefix.
        sub.put(&KeyPath::from("k9"), &Value::from(9i64)).unwrap();
        assert_eq!(
            store.get(&KeyPath::from("pk9")).unwrap(),
            Some(Value::Int(9))
        );
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn two_clients_share_one_server_side_store() {
    let (uri, dir) = start_service().await;
    let path = db_path(&dir);

    tokio::task::spawn_blocking(move || {
        let writer = RemoteStore::connect(&uri, path.clone()).unwrap();
        let reader = RemoteStore::connect(&uri, path).unwrap();

        writer
            .put(&KeyPath::from("shared"), &Value::from(1i64))
            .unwrap();
        assert_eq!(
            reader.get(&KeyPath::from("shared")).unwrap(),
            Some(Value::Int(1))
        );
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn repr_names_the_database_path() {
    let (uri, dir) = start_service().await;
    let path = db_path(&dir);

    tokio::task::spawn_blocking(move || {
        let store = RemoteStore::connect(&uri, path.clone()).unwrap();
        let described = store.describe().unwrap();
        assert!(described.starts_with("StoreHandle(db_path="));
        assert!(described.contains(dir.path().file_name().unwrap().to_str().unwrap()));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn missing_dbpath_answers_bad_request() {
    let (uri, _dir) = start_service().await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("{uri}getitem?key=k1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body = response.text().await.unwrap();
    assert!(body.contains("dbpath"));
}

#[tokio::test]
async fn malformed_blob_is_rejected_before_storage() {
    let (uri, dir) = start_service().await;
    let path = db_path(&dir);

    let client = reqwest::Client::new();
    // "AA==" decodes to the single byte 0x00, which is no known tag.
    let response = client
        .post(format!("{uri}setitem?dbpath={path}&key=k1"))
        .body("AA==")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body = response.text().await.unwrap();
    assert!(body.contains("missing type identifier"));

    // Nothing landed.
    let count = client
        .get(format!("{uri}dblen?dbpath={path}"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(count, "0");
}

#[tokio::test]
async fn unreachable_server_fails_at_connect() {
    let result = tokio::task::spawn_blocking(|| {
        RemoteStore::connect("http://127.0.0.1:1/", "/tmp/never")
    })
    .await
    .unwrap();
    assert!(result.is_err());
}
