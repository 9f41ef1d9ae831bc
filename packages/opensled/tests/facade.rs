use std::sync::Arc;

use serde_json::json;

use opensled::{Database, DbError, IterItem, IterOptions, KeyPath, Registry, Value};

async fn start_service() -> (String, tempfile::TempDir) {
    let registry = Arc::new(Registry::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(opensled::serve(listener, registry));
    (format!("http://{addr}/"), tempfile::tempdir().unwrap())
}

#[tokio::test]
async fn remote_facade_mirrors_the_local_surface() {
    let (uri, dir) = start_service().await;
    let path = dir.path().to_str().unwrap().to_string();

    tokio::task::spawn_blocking(move || {
        let db = Database::connect(&uri, path).unwrap();

        db.put(&KeyPath::value(["b", "k1"]), &Value::from("v1"))
            .unwrap();
        db.put(
            &KeyPath::from("doc"),
            &Value::Json(json!({"nested": [1, 2, 3]})),
        )
        .unwrap();

        assert_eq!(
            db.get(&KeyPath::from("bk1")).unwrap(),
            Some(Value::from("v1"))
        );
        assert_eq!(db.len().unwrap(), 2);

        let under_b: Vec<IterItem> = db
            .iter(&IterOptions::new().with_prefixes(["b"]))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            under_b,
            vec![IterItem::Pair("k1".to_string(), Value::from("v1"))]
        );

        let sub = db.sub_store(&KeyPath::sub_store(["b"])).unwrap();
        assert_eq!(
            sub.get(&KeyPath::from("k1")).unwrap(),
            Some(Value::from("v1"))
        );

        db.delete(&KeyPath::from("doc")).unwrap();
        assert_eq!(db.len().unwrap(), 1);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn remote_read_only_rejects_writes_before_the_wire() {
    let (uri, dir) = start_service().await;
    let path = dir.path().to_str().unwrap().to_string();

    tokio::task::spawn_blocking(move || {
        let writer = Database::connect(&uri, path.clone()).unwrap();
        writer
            .put(&KeyPath::from("k"), &Value::from(1i64))
            .unwrap();

        let db = Database::connect_read_only(&uri, path).unwrap();
        assert_eq!(db.get(&KeyPath::from("k")).unwrap(), Some(Value::Int(1)));
        assert!(matches!(
            db.put(&KeyPath::from("k"), &Value::from(2i64)),
            Err(DbError::NotWritable { .. })
        ));
        assert!(matches!(
            db.delete(&KeyPath::from("k")),
            Err(DbError::NotWritable { .. })
        ));
    })
    .await
    .unwrap();
}
