mod common;

use common::*;
use serde_json::json;

fn url(path: &str) -> String {
    if path.contains('?') {
        format!("/v1/menu{}&token={}", path, TOKEN)
    } else {
        format!("/v1/menu{}?token={}", path, TOKEN)
    }
}

#[tokio::test]
async fn token_is_required() {
    let app = test_app().await;

    let msg = assert_err(&get(&app, "/v1/menu").await);
    assert!(msg.contains("missing token"), "{}", msg);

    let msg = assert_err(&post(&app, "/v1/menu?token=wrong", json!({"title": "x"})).await);
    assert!(msg.contains("invalid token"), "{}", msg);

    assert_ok(&get(&app, &url("")).await);
}

#[tokio::test]
async fn filters_are_anded_and_typed() {
    let app = test_app().await;
    for (title, ty) in [("Foo", 2), ("Foo", 1), ("Bar", 2)] {
        let env = post(
            &app,
            &url(""),
            json!({"title": title, "type": ty, "image": "https://cdn/x.png", "link": "/sale"}),
        )
        .await;
        assert_ok(&env);
        assert_eq!(env["data"]["type"], ty);
    }

    let env = get(&app, &url("?query=title:Foo,type:2")).await;
    assert_ok(&env);
    let rows = env["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Foo");
    assert_eq!(rows[0]["type"], 2);

    let env = get(&app, &url("?query=type__in:1%7C2&sortby=id&order=desc")).await;
    assert_eq!(ids(&env), vec![3, 2, 1]);

    let msg = assert_err(&get(&app, &url("?query=type:two")).await);
    assert!(msg.contains("invalid value"), "{}", msg);
}

#[tokio::test]
async fn full_lifecycle() {
    let app = test_app().await;
    let created = post(
        &app,
        &url(""),
        json!({"image": "a.png", "link": "/a", "title": "A", "type": 1}),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["image"], "a.png");

    assert_ok(&put(&app, &url(&format!("/{}", id)), json!({"link": "/b", "type": 3})).await);
    let row = &get(&app, &url(&format!("?query=id:{}", id))).await["data"][0];
    assert_eq!(row["link"], "/b");
    assert_eq!(row["type"], 3);
    assert_eq!(row["title"], "A");

    assert_ok(&delete(&app, &url(&format!("/{}", id))).await);
    assert!(get(&app, &url(""))
        .await["data"]
        .as_array()
        .unwrap()
        .is_empty());
}
