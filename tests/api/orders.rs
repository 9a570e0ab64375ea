use futures_util::future::join;
use restaurant::{configuration::StationLookup, storage::Fault};
use serde_json::{json, Value};

use crate::helpers::TestApp;

fn sorted_printers(body: &Value) -> Vec<String> {
    let mut printers: Vec<String> = body["data"]["printers"]
        .as_array()
        .expect("printers missing")
        .iter()
        .map(|p| p.as_str().unwrap().to_string())
        .collect();
    printers.sort();
    printers
}

#[actix_web::test]
async fn order_returns_id_and_distinct_printers(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    let rice = app.create_product("4.00", "A").await;
    let tea = app.create_product("2.00", "B").await;

    let response = app.post_order(3, &[(soup, 1), (rice, 2), (tea, 1)]).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert!(body["data"]["order_id"].as_i64().is_some());
    assert_eq!(sorted_printers(&body), vec!["A".to_string(), "B".to_string()]);
}

#[actix_web::test]
async fn invalid_orders_are_rejected_with_400(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    let cases = vec![
        (json!({ "table_number": 0, "items": [{ "product_id": soup, "quantity": 1 }] }), "table number zero"),
        (json!({ "table_number": 1, "items": [] }), "no items"),
        (json!({ "table_number": 1, "items": [{ "product_id": soup, "quantity": 0 }] }), "zero quantity"),
        (json!({ "items": [{ "product_id": soup, "quantity": 1 }] }), "missing table number"),
        (json!({ "table_number": 1, "items": [{ "product_id": 9999, "quantity": 1 }] }), "unknown product"),
    ];

    for (body, description) in cases {
        let response = app.post_json("/orders", &body).await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not reject an order with {}",
            description
        );
    }

    let body: Value = app.get("/orders").await.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn failed_item_insert_persists_nothing(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    let tea = app.create_product("2.00", "B").await;
    app.storage.inject(Fault::OrderItemInsert(2));

    let response = app.post_order(1, &[(soup, 1), (tea, 1)]).await;
    assert_eq!(response.status().as_u16(), 500);

    app.storage.clear_faults();
    let orders: Value = app.get("/orders").await.json().await.unwrap();
    let items: Value = app.get("/order-items").await.json().await.unwrap();
    assert!(orders["data"].as_array().unwrap().is_empty());
    assert!(items["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn unavailable_storage_returns_503(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    app.storage.inject(Fault::Unavailable);

    let response = app.post_order(1, &[(soup, 1)]).await;

    assert_eq!(response.status().as_u16(), 503);
}

#[actix_web::test]
async fn post_commit_lookup_failure_returns_202_and_can_be_retried(){
    let app = TestApp::spawn_app_with(StationLookup::AfterCommit).await;
    let soup = app.create_product("10.00", "A").await;
    let tea = app.create_product("2.00", "B").await;
    app.storage.inject(Fault::StationLookup);

    let response = app.post_order(6, &[(soup, 1), (tea, 2)]).await;
    assert_eq!(response.status().as_u16(), 202);

    let body: Value = response.json().await.unwrap();
    assert!(body["data"]["printers"].is_null());
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    app.storage.clear_faults();
    let response = app.get(&format!("/orders/{}/printers", order_id)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let mut printers: Vec<String> = serde_json::from_value(body["data"].clone()).unwrap();
    printers.sort();
    assert_eq!(printers, vec!["A".to_string(), "B".to_string()]);
}

#[actix_web::test]
async fn after_commit_lookup_succeeds_normally(){
    let app = TestApp::spawn_app_with(StationLookup::AfterCommit).await;
    let soup = app.create_product("10.00", "A").await;

    let response = app.post_order(6, &[(soup, 1)]).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(sorted_printers(&body), vec!["A".to_string()]);
}

#[actix_web::test]
async fn concurrent_orders_get_distinct_ids(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    let tea = app.create_product("2.00", "B").await;

    let (first, second) = join(
        app.post_order(1, &[(soup, 1)]),
        app.post_order(2, &[(tea, 3)])
    ).await;
    assert_eq!(first.status().as_u16(), 201);
    assert_eq!(second.status().as_u16(), 201);

    let first: Value = first.json().await.unwrap();
    let second: Value = second.json().await.unwrap();
    let first_id = first["data"]["order_id"].as_i64().unwrap();
    let second_id = second["data"]["order_id"].as_i64().unwrap();
    assert_ne!(first_id, second_id);

    let first_bill: Value = app.get(&format!("/orders/{}/bill", first_id)).await.json().await.unwrap();
    let second_bill: Value = app.get(&format!("/orders/{}/bill", second_id)).await.json().await.unwrap();
    assert_eq!(first_bill["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(first_bill["data"]["items"][0]["quantity"], 1);
    assert_eq!(second_bill["data"]["items"][0]["quantity"], 3);
}

#[actix_web::test]
async fn order_table_can_be_updated_but_not_its_id(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    let body: Value = app.post_order(1, &[(soup, 1)]).await.json().await.unwrap();
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    let response = app.put_json(&format!("/orders?id={}", order_id), &json!({ "id": 77 })).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.put_json(&format!("/orders?id={}", order_id), &json!({ "table_number": 12 })).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = app.get(&format!("/orders?id={}", order_id)).await.json().await.unwrap();
    assert_eq!(body["data"]["table_number"], 12);
}

#[actix_web::test]
async fn deleted_order_is_gone(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    let body: Value = app.post_order(1, &[(soup, 1)]).await.json().await.unwrap();
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    assert_eq!(app.delete(&format!("/orders?id={}", order_id)).await.status().as_u16(), 200);

    assert_eq!(app.get(&format!("/orders?id={}", order_id)).await.status().as_u16(), 404);
    assert_eq!(app.get(&format!("/orders/{}/bill", order_id)).await.status().as_u16(), 404);
    assert_eq!(app.get(&format!("/orders/{}/printers", order_id)).await.status().as_u16(), 404);
}
