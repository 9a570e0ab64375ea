use serde_json::{json, Value};

use crate::helpers::{dec, decimal, TestApp};

#[actix_web::test]
async fn item_added_later_shows_up_on_the_bill(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    let tea = app.create_product("1.50", "B").await;
    let body: Value = app.post_order(5, &[(soup, 1)]).await.json().await.unwrap();
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    let response = app.post_json(
        "/order-items",
        &json!({ "order_id": order_id, "product_id": tea, "quantity": 2 })
    ).await;
    assert_eq!(response.status().as_u16(), 201);

    let bill: Value = app.get(&format!("/orders/{}/bill", order_id)).await.json().await.unwrap();
    assert_eq!(decimal(&bill["data"]["total_price"]), dec("13.00"));
}

#[actix_web::test]
async fn item_for_unknown_order_is_404(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;

    let response = app.post_json(
        "/order-items",
        &json!({ "order_id": 31, "product_id": soup, "quantity": 1 })
    ).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn item_cannot_be_moved_to_another_order(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    app.post_order(5, &[(soup, 1)]).await;

    let items: Value = app.get("/order-items").await.json().await.unwrap();
    let item_id = items["data"][0]["id"].as_i64().unwrap();

    let response = app.put_json(&format!("/order-items?id={}", item_id), &json!({ "order_id": 2 })).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.put_json(&format!("/order-items?id={}", item_id), &json!({ "quantity": 4 })).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["quantity"], 4);
}

#[actix_web::test]
async fn deleted_item_is_dropped_from_the_bill(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    let tea = app.create_product("2.00", "B").await;
    let body: Value = app.post_order(5, &[(soup, 1), (tea, 1)]).await.json().await.unwrap();
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    let items: Value = app.get("/order-items").await.json().await.unwrap();
    let tea_item = items["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["product_id"] == tea)
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    assert_eq!(app.delete(&format!("/order-items?id={}", tea_item)).await.status().as_u16(), 200);

    let bill: Value = app.get(&format!("/orders/{}/bill", order_id)).await.json().await.unwrap();
    assert_eq!(bill["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(decimal(&bill["data"]["total_price"]), dec("10.00"));
}

#[actix_web::test]
async fn missing_id_query_is_400(){
    let app = TestApp::spawn_app().await;

    let response = app.delete("/order-items").await;

    assert_eq!(response.status().as_u16(), 400);
}
