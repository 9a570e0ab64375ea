use serde_json::Value;

use crate::helpers::{dec, decimal, TestApp};

#[actix_web::test]
async fn bill_total_is_exact(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("10.00", "A").await;
    let tea = app.create_product("3.50", "B").await;
    let body: Value = app.post_order(8, &[(soup, 2), (tea, 1)]).await.json().await.unwrap();
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    let response = app.get(&format!("/orders/{}/bill", order_id)).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let bill = &body["data"];
    assert_eq!(bill["order_id"], order_id);
    assert_eq!(bill["table_number"], 8);
    assert_eq!(decimal(&bill["total_price"]), dec("23.50"));
    assert_eq!(bill["items"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn bill_of_missing_order_is_404(){
    let app = TestApp::spawn_app().await;

    let response = app.get("/orders/4242/bill").await;

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn bill_reads_are_idempotent(){
    let app = TestApp::spawn_app().await;
    let soup = app.create_product("7.25", "A").await;
    let body: Value = app.post_order(2, &[(soup, 3)]).await.json().await.unwrap();
    let order_id = body["data"]["order_id"].as_i64().unwrap();

    let first: Value = app.get(&format!("/orders/{}/bill", order_id)).await.json().await.unwrap();
    let second: Value = app.get(&format!("/orders/{}/bill", order_id)).await.json().await.unwrap();

    assert_eq!(first, second);
}

#[actix_web::test]
async fn bill_path_must_be_numeric(){
    let app = TestApp::spawn_app().await;

    let response = app.get("/orders/abc/bill").await;

    assert_eq!(response.status().as_u16(), 400);
}
