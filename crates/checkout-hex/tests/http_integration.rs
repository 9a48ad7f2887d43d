use checkout_hex::application::checkout_service::CheckoutService;
use checkout_hex::inbound::http::{HttpServer, HttpServerConfig};
use checkout_repo::memory::InMemoryRepo;
use checkout_types::domain::cart::CartItem;
use checkout_types::domain::catalog::{find_add_on, find_plan, BillingTerm, Plan};
use checkout_types::domain::order::{Order, OrderDraft};
use checkout_types::domain::promo::PromoBook;
use checkout_types::ports::order_repository::{OrderRepository, RepoError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::json;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Store whose every call fails, for exercising the error responses.
struct FailingRepo;

#[async_trait::async_trait]
impl OrderRepository for FailingRepo {
    async fn create(&self, _draft: OrderDraft) -> Result<Order, RepoError> {
        Err(RepoError::DbError("disk full".into()))
    }

    async fn get(&self, _id: uuid::Uuid) -> Result<Option<Order>, RepoError> {
        Err(RepoError::DbError("connection reset".into()))
    }
}

async fn start_server() -> (String, tokio::task::JoinHandle<()>) {
    start_server_with(InMemoryRepo::new()).await
}

async fn start_server_with<R: OrderRepository>(repo: R) -> (String, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let config = HttpServerConfig {
        port: port.to_string(),
    };
    let service = CheckoutService::new(repo, PromoBook::seed());
    let server = HttpServer::new(service, config).await.unwrap();
    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });

    // Give the server a moment to start.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    (format!("http://127.0.0.1:{}/api", port), handle)
}

fn order_body(cart_item: &CartItem, promo_code: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "email": "http@example.com",
        "password": "password123",
        "cartItem": cart_item,
        "paymentDetails": {
            "cardNumber": "4242424242424242",
            "expiryDate": "12/30",
            "cvv": "123",
            "country": "US"
        }
    });
    if let Some(code) = promo_code {
        body["promoCode"] = json!(code);
    }
    body
}

#[derive(Deserialize)]
struct PromoReply {
    valid: bool,
    discount: Decimal,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    id: String,
    email: String,
    total: Decimal,
}

#[derive(Deserialize)]
struct Created {
    success: bool,
    order: Summary,
    message: String,
}

#[derive(Deserialize)]
struct Fetched {
    success: bool,
    order: Order,
}

#[derive(Deserialize)]
struct Failure {
    success: bool,
    message: String,
}

#[tokio::test]
async fn promo_validation_over_http() {
    let (addr, handle) = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/promo-code/validate", addr))
        .json(&json!({ "code": "ultimate20" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let reply: PromoReply = res.json().await.unwrap();
    assert!(reply.valid);
    assert_eq!(reply.discount, dec!(0.2));
    assert_eq!(reply.message, "Promo code applied - 20% off");

    let res = client
        .post(format!("{}/promo-code/validate", addr))
        .json(&json!({ "code": "NOPE" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let reply: PromoReply = res.json().await.unwrap();
    assert!(!reply.valid);
    assert_eq!(reply.discount, Decimal::ZERO);
    assert_eq!(reply.message, "Invalid promo code");

    for bad in [json!({ "code": "" }), json!({ "promo": "SAVE10" })] {
        let res = client
            .post(format!("{}/promo-code/validate", addr))
            .json(&bad)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
        let reply: PromoReply = res.json().await.unwrap();
        assert_eq!(reply.message, "Invalid request");
    }

    handle.abort();
}

#[tokio::test]
async fn create_then_fetch_over_http() {
    let (addr, handle) = start_server().await;
    let client = reqwest::Client::new();

    let mut cart_item = CartItem::for_plan(find_plan("premium").unwrap(), BillingTerm::Yearly);
    cart_item.toggle_add_on(find_add_on("vpn").unwrap());

    let res = client
        .post(format!("{}/orders", addr))
        .json(&order_body(&cart_item, Some("SAVE10")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: Created = res.json().await.unwrap();
    assert!(created.success);
    assert_eq!(created.message, "Order created successfully");
    assert_eq!(created.order.email, "http@example.com");
    assert_eq!(created.order.total, dec!(74.981));

    let res = client
        .get(format!("{}/orders/{}", addr, created.order.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let fetched: Fetched = res.json().await.unwrap();
    assert!(fetched.success);
    assert_eq!(fetched.order.id.to_string(), created.order.id);
    assert_eq!(fetched.order.cart_item, cart_item);
    assert_eq!(fetched.order.subtotal, dec!(79.98));
    assert_eq!(fetched.order.promo_code.as_deref(), Some("SAVE10"));

    handle.abort();
}

#[tokio::test]
async fn bogus_promo_still_creates_order() {
    let (addr, handle) = start_server().await;
    let client = reqwest::Client::new();

    let cart_item = CartItem::for_plan(find_plan("premium").unwrap(), BillingTerm::Monthly);
    let res = client
        .post(format!("{}/orders", addr))
        .json(&order_body(&cart_item, Some("BOGUS")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: Created = res.json().await.unwrap();
    assert_eq!(created.order.total, dec!(4.99));

    let fetched: Fetched = client
        .get(format!("{}/orders/{}", addr, created.order.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.order.discount, Decimal::ZERO);

    handle.abort();
}

#[tokio::test]
async fn bad_request_and_not_found_paths() {
    let (addr, handle) = start_server().await;
    let client = reqwest::Client::new();

    let cart_item = CartItem::for_plan(find_plan("free").unwrap(), BillingTerm::Yearly);
    let mut short_password = order_body(&cart_item, None);
    short_password["password"] = json!("short");
    let res = client
        .post(format!("{}/orders", addr))
        .json(&short_password)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let failure: Failure = res.json().await.unwrap();
    assert!(!failure.success);
    assert_eq!(failure.message, "Password must be at least 8 characters");

    let mut bad_tier = order_body(&cart_item, None);
    bad_tier["cartItem"]["tier"] = json!("platinum");
    let res = client
        .post(format!("{}/orders", addr))
        .json(&bad_tier)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let failure: Failure = res.json().await.unwrap();
    assert_eq!(failure.message, "Invalid request");

    for missing in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let res = client
            .get(format!("{}/orders/{}", addr, missing))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
        let failure: Failure = res.json().await.unwrap();
        assert!(!failure.success);
        assert_eq!(failure.message, "Order not found");
    }

    handle.abort();
}

#[tokio::test]
async fn oversized_prices_are_rejected_not_crashed() {
    let (addr, handle) = start_server().await;
    let client = reqwest::Client::new();

    let mut cart_item = CartItem::for_plan(find_plan("premium").unwrap(), BillingTerm::Monthly);
    cart_item.toggle_add_on(find_add_on("vpn").unwrap());
    let mut body = order_body(&cart_item, None);
    body["cartItem"]["price"] = json!(5e28);
    body["cartItem"]["addOns"][0]["monthlyPrice"] = json!(5e28);

    let res = client
        .post(format!("{}/orders", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let failure: Failure = res.json().await.unwrap();
    assert!(!failure.success);
    assert_eq!(failure.message, "Price is out of range");

    // The server keeps serving after the rejected submission.
    let res = client
        .post(format!("{}/orders", addr))
        .json(&order_body(&cart_item, None))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    handle.abort();
}

#[tokio::test]
async fn store_failures_map_to_generic_messages() {
    let (addr, handle) = start_server_with(FailingRepo).await;
    let client = reqwest::Client::new();

    let cart_item = CartItem::for_plan(find_plan("premium").unwrap(), BillingTerm::Yearly);
    let res = client
        .post(format!("{}/orders", addr))
        .json(&order_body(&cart_item, Some("SAVE10")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let failure: Failure = res.json().await.unwrap();
    assert!(!failure.success);
    assert_eq!(failure.message, "Failed to create order");

    let res = client
        .get(format!("{}/orders/{}", addr, uuid::Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let failure: Failure = res.json().await.unwrap();
    assert!(!failure.success);
    assert_eq!(failure.message, "Failed to retrieve order");

    handle.abort();
}

#[tokio::test]
async fn catalog_and_health() {
    let (addr, handle) = start_server().await;
    let client = reqwest::Client::new();

    let plans: Vec<Plan> = client
        .get(format!("{}/plans", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[1].yearly_price, dec!(49.99));

    let health = client
        .get(addr.trim_end_matches("/api").to_string() + "/health")
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), reqwest::StatusCode::OK);

    handle.abort();
}
