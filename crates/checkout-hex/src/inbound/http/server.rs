use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    serve, Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::checkout_service::{CheckoutService, PlaceOrder};
use crate::errors::AppError;
use checkout_types::domain::cart::CartItem;
use checkout_types::domain::catalog::{self, AddOn, Plan};
use checkout_types::domain::checkout::{Credentials, PaymentDetails};
use checkout_types::domain::order::Order;
use checkout_types::domain::pricing::discount_percent;
use checkout_types::ports::order_repository::OrderRepository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: OrderRepository,
{
    pub service: Arc<CheckoutService<R>>,
    pub config: HttpServerConfig,
}

#[derive(Deserialize)]
pub struct PromoCodeRequest {
    pub code: String,
}

#[derive(Serialize)]
struct PromoCodeResponse {
    valid: bool,
    discount: Decimal,
    message: String,
}

impl PromoCodeResponse {
    fn rejected(message: &str) -> (StatusCode, Json<Self>) {
        (
            StatusCode::BAD_REQUEST,
            Json(Self {
                valid: false,
                discount: Decimal::ZERO,
                message: message.into(),
            }),
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub email: String,
    pub password: String,
    pub cart_item: CartItem,
    #[serde(default)]
    pub promo_code: Option<String>,
    pub payment_details: PaymentDetails,
}

impl From<CreateOrderRequest> for PlaceOrder {
    fn from(r: CreateOrderRequest) -> Self {
        Self {
            credentials: Credentials {
                email: r.email,
                password: r.password,
            },
            cart_item: r.cart_item,
            promo_code: r.promo_code,
            payment: r.payment_details,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderSummary {
    id: String,
    email: String,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl From<Order> for OrderSummary {
    fn from(o: Order) -> Self {
        Self {
            id: o.id.to_string(),
            email: o.email,
            total: o.total,
            created_at: o.created_at,
        }
    }
}

#[derive(Serialize)]
struct CreateOrderResponse {
    success: bool,
    order: OrderSummary,
    message: String,
}

#[derive(Serialize)]
struct GetOrderResponse {
    success: bool,
    order: Order,
}

impl<R> HttpServer<R>
where
    R: OrderRepository + Send + Sync + 'static,
{
    pub async fn new(service: CheckoutService<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        let api = Router::new()
            .route("/plans", get(list_plans))
            .route("/add-ons", get(list_add_ons))
            .route("/promo-code/validate", post(validate_promo::<R>))
            .route("/orders", post(create_order::<R>))
            .route("/orders/{id}", get(get_order::<R>));

        let svc = self.service.clone();
        let app = Router::new()
            .route("/health", get(health))
            .nest("/api", api)
            .layer(trace_layer)
            .with_state(svc);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn list_plans() -> Json<&'static [Plan]> {
    Json(catalog::plans())
}

async fn list_add_ons() -> Json<&'static [AddOn]> {
    Json(catalog::add_ons())
}

async fn validate_promo<R>(
    State(service): State<Arc<CheckoutService<R>>>,
    payload: Result<Json<PromoCodeRequest>, JsonRejection>,
) -> (StatusCode, Json<PromoCodeResponse>)
where
    R: OrderRepository + Send + Sync + 'static,
{
    let code = match payload {
        Ok(Json(req)) if !req.code.is_empty() => req.code,
        Ok(_) => return PromoCodeResponse::rejected("Invalid request"),
        Err(rejection) => {
            tracing::debug!(%rejection, "malformed promo request");
            return PromoCodeResponse::rejected("Invalid request");
        }
    };

    let promo = service.validate_promo(&code);
    if !promo.valid {
        return PromoCodeResponse::rejected("Invalid promo code");
    }
    (
        StatusCode::OK,
        Json(PromoCodeResponse {
            valid: true,
            discount: promo.discount,
            message: format!(
                "Promo code applied - {}% off",
                discount_percent(promo.discount)
            ),
        }),
    )
}

async fn create_order<R>(
    State(service): State<Arc<CheckoutService<R>>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError>
where
    R: OrderRepository + Send + Sync + 'static,
{
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "malformed order request");
        AppError::BadRequest("Invalid request".into())
    })?;

    // Store failures surface as a rejected submission so the client can resubmit.
    let order = service
        .place_order(payload.into())
        .await
        .map_err(|e| match e {
            AppError::Internal(err) => {
                tracing::error!(error = %format!("{err:#}"), "order creation failed");
                AppError::BadRequest("Failed to create order".into())
            }
            other => other,
        })?;

    let body = CreateOrderResponse {
        success: true,
        order: order.into(),
        message: "Order created successfully".into(),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

async fn get_order<R>(
    State(service): State<Arc<CheckoutService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<GetOrderResponse>, AppError>
where
    R: OrderRepository + Send + Sync + 'static,
{
    // A malformed id cannot name a stored order.
    let uuid = Uuid::parse_str(&id).map_err(|_| AppError::NotFound("Order not found".into()))?;
    let order = service.get_order(uuid).await?;
    Ok(Json(GetOrderResponse {
        success: true,
        order,
    }))
}
