//! checkout-client: typed HTTP client, local cart snapshot and the checkout flow.

use std::time::Duration;

use anyhow::Context;
use checkout_types::domain::cart::CartItem;
use checkout_types::domain::catalog::{AddOn, Plan};
use checkout_types::domain::checkout::PaymentDetails;
use checkout_types::domain::order::Order;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod cart;
pub mod flow;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The server answered with a failure body.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(String),
}

#[derive(Clone)]
pub struct CheckoutClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct CheckoutClient {
    base: Url,
    client: reqwest::Client,
}

impl CheckoutClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    /// `base_url` is the API root, e.g. `http://localhost:3000/api/`.
    pub fn builder(base_url: &str) -> anyhow::Result<CheckoutClientBuilder> {
        let mut base = Url::parse(base_url).context("invalid base url")?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(CheckoutClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Url(e.to_string()))
    }

    pub async fn plans(&self) -> Result<Vec<Plan>, ClientError> {
        let res = self
            .client
            .get(self.url("plans")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn add_ons(&self) -> Result<Vec<AddOn>, ClientError> {
        let res = self
            .client
            .get(self.url("add-ons")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    /// Unknown codes come back as `valid: false` rather than an error.
    pub async fn validate_promo(&self, code: &str) -> Result<PromoResponse, ClientError> {
        let res = self
            .client
            .post(self.url("promo-code/validate")?)
            .json(&PromoCodeRequest { code })
            .send()
            .await?;
        let status = res.status();
        if status.is_success() || status == StatusCode::BAD_REQUEST {
            return Ok(res.json().await?);
        }
        Err(ClientError::Rejected {
            status,
            message: format!("promo validation failed with {status}"),
        })
    }

    pub async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ClientError> {
        let res = self
            .client
            .post(self.url("orders")?)
            .json(req)
            .send()
            .await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res.json().await?);
        }
        Err(rejection(status, res).await)
    }

    /// `Ok(None)` when the server does not know the id.
    pub async fn get_order(&self, id: &str) -> Result<Option<Order>, ClientError> {
        let res = self
            .client
            .get(self.url(&format!("orders/{id}"))?)
            .send()
            .await?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(rejection(status, res).await);
        }
        let body: GetOrderResponse = res.json().await?;
        Ok(Some(body.order))
    }
}

async fn rejection(status: StatusCode, res: reqwest::Response) -> ClientError {
    let message = match res.json::<FailureBody>().await {
        Ok(body) => body.message,
        Err(e) => {
            tracing::debug!(error = %e, "failure body was not json");
            format!("request failed with {status}")
        }
    };
    ClientError::Rejected { status, message }
}

impl CheckoutClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<CheckoutClient> {
        if let Some(client) = self.client {
            return Ok(CheckoutClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(CheckoutClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Debug)]
struct PromoCodeRequest<'a> {
    code: &'a str,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PromoResponse {
    pub valid: bool,
    pub discount: Decimal,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub email: String,
    pub password: String,
    pub cart_item: CartItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub payment_details: PaymentDetails,
}

impl std::fmt::Debug for CreateOrderRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateOrderRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .field("cart_item", &self.cart_item)
            .field("promo_code", &self.promo_code)
            .field("payment_details", &self.payment_details)
            .finish()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub email: String,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order: OrderSummary,
    pub message: String,
}

#[derive(Deserialize)]
struct GetOrderResponse {
    order: Order,
}

#[derive(Deserialize)]
struct FailureBody {
    message: String,
}
