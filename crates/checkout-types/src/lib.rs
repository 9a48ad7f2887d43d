//! checkout-types: domain model and ports shared by the checkout server and client.

pub mod domain;
pub mod ports;
