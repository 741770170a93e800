//! QR code generators.

use serde::Serialize;
use toolhub_core::validation::{require_text, MSG_PRODUCT_REQUIRED};

use super::decode_inline_image;
use crate::api::{ApiError, ToolhubApi};
use crate::schemas::QrResponse;

/// Content of a general-purpose QR code, sent as `{type, ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QrContent {
    Text {
        text: String,
        size: u32,
        error_correction: String,
    },
    Wifi {
        ssid: String,
        password: String,
        security: String,
        hidden: bool,
    },
    Contact {
        name: String,
        phone: String,
        email: String,
        url: String,
        address: String,
    },
    Email {
        to: String,
        subject: String,
        body: String,
    },
}

/// Product label encoded into a QR code.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductQr {
    pub name: String,
    pub sku: String,
    pub price: String,
    pub currency: String,
    pub manufacturer: String,
    pub category: String,
    pub description: String,
    pub website: String,
    pub image_url: String,
    pub size: u32,
    pub error_correction: String,
}

#[derive(Serialize)]
struct ProductRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    product: &'a ProductQr,
}

impl QrResponse {
    /// The PNG bytes of the code.
    pub fn png(&self) -> Result<Vec<u8>, ApiError> {
        decode_inline_image(&self.qr_code)
    }
}

impl ToolhubApi {
    pub async fn generate_qr(&self, content: &QrContent) -> Result<QrResponse, ApiError> {
        self.post_json("/generate-qr", content).await
    }

    /// Generate a product code. Name and SKU are mandatory.
    pub async fn generate_product_qr(&self, product: &ProductQr) -> Result<QrResponse, ApiError> {
        require_text(&product.name, MSG_PRODUCT_REQUIRED)?;
        require_text(&product.sku, MSG_PRODUCT_REQUIRED)?;

        let product = ProductQr {
            name: product.name.trim().to_string(),
            sku: product.sku.trim().to_string(),
            ..product.clone()
        };
        let body = ProductRequest {
            kind: "product",
            product: &product,
        };
        let reply: QrResponse = self.post_json("/generate-product-qr", &body).await?;
        tracing::info!(sku = %product.sku, "Product QR generated");
        Ok(reply)
    }
}
