//! Payment provider (opaque call)
//!
//! 对核心只暴露 "创建 intent / 读取 intent 状态" 两个操作。
//! 未配置 PAYMENT_API_URL 时进入开发模式：本地生成已成功的
//! intent，方便无支付环境联调。

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment provider error: {0}")]
    Provider(String),

    #[error("payment intent {0} not found")]
    IntentNotFound(String),
}

/// Intent status as reported by the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    Succeeded,
    Processing,
    Failed,
}

/// Payment intent (provider response subset)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: PaymentIntentStatus,
    pub amount: Decimal,
    /// 创建时附带的业务元数据，确认时原样取回
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// 前端完成支付所需的凭据
    pub client_secret: Option<String>,
}

#[derive(Debug)]
pub struct PaymentService {
    api_url: Option<String>,
    api_key: String,
    client: reqwest::Client,
    /// 开发模式下已创建的 intent (确认时取回元数据)
    dev_intents: DashMap<String, PaymentIntent>,
}

impl PaymentService {
    pub fn new(api_url: Option<String>, api_key: String) -> Self {
        Self {
            api_url,
            api_key,
            client: reqwest::Client::new(),
            dev_intents: DashMap::new(),
        }
    }

    /// Create a payment intent for the given amount
    pub async fn create_intent(
        &self,
        amount: Decimal,
        metadata: serde_json::Value,
    ) -> Result<PaymentIntent, PaymentError> {
        let Some(url) = &self.api_url else {
            // 开发模式：直接判定成功，留存元数据供确认时取回
            let id = format!("pi_dev_{}", Uuid::new_v4().simple());
            tracing::info!(intent = %id, "Payment provider not configured, using dev-mode intent");
            let intent = PaymentIntent {
                id: id.clone(),
                status: PaymentIntentStatus::Succeeded,
                amount,
                metadata,
                client_secret: Some(format!("{id}_secret")),
            };
            self.dev_intents.insert(id, intent.clone());
            return Ok(intent);
        };

        let body = serde_json::json!({
            "amount": amount,
            "currency": "eur",
            "metadata": metadata,
        });
        let resp = self
            .client
            .post(format!("{url}/v1/payment_intents"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Provider(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PaymentError::Provider(format!(
                "create intent returned {}",
                resp.status()
            )));
        }

        resp.json::<PaymentIntent>()
            .await
            .map_err(|e| PaymentError::Provider(e.to_string()))
    }

    /// Retrieve an intent to verify its final status
    pub async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError> {
        let Some(url) = &self.api_url else {
            return self
                .dev_intents
                .get(intent_id)
                .map(|i| i.clone())
                .ok_or_else(|| PaymentError::IntentNotFound(intent_id.to_string()));
        };

        let resp = self
            .client
            .get(format!("{url}/v1/payment_intents/{intent_id}"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| PaymentError::Provider(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PaymentError::IntentNotFound(intent_id.to_string()));
        }
        if !resp.status().is_success() {
            return Err(PaymentError::Provider(format!(
                "retrieve intent returned {}",
                resp.status()
            )));
        }

        resp.json::<PaymentIntent>()
            .await
            .map_err(|e| PaymentError::Provider(e.to_string()))
    }
}
