//! AI 文案与销售分析
//!
//! 尽力而为的外部调用: 有超时限制, 不在结账路径上, 任何失败都降级为固定文案。
//! 错误类型 [`EnrichmentError`] 不会离开本模块。

use std::time::Duration;

use serde_json::{Value, json};
use shared::models::Transaction;
use thiserror::Error;

use crate::core::AiConfig;

pub const DESCRIPTION_NO_KEY: &str = "Deskripsi AI tidak tersedia (API Key hilang).";
pub const DESCRIPTION_FAILED: &str = "Tidak dapat membuat deskripsi saat ini.";
pub const INSIGHT_NO_KEY: &str = "Analisis AI membutuhkan API Key.";
pub const INSIGHT_NO_DATA: &str = "Belum ada data penjualan untuk dianalisis.";
pub const INSIGHT_FAILED: &str = "Tidak dapat menganalisis data saat ini.";

/// 单次分析发送的最近交易数
pub const INSIGHT_WINDOW: usize = 20;

#[derive(Debug, Error)]
enum EnrichmentError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected response: {0}")]
    Malformed(String),
}

/// 生成式模型客户端
#[derive(Clone)]
pub struct EnrichmentClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl std::fmt::Debug for EnrichmentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentClient")
            .field("model", &self.config.model)
            .field("endpoint", &self.config.endpoint)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// 取 `candidates[0].content.parts[0].text`
fn extract_text(body: &Value) -> Option<String> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn description_prompt(name: &str, category: &str) -> String {
    format!(
        "Buatkan deskripsi produk yang menarik, menggugah selera, dan singkat (maksimal 20 kata) \
         dalam Bahasa Indonesia untuk produk bernama \"{}\" yang termasuk dalam kategori \"{}\". \
         Jangan gunakan tanda kutip.",
        name, category
    )
}

fn insight_prompt(transactions: &[Transaction]) -> String {
    let data: Vec<Value> = transactions
        .iter()
        .take(INSIGHT_WINDOW)
        .map(|t| {
            let date = chrono::DateTime::from_timestamp_millis(t.timestamp)
                .map(|dt| dt.date_naive().to_string())
                .unwrap_or_default();
            let items = t
                .items
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            json!({ "date": date, "total": t.total, "items": items })
        })
        .collect();

    format!(
        "Anda adalah analis bisnis profesional. Analisis data transaksi POS terbaru berikut ini: {}. \
         Berikan ringkasan wawasan singkat (3 kalimat) tentang performa penjualan dan tren produk \
         terlaris dalam Bahasa Indonesia yang profesional dan menyemangati.",
        Value::Array(data)
    )
}

impl EnrichmentClient {
    pub fn new(config: AiConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build AI http client: {}, using defaults", e);
                reqwest::Client::new()
            });
        Self { http, config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// 商品描述 (不超过 20 个词)
    pub async fn product_description(&self, name: &str, category: &str) -> String {
        if !self.is_enabled() {
            tracing::warn!("AI API key not configured, skipping product description");
            return DESCRIPTION_NO_KEY.to_string();
        }
        match self.generate(description_prompt(name, category)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(product = %name, error = %e, "AI description failed");
                DESCRIPTION_FAILED.to_string()
            }
        }
    }

    /// 销售分析 (三句话); `transactions` 按时间倒序, 只取最近 20 笔
    pub async fn sales_insight(&self, transactions: &[Transaction]) -> String {
        if transactions.is_empty() {
            return INSIGHT_NO_DATA.to_string();
        }
        if !self.is_enabled() {
            return INSIGHT_NO_KEY.to_string();
        }
        match self.generate(insight_prompt(transactions)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "AI sales insight failed");
                INSIGHT_FAILED.to_string()
            }
        }
    }

    async fn generate(&self, prompt: String) -> Result<String, EnrichmentError> {
        let key = self.config.api_key.as_deref().unwrap_or_default();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let request = self
            .http
            .post(url)
            .query(&[("key", key)])
            .json(&body)
            .send();
        // 客户端超时覆盖响应读取, 这里同时限制连接建立
        let response = tokio::time::timeout(
            Duration::from_millis(self.config.timeout_ms),
            request,
        )
        .await
        .map_err(|_| EnrichmentError::Timeout)??
        .error_for_status()?;

        let body: Value = response.json().await?;
        extract_text(&body).ok_or_else(|| EnrichmentError::Malformed(body.to_string()))
    }
}
