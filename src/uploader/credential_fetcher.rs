use async_trait::async_trait;
use futures::future::BoxFuture;
use garde::Validate;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::collections::HashMap;
use std::time::Duration;

use crate::uploader::{Credentials, UploaderError};

/// 上传凭证获取接口
///
/// 返回 `Ok(None)` 表示没有可用的新凭证，调用方保持现有状态不变
#[async_trait]
pub trait CredentialFetcher: Send + Sync {
    async fn fetch(&self, provider_type: &str) -> Result<Option<Credentials>, UploaderError>;
}

// ============================================================================
// 固定凭证
// ============================================================================

/// 固定凭证，主要用于测试和凭证由外部下发的场景
#[derive(Debug, Clone)]
pub struct StaticCredentialFetcher {
    credentials: Option<Credentials>,
}

impl StaticCredentialFetcher {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }

    /// 永远返回空结果
    pub fn empty() -> Self {
        Self { credentials: None }
    }
}

#[async_trait]
impl CredentialFetcher for StaticCredentialFetcher {
    async fn fetch(&self, _provider_type: &str) -> Result<Option<Credentials>, UploaderError> {
        Ok(self.credentials.clone())
    }
}

// ============================================================================
// 闭包
// ============================================================================

type FetchFn =
    dyn Fn(String) -> BoxFuture<'static, Result<Option<Credentials>, UploaderError>> + Send + Sync;

/// 把异步闭包包装成 CredentialFetcher
///
/// # 示例
///
/// ```rust
/// use oss_uploader::uploader::{Credentials, FnCredentialFetcher};
///
/// let fetcher = FnCredentialFetcher::new(|provider_type| async move {
///     Ok(Some(Credentials {
///         provider_type,
///         ..Default::default()
///     }))
/// });
/// ```
pub struct FnCredentialFetcher {
    func: Box<FetchFn>,
}

impl FnCredentialFetcher {
    pub fn new<F, Fut>(func: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Option<Credentials>, UploaderError>> + Send + 'static,
    {
        Self {
            func: Box::new(move |provider_type| Box::pin(func(provider_type))),
        }
    }
}

#[async_trait]
impl CredentialFetcher for FnCredentialFetcher {
    async fn fetch(&self, provider_type: &str) -> Result<Option<Credentials>, UploaderError> {
        (self.func)(provider_type.to_string()).await
    }
}

// ============================================================================
// HTTP 接口
// ============================================================================

/// 凭证接口配置
#[derive(Debug, Deserialize, Serialize, SmartDefault, Clone, PartialEq, Validate)]
#[serde(default)]
pub struct HttpCredentialFetcherConfig {
    /// 凭证接口地址，请求时附加 `type={厂商类型}` 查询参数
    #[garde(length(min = 1))]
    pub url: String,

    /// 附加请求头，如鉴权 token
    #[garde(skip)]
    pub headers: HashMap<String, String>,

    /// 凭证在响应 JSON 中的位置（JSON Pointer），如 `/data`；为空时整个响应即凭证
    #[garde(skip)]
    pub pointer: Option<String>,

    /// 请求超时（秒）
    #[garde(skip)]
    #[default = 10]
    pub timeout_secs: u64,
}

/// 从 HTTP 接口获取上传凭证
pub struct HttpCredentialFetcher {
    client: reqwest::Client,
    config: HttpCredentialFetcherConfig,
}

impl HttpCredentialFetcher {
    pub fn new(config: HttpCredentialFetcherConfig) -> Result<Self, UploaderError> {
        if let Err(errors) = config.validate() {
            return Err(UploaderError::Configuration(format!("{}", errors)));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UploaderError::Configuration(format!("创建 HTTP 客户端失败: {}", e)))?;

        Ok(Self { client, config })
    }

    /// 从响应体中取出凭证，空响应或 null 视为没有凭证
    fn parse_body(&self, body: &str) -> Result<Option<Credentials>, UploaderError> {
        if body.trim().is_empty() {
            return Ok(None);
        }

        let value: serde_json::Value = serde_json::from_str(body)?;
        let value = match self.config.pointer.as_deref() {
            Some(pointer) => value.pointer(pointer).cloned().unwrap_or_default(),
            None => value,
        };

        if value.is_null() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(value)?))
    }
}

#[async_trait]
impl CredentialFetcher for HttpCredentialFetcher {
    async fn fetch(&self, provider_type: &str) -> Result<Option<Credentials>, UploaderError> {
        let mut request = self
            .client
            .get(&self.config.url)
            .query(&[("type", provider_type)]);

        for (name, value) in &self.config.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| UploaderError::CredentialFetch(format!("请求凭证接口失败: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(UploaderError::CredentialFetch(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UploaderError::CredentialFetch(format!("读取凭证失败: {}", e)))?;

        self.parse_body(&body)
    }
}
