use smart_default::SmartDefault;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::uploader::object_key::{object_key, resolve_name, today};
use crate::uploader::{
    build_form_params, BatchUploadResult, CredentialFetcher, Credentials, HttpTransport,
    TransportOutcome, UploadInput, UploadRecord, UploadRequest, UploadResponse, UploadTarget,
    UploadTransport, UploaderError, FILE_FIELD_NAME, PROVIDER_ALIYUN,
};

/// 上传器配置
#[derive(Clone, SmartDefault)]
pub struct UploaderConfig {
    /// 厂商类型：ALIYUN / TXYUN / HUAWEI，原样传给凭证获取接口
    #[default = "ALIYUN"]
    pub provider_type: String,

    /// 凭证获取接口
    pub credential_fetcher: Option<Arc<dyn CredentialFetcher>>,

    /// 平台提供的上传接口，未配置时直接使用备用接口
    pub primary_transport: Option<Arc<dyn UploadTransport>>,

    /// 备用上传接口，默认为 HttpTransport
    pub fallback_transport: Option<Arc<dyn UploadTransport>>,
}

impl UploaderConfig {
    pub fn new(provider_type: impl Into<String>, fetcher: Arc<dyn CredentialFetcher>) -> Self {
        Self {
            provider_type: provider_type.into(),
            credential_fetcher: Some(fetcher),
            ..Default::default()
        }
    }

    /// 浅合并，覆盖项优先
    pub fn merge(&mut self, overrides: ConfigOverrides) {
        if let Some(provider_type) = overrides.provider_type {
            self.provider_type = provider_type;
        }
        if let Some(fetcher) = overrides.credential_fetcher {
            self.credential_fetcher = Some(fetcher);
        }
        if let Some(transport) = overrides.primary_transport {
            self.primary_transport = Some(transport);
        }
        if let Some(transport) = overrides.fallback_transport {
            self.fallback_transport = Some(transport);
        }
    }
}

impl std::fmt::Debug for UploaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploaderConfig")
            .field("provider_type", &self.provider_type)
            .field("credential_fetcher", &self.credential_fetcher.as_ref().map(|_| "..."))
            .field("primary_transport", &self.primary_transport.as_ref().map(|_| "..."))
            .field("fallback_transport", &self.fallback_transport.as_ref().map(|_| "..."))
            .finish()
    }
}

/// 调用方提供的配置覆盖项
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub provider_type: Option<String>,
    pub credential_fetcher: Option<Arc<dyn CredentialFetcher>>,
    pub primary_transport: Option<Arc<dyn UploadTransport>>,
    pub fallback_transport: Option<Arc<dyn UploadTransport>>,
}

/// 表单直传上传器
///
/// 凭证在第一次上传或过期时才获取，构造时不发起任何网络请求。
/// 配置和凭证整体替换，多个任务共享同一实例时不会读到不完整的凭证。
pub struct Uploader {
    config: RwLock<UploaderConfig>,
    credentials: RwLock<Option<Arc<Credentials>>>,
    /// 串行化凭证刷新
    refresh_lock: Mutex<()>,
    default_fallback: Arc<dyn UploadTransport>,
}

impl Uploader {
    pub fn new(config: UploaderConfig) -> Self {
        Self {
            config: RwLock::new(config),
            credentials: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            default_fallback: Arc::new(HttpTransport::default()),
        }
    }

    /// 当前凭证的快照
    pub async fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .read()
            .await
            .as_ref()
            .map(|c| c.as_ref().clone())
    }

    pub async fn provider_type(&self) -> String {
        self.config.read().await.provider_type.clone()
    }

    /// 获取配置信息
    ///
    /// 传入覆盖项时只合并配置，不请求凭证；否则调用凭证接口刷新凭证，
    /// 接口没有返回凭证时保持现有状态不变
    pub async fn init_options(&self, overrides: Option<ConfigOverrides>) -> Result<(), UploaderError> {
        if let Some(overrides) = overrides {
            self.config.write().await.merge(overrides);
            return Ok(());
        }

        let (provider_type, fetcher) = {
            let config = self.config.read().await;
            (config.provider_type.clone(), config.credential_fetcher.clone())
        };

        let Some(fetcher) = fetcher else {
            debug!("no credential fetcher configured, skip refresh");
            return Ok(());
        };

        debug!(provider_type = %provider_type, "fetching upload credentials");
        match fetcher.fetch(&provider_type).await? {
            Some(credentials) => {
                let mut credentials = credentials.normalized();
                credentials.provider_type = provider_type;
                *self.credentials.write().await = Some(Arc::new(credentials));
            }
            None => {
                debug!(provider_type = %provider_type, "credential fetcher returned nothing");
            }
        }

        Ok(())
    }

    async fn fresh_credentials(&self) -> Option<Arc<Credentials>> {
        self.credentials
            .read()
            .await
            .as_ref()
            .filter(|c| !c.is_expired())
            .cloned()
    }

    /// 确保凭证可用，没有凭证或已过期时刷新
    async fn ensure_credentials(&self) -> Result<Arc<Credentials>, UploaderError> {
        if let Some(credentials) = self.fresh_credentials().await {
            return Ok(credentials);
        }

        let _guard = self.refresh_lock.lock().await;
        // 等锁期间可能已被其他任务刷新
        if let Some(credentials) = self.fresh_credentials().await {
            return Ok(credentials);
        }

        self.init_options(None).await?;

        // 刷新没有拿到新凭证时继续使用旧凭证
        self.credentials
            .read()
            .await
            .clone()
            .ok_or(UploaderError::MissingCredentials)
    }

    /// 单文件上传
    ///
    /// 成功返回 `{data: 文件地址, head: {ret: 0, msg: "success"}}`，
    /// 服务端拒绝时返回 `UploaderError::Rejected`
    pub async fn upload_file(&self, mut target: UploadTarget) -> Result<UploadResponse, UploaderError> {
        let credentials = self.ensure_credentials().await?;

        let name = resolve_name(&mut target).ok_or_else(|| {
            UploaderError::InvalidInput("文件名和本地路径不能同时为空".to_string())
        })?;

        let path = credentials.path.as_deref().unwrap_or_default();
        let key = object_key(path, &today(), &name, credentials.use_original_name);
        let form = build_form_params(&credentials, &name, &key);
        let uploaded_url = remote_url(&credentials.domain, &key);

        let request = UploadRequest {
            url: form.url.clone(),
            file_path: target.local_path.clone(),
            file_name: name.clone(),
            field_name: FILE_FIELD_NAME.to_string(),
            form,
            content: target.content.clone(),
        };

        let (primary, fallback) = {
            let config = self.config.read().await;
            (
                config.primary_transport.clone(),
                config
                    .fallback_transport
                    .clone()
                    .unwrap_or_else(|| self.default_fallback.clone()),
            )
        };

        let outcome = match primary {
            Some(transport) => transport.upload(&request).await,
            None => TransportOutcome::Unavailable("platform upload transport not configured".to_string()),
        };

        match outcome {
            TransportOutcome::Completed { status: 200, .. } => {
                debug!(key = %key, "upload succeeded");
                Ok(UploadResponse::success(uploaded_url))
            }
            TransportOutcome::Completed { status, body } => Err(UploaderError::Rejected(
                UploadResponse::failure(name, format!("HTTP {}: {}", status, body)),
            )),
            TransportOutcome::Failed(e) => Err(e),
            TransportOutcome::Unavailable(reason) => {
                warn!(reason = %reason, "platform upload unavailable, falling back to http client");
                match fallback.upload(&request).await {
                    TransportOutcome::Completed { status: 200, .. } => {
                        debug!(key = %key, "upload succeeded");
                        Ok(UploadResponse::success(uploaded_url))
                    }
                    TransportOutcome::Completed { status, .. } => {
                        debug!(status, "fallback upload rejected");
                        Err(UploaderError::Rejected(UploadResponse::failure(name, "fail")))
                    }
                    TransportOutcome::Failed(e) => {
                        debug!(error = %e, "fallback upload failed");
                        Err(UploaderError::Rejected(UploadResponse::failure(name, "fail")))
                    }
                    TransportOutcome::Unavailable(reason) => {
                        debug!(reason = %reason, "fallback upload unavailable");
                        Err(UploaderError::Rejected(UploadResponse::failure(name, "fail")))
                    }
                }
            }
        }
    }

    /// 多文件上传，逐个串行上传
    ///
    /// 任一文件返回错误时直接返回该错误，剩余文件不再上传
    pub async fn upload_files(&self, targets: Vec<UploadTarget>) -> Result<BatchUploadResult, UploaderError> {
        let mut result = BatchUploadResult::default();
        for target in targets {
            let response = self.upload_file(target).await?;
            if response.is_success() {
                result.success_urls.push(response.data);
            } else {
                result.fail_names.push(response.data);
            }
        }
        Ok(result)
    }

    /// 通用文件上传，接受单个文件或文件列表，按输入顺序返回每个文件的结果
    ///
    /// 任一文件返回错误时直接返回该错误，剩余文件不再上传
    pub async fn upload(&self, input: impl Into<UploadInput>) -> Result<Vec<UploadRecord>, UploaderError> {
        let targets = input.into().into_targets();
        let mut records = Vec::with_capacity(targets.len());
        for (index, target) in targets.into_iter().enumerate() {
            let response = self.upload_file(target).await?;
            records.push(UploadRecord {
                index,
                url: response.data,
                ret: response.head.ret,
            });
        }
        Ok(records)
    }
}

/// 上传后的文件地址：域名 + `/` + 对象 key
pub fn remote_url(domain: &str, key: &str) -> String {
    let separator = if domain.ends_with('/') { "" } else { "/" };
    format!("{}{}{}", domain, separator, key)
}
