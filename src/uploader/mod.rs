//! 对象存储表单直传模块
//!
//! 使用服务端签发的 policy 和签名，以 multipart 表单的方式把文件直接上传到
//! 阿里云 OSS、腾讯云 COS 或华为云 OBS。
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use oss_uploader::uploader::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), UploaderError> {
//!     let fetcher = HttpCredentialFetcher::new(HttpCredentialFetcherConfig {
//!         url: "https://api.example.com/oss/policy".to_string(),
//!         pointer: Some("/data".to_string()),
//!         ..Default::default()
//!     })?;
//!
//!     let uploader = uploader_instance(UploaderConfig::new(PROVIDER_TXYUN, Arc::new(fetcher)));
//!
//!     let response = uploader.upload_file(UploadTarget::from_path("/tmp/photo.jpeg")).await?;
//!     println!("{}", response.data);
//!
//!     Ok(())
//! }
//! ```

mod credential_fetcher;
mod error;
mod form_params;
mod global;
pub mod object_key;
mod settings;
mod transport;
#[allow(clippy::module_inception)]
mod uploader;
mod uploader_types;

pub use credential_fetcher::{
    CredentialFetcher, FnCredentialFetcher, HttpCredentialFetcher, HttpCredentialFetcherConfig,
    StaticCredentialFetcher,
};
pub use error::UploaderError;
pub use form_params::{build_form_params, FormParams};
pub use global::{global_uploader, reset_uploader_instance, uploader_instance};
pub use settings::{expand_env_vars, CredentialSource, UploaderSettings};
pub use transport::{
    HttpTransport, TransportOutcome, UploadRequest, UploadTransport, FILE_FIELD_NAME, USER_AGENT,
};
pub use uploader::{remote_url, ConfigOverrides, Uploader, UploaderConfig};
pub use uploader_types::{
    BatchUploadResult, Credentials, ProviderKind, UploadHead, UploadInput, UploadRecord,
    UploadResponse, UploadStatus, UploadTarget, CREDENTIALS_EXPIRY_MARGIN_MS, PROVIDER_ALIYUN,
    PROVIDER_HUAWEI, PROVIDER_TXYUN,
};
