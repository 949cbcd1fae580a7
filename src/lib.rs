//! oss-uploader - 对象存储表单直传客户端
//!
//! 通过服务端签发的上传凭证，把本地文件或内存数据直接上传到对象存储，
//! 支持阿里云 OSS、腾讯云 COS、华为云 OBS。
//!
//! ## 模块
//!
//! - **uploader**: 凭证管理、表单参数组装、上传传输层、全局上传器

pub mod uploader;

// 重新导出主要的公共 API
pub use uploader::{
    reset_uploader_instance, uploader_instance, BatchUploadResult, ConfigOverrides,
    CredentialFetcher, Credentials, HttpCredentialFetcher, HttpCredentialFetcherConfig,
    ProviderKind, UploadRecord, UploadResponse, UploadStatus, UploadTarget, UploadTransport,
    Uploader, UploaderConfig, UploaderError, UploaderSettings,
};
