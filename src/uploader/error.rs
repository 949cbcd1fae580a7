use thiserror::Error;

use crate::uploader::UploadResponse;

/// 上传统一错误类型
#[derive(Error, Debug)]
pub enum UploaderError {
    /// 服务端拒绝上传，携带 `{data: 文件名, head: {ret: 1, msg}}`
    #[error("上传失败 [{}]: {}", .0.data, .0.head.msg)]
    Rejected(UploadResponse),

    #[error("传输错误: {0}")]
    Transport(String),

    #[error("获取凭证失败: {0}")]
    CredentialFetch(String),

    #[error("没有可用的上传凭证")]
    MissingCredentials,

    #[error("无效参数: {0}")]
    InvalidInput(String),

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl UploaderError {
    /// 从 HTTP 客户端等传输层错误转换
    pub fn from_transport<E>(err: E, context: &str) -> Self
    where
        E: std::error::Error,
    {
        UploaderError::Transport(format!("{}: {}", context, err))
    }

    /// 被拒绝时返回对应的上传结果
    pub fn rejection(&self) -> Option<&UploadResponse> {
        match self {
            UploaderError::Rejected(response) => Some(response),
            _ => None,
        }
    }
}
