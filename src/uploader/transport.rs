use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

use crate::uploader::{FormParams, UploaderError};

/// 文件在表单中的字段名
pub const FILE_FIELD_NAME: &str = "file";

/// 一次表单上传请求
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// 上传地址
    pub url: String,
    /// 本地文件路径
    pub file_path: Option<PathBuf>,
    /// 文件名
    pub file_name: String,
    /// 文件字段名
    pub field_name: String,
    /// 表单字段
    pub form: FormParams,
    /// 内存中的文件内容
    pub content: Option<Bytes>,
}

impl UploadRequest {
    /// 读取文件内容，优先使用内存数据
    pub async fn payload(&self) -> Result<Bytes, UploaderError> {
        if let Some(content) = &self.content {
            return Ok(content.clone());
        }
        match &self.file_path {
            Some(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
            None => Err(UploaderError::InvalidInput(format!(
                "文件 {} 没有可上传的内容",
                self.file_name
            ))),
        }
    }
}

/// 传输层结果
#[derive(Debug)]
pub enum TransportOutcome {
    /// 请求完成，携带 HTTP 状态码和响应描述
    Completed { status: u16, body: String },
    /// 当前环境不支持该传输方式
    Unavailable(String),
    /// 传输失败
    Failed(UploaderError),
}

/// 文件上传传输层
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> TransportOutcome;
}

/// 基于 reqwest 的 multipart 表单上传
pub struct HttpTransport {
    client: reqwest::Client,
}

/// 默认 User-Agent
pub const USER_AGENT: &str = concat!("oss-uploader/", env!("CARGO_PKG_VERSION"));

impl HttpTransport {
    /// 创建带 `oss-uploader/{版本}` User-Agent 的客户端
    pub fn new() -> Result<Self, UploaderError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| UploaderError::Configuration(format!("创建 HTTP 客户端失败: {}", e)))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: &UploadRequest) -> Result<(u16, String), UploaderError> {
        let payload = request.payload().await?;

        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &request.form.fields {
            form = form.text(name.clone(), value.clone());
        }
        // 文件字段必须放在最后
        let part = reqwest::multipart::Part::bytes(payload.to_vec())
            .file_name(request.file_name.clone());
        form = form.part(request.field_name.clone(), part);

        let response = self
            .client
            .post(&request.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploaderError::from_transport(e, "发送上传请求失败"))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok((status, body))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::with_client(reqwest::Client::new())
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn upload(&self, request: &UploadRequest) -> TransportOutcome {
        match self.send(request).await {
            Ok((status, body)) => TransportOutcome::Completed { status, body },
            Err(e) => TransportOutcome::Failed(e),
        }
    }
}
