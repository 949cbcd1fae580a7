use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use std::collections::HashMap;
use std::path::PathBuf;

/// 阿里云
pub const PROVIDER_ALIYUN: &str = "ALIYUN";
/// 腾讯云
pub const PROVIDER_TXYUN: &str = "TXYUN";
/// 华为云
pub const PROVIDER_HUAWEI: &str = "HUAWEI";

/// 凭证提前过期的时间（毫秒）
pub const CREDENTIALS_EXPIRY_MARGIN_MS: i64 = 10 * 1000;

/// 对象存储厂商
///
/// 分发时使用的封闭枚举，未识别的类型字符串统一落到 `Aliyun`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Aliyun,
    Txyun,
    Huawei,
}

impl ProviderKind {
    /// 根据类型字符串解析厂商（区分大小写）
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            PROVIDER_TXYUN => ProviderKind::Txyun,
            PROVIDER_HUAWEI => ProviderKind::Huawei,
            // ALIYUN 以及所有未知类型
            _ => ProviderKind::Aliyun,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            ProviderKind::Aliyun => PROVIDER_ALIYUN,
            ProviderKind::Txyun => PROVIDER_TXYUN,
            ProviderKind::Huawei => PROVIDER_HUAWEI,
        }
    }
}

impl From<&str> for ProviderKind {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

/// 服务端签发的上传凭证
///
/// 字段名与凭证接口返回的 JSON 保持一致（camelCase），字段缺失或为 null 时取默认值
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub access_key_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub signature: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub bucket_name: String,
    /// 区域端点，可能带 http(s):// 前缀
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub end_point: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub policy: String,
    /// 对象 key 前缀，接收后统一以 `/` 结尾
    pub path: Option<String>,
    /// 是否在对象 key 中保留原始文件名
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub use_original_name: bool,
    /// 上传后访问文件使用的域名
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub domain: String,
    /// 过期时间（毫秒时间戳）
    #[serde(rename = "timeOut", alias = "timeoutAt")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub timeout_at: i64,
    /// 厂商特有参数，如腾讯云的 `q-sign-time`
    #[serde(alias = "providerSpecificFields")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub param: HashMap<String, String>,
    /// 获取凭证时使用的类型
    #[serde(rename = "type")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub provider_type: String,
}

/// 待上传的文件
#[derive(Debug, Clone, Default)]
pub struct UploadTarget {
    /// 本地路径；`blob`/`data` 开头表示内存中的数据
    pub local_path: Option<PathBuf>,
    /// 文件名，为空时根据路径生成
    pub name: Option<String>,
    pub size: Option<u64>,
    /// 内存中的文件内容，存在时不再读取本地路径
    pub content: Option<Bytes>,
}

impl UploadTarget {
    /// 从本地文件创建
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// 从内存数据创建
    pub fn from_bytes(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: Some(name.into()),
            size: Some(content.len() as u64),
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 本地路径的字符串形式
    pub fn local_path_str(&self) -> Option<String> {
        self.local_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
    }
}

/// 上传状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum UploadStatus {
    Success,
    Failure,
}

impl UploadStatus {
    pub fn code(&self) -> u8 {
        match self {
            UploadStatus::Success => 0,
            UploadStatus::Failure => 1,
        }
    }
}

impl From<UploadStatus> for u8 {
    fn from(status: UploadStatus) -> Self {
        status.code()
    }
}

impl TryFrom<u8> for UploadStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(UploadStatus::Success),
            1 => Ok(UploadStatus::Failure),
            other => Err(format!("unknown upload status: {}", other)),
        }
    }
}

/// 上传结果头部
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadHead {
    pub ret: UploadStatus,
    pub msg: String,
}

/// 单文件上传结果
///
/// 成功时 `data` 为文件访问地址，失败时为文件名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub data: String,
    pub head: UploadHead,
}

impl UploadResponse {
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            data: url.into(),
            head: UploadHead {
                ret: UploadStatus::Success,
                msg: "success".to_string(),
            },
        }
    }

    pub fn failure(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            data: name.into(),
            head: UploadHead {
                ret: UploadStatus::Failure,
                msg: msg.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.head.ret == UploadStatus::Success
    }
}

/// 多文件上传结果，成功和失败分开收集
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUploadResult {
    pub success_urls: Vec<String>,
    pub fail_names: Vec<String>,
}

/// 通用上传接口中每个文件的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub index: usize,
    pub url: String,
    pub ret: UploadStatus,
}

/// 通用上传接口的输入：单个文件或文件列表
#[derive(Debug, Clone)]
pub enum UploadInput {
    Single(UploadTarget),
    Many(Vec<UploadTarget>),
}

impl UploadInput {
    pub fn into_targets(self) -> Vec<UploadTarget> {
        match self {
            UploadInput::Single(target) => vec![target],
            UploadInput::Many(targets) => targets,
        }
    }
}

impl From<UploadTarget> for UploadInput {
    fn from(target: UploadTarget) -> Self {
        UploadInput::Single(target)
    }
}

impl From<Vec<UploadTarget>> for UploadInput {
    fn from(targets: Vec<UploadTarget>) -> Self {
        UploadInput::Many(targets)
    }
}
