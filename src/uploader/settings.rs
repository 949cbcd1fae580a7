//! 上传器的文件配置
//!
//! 支持 YAML、JSON（JSON5）、TOML 三种格式，配置内容中的 `${VAR}` 会被替换为环境变量

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::path::Path;
use std::sync::Arc;

use crate::uploader::{
    CredentialFetcher, Credentials, HttpCredentialFetcher, HttpCredentialFetcherConfig,
    StaticCredentialFetcher, UploaderConfig, UploaderError,
};

/// 凭证来源，沿用 `{type, options}` 的配置形式
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", content = "options")]
pub enum CredentialSource {
    /// 固定凭证
    Static(Credentials),
    /// 凭证接口
    Http(HttpCredentialFetcherConfig),
}

impl CredentialSource {
    pub fn build(&self) -> Result<Arc<dyn CredentialFetcher>, UploaderError> {
        Ok(match self {
            CredentialSource::Static(credentials) => {
                Arc::new(StaticCredentialFetcher::new(credentials.clone()))
            }
            CredentialSource::Http(config) => Arc::new(HttpCredentialFetcher::new(config.clone())?),
        })
    }
}

/// 上传器配置文件
///
/// ```yaml
/// type: TXYUN
/// credentials:
///   type: Http
///   options:
///     url: https://api.example.com/oss/policy
///     headers:
///       Authorization: Bearer ${API_TOKEN}
///     pointer: /data
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct UploaderSettings {
    /// 厂商类型
    #[serde(rename = "type")]
    #[default = "ALIYUN"]
    pub provider_type: String,

    /// 凭证来源
    pub credentials: Option<CredentialSource>,
}

impl UploaderSettings {
    /// 从 JSON 字符串创建（支持 JSON5 格式）
    pub fn from_json(content: &str) -> Result<Self, UploaderError> {
        json5::from_str(&expand_env_vars(content))
            .map_err(|e| UploaderError::Configuration(format!("解析 JSON 配置失败: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self, UploaderError> {
        serde_yaml::from_str(&expand_env_vars(content))
            .map_err(|e| UploaderError::Configuration(format!("解析 YAML 配置失败: {}", e)))
    }

    pub fn from_toml(content: &str) -> Result<Self, UploaderError> {
        toml::from_str(&expand_env_vars(content))
            .map_err(|e| UploaderError::Configuration(format!("解析 TOML 配置失败: {}", e)))
    }

    /// 从文件加载，根据扩展名选择格式，默认按 YAML 解析
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, UploaderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") | Some("json5") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// 构造 UploaderConfig，传输层使用默认配置
    pub fn into_config(self) -> Result<UploaderConfig, UploaderError> {
        let credential_fetcher = match &self.credentials {
            Some(source) => Some(source.build()?),
            None => None,
        };
        Ok(UploaderConfig {
            provider_type: self.provider_type,
            credential_fetcher,
            ..Default::default()
        })
    }
}

/// 替换 `${VAR}` 形式的环境变量，未定义的变量保持原样
pub fn expand_env_vars(content: &str) -> String {
    let re = match Regex::new(r"\$\{([^}]+)\}") {
        Ok(re) => re,
        Err(_) => return content.to_string(),
    };
    re.replace_all(content, |caps: &regex_lite::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_expand_env_vars() {
        std::env::set_var("OSS_UPLOADER_TEST_VAR", "test_value");
        let expanded = expand_env_vars("key: ${OSS_UPLOADER_TEST_VAR}, other: ${OSS_UPLOADER_UNDEFINED}");
        assert_eq!(expanded, "key: test_value, other: ${OSS_UPLOADER_UNDEFINED}");
        std::env::remove_var("OSS_UPLOADER_TEST_VAR");
    }

    #[test]
    fn test_defaults() {
        let settings = UploaderSettings::from_yaml("{}").unwrap();
        assert_eq!(settings.provider_type, "ALIYUN");
        assert!(settings.credentials.is_none());
    }

    #[test]
    #[serial]
    fn test_from_yaml_http() {
        std::env::set_var("OSS_UPLOADER_TEST_TOKEN", "secret");
        let settings = UploaderSettings::from_yaml(
            r#"
type: TXYUN
credentials:
  type: Http
  options:
    url: https://api.example.com/oss/policy
    headers:
      Authorization: Bearer ${OSS_UPLOADER_TEST_TOKEN}
    pointer: /data
"#,
        )
        .unwrap();
        std::env::remove_var("OSS_UPLOADER_TEST_TOKEN");

        assert_eq!(settings.provider_type, "TXYUN");
        match settings.credentials {
            Some(CredentialSource::Http(ref config)) => {
                assert_eq!(config.url, "https://api.example.com/oss/policy");
                assert_eq!(
                    config.headers.get("Authorization").map(String::as_str),
                    Some("Bearer secret")
                );
                assert_eq!(config.pointer.as_deref(), Some("/data"));
                assert_eq!(config.timeout_secs, 10);
            }
            other => panic!("unexpected credentials: {:?}", other),
        }
    }

    #[test]
    fn test_from_json5_static() {
        let settings = UploaderSettings::from_json(
            r#"{
                // 固定凭证
                type: "HUAWEI",
                credentials: {
                    type: "Static",
                    options: {
                        accessKeyId: "AK",
                        bucketName: "b1",
                        endPoint: "cn-north-4",
                    },
                },
            }"#,
        )
        .unwrap();

        assert_eq!(settings.provider_type, "HUAWEI");
        match settings.credentials {
            Some(CredentialSource::Static(ref creds)) => {
                assert_eq!(creds.access_key_id, "AK");
                assert_eq!(creds.bucket_name, "b1");
            }
            other => panic!("unexpected credentials: {:?}", other),
        }
    }

    #[test]
    fn test_from_toml() {
        let settings = UploaderSettings::from_toml(
            r#"
type = "ALIYUN"

[credentials]
type = "Http"

[credentials.options]
url = "http://localhost:8080/sts"
"#,
        )
        .unwrap();

        assert!(matches!(settings.credentials, Some(CredentialSource::Http(_))));
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"type": "TXYUN"}"#).unwrap();
        let settings = UploaderSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.provider_type, "TXYUN");

        let missing = UploaderSettings::from_file("/nonexistent/oss-uploader.yaml");
        assert!(matches!(missing, Err(UploaderError::Io(_))));
    }

    #[tokio::test]
    async fn test_into_config() -> Result<(), UploaderError> {
        let settings = UploaderSettings {
            provider_type: "HUAWEI".to_string(),
            credentials: Some(CredentialSource::Static(Credentials {
                access_key_id: "AK".to_string(),
                ..Default::default()
            })),
        };

        let config = settings.into_config()?;
        assert_eq!(config.provider_type, "HUAWEI");
        let creds = config
            .credential_fetcher
            .expect("fetcher")
            .fetch("HUAWEI")
            .await?
            .expect("credentials");
        assert_eq!(creds.access_key_id, "AK");

        Ok(())
    }

    #[test]
    fn test_invalid_http_source() {
        let settings = UploaderSettings {
            credentials: Some(CredentialSource::Http(HttpCredentialFetcherConfig::default())),
            ..Default::default()
        };
        assert!(matches!(settings.into_config(), Err(UploaderError::Configuration(_))));
    }
}
