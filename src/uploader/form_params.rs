//! 按厂商组装表单上传参数

use crate::uploader::{Credentials, ProviderKind};

/// 表单上传参数
///
/// `fields` 保持插入顺序，文件字段需要放在最后，由传输层追加
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormParams {
    /// 上传地址
    pub url: String,
    /// 对象 key
    pub key: String,
    pub fields: Vec<(String, String)>,
}

impl FormParams {
    /// 获取字段值
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn push(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push((name.to_string(), value.into()));
    }
}

/// 根据凭证组装表单参数
///
/// 腾讯云、华为云使用各自的字段和域名，其他类型一律按阿里云处理
pub fn build_form_params(credentials: &Credentials, name: &str, key: &str) -> FormParams {
    let mut params = FormParams {
        url: String::new(),
        key: key.to_string(),
        fields: Vec::new(),
    };
    params.push("name", name);
    params.push("policy", credentials.policy.as_str());
    params.push("success_action_status", "200");
    params.push("key", key);

    let end_point = credentials.bare_end_point();
    let bucket = credentials.bucket_name.as_str();

    let url = match credentials.provider_kind() {
        ProviderKind::Txyun => {
            params.push("q-ak", credentials.access_key_id.as_str());
            params.push("q-signature", credentials.signature.as_str());
            params.push("q-sign-algorithm", "sha1");
            if let Some(key_time) = credentials.param.get("q-sign-time") {
                params.push("q-key-time", key_time.as_str());
            }
            format!("https://{}.cos.{}.myqcloud.com", bucket, end_point)
        }
        ProviderKind::Huawei => {
            params.push("AccessKeyId", credentials.access_key_id.as_str());
            params.push("signature", credentials.signature.as_str());
            format!("https://{}.obs.{}.myhuaweicloud.com", bucket, end_point)
        }
        ProviderKind::Aliyun => {
            params.push("signature", credentials.signature.as_str());
            params.push("OSSAccessKeyId", credentials.access_key_id.as_str());
            params.push("bucket", bucket);
            format!("https://{}.{}", bucket, end_point)
        }
    };

    params.push("url", url.as_str());
    params.url = url;
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn credentials(provider_type: &str) -> Credentials {
        Credentials {
            access_key_id: "AK".to_string(),
            signature: "SIG".to_string(),
            bucket_name: "b1".to_string(),
            end_point: "https://oss-cn-hangzhou.aliyuncs.com".to_string(),
            policy: "P".to_string(),
            provider_type: provider_type.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_common_fields() {
        let params = build_form_params(&credentials("ALIYUN"), "a.jpg", "up/a.jpg");
        assert_eq!(params.get("name"), Some("a.jpg"));
        assert_eq!(params.get("policy"), Some("P"));
        assert_eq!(params.get("success_action_status"), Some("200"));
        assert_eq!(params.get("key"), Some("up/a.jpg"));
        assert_eq!(params.key, "up/a.jpg");
    }

    #[test]
    fn test_aliyun_params() {
        let params = build_form_params(&credentials("ALIYUN"), "a.jpg", "k");
        assert_eq!(params.get("signature"), Some("SIG"));
        assert_eq!(params.get("OSSAccessKeyId"), Some("AK"));
        assert_eq!(params.get("bucket"), Some("b1"));
        assert_eq!(params.url, "https://b1.oss-cn-hangzhou.aliyuncs.com");
        assert_eq!(params.get("url"), Some(params.url.as_str()));
        assert_eq!(params.get("q-ak"), None);
    }

    #[test]
    fn test_unknown_type_falls_back_to_aliyun() {
        let expected = build_form_params(&credentials("ALIYUN"), "a.jpg", "k");
        for tag in ["", "aliyun", "S3", "🤷", "TXYUN "] {
            let params = build_form_params(&credentials(tag), "a.jpg", "k");
            assert_eq!(params, expected, "type {:?} should use aliyun params", tag);
        }
    }

    #[test]
    fn test_txyun_params() {
        let mut creds = credentials("TXYUN");
        creds.end_point = "ap-guangzhou".to_string();
        creds.param = HashMap::from([("q-sign-time".to_string(), "123;456".to_string())]);

        let params = build_form_params(&creds, "a.jpg", "k");
        assert_eq!(params.get("q-ak"), Some("AK"));
        assert_eq!(params.get("q-signature"), Some("SIG"));
        assert_eq!(params.get("q-sign-algorithm"), Some("sha1"));
        assert_eq!(params.get("q-key-time"), Some("123;456"));
        assert_eq!(params.url, "https://b1.cos.ap-guangzhou.myqcloud.com");
        assert_eq!(params.get("OSSAccessKeyId"), None);
    }

    #[test]
    fn test_txyun_without_sign_time() {
        let mut creds = credentials("TXYUN");
        creds.end_point = "ap-guangzhou".to_string();
        let params = build_form_params(&creds, "a.jpg", "k");
        assert_eq!(params.get("q-key-time"), None);
    }

    #[test]
    fn test_huawei_params() {
        let mut creds = credentials("HUAWEI");
        creds.end_point = "http://cn-north-4".to_string();

        let params = build_form_params(&creds, "a.jpg", "k");
        assert_eq!(params.get("AccessKeyId"), Some("AK"));
        assert_eq!(params.get("signature"), Some("SIG"));
        assert_eq!(params.url, "https://b1.obs.cn-north-4.myhuaweicloud.com");
        assert_eq!(params.get("bucket"), None);
    }
}
