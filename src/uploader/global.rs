//! 全局上传器单例
//!
//! 进程内只有一个共享的 `Uploader`，第一次调用时用传入的配置创建，之后的调用忽略新配置

use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex, PoisonError};

use crate::uploader::{Uploader, UploaderConfig};

/// 全局上传器单例
static GLOBAL_UPLOADER: Lazy<Mutex<Option<Arc<Uploader>>>> = Lazy::new(|| Mutex::new(None));

/// 获取全局上传器，不存在时用 `config` 创建
///
/// 创建时不会发起网络请求，凭证在第一次上传时才获取
///
/// # 示例
///
/// ```rust
/// use std::sync::Arc;
/// use oss_uploader::uploader::{uploader_instance, StaticCredentialFetcher, UploaderConfig};
///
/// let config = UploaderConfig::new("TXYUN", Arc::new(StaticCredentialFetcher::empty()));
/// let uploader = uploader_instance(config);
///
/// // 之后的调用返回同一个实例
/// let again = uploader_instance(Default::default());
/// assert!(Arc::ptr_eq(&uploader, &again));
/// ```
pub fn uploader_instance(config: UploaderConfig) -> Arc<Uploader> {
    let mut global = GLOBAL_UPLOADER
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    global
        .get_or_insert_with(|| Arc::new(Uploader::new(config)))
        .clone()
}

/// 获取已创建的全局上传器
pub fn global_uploader() -> Option<Arc<Uploader>> {
    GLOBAL_UPLOADER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// 丢弃全局上传器，下一次 `uploader_instance` 会重新创建
///
/// 主要用于测试隔离，已经持有的实例不受影响
pub fn reset_uploader_instance() {
    GLOBAL_UPLOADER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_first_config_wins() {
        reset_uploader_instance();

        let first = uploader_instance(UploaderConfig {
            provider_type: "HUAWEI".to_string(),
            ..Default::default()
        });
        let second = uploader_instance(UploaderConfig {
            provider_type: "TXYUN".to_string(),
            ..Default::default()
        });

        assert!(Arc::ptr_eq(&first, &second));
        let rt = tokio::runtime::Runtime::new().unwrap();
        assert_eq!(rt.block_on(second.provider_type()), "HUAWEI");

        reset_uploader_instance();
    }

    #[test]
    #[serial]
    fn test_reset() {
        reset_uploader_instance();
        assert!(global_uploader().is_none());

        let first = uploader_instance(UploaderConfig::default());
        assert!(global_uploader().is_some());

        reset_uploader_instance();
        assert!(global_uploader().is_none());

        let second = uploader_instance(UploaderConfig::default());
        assert!(!Arc::ptr_eq(&first, &second));

        reset_uploader_instance();
    }
}
