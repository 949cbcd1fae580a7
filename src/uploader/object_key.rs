//! 文件名与对象 key 生成

use chrono::{Local, NaiveDate};
use rand::Rng;
use std::path::Path;

use crate::uploader::UploadTarget;

/// 内存数据默认使用的后缀
const IN_MEMORY_SUFFIX: &str = ".png";

/// 生成 UUID v4 格式的随机字符串，用于生成随机文件名
///
/// 只用于避免文件名冲突，不适合对碰撞有安全要求的场景
pub fn guid() -> String {
    let mut rng = rand::thread_rng();
    "xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx"
        .chars()
        .map(|c| match c {
            'x' => hex_digit(rng.gen_range(0..16)),
            'y' => hex_digit((rng.gen_range(0..16) & 0x3) | 0x8),
            other => other,
        })
        .collect()
}

fn hex_digit(v: u32) -> char {
    std::char::from_digit(v, 16).unwrap_or('0')
}

/// 格式化日期为 YYYYMMDD
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// 当前本地日期 YYYYMMDD
pub fn today() -> String {
    format_date(Local::now().date_naive())
}

/// 路径是否表示内存数据（blob 或 base64 data URI）
pub fn is_in_memory_path(path: &str) -> bool {
    path.starts_with("blob") || path.starts_with("data")
}

/// 根据本地路径生成文件名：随机 id + 后缀
///
/// 内存数据使用 `.png`，否则沿用路径最后一段的扩展名，没有扩展名时不加后缀
pub fn synthesize_name(local_path: &str) -> String {
    let suffix = if is_in_memory_path(local_path) {
        IN_MEMORY_SUFFIX.to_string()
    } else {
        Path::new(local_path)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    };
    format!("{}{}", guid(), suffix)
}

/// 解析上传使用的文件名，为空时根据本地路径生成并回填
pub fn resolve_name(target: &mut UploadTarget) -> Option<String> {
    if target.name.is_none() {
        if let Some(path) = target.local_path_str() {
            target.name = Some(synthesize_name(&path));
        }
    }
    target.name.clone()
}

/// 拆分文件名为 (不含后缀的名字, 后缀)
pub fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
        None => (name, None),
    }
}

/// 生成对象 key：`{path}{YYYYMMDD}/{随机 id}[/{原文件名}].{后缀}`
///
/// 保留原文件名时仍然带随机 id，避免同名文件被覆盖
pub fn object_key(path: &str, date: &str, name: &str, use_original_name: bool) -> String {
    let (stem, suffix) = split_name(name);
    let original = if use_original_name {
        format!("/{}", stem)
    } else {
        String::new()
    };
    let suffix = suffix.map(|s| format!(".{}", s)).unwrap_or_default();
    format!("{}{}/{}{}{}", path, date, guid(), original, suffix)
}
