// Upload command implementation

use anyhow::Result;
use oss_uploader::uploader::{UploadRecord, UploadTarget, Uploader};
use std::path::Path;

use crate::cli::UploadArgs;

/// Build an upload target that keeps the local file name
fn build_target(file: &str) -> UploadTarget {
    let path = shellexpand::tilde(file).to_string();
    let mut target = UploadTarget::from_path(&path);
    target.name = Path::new(&path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    target.size = std::fs::metadata(&path).ok().map(|m| m.len());
    target
}

/// One line per file: `index ret url`
fn format_record(record: &UploadRecord) -> String {
    format!("{} {} {}", record.index, record.ret.code(), record.url)
}

/// Execute the upload command
pub async fn execute_upload(args: &UploadArgs, uploader: &Uploader) -> Result<()> {
    let targets = args
        .files
        .iter()
        .map(|file| build_target(file))
        .collect::<Vec<_>>();

    // The first failure aborts the remaining files
    let records = uploader.upload(targets).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        println!("{}", format_record(record));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oss_uploader::uploader::object_key::{object_key, resolve_name};
    use oss_uploader::uploader::UploadStatus;
    use std::io::Write;

    #[test]
    fn test_build_target_keeps_file_name() {
        let mut target = build_target("/home/u/report.pdf");
        assert_eq!(target.name.as_deref(), Some("report.pdf"));
        assert_eq!(target.size, None);

        let name = resolve_name(&mut target).unwrap();
        let key = object_key("up/", "20240307", &name, true);
        assert!(key.ends_with("/report.pdf"), "unexpected key: {}", key);
    }

    #[test]
    fn test_build_target_reads_size() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"hello").unwrap();

        let target = build_target(&file.path().to_string_lossy());
        assert_eq!(target.size, Some(5));
        assert!(target.name.unwrap().ends_with(".txt"));
    }

    #[test]
    fn test_format_record() {
        let ok = UploadRecord {
            index: 0,
            url: "https://cdn.example.com/up/a.jpg".to_string(),
            ret: UploadStatus::Success,
        };
        assert_eq!(format_record(&ok), "0 0 https://cdn.example.com/up/a.jpg");

        let failed = UploadRecord {
            index: 3,
            url: "b.jpg".to_string(),
            ret: UploadStatus::Failure,
        };
        assert_eq!(format_record(&failed), "3 1 b.jpg");
    }
}
