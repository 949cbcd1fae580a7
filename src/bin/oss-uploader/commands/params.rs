// Params command implementation

use anyhow::{anyhow, Result};
use oss_uploader::uploader::object_key::{object_key, today};
use oss_uploader::uploader::{build_form_params, Uploader};

use crate::cli::ParamsArgs;

/// Execute the params command
pub async fn execute_params(args: &ParamsArgs, uploader: &Uploader) -> Result<()> {
    uploader.init_options(None).await?;
    let credentials = uploader
        .credentials()
        .await
        .ok_or_else(|| anyhow!("Credential fetcher returned no credentials"))?;

    let path = credentials.path.as_deref().unwrap_or_default();
    let key = object_key(path, &today(), &args.name, credentials.use_original_name);
    let params = build_form_params(&credentials, &args.name, &key);

    println!("POST {}", params.url);
    for (name, value) in &params.fields {
        println!("  {}: {}", name, value);
    }

    Ok(())
}
