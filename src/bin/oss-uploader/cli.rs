// CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "oss-uploader")]
#[command(author = "hatlonely <hatlonely@foxmail.com>")]
#[command(version = "0.1.0")]
#[command(about = "Upload files to OSS/COS/OBS with server-signed form policies", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.oss-uploader/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override provider type from config (ALIYUN, TXYUN, HUAWEI)
    #[arg(short = 't', long = "type", global = true)]
    pub provider_type: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload local files one by one
    Upload(UploadArgs),
    /// Print the form fields that would be posted for a file name
    Params(ParamsArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Local files to upload
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// File name used to build the object key
    pub name: String,
}
