use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tinify::{Client, ClientOptions, ResizeMethod, ResizeOption, Source};

/// tinify - compress images with the Tinify API
///
/// The API key is read from --key or the TINIFY_API_KEY environment variable.
///
/// Examples:
///   tinify compress photo.jpg photo-min.jpg
///   tinify compress photo.png thumb.png --resize fit --width 128 --height 128
///   tinify url https://example.com/photo.jpg photo-min.jpg
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API key
    #[arg(
        long = "key",
        short = 'k',
        env = "TINIFY_API_KEY",
        hide_env_values = true,
        global = true
    )]
    pub key: Option<String>,

    /// API URL (defaults to https://api.tinify.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Outbound proxy, e.g. http://proxyserver:8888
    #[arg(long, value_name = "URL", global = true)]
    pub proxy: Option<String>,

    /// Appended to the User-Agent header
    #[arg(long = "app-id", value_name = "ID", global = true)]
    pub app_id: Option<String>,

    /// Resend attempts on network failure
    #[arg(long = "retry-count", default_value_t = 1, global = true)]
    pub retry_count: u32,

    /// Milliseconds to wait between attempts
    #[arg(long = "retry-wait-ms", default_value_t = 500, global = true)]
    pub retry_wait_ms: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Compress a local image file
    Compress(CompressArgs),

    /// Compress an image the API downloads from a URL
    Url(UrlArgs),
}

#[derive(clap::Args, Debug)]
pub struct CompressArgs {
    /// Image to upload
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the compressed image
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub resize: ResizeArgs,
}

#[derive(clap::Args, Debug)]
pub struct UrlArgs {
    /// Public URL of the image
    #[arg(value_name = "URL")]
    pub url: String,

    /// Where to write the compressed image
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub resize: ResizeArgs,
}

#[derive(clap::Args, Debug)]
pub struct ResizeArgs {
    /// Resize method: scale, fit or cover
    #[arg(long = "resize", value_name = "METHOD")]
    pub method: Option<ResizeMethod>,

    /// Target width in pixels
    #[arg(long, requires = "method")]
    pub width: Option<u64>,

    /// Target height in pixels
    #[arg(long, requires = "method")]
    pub height: Option<u64>,
}

impl ResizeArgs {
    fn option(&self) -> Option<ResizeOption> {
        self.method
            .map(|method| {
                ResizeOption::new(method, self.width.unwrap_or(0), self.height.unwrap_or(0))
            })
    }
}

impl Cli {
    fn client(&self) -> Result<Client> {
        let key = self
            .key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .context("Missing API key. Pass --key or set the TINIFY_API_KEY environment variable")?;

        let mut options = ClientOptions::default()
            .with_retry_count(self.retry_count)
            .with_retry_wait(Duration::from_millis(self.retry_wait_ms));
        if let Some(api_url) = &self.api_url {
            options = options.with_api_url(api_url);
        }
        if let Some(proxy) = &self.proxy {
            options = options.with_proxy(proxy);
        }
        if let Some(app_id) = &self.app_id {
            options = options.with_app_identifier(app_id);
        }

        Client::new(key, options).context("Failed to create API client")
    }
}

async fn compress(
    client: &Client,
    mut source: Source,
    output: &Path,
    resize: &ResizeArgs,
) -> Result<()> {
    if let Some(option) = resize.option() {
        client.resize(Some(&mut source), Some(option))?;
    }

    let result = client
        .to_output(&source)
        .await
        .context("Failed to download compressed image")?;
    let path = result
        .to_file(output)
        .with_context(|| format!("Failed to write {:?}", output))?;

    println!(
        "{} ({} bytes, {}x{}, {})",
        path.display(),
        result.size(),
        result.width(),
        result.height(),
        result.mime_type()
    );
    println!("Compression count: {}", client.compression_count());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = cli.client()?;

    match &cli.command {
        Commands::Compress(args) => {
            let source = client
                .from_file(&args.input)
                .await
                .with_context(|| format!("Failed to upload {:?}", args.input))?;
            compress(&client, source, &args.output, &args.resize).await?
        }
        Commands::Url(args) => {
            let source = client
                .from_url(&args.url)
                .await
                .with_context(|| format!("Failed to upload {}", args.url))?;
            compress(&client, source, &args.output, &args.resize).await?
        }
    }
    Ok(())
}
