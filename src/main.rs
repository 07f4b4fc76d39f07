//! S3 Navigator
//!
//! Browse S3 buckets from the terminal: tabbed, split panes with JSON,
//! Markdown, HTML, image and text previews.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use s3_navigator::app::{App, LaunchParams};
use s3_navigator::gateway::{self, Gateway};
use s3_navigator::s3::{S3Client, S3ClientConfig, S3Url};
use s3_navigator::settings::Settings;
use s3_navigator::shell::{Flow, Shell};

#[derive(Debug, Parser)]
#[command(name = "s3-navigator", version, about)]
struct Args {
    /// Location to open at startup (s3://bucket/key or an S3 https URL)
    url: Option<String>,

    /// AWS profile from ~/.aws/config
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Endpoint of an S3-compatible store
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Address buckets by path instead of virtual host
    #[arg(long)]
    path_style: bool,

    /// Bucket to open at startup
    #[arg(long)]
    bucket: Option<String>,

    /// Key or prefix within --bucket
    #[arg(long, requires = "bucket", default_value = "")]
    key: String,
}

impl Args {
    fn launch_params(&self) -> Result<Option<LaunchParams>> {
        if let Some(url) = &self.url {
            let parsed = S3Url::parse(url).with_context(|| format!("Not an S3 location: {}", url))?;
            return Ok(Some(parsed.into()));
        }
        Ok(self
            .bucket
            .as_ref()
            .map(|bucket| LaunchParams::new(bucket, &self.key)))
    }

    fn client_config(&self) -> S3ClientConfig {
        S3ClientConfig {
            profile: self.profile.clone(),
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            force_path_style: self.path_style,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't mix with the shell output
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting S3 Navigator v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let launch = args.launch_params()?;

    let settings = Settings::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings, using defaults: {:#}", e);
        Settings::default()
    });

    let client = S3Client::with_config(args.client_config()).await?;
    let (store, gateway_task) = gateway::channel::spawn(Gateway::new(client));

    let mut app = App::new(store, settings);
    match Settings::settings_path() {
        Ok(path) => app = app.with_settings_path(path),
        Err(e) => tracing::warn!("Settings will not be saved: {:#}", e),
    }
    if let Some(params) = &launch {
        app.launch(params).await;
    }

    run_shell(Shell::new(app)).await?;

    gateway_task.abort();
    Ok(())
}

async fn run_shell<S: gateway::ObjectStore>(mut shell: Shell<S>) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let intro = shell.render();
    stdout.write_all(intro.as_bytes()).await?;

    loop {
        stdout.write_all(b"s3> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match shell.handle_line(&line).await {
            Flow::Continue(output) => {
                stdout.write_all(output.as_bytes()).await?;
                if !output.is_empty() && !output.ends_with('\n') {
                    stdout.write_all(b"\n").await?;
                }
            }
            Flow::Quit => break,
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}
