use anyhow::Context;
use clap::Parser;
use imprint::config::Config;
use imprint::editor::ImageEditor;
use imprint::server::EditorServer;
use std::path::PathBuf;

/// Imprint - captions photos with a darkening gradient, a logo and wrapped text
#[derive(Parser, Debug)]
#[command(name = "imprint")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long)]
    address: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,
}

fn load_config(args: &Args) -> Result<Config, String> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(address) = &args.address {
        config.server.address = address.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    config.validate()?;
    Ok(config)
}

fn main() {
    // Initialize logging subsystem
    imprint::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    tracing::info!(
        config_file = %args.config.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
        server_address = %config.server.address,
        server_port = config.server.port,
        canvas_size = config.editor.canvas_size,
        "Configuration loaded successfully"
    );

    if args.test {
        println!("Configuration OK");
        return;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(serve(config)) {
        tracing::error!(error = %format!("{:#}", e), "Image editor exited with error");
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let editor =
        ImageEditor::from_config(config.editor.clone()).context("Failed to create image editor")?;

    let address = config.server.listen_address();
    let server = EditorServer::bind(config.server, editor)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(address = %address, "Starting image editor");
    server.run().await.context("Server error")
}
