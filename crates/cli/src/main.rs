use clap::{Parser, Subcommand};
use smartmail::extract::InboundBody;
use smartmail::platforms::PlatformKind;

#[derive(Parser)]
#[command(name = "smartmail")]
#[command(about = "SmartMail Insight CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config.json.
    Init {
        /// Config file path (default: ~/.smartmail/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the webhook gateway (Cliq and SalesIQ webhooks, stats API, dashboard).
    Serve {
        /// Config file path (default: ~/.smartmail/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default: PORT env, then config, then 5000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Analyze one message with the configured analyzer and print the platform reply JSON.
    Analyze {
        /// Config file path (default: ~/.smartmail/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Reply schema: cliq or salesiq
        #[arg(long, default_value = "cliq")]
        platform: PlatformKind,

        /// Message text to analyze
        text: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("smartmail {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("gateway failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Analyze {
            config,
            platform,
            text,
        }) => {
            if let Err(e) = run_analyze(config, platform, text).await {
                log::error!("analyze failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(smartmail::config::default_config_path);
    let dir = smartmail::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (config, path) = smartmail::config::load_config(config_path)?;
    log::debug!("using config {}", path.display());
    let mut state = smartmail::gateway::GatewayState::from_config(config);
    if let Some(p) = port {
        state.port = p;
    }
    log::info!("starting gateway on {}:{}", state.config.gateway.bind, state.port);
    smartmail::gateway::run_with_state(state).await
}

async fn run_analyze(
    config_path: Option<std::path::PathBuf>,
    platform: PlatformKind,
    text: String,
) -> anyhow::Result<()> {
    let (config, _) = smartmail::config::load_config(config_path)?;
    let analyzer = smartmail::analysis::build_analyzer(&config.analyzer);
    let body = InboundBody::Form {
        arguments: Some(text),
    };
    let reply = smartmail::pipeline::handle(&body, platform, analyzer.as_ref(), None).await;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
