use clap::{Parser, ValueEnum};
use pkg_aggregator::ShapeSettings;
use pkg_api::AuthConfig;
use pkg_api::server::{ServerConfig, start_server};
use pkg_constants::network::{DEFAULT_API_PORT, DEFAULT_REQUEST_TIMEOUT_SECS};
use pkg_constants::paths::{DEFAULT_SERVER_CONFIG, DEFAULT_SERVER_DATA_DIR};
use pkg_rbac::{PolicyEngine, Role};
use pkg_state::client::StateStore;
use pkg_state::memory::MemoryStore;
use pkg_types::config::{ServerConfigFile, load_config_file};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "lens-server", about = "Read-only cluster viewer API")]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_SERVER_CONFIG)]
    config: String,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Directory of the SlateDB registry to read
    #[arg(long)]
    data_dir: Option<String>,

    /// Serve from memory, seeded from this YAML fixture, instead of the registry
    #[arg(long)]
    fixture: Option<String>,

    /// Require a Bearer token on every API request
    #[arg(long)]
    enable_auth: Option<bool>,

    /// Apply label-based visibility rules
    #[arg(long)]
    enable_rbac: Option<bool>,

    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    // Load config file (returns defaults if file not found)
    let file_cfg: ServerConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let port = cli.port.or(file_cfg.port).unwrap_or(DEFAULT_API_PORT);
    let fixture = cli.fixture.or(file_cfg.fixture);
    let data_dir = cli
        .data_dir
        .or(file_cfg.data_dir)
        .unwrap_or_else(|| DEFAULT_SERVER_DATA_DIR.to_string());
    let enable_auth = cli.enable_auth.or(file_cfg.enable_auth).unwrap_or(false);
    let enable_rbac = cli.enable_rbac.or(file_cfg.enable_rbac).unwrap_or(true);
    let timeout_secs = file_cfg
        .request_timeout_secs
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    let defaults = ShapeSettings::default();
    let settings = ShapeSettings {
        link_label: file_cfg.link_label.unwrap_or(defaults.link_label),
        name_labels: file_cfg.name_labels.unwrap_or(defaults.name_labels),
        sensitive_env: file_cfg.sensitive_env.unwrap_or(defaults.sensitive_env),
    };

    info!("Starting lens-server");
    info!("  Port:      {}", port);
    info!("  Auth:      {}", enable_auth);
    info!("  RBAC:      {}", enable_rbac);
    info!("  Tokens:    {}", file_cfg.tokens.len());
    info!("  Link by:   {}", settings.link_label);

    let config = ServerConfig {
        addr: SocketAddr::from(([0, 0, 0, 0], port)),
        request_timeout: Duration::from_secs(timeout_secs),
        auth: AuthConfig {
            enabled: enable_auth,
            tokens: file_cfg.tokens,
            default_role: file_cfg.default_role.unwrap_or_else(Role::operator),
            engine: PolicyEngine::new(enable_rbac),
        },
        settings,
    };

    match fixture {
        Some(path) => {
            info!("  Store:     memory (fixture {})", path);
            let store = MemoryStore::from_fixture(&path).await?;
            start_server(store, config).await?;
        }
        None => {
            info!("  Store:     registry at {}", data_dir);
            let store = StateStore::open(&data_dir).await?;
            start_server(store.clone(), config).await?;
            store.close().await?;
        }
    }

    Ok(())
}
