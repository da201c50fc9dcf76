use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use typed_route::logging::init_logging;
use typed_route::runtime_config::RuntimeConfig;
use typed_route::{AppConfig, HttpServer, ResponseFormat};
use users_app::{build_service, UserStore};

#[derive(Parser, Debug)]
#[command(name = "users-app", version, about = "Users CRUD service built on typed-route")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "USERS_APP_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind, e.g. 0.0.0.0:8080
    #[arg(long, env = "USERS_APP_ADDR")]
    addr: Option<String>,

    /// Response format: json or html
    #[arg(long, env = "USERS_APP_FORMAT")]
    format: Option<ResponseFormat>,

    /// Directory holding the view templates
    #[arg(long, env = "USERS_APP_TEMPLATES")]
    templates: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(templates) = self.templates {
            config.templates_dir = Some(templates);
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging()?;
    RuntimeConfig::from_env().apply();

    let config = Cli::parse().into_config()?;
    let store = UserStore::spawn()?;
    let service = build_service(&config, &store)?;

    let handle = HttpServer(service).start(config.addr.as_str())?;
    handle.wait_ready()?;
    info!(addr = %handle.addr(), format = %config.format, "users-app listening");

    wait_for_shutdown()?;
    info!("Shutting down");
    handle.stop();
    Ok(())
}

#[cfg(unix)]
fn wait_for_shutdown() -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown() -> anyhow::Result<()> {
    loop {
        std::thread::park();
    }
}
