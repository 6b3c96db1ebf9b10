use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use samplebox_select::SelectorConfig;
use samplebox_service::{Registry, Server};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address selectors are served on
    #[arg(short, long, default_value = "127.0.0.1:9090")]
    bind: String,
    /// Active learning selector configuration (JSON file)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Random seed for reproducible campaigns
    #[arg(short, long)]
    seed: Option<u64>,
    /// Seconds a connection may stay idle before being closed (0 waits forever)
    #[arg(short, long, default_value_t = 300)]
    timeout: u64,
}

fn main() -> Result<()> {
    let env = Env::new().filter_or("SAMPLEBOX_LOG", "info");
    Builder::from_env(env)
        .target(env_logger::Target::Stdout)
        .try_init()
        .ok();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Cannot open configuration {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Invalid configuration {}", path.display()))?
        }
        None => SelectorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }

    let registry = Registry::with_defaults(config)?;
    let mut server = Server::bind(&args.bind, registry)
        .with_context(|| format!("Cannot bind {}", args.bind))?
        .read_timeout(Some(Duration::from_secs(args.timeout)));
    server.serve()?;
    Ok(())
}
