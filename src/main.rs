use clap::Parser;
use price_monitor::cli::{Cli, Commands};
use price_monitor::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str::<Config>(include_str!("../config.toml.example"))
    })?;

    // Check tasks run on this pool
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.monitor.workers)
        .thread_name("price-monitor-worker")
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        price_monitor::telemetry::init_telemetry(&config.telemetry)?;

        match cli.command {
            Commands::Run(args) => {
                tracing::info!("Starting feed reconciliation");
                args.execute(&config.monitor).await?;
            }
            Commands::Config => {
                println!("Current configuration:");
                println!(
                    "  Monitor: throttle={}ms guard={}ms workers={} shutdown_timeout={}s",
                    config.monitor.throttle_ms,
                    config.monitor.guard_ms,
                    config.monitor.workers,
                    config.monitor.shutdown_timeout_secs
                );
                println!(
                    "  Telemetry: level={} format={:?} metrics_port={:?}",
                    config.telemetry.log_level,
                    config.telemetry.log_format,
                    config.telemetry.metrics_port
                );
            }
        }

        Ok::<(), anyhow::Error>(())
    })
}
