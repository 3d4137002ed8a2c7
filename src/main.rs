use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use reelcache::cli::{commands, handle_error, AppContext, Cli, Commands};
use reelcache::ConfigLoader;

/// Logs go to stderr so stdout stays clean for command output and --json.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reelcache={default_level}")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(err, json),
    };
    init_tracing(&config.logging.level);

    // Init runs before any services exist.
    if let Commands::Init(args) = &cli.command {
        if let Err(err) = commands::init::execute(args, &config, json).await {
            handle_error(err, json);
        }
        return;
    }

    let ctx = match AppContext::init(config).await {
        Ok(ctx) => ctx,
        Err(err) => handle_error(err, json),
    };

    let requester = cli.requester.as_str();
    let result = match &cli.command {
        Commands::Init(_) => unreachable!("handled above"),
        Commands::Search(args) => commands::search::execute(&ctx, args, requester, json).await,
        Commands::Movie(args) => commands::movie::execute(&ctx, args, requester, json).await,
        Commands::Links(args) => commands::links::execute(&ctx, args, requester, json).await,
        Commands::Open(args) => commands::open::execute(&ctx, args, requester, json).await,
        Commands::History(args) => commands::history::execute(&ctx, args, requester, json).await,
        Commands::Stats(args) => commands::stats::execute(&ctx, args, requester, json).await,
    };

    ctx.close().await;
    if let Err(err) = result {
        handle_error(err, json);
    }
}
