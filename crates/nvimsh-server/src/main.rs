use std::{path::Path, sync::Arc};

use actix_web::{web, App, HttpServer};
use clap::Parser;
use cli::{Args, Commands};
use error::{ErrorContext, ServerResult};
use logging::setup_logging;
use nvimsh_config::Config;
use nvimsh_core::{Catalog, RefreshConfig, Refresher, SnapshotStore};
use nvimsh_registry::{ClientConfig, FeedSource, HttpFeed};
use tracing::{debug, info};

mod cli;
mod error;
mod handlers;
mod logging;
mod render;
mod utils;

async fn serve(config: Config) -> ServerResult<()> {
    let addr = config.listen_addr()?;

    let feed = HttpFeed::new(
        config.feed_url(),
        ClientConfig {
            user_agent: Some(config.user_agent()),
            timeout: Some(config.request_timeout()?),
            max_body_size: config.max_feed_size(),
        },
    )?;
    let source: Arc<dyn FeedSource> = Arc::new(feed);

    let store = Arc::new(SnapshotStore::new());
    let refresh = Refresher::new(
        Arc::clone(&store),
        source,
        RefreshConfig {
            interval: config.refresh_interval()?,
            enabled: config.refresh_enabled(),
        },
    )
    .start();

    let catalog = web::Data::new(Catalog::new(store));

    info!("Listening on http://{addr}");
    let result = HttpServer::new(move || {
        App::new()
            .app_data(catalog.clone())
            .configure(handlers::configure_routes)
    })
    .bind(addr)
    .with_context(|| format!("binding to {addr}"));

    let result = match result {
        Ok(server) => {
            server
                .run()
                .await
                .with_context(|| "running HTTP server".to_string())
        }
        Err(err) => Err(err),
    };

    debug!("HTTP server stopped, stopping plugin refresh");
    refresh.stop().await;

    result
}

async fn handle_cli() -> ServerResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        utils::set_color(false);
    }

    match args.command.unwrap_or_default() {
        Commands::DefConfig => {
            print!("{}", Config::default_toml()?);
        }
        Commands::Serve {
            listen,
            feed_url,
        } => {
            let mut config = Config::load(args.config.as_deref().map(Path::new))?;

            if let Some(listen) = listen {
                config.listen = Some(listen);
            }
            if let Some(feed_url) = feed_url {
                config.feed_url = Some(feed_url);
            }
            config.validate()?;

            serve(config).await?;
        }
    }

    Ok(())
}

#[actix_web::main]
async fn main() {
    // Install miette's fancy error handler for beautiful error output
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli().await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
