mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, TargetArgs};
use mc_catalog::{Catalog, MediaRef, MediaUpdate, SqliteCatalogStore};
use mc_core::config::Config;
use mc_core::{MediaId, MediaItem, NewMedia};
use mc_server::routes::media::{ListMediaParams, MediaResponse};
use tokio_util::sync::CancellationToken;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediacat=debug,mc_catalog=debug,mc_db=debug,mc_server=debug,tower_http=debug"
                .to_string()
        } else {
            "mediacat=info,mc_catalog=info,mc_server=info,tower_http=info".to_string()
        }
    });

    // Logs go to stderr so command output on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("mediacat {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = Config::load_or_default(cli.config.as_deref());
    if let Some(db) = cli.db {
        config.database.path = db;
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli.command, config))
}

async fn run(command: Commands, mut config: Config) -> Result<()> {
    if let Commands::Serve { host, port } = command {
        if let Some(host) = host {
            config.server.host = host;
        }
        if let Some(port) = port {
            config.server.port = port;
        }
        tracing::info!(
            "Starting mediacat on {}:{}",
            config.server.host,
            config.server.port
        );
        mc_server::start(config).await?;
        return Ok(());
    }

    let catalog = open_catalog(&config)?;

    // Ctrl+C aborts a running catalog call instead of killing it mid-write.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    match command {
        Commands::Add {
            title,
            year,
            kind,
            genre,
            rating,
            watched,
        } => {
            let draft = NewMedia {
                title,
                release_year: year,
                kind: kind.parse()?,
                genre,
                rating,
                watched,
            };
            let item = catalog.add_media(draft, &cancel).await?;
            print_item(&item)
        }
        Commands::List {
            search,
            kind,
            genre,
            year_from,
            year_to,
            rating_min,
            rating_max,
            watched,
            page,
            page_size,
            sort_by,
            descending,
        } => {
            let criteria = ListMediaParams {
                search,
                kind,
                genre,
                year_from,
                year_to,
                rating_min,
                rating_max,
                watched,
                page: Some(page),
                page_size: Some(page_size),
                sort_by,
                ascending: Some(!descending),
            }
            .into_criteria()?;
            let items = catalog.list_media(&criteria, &cancel).await?;
            let out: Vec<MediaResponse> = items.iter().map(MediaResponse::from_model).collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Commands::Rate { rating, target } => {
            let item = catalog
                .rate_media(&media_ref(target)?, rating, &cancel)
                .await?;
            print_item(&item)
        }
        Commands::Update {
            target,
            new_title,
            year,
            kind,
            genre,
        } => {
            let changes = MediaUpdate {
                title: new_title,
                release_year: year,
                kind: kind.parse()?,
                genre,
            };
            let item = catalog
                .update_media(&media_ref(target)?, changes, &cancel)
                .await?;
            print_item(&item)
        }
        Commands::Watched { target } => {
            let item = catalog.mark_watched(&media_ref(target)?, &cancel).await?;
            print_item(&item)
        }
        Commands::Mcp => {
            mc_mcp::serve_stdio(catalog, cancel).await?;
            Ok(())
        }
        Commands::Serve { .. } | Commands::Version => Ok(()),
    }
}

fn open_catalog(config: &Config) -> Result<Catalog> {
    let db_path = config.database.path.to_string_lossy();
    let pool = mc_db::pool::init_pool(&db_path, config.database.effective_pool_size())
        .with_context(|| format!("Failed to open database at {db_path}"))?;
    Ok(Catalog::new(Arc::new(SqliteCatalogStore::new(pool))))
}

fn media_ref(target: TargetArgs) -> Result<MediaRef> {
    let id = target
        .id
        .map(|raw| {
            raw.parse::<MediaId>()
                .with_context(|| format!("Invalid media ID '{raw}'"))
        })
        .transpose()?;
    Ok(MediaRef {
        id,
        title: target.title,
    })
}

fn print_item(item: &MediaItem) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&MediaResponse::from_model(item))?
    );
    Ok(())
}
