//! List genres command handler

use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{CatalogService, SeaOrmCatalogService};

pub async fn cmd_list_genres(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(
        Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?,
    );
    let catalog = SeaOrmCatalogService::new(store, config.listing.clone());

    let counts = catalog.get_genres_with_title_counts().await?;

    if counts.is_empty() {
        println!("No genres found.");
        return Ok(());
    }

    println!("Genres ({} total)", counts.len());
    println!("{:-<40}", "");

    for count in counts {
        println!(
            "{:>4}  {:<24} {:>6}",
            count.genre.id.value(),
            count.genre.name,
            count.title_count
        );
    }

    Ok(())
}
