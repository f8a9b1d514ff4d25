use std::io;

pub mod clients;
use clients::omdb_client::OmdbClient;

pub mod config;
use config::Config;

pub mod error;
use error::AppResult;

pub mod extractors;
pub mod manager;
use manager::CollectionManager;

pub mod model;

pub mod persisters;
use persisters::storage::open_storage;

pub mod shell;
use shell::Shell;

pub mod site_generator;
use site_generator::SiteGenerator;

/// Runs the interactive menu on stdin/stdout until the user quits.
pub async fn run(config: Config) -> AppResult<()> {
    log::debug!("Starting with {:?}", config);

    let storage = open_storage(&config.storage_path, config.storage_format());
    let omdb_client = OmdbClient::new(config.api_url.clone(), config.api_key.clone())?;
    let manager = CollectionManager::new(storage, omdb_client);
    let site = SiteGenerator::from_config(&config)?;

    let stdin = io::stdin();
    let mut shell = Shell::new(manager, site, stdin.lock(), io::stdout());
    shell.run().await
}
