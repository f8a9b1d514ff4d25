use std::{env, path::PathBuf, process};

use movieshelf::config::Config;

mod logging;

fn get_config_path() -> Option<PathBuf> {
    env::args().nth(1).map(PathBuf::from)
}

#[tokio::main]
async fn main() {
    let config = match Config::load(get_config_path().as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    logging::setup_logging(&config.log_level);

    if let Err(e) = movieshelf::run(config).await {
        log::error!("Movie shelf stopped: {:?}", e);
        eprintln!("{}", e);
        process::exit(1);
    }
}
