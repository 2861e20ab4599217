//! compras-report - a terminal report over the Compras.gov.br Contratos data set.

use compras_report::cli::Cli;
use compras_report::config::Config;
use compras_report::error::Result;
use compras_report::{logging, tui};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();

    if cli.is_headless() {
        logging::init_stderr_logging();

        match run_headless(&cli).await {
            Ok(code) => std::process::exit(code),
            Err(e) => {
                error!("{}: {}", e.category(), e);
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    logging::init_file_logging();

    if let Err(e) = run(&cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    Config::load_from_file(&config_path)
}

async fn run_headless(cli: &Cli) -> Result<i32> {
    let config = load_config(cli)?;
    tui::headless::run_headless(cli, &config).await
}

async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let data = config.data_source(cli.data_path());
    tui::run(&config, &data).await
}
