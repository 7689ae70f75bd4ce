use anyhow::{bail, Context, Result};
use asa_common::{
    logger::{setup_logger, LogFileConfig, LoggerConfig, DEFAULT_LOGS_DATETIME_FORMAT},
    rpc::http::{AlgodClient, IndexerHttpClient, KmdClient},
};
use asa_testing_integration::{config::Config, Orchestrator};
use clap::Parser;
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log = &config.log;
    setup_logger(&LoggerConfig {
        level: log.log_level,
        disable_colors: log.disable_log_color,
        file: (!log.disable_file_logging).then(|| LogFileConfig {
            dir_path: &log.logs_path,
            filename_log: &log.filename_log,
            level: log.file_log_level.unwrap_or(log.log_level),
        }),
        logs_datetime_format: DEFAULT_LOGS_DATETIME_FORMAT,
    })
    .context("Error while initializing logger")?;

    if log::log_enabled!(log::Level::Info) {
        info!(
            "ASA State Observer test v{} starting...",
            asa_common::config::VERSION
        );
        info!("Ledger node: {}", config.node.algod_address);
    }

    let rest = config.node.rest_client_config();
    let algod = AlgodClient::new(&config.node.algod_address, &config.node.algod_token, &rest)
        .context("Error while creating the ledger client")?;
    let kmd = KmdClient::new(&config.node.kmd_address, &config.node.kmd_token, &rest)
        .context("Error while creating the wallet client")?;
    let indexer = IndexerHttpClient::new(
        &config.node.indexer_address,
        &config.node.indexer_token,
        &rest,
    )
    .context("Error while creating the indexer client")?;

    let stats = Orchestrator::new(&algod, &kmd, &indexer, config.harness_config())
        .run()
        .await
        .context("Observer test run aborted")?;

    println!("{stats}");

    if !stats.is_success() {
        bail!("{} of {} unit tests failed", stats.failed_tests, stats.total());
    }
    Ok(())
}
