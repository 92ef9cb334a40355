// use modules
use clap::Parser;
use std::process;
use tempdir::TempDir;

// define local modules
mod api;
mod bundle;
mod config;
mod container;
mod error;
mod image;
mod log;
mod manifests;
mod operator;
mod workflow;

// use local modules
use api::schema::*;
use config::load::*;
use log::logging::*;
use workflow::run::*;

// main entry point (use async)
#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let cfg = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(err) => {
            Logging {
                log_level: Level::ERROR,
            }
            .error(&err.to_string());
            process::exit(exitcode::USAGE);
        }
    };

    let log = &Logging {
        log_level: get_log_level(&cfg),
    };

    log.info(&format!(
        "bundle-mirror {} -> {}",
        cfg.bundle_image, cfg.dest_prefix
    ));
    log.trace(&format!("{:#?}", args));

    // removed on every exit path below, including termination by signal
    let scratch = match TempDir::new("bundle-mirror") {
        Ok(dir) => dir,
        Err(err) => {
            log.error(&format!("unable to create scratch directory : {}", err));
            process::exit(exitcode::CANTCREAT);
        }
    };
    log.debug(&format!("scratch directory {}", scratch.path().display()));

    let reg_con = ImplContainerInterface {
        engine: cfg.engine.clone(),
        copy_tool: cfg.copy_tool.clone(),
    };

    // the workflow borrows the path only, the directory itself is closed by run_until_signal
    let scratch_path = scratch.path().to_path_buf();
    let work = run_mirror(&reg_con, log, &cfg, &scratch_path);
    let code = run_until_signal(log, work, wait_for_signal(), scratch).await;
    process::exit(code);
}
