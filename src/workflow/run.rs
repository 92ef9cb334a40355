use std::future::Future;
use std::path::{Path, PathBuf};
use tempdir::TempDir;
use tokio::signal::unix::{signal, SignalKind};

use crate::api::schema::*;
use crate::bundle::publish::*;
use crate::error::handler::MirrorError;
use crate::image::copy::*;
use crate::log::logging::*;
use crate::manifests::extract::*;
use crate::operator::collector::*;

// extract, collect, mirror and republish, in that order
pub async fn run_mirror<T: ContainerInterface>(
    reg_con: &T,
    log: &Logging,
    cfg: &MirrorConfig,
    scratch: &Path,
) -> Result<MirrorSummary, MirrorError> {
    if cfg.dry_run {
        log.warn("dry run: images are not copied and the bundle is not pushed");
    }

    let manifests_dir = extract_manifests(reg_con, log, cfg.bundle_image.clone(), scratch).await?;

    if !cfg.version_filter.is_empty() {
        log.lo(&format!("restricting csv files to version {}", cfg.version_filter));
    }
    let files = select_csv_files(log, &manifests_dir, &cfg.version_filter)?;
    log.mid(&format!("selected {} csv file(s)", files.len()));

    let images = collect_related_images(log, &files)?;
    log.mid(&format!("found {} related image(s)", images.len()));

    let mirrored = mirror_images(reg_con, log, cfg, &images).await?;
    if mirrored > 0 {
        log.hi(&format!("completed mirroring of {} related image(s)", mirrored));
    }

    let template_dir = match &cfg.template_dir {
        Some(dir) => PathBuf::from(dir),
        None => write_bundle_template(scratch)?,
    };
    let bundle = repatch_and_publish(reg_con, log, cfg, &template_dir).await?;
    log.hi(&format!("bundle republished as {}", bundle));

    Ok(MirrorSummary {
        csv_files: files.len(),
        images: mirrored,
        bundle,
    })
}

// drive the workflow until it finishes or a shutdown signal arrives,
// the scratch directory is removed either way and the exit code returned
pub async fn run_until_signal<F, S>(log: &Logging, work: F, shutdown: S, scratch: TempDir) -> i32
where
    F: Future<Output = Result<MirrorSummary, MirrorError>>,
    S: Future<Output = &'static str>,
{
    let code = tokio::select! {
        res = work => match res {
            Ok(summary) => {
                log.hi(&format!(
                    "mirrored {} image(s) from {} csv file(s), bundle {}",
                    summary.images, summary.csv_files, summary.bundle
                ));
                exitcode::OK
            }
            Err(err) => {
                log.error(&err.to_string());
                exitcode::SOFTWARE
            }
        },
        name = shutdown => {
            log.error(&format!("received {}, aborting", name));
            exitcode::TEMPFAIL
        }
    };

    if let Err(err) = scratch.close() {
        log.warn(&format!("unable to remove scratch directory : {}", err));
    }
    code
}

// resolves with the name of the first termination signal received
pub async fn wait_for_signal() -> &'static str {
    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(_) => return signal_received(tokio::signal::ctrl_c().await, "SIGINT").await,
    };
    tokio::select! {
        name = async { signal_received(tokio::signal::ctrl_c().await, "SIGINT").await } => name,
        _ = term.recv() => "SIGTERM",
    }
}

// a listener that could not be registered never fires
pub async fn signal_received(res: std::io::Result<()>, name: &'static str) -> &'static str {
    if res.is_err() {
        std::future::pending::<()>().await;
    }
    name
}
