use std::path::{Path, PathBuf};

use crate::api::schema::*;
use crate::error::handler::MirrorError;
use crate::log::logging::*;

// well known location of the manifests inside a bundle image
pub const BUNDLE_MANIFESTS_PATH: &str = "/manifests";

// extract the manifests directory of the bundle image into the scratch directory
pub async fn extract_manifests<T: ContainerInterface>(
    reg_con: &T,
    log: &Logging,
    bundle_image: String,
    scratch: &Path,
) -> Result<PathBuf, MirrorError> {
    log.info(&format!("extracting manifests from {}", bundle_image));
    let container_id = reg_con.create(log, bundle_image.clone()).await?;
    log.debug(&format!("created container {}", container_id));

    let dest = get_manifests_dir(scratch);
    let copied = reg_con
        .copy_out(
            log,
            container_id.clone(),
            String::from(BUNDLE_MANIFESTS_PATH),
            dest.display().to_string(),
        )
        .await;

    match copied {
        Ok(_) => {
            reg_con.remove(log, container_id).await?;
        }
        Err(err) => {
            if let Err(rm_err) = reg_con.remove(log, container_id.clone()).await {
                log.warn(&format!("unable to remove container {} : {}", container_id, rm_err));
            }
            return Err(err);
        }
    }
    log.debug(&format!("manifests extracted to {}", dest.display()));
    Ok(dest)
}

pub fn get_manifests_dir(scratch: &Path) -> PathBuf {
    scratch.join("manifests")
}
