// module copy

use crate::api::schema::*;
use crate::error::handler::MirrorError;
use crate::log::logging::*;

pub const DIGEST_MARKER: &str = "@sha256";

// split a reference at the last '/' into (registry and namespace with trailing '/', name and tag)
pub fn split_image_reference(source: &str) -> (&str, &str) {
    match source.rfind('/') {
        Some(idx) => source.split_at(idx + 1),
        None => ("", source),
    }
}

// map a source reference onto the destination prefix
//
// '@sha256' is dropped from the name so 'app@sha256:abcd' becomes 'app:abcd',
// the mirror consumer cannot handle digest references after the rewrite.
// The result is a tag carrying the digest hex, not a digest reference.
pub fn get_destination_image(source: &str, prefix: &str) -> String {
    let (_, name_tag) = split_image_reference(source);
    format!("{}{}", prefix, name_tag.replace(DIGEST_MARKER, ""))
}

pub fn is_digest_reference(source: &str) -> bool {
    source.contains(DIGEST_MARKER)
}

// copy tool arguments, plus the same arguments with the password masked for logs
pub fn get_copy_args(
    src_url: String,
    dest_url: String,
    all: bool,
    dest_creds: Option<String>,
) -> (Vec<String>, Vec<String>) {
    let mut args = vec![String::from("copy")];
    let mut display = vec![String::from("copy")];
    if all {
        args.push(String::from("--all"));
        display.push(String::from("--all"));
    }
    if let Some(creds) = dest_creds {
        args.push(String::from("--dest-creds"));
        display.push(String::from("--dest-creds"));
        display.push(mask_creds(&creds));
        args.push(creds);
    }
    args.push(src_url.clone());
    args.push(dest_url.clone());
    display.push(src_url);
    display.push(dest_url);
    (args, display)
}

pub fn mask_creds(creds: &str) -> String {
    match creds.split_once(':') {
        Some((user, _)) => format!("{}:***", user),
        None => creds.to_string(),
    }
}

// mirror every image in order, the first failure aborts the rest
// returns the number of images copied (or logged in dry run)
pub async fn mirror_images<T: ContainerInterface>(
    reg_con: &T,
    log: &Logging,
    cfg: &MirrorConfig,
    images: &[String],
) -> Result<usize, MirrorError> {
    let mut mirrored = 0;
    for (idx, source) in images.iter().enumerate() {
        let dest = get_destination_image(source, &cfg.dest_prefix);
        let all = is_digest_reference(source);
        let src_url = format!("docker://{}", source);
        let dest_url = format!("docker://{}", dest);
        let dest_creds = cfg.dest_creds.as_ref().map(|c| c.to_arg());

        log.hi(&format!(
            "[{}/{}] mirroring {} -> {}",
            idx + 1,
            images.len(),
            source,
            dest
        ));
        if cfg.dry_run {
            let (_, display) = get_copy_args(src_url, dest_url, all, dest_creds);
            log.info(&format!("would copy: {} {}", cfg.copy_tool, display.join(" ")));
        } else {
            reg_con
                .copy(log, src_url, dest_url, all, dest_creds)
                .await
                .map_err(|e| MirrorError::new(&format!("mirroring {} failed : {}", source, e)))?;
        }
        mirrored += 1;
    }
    Ok(mirrored)
}
