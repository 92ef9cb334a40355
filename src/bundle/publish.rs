use std::fs;
use std::path::{Path, PathBuf};

use crate::api::schema::*;
use crate::error::handler::MirrorError;
use crate::image::copy::*;
use crate::log::logging::*;

// companion build template, rewrites the references inside the bundle manifests
pub const BUNDLE_TEMPLATE: &str = include_str!("../../bundle-template/Containerfile");
pub const BUNDLE_REWRITE_SCRIPT: &str = include_str!("../../bundle-template/rewrite.sh");

// write the embedded build context into <scratch>/build and return that directory
pub fn write_bundle_template(scratch: &Path) -> Result<PathBuf, MirrorError> {
    let dir = scratch.join("build");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("Containerfile"), BUNDLE_TEMPLATE)?;
    fs::write(dir.join("rewrite.sh"), BUNDLE_REWRITE_SCRIPT)?;
    Ok(dir)
}

pub fn get_build_args(bundle_image: &str, dest_prefix: &str) -> Vec<(String, String)> {
    // the source prefix always comes from the bundle reference itself
    let (source, _) = split_image_reference(bundle_image);
    vec![
        (String::from("PARENT_IMAGE"), bundle_image.to_string()),
        (String::from("SOURCE"), source.to_string()),
        (String::from("DESTINATION"), dest_prefix.to_string()),
    ]
}

// rebuild the bundle against the destination and publish it
pub async fn repatch_and_publish<T: ContainerInterface>(
    reg_con: &T,
    log: &Logging,
    cfg: &MirrorConfig,
    template_dir: &Path,
) -> Result<String, MirrorError> {
    let dest = get_destination_image(&cfg.bundle_image, &cfg.dest_prefix);
    let build_args = get_build_args(&cfg.bundle_image, &cfg.dest_prefix);
    log.debug(&format!("build args {:?}", build_args));

    log.info(&format!("building bundle {}", dest));
    let image_id = reg_con
        .build(
            log,
            template_dir.display().to_string(),
            build_args,
            dest.clone(),
        )
        .await?;
    log.debug(&format!("built image {}", image_id));

    if cfg.dry_run {
        log.info(&format!("would push: {}", dest));
    } else {
        log.info(&format!("pushing bundle {}", dest));
        reg_con.push(log, dest.clone()).await?;
    }
    Ok(dest)
}

#[cfg(test)]
mod tests {
    // this brings everything from parent's scope into this scope
    use super::*;
    use crate::api::fake::Fake;
    use std::process::Command;
    use tempdir::TempDir;

    macro_rules! aw {
        ($e:expr) => {
            tokio_test::block_on($e)
        };
    }

    fn get_config(bundle_image: &str, dry_run: bool) -> MirrorConfig {
        MirrorConfig {
            bundle_image: bundle_image.to_string(),
            dest_prefix: String::from("quay.io/dest/"),
            dest_creds: None,
            version_filter: String::from(""),
            dry_run,
            debug: false,
            engine: String::from("podman"),
            copy_tool: String::from("skopeo"),
            template_dir: None,
        }
    }

    #[test]
    fn get_build_args_pass() {
        let res = get_build_args("quay.io/ns/bundle:v1", "quay.io/dest/");
        assert_eq!(
            res,
            vec![
                (String::from("PARENT_IMAGE"), String::from("quay.io/ns/bundle:v1")),
                (String::from("SOURCE"), String::from("quay.io/ns/")),
                (String::from("DESTINATION"), String::from("quay.io/dest/")),
            ]
        );
    }

    #[test]
    fn write_bundle_template_pass() {
        let tmp = TempDir::new("publish-test").expect("should create tempdir");
        let dir = write_bundle_template(tmp.path()).unwrap();
        let content = fs::read_to_string(dir.join("Containerfile")).unwrap();
        assert!(content.contains("ARG PARENT_IMAGE"));
        assert!(content.contains("ARG SOURCE"));
        assert!(content.contains("ARG DESTINATION"));
        assert!(content.contains("COPY rewrite.sh"));
        assert!(dir.join("rewrite.sh").exists());
    }

    // run the embedded rewrite script over a single manifest and return the result
    fn rewrite_manifest(source: &str, destination: &str, manifest: &str) -> String {
        let tmp = TempDir::new("publish-test").expect("should create tempdir");
        let build = write_bundle_template(tmp.path()).unwrap();
        let manifests = tmp.path().join("manifests");
        fs::create_dir_all(&manifests).unwrap();
        fs::write(manifests.join("op.clusterserviceversion.yaml"), manifest).unwrap();
        let status = Command::new("sh")
            .arg(build.join("rewrite.sh"))
            .arg(&manifests)
            .env("SOURCE", source)
            .env("DESTINATION", destination)
            .status()
            .expect("should run rewrite script");
        assert!(status.success());
        fs::read_to_string(manifests.join("op.clusterserviceversion.yaml")).unwrap()
    }

    #[test]
    fn rewrite_script_pass() {
        let manifest = "image: quay.io/ns/op@sha256:0a1b\nproxy: \"quay.io/ns/img:v1\"\n";
        let res = rewrite_manifest("quay.io/ns/", "quay.io/dest/", manifest);
        assert_eq!(
            res,
            String::from("image: quay.io/dest/op:0a1b\nproxy: \"quay.io/dest/img:v1\"\n")
        );
    }

    #[test]
    fn rewrite_script_keeps_digests_outside_destination() {
        let manifest = "image: quay.io/ns/op@sha256:0a1b\nother: quay.io/other/x@sha256:ff\n";
        let res = rewrite_manifest("quay.io/ns/", "quay.io/dest/", manifest);
        assert!(res.contains("quay.io/dest/op:0a1b"));
        assert!(res.contains("quay.io/other/x@sha256:ff"));
    }

    #[test]
    fn rewrite_script_dot_is_literal() {
        let manifest = "near: quayxio/ns/foo:v1\n";
        let res = rewrite_manifest("quay.io/ns/", "quay.io/dest/", manifest);
        assert_eq!(res, String::from(manifest));
    }

    #[test]
    fn rewrite_script_empty_source_is_noop() {
        // a bundle reference without '/' has no source prefix
        let manifest = "image: quay.io/ns/op@sha256:0a1b\n";
        let res = rewrite_manifest("", "quay.io/dest/", manifest);
        assert_eq!(res, String::from(manifest));
    }

    #[test]
    fn repatch_and_publish_pass() {
        let log = &Logging {
            log_level: Level::DEBUG,
        };
        let fake = Fake::default();
        let cfg = get_config("quay.io/ns/bundle:v1", false);
        let res = aw!(repatch_and_publish(&fake, log, &cfg, Path::new("/tmp/build")));
        assert_eq!(res, Ok(String::from("quay.io/dest/bundle:v1")));
        assert_eq!(
            fake.calls(),
            vec![
                String::from("build PARENT_IMAGE=quay.io/ns/bundle:v1 SOURCE=quay.io/ns/ DESTINATION=quay.io/dest/ -t quay.io/dest/bundle:v1 /tmp/build"),
                String::from("push quay.io/dest/bundle:v1"),
            ]
        );
    }

    #[test]
    fn repatch_and_publish_dry_run_still_builds() {
        let log = &Logging {
            log_level: Level::INFO,
        };
        let fake = Fake::default();
        let cfg = get_config("quay.io/ns/bundle@sha256:abcd", true);
        let res = aw!(repatch_and_publish(&fake, log, &cfg, Path::new("/tmp/build")));
        assert_eq!(res, Ok(String::from("quay.io/dest/bundle:abcd")));
        assert_eq!(fake.count("build"), 1);
        assert_eq!(fake.count("push"), 0);
    }

    #[test]
    fn repatch_and_publish_build_fail() {
        let log = &Logging {
            log_level: Level::INFO,
        };
        let fake = Fake::failing_on("build");
        let cfg = get_config("quay.io/ns/bundle:v1", false);
        let res = aw!(repatch_and_publish(&fake, log, &cfg, Path::new("/tmp/build")));
        assert!(res.is_err());
        assert_eq!(fake.count("push"), 0);
    }
}
