use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::api::schema::*;
use crate::error::handler::MirrorError;
use crate::log::logging::*;

// file name suffix of a ClusterServiceVersion manifest
pub const CSV_SUFFIX: &str = ".clusterserviceversion.yaml";

// find all csv files under dir whose name ends with <filter><suffix>
pub fn select_csv_files(
    log: &Logging,
    dir: &Path,
    version_filter: &str,
) -> Result<Vec<PathBuf>, MirrorError> {
    let pattern = format!("{}{}", version_filter, CSV_SUFFIX);
    log.debug(&format!("selecting files matching *{}", pattern));
    let mut files = vec![];
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(&pattern) {
            log.trace(&format!("csv file {}", entry.path().display()));
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    if files.is_empty() {
        log.warn(&format!(
            "no files matching *{} found in {}",
            pattern,
            dir.display()
        ));
    }
    Ok(files)
}

// parse a single csv document and return spec.relatedImages[].image
pub fn parse_related_images(data: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let csv: ClusterServiceVersion = serde_yaml::from_str(data)?;
    let images = csv
        .spec
        .related_images
        .into_iter()
        .map(|ri| ri.image)
        .collect();
    Ok(images)
}

// collect the related images of all files, deduplicated and sorted
pub fn collect_related_images(
    log: &Logging,
    files: &[PathBuf],
) -> Result<Vec<String>, MirrorError> {
    let mut images = BTreeSet::new();
    for file in files.iter() {
        let data = fs::read_to_string(file).map_err(|e| {
            MirrorError::new(&format!("unable to read {} : {}", file.display(), e))
        })?;
        let related = parse_related_images(&data).map_err(|e| {
            MirrorError::new(&format!("unable to parse {} : {}", file.display(), e))
        })?;
        log.debug(&format!(
            "found {} related images in {}",
            related.len(),
            file.display()
        ));
        images.extend(related);
    }
    let res: Vec<String> = images.into_iter().collect();
    log.trace(&format!("related images {:#?}", res));
    Ok(res)
}
