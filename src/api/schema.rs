// module schema

use async_trait::async_trait;
use clap::Parser;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::error::handler::MirrorError;
use crate::log::logging::*;

/// bundle-mirror cli struct
#[derive(Parser, Debug)]
#[command(name = "bundle-mirror")]
#[command(version = "0.1.0")]
#[command(
    about = "Mirror the related images of an operator bundle to a new registry and republish the bundle",
    long_about = None
)]
pub struct Cli {
    /// bundle image to mirror (registry/namespace/name:tag)
    #[arg(value_name = "SOURCE_BUNDLE_REGISTRY")]
    pub source_bundle: String,

    /// prefix that replaces the registry and namespace of every image
    #[arg(value_name = "DEST_PREFIX")]
    pub dest_prefix: String,

    /// destination registry credentials
    #[arg(short = 's', long, value_name = "USERNAME[:PASSWORD]")]
    pub dest_secret: Option<String>,

    /// restrict csv selection to this version substring
    #[arg(long, value_name = "VERSION", default_value = "")]
    pub version_filter: String,

    /// enable verbose trace output
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,

    /// log actions instead of executing copy/push
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// container engine used to extract, build and push
    #[arg(long, value_name = "BINARY", default_value = "podman")]
    pub engine: String,

    /// image copy tool used to mirror related images
    #[arg(long, value_name = "BINARY", default_value = "skopeo")]
    pub copy_tool: String,

    /// build context to use instead of the embedded bundle template
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<String>,
}

// ClusterServiceVersion, only the fields needed to find related images
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClusterServiceVersion {
    #[serde(rename = "spec")]
    pub spec: CsvSpec,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CsvSpec {
    #[serde(rename = "relatedImages")]
    pub related_images: Vec<RelatedImage>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RelatedImage {
    #[serde(rename = "name")]
    pub name: Option<String>,

    #[serde(rename = "image")]
    pub image: String,
}

// credentials forwarded to the copy tool for the destination side
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationCredentials {
    pub username: String,
    pub password: Option<String>,
}

// explicit configuration threaded through every component
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub bundle_image: String,
    pub dest_prefix: String,
    pub dest_creds: Option<DestinationCredentials>,
    pub version_filter: String,
    pub dry_run: bool,
    pub debug: bool,
    pub engine: String,
    pub copy_tool: String,
    pub template_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MirrorSummary {
    pub csv_files: usize,
    pub images: usize,
    pub bundle: String,
}

// one method per external operation
#[async_trait]
pub trait ContainerInterface {
    // create a (non running) container and return its id
    async fn create(&self, log: &Logging, image: String) -> Result<String, MirrorError>;
    async fn copy_out(
        &self,
        log: &Logging,
        container_id: String,
        path: String,
        dest_dir: String,
    ) -> Result<(), MirrorError>;
    async fn remove(&self, log: &Logging, container_id: String) -> Result<(), MirrorError>;
    // build args are passed as (NAME, VALUE) pairs, returns the image id
    async fn build(
        &self,
        log: &Logging,
        template_dir: String,
        build_args: Vec<(String, String)>,
        tag: String,
    ) -> Result<String, MirrorError>;
    async fn push(&self, log: &Logging, tag: String) -> Result<(), MirrorError>;
    async fn copy(
        &self,
        log: &Logging,
        src_url: String,
        dest_url: String,
        all: bool,
        dest_creds: Option<String>,
    ) -> Result<(), MirrorError>;
}

#[derive(Debug, Clone)]
pub struct ImplContainerInterface {
    pub engine: String,
    pub copy_tool: String,
}
