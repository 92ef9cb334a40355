// recording stand in for the external tools, used by the unit tests

use async_trait::async_trait;
use std::sync::Mutex;

use crate::api::schema::*;
use crate::error::handler::MirrorError;
use crate::log::logging::*;

#[derive(Default)]
pub struct Fake {
    pub calls: Mutex<Vec<String>>,
    // any call whose rendered form contains this string fails
    pub fail_on: Option<String>,
}

impl Fake {
    pub fn failing_on(pattern: &str) -> Fake {
        Fake {
            calls: Mutex::new(vec![]),
            fail_on: Some(pattern.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) -> Result<(), MirrorError> {
        self.calls.lock().unwrap().push(call.clone());
        match &self.fail_on {
            Some(pattern) if call.contains(pattern.as_str()) => {
                Err(MirrorError::new(&format!("fake failure for {}", call)))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ContainerInterface for Fake {
    async fn create(&self, _log: &Logging, image: String) -> Result<String, MirrorError> {
        self.record(format!("create {}", image))?;
        Ok(String::from("abc123"))
    }

    async fn copy_out(
        &self,
        _log: &Logging,
        container_id: String,
        path: String,
        dest_dir: String,
    ) -> Result<(), MirrorError> {
        self.record(format!("cp {}:{} {}", container_id, path, dest_dir))
    }

    async fn remove(&self, _log: &Logging, container_id: String) -> Result<(), MirrorError> {
        self.record(format!("rm {}", container_id))
    }

    async fn build(
        &self,
        _log: &Logging,
        template_dir: String,
        build_args: Vec<(String, String)>,
        tag: String,
    ) -> Result<String, MirrorError> {
        let args: Vec<String> = build_args
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        self.record(format!("build {} -t {} {}", args.join(" "), tag, template_dir))?;
        Ok(String::from("sha256:feedbeef"))
    }

    async fn push(&self, _log: &Logging, tag: String) -> Result<(), MirrorError> {
        self.record(format!("push {}", tag))
    }

    async fn copy(
        &self,
        _log: &Logging,
        src_url: String,
        dest_url: String,
        all: bool,
        dest_creds: Option<String>,
    ) -> Result<(), MirrorError> {
        self.record(format!(
            "copy all={} creds={} {} {}",
            all,
            dest_creds.unwrap_or_default(),
            src_url,
            dest_url
        ))
    }
}
