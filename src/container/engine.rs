// module engine

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::api::schema::*;
use crate::error::handler::MirrorError;
use crate::image::copy::get_copy_args;
use crate::log::logging::*;

#[async_trait]
impl ContainerInterface for ImplContainerInterface {
    async fn create(&self, log: &Logging, image: String) -> Result<String, MirrorError> {
        let args = vec![String::from("create"), image];
        let out = exec(log, &self.engine, args.clone(), args, true).await?;
        let id = out.trim().to_string();
        if id.is_empty() {
            return Err(MirrorError::new(&format!(
                "{} create returned no container id",
                self.engine
            )));
        }
        Ok(id)
    }

    async fn copy_out(
        &self,
        log: &Logging,
        container_id: String,
        path: String,
        dest_dir: String,
    ) -> Result<(), MirrorError> {
        let args = vec![
            String::from("cp"),
            format!("{}:{}", container_id, path),
            dest_dir,
        ];
        exec(log, &self.engine, args.clone(), args, true).await?;
        Ok(())
    }

    async fn remove(&self, log: &Logging, container_id: String) -> Result<(), MirrorError> {
        let args = vec![String::from("rm"), container_id];
        exec(log, &self.engine, args.clone(), args, true).await?;
        Ok(())
    }

    async fn build(
        &self,
        log: &Logging,
        template_dir: String,
        build_args: Vec<(String, String)>,
        tag: String,
    ) -> Result<String, MirrorError> {
        let mut args = vec![String::from("build")];
        for (name, value) in build_args.iter() {
            args.push(String::from("--build-arg"));
            args.push(format!("{}={}", name, value));
        }
        args.push(String::from("-t"));
        args.push(tag);
        args.push(template_dir);
        let out = exec(log, &self.engine, args.clone(), args, true).await?;
        // the image id is the last line written by the build
        let id = out.lines().last().unwrap_or("").trim().to_string();
        Ok(id)
    }

    async fn push(&self, log: &Logging, tag: String) -> Result<(), MirrorError> {
        let args = vec![String::from("push"), tag];
        exec(log, &self.engine, args.clone(), args, false).await?;
        Ok(())
    }

    async fn copy(
        &self,
        log: &Logging,
        src_url: String,
        dest_url: String,
        all: bool,
        dest_creds: Option<String>,
    ) -> Result<(), MirrorError> {
        let (args, display) = get_copy_args(src_url, dest_url, all, dest_creds);
        exec(log, &self.copy_tool, args, display, false).await?;
        Ok(())
    }
}

// run an external tool to completion, stdout is captured only when asked for
async fn exec(
    log: &Logging,
    program: &str,
    args: Vec<String>,
    display: Vec<String>,
    capture: bool,
) -> Result<String, MirrorError> {
    let cmd_line = format!("{} {}", program, display.join(" "));
    log.debug(&format!("executing {}", cmd_line));

    let mut cmd = Command::new(program);
    cmd.args(&args).kill_on_drop(true).stdin(Stdio::null());
    // output() would force stdout to piped, so spawn and wait instead
    if capture {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }
    cmd.stderr(Stdio::piped());

    let child = cmd
        .spawn()
        .map_err(|e| MirrorError::new(&format!("unable to execute {} : {}", cmd_line, e)))?;
    let output = child
        .wait_with_output()
        .await
        .map_err(|e| MirrorError::new(&format!("unable to wait for {} : {}", cmd_line, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MirrorError::new(&format!(
            "{} failed with {} : {}",
            cmd_line,
            output.status,
            stderr.trim()
        )));
    }
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    log.trace(&format!("output {}", stdout.trim()));
    Ok(stdout)
}
