use crate::api::schema::*;
use crate::error::handler::MirrorError;
use crate::log::logging::*;

// build the run configuration from the command line
pub fn load_config(args: &Cli) -> Result<MirrorConfig, MirrorError> {
    let dest_creds = match &args.dest_secret {
        Some(secret) => Some(parse_credentials(secret)?),
        None => None,
    };
    let cfg = MirrorConfig {
        bundle_image: args.source_bundle.clone(),
        dest_prefix: args.dest_prefix.clone(),
        dest_creds,
        version_filter: args.version_filter.clone(),
        dry_run: args.dry_run,
        debug: args.debug,
        engine: args.engine.clone(),
        copy_tool: args.copy_tool.clone(),
        template_dir: args.template_dir.clone(),
    };
    Ok(cfg)
}

// parse USERNAME[:PASSWORD], the password may itself contain ':'
pub fn parse_credentials(secret: &str) -> Result<DestinationCredentials, MirrorError> {
    let (username, password) = match secret.split_once(':') {
        Some((user, pwd)) => (user, Some(pwd.to_string())),
        None => (secret, None),
    };
    if username.is_empty() {
        return Err(MirrorError::new(
            "--dest-secret expects USERNAME[:PASSWORD] with a non empty username",
        ));
    }
    Ok(DestinationCredentials {
        username: username.to_string(),
        password,
    })
}

pub fn get_log_level(cfg: &MirrorConfig) -> Level {
    if cfg.debug {
        Level::TRACE
    } else {
        Level::INFO
    }
}

impl DestinationCredentials {
    // value handed to the copy tool
    pub fn to_arg(&self) -> String {
        match &self.password {
            Some(pwd) => format!("{}:{}", self.username, pwd),
            None => self.username.clone(),
        }
    }
}
