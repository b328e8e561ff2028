use crate::config::toml_config::VsacConfig;
use crate::utils::error::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Clone, Parser)]
#[command(name = "vsac-fetch")]
#[command(about = "Download value sets from VSAC into a local cache")]
#[command(group(ArgGroup::new("source").required(true).args(["input", "descriptors"])))]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON file mapping display names to OIDs
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// JSON file of {name, id} value set descriptors
    #[arg(short, long)]
    pub descriptors: Option<PathBuf>,

    /// Output directory, overrides [output].path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Fetch and parse only, without writing any file
    #[arg(long)]
    pub no_cache: bool,

    #[arg(long, env = "VSAC_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "VSAC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Start from the valueset-db.json already in the output directory
    #[arg(long)]
    pub reuse_index: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the TOML file, if any, and applies command line overrides.
    pub fn load_config(&self) -> Result<VsacConfig> {
        let mut config = match &self.config {
            Some(path) => VsacConfig::from_file(path)?,
            None => VsacConfig::default(),
        };

        if let Some(username) = &self.username {
            config.auth.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            config.auth.password = Some(password.clone());
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if self.no_cache {
            config.output.caching = false;
        }

        Ok(config)
    }
}
