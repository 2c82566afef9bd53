//! Run configuration.
//!
//! Resolution order, later sources winning:
//! 1. Built-in defaults
//! 2. `bpdoc.toml` in the working directory, or the file given with `--config`
//! 3. Environment variables (`BPDOC_*`)
//! 4. Command-line flags

use anyhow::{bail, Context, Result};
use bpdoc_core::{Format, GeneratorOptions};
use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "bpdoc.toml";
pub const ENV_PREFIX: &str = "BPDOC_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub output: PathBuf,
    /// A list, or one comma-separated string as `BPDOC_FORMATS=xml,json` gives.
    #[serde(deserialize_with = "string_or_list")]
    pub formats: Vec<String>,
    pub blueprint_context: bool,
    pub images: bool,
    pub teamcity: bool,
    pub fail_on_warnings: bool,
}

impl Default for Config {
    fn default() -> Self {
        let options = GeneratorOptions::default();
        Self {
            title: options.docs_title,
            output: options.output_dir,
            formats: options.formats,
            blueprint_context: options.in_blueprint_context,
            images: true,
            teamcity: false,
            fail_on_warnings: false,
        }
    }
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Values given on the command line; `None` leaves the loaded value alone.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub title: Option<String>,
    pub output: Option<PathBuf>,
    pub formats: Vec<String>,
    pub blueprint_context: bool,
    pub no_images: bool,
    pub teamcity: bool,
    pub fail_on_warnings: bool,
}

impl Config {
    /// Load defaults, then the config file, then the environment.
    ///
    /// An explicit `config_file` must exist; the default file is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        match config_file {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file not found: {}", path.display());
                }
                debug!("loading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    debug!("loading config from {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment.extract().context("invalid configuration")?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(title) = overrides.title {
            self.title = title;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if !overrides.formats.is_empty() {
            self.formats = overrides.formats;
        }
        self.blueprint_context |= overrides.blueprint_context;
        self.images &= !overrides.no_images;
        self.teamcity |= overrides.teamcity;
        self.fail_on_warnings |= overrides.fail_on_warnings;
    }

    /// Split comma lists, lowercase, dedup and check every format name.
    pub fn validate(&mut self) -> Result<()> {
        let mut formats: Vec<String> = Vec::new();
        for name in self.formats.iter().flat_map(|f| f.split(',')) {
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() || formats.contains(&name) {
                continue;
            }
            Format::parse(&name)?;
            formats.push(name);
        }
        if formats.is_empty() {
            bail!("at least one output format is required");
        }
        self.formats = formats;

        if self.title.trim().is_empty() {
            bail!("documentation title must not be empty");
        }
        Ok(())
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            docs_title: self.title.clone(),
            output_dir: self.output.clone(),
            formats: self.formats.clone(),
            in_blueprint_context: self.blueprint_context,
        }
    }
}
