//! Configuration management for evmaot
//!
//! The configuration lives at `$HOME/.evmaot/config.toml` and supplies defaults for every
//! option the command line leaves empty.

/// Error types for the configuration module
pub mod error;

use std::{path::PathBuf, str::FromStr};

use crate::error::Error;
use clap::Parser;
use evmaot_common::utils::io::file::{delete_path, read_file, write_file};
use evmaot_vm::core::revision::Revision;
use serde::{Deserialize, Serialize};
#[allow(deprecated)]
use std::env::home_dir;
use tracing::{debug, error, info};

/// The native compiler invoked by the generated build script when none is configured.
pub const DEFAULT_CXX: &str = "g++";
/// The environment variable naming the toolchain root when none is configured.
pub const DEFAULT_TOOLCHAIN_ENV: &str = "MOEINGEVM";
/// The shared library built by the generated build script when none is configured.
pub const DEFAULT_LIBRARY_NAME: &str = "libevmaot.so";

/// Command line arguments for the configuration command
#[derive(Debug, Clone, Parser)]
#[clap(
    about = "Display and edit the current configuration",
    override_usage = "evmaot config [OPTIONS]"
)]
pub struct ConfigArgs {
    /// The target key to update.
    #[clap(required = false, default_value = "")]
    key: String,

    /// The value to set the key to.
    #[clap(required = false, default_value = "")]
    value: String,
}

/// The [`Configuration`] struct holds the defaults the CLI falls back to when an option is not
/// given on the command line.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// The revision contracts are compiled for
    pub revision: String,

    /// The number of worker threads, where 0 uses the available parallelism
    pub threads: usize,

    /// The C++ compiler invoked by the generated build script
    pub cxx: String,

    /// The environment variable holding the toolchain root
    pub toolchain_env: String,

    /// The shared library built by the generated build script
    pub library_name: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            revision: Revision::default().to_string(),
            threads: 0,
            cxx: DEFAULT_CXX.to_string(),
            toolchain_env: DEFAULT_TOOLCHAIN_ENV.to_string(),
            library_name: DEFAULT_LIBRARY_NAME.to_string(),
        }
    }
}

#[allow(deprecated)]
fn config_path() -> Result<String, Error> {
    let mut home: PathBuf = home_dir().ok_or_else(|| {
        Error::Generic(
            "failed to get home directory. does your os support `std::env::home_dir()`?"
                .to_string(),
        )
    })?;
    home.push(".evmaot");
    home.push("config.toml");

    home.to_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))
}

impl Configuration {
    /// Returns the current configuration, creating the config file with defaults if it does not
    /// exist yet.
    pub fn load() -> Result<Self, Error> {
        let path = config_path()?;

        // if the config file doesn't exist, create it
        if !std::path::Path::new(&path).exists() {
            debug!("creating default configuration at {}", path);
            Configuration::default().save()?;
        }

        let contents = read_file(&path)
            .map_err(|e| Error::Generic(format!("failed to read config file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("failed to parse config file: {e}")))
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> Result<(), Error> {
        write_file(
            &config_path()?,
            &toml::to_string(&self)
                .map_err(|e| Error::ParseError(format!("failed to serialize config: {e}")))?,
        )
        .map_err(|e| Error::Generic(format!("failed to write config file: {e}")))?;

        Ok(())
    }

    /// Deletes the configuration file at `$HOME/.evmaot/config.toml`.
    pub fn delete() -> Result<(), Error> {
        let path = config_path()?;
        if !delete_path(&path) {
            return Err(Error::Generic(format!("failed to delete config file at {path}")));
        }

        Ok(())
    }

    /// Returns the configured revision.
    pub fn revision(&self) -> Result<Revision, Error> {
        Revision::from_str(&self.revision).map_err(|e| Error::ParseError(e.to_string()))
    }

    /// Returns the configured thread count, or `None` when the available parallelism should be
    /// used.
    pub fn threads(&self) -> Option<usize> {
        (self.threads > 0).then_some(self.threads)
    }

    /// Update a single key/value pair in the configuration.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), Error> {
        // update the key in the struct and ensure it's the correct type
        match key {
            "revision" => {
                let revision = Revision::from_str(value)
                    .map_err(|e| Error::ParseError(format!("invalid revision: {e}")))?;
                self.revision = revision.to_string();
            }
            "threads" => {
                self.threads = value.parse::<usize>().map_err(|e| {
                    Error::ParseError(format!("invalid thread count '{value}': {e}"))
                })?;
            }
            "cxx" => {
                self.cxx = value.to_string();
            }
            "toolchain_env" => {
                self.toolchain_env = value.to_string();
            }
            "library_name" => {
                self.library_name = value.to_string();
            }
            _ => {
                return Err(Error::Generic(format!(
                    "invalid key: \'{key}\' is not a valid configuration key."
                )))
            }
        }

        // write the updated config to disk
        self.save()?;

        Ok(())
    }
}

/// The `config` command is used to display and edit the current configuration.
pub fn config(args: ConfigArgs) -> Result<(), Error> {
    if !args.key.is_empty() {
        if !args.value.is_empty() {
            // read the config file and update the key/value pair
            let mut config = Configuration::load()?;
            config.update(&args.key, &args.value)?;
            info!("updated configuration! Set \'{}\' = \'{}\' .", &args.key, &args.value);
        } else {
            // key is set, but no value is set
            error!(
                "found key but no value to set. Please specify a value to set, use `evmaot config --help` for more information."
            );
        }
    } else {
        // no key is set, print the config file
        println!("{:#?}", Configuration::load()?);
        info!("use `evmaot config <KEY> <VALUE>` to set a key/value pair.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.revision, "shanghai");
        assert_eq!(config.threads, 0);
        assert_eq!(config.cxx, "g++");
        assert_eq!(config.toolchain_env, "MOEINGEVM");
        assert_eq!(config.library_name, "libevmaot.so");
        assert_eq!(config.revision().expect("invalid default revision"), Revision::Shanghai);
        assert_eq!(config.threads(), None);
    }

    #[test]
    #[serial]
    fn test_load_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");

        assert_eq!(config, Configuration::default());
    }

    #[test]
    #[serial]
    fn test_save_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::default();

        config.update("revision", "london").expect("failed to update revision");
        config.update("threads", "4").expect("failed to update threads");
        config.update("cxx", "clang++").expect("failed to update cxx");

        let loaded_config = Configuration::load().expect("failed to load config file");
        assert_eq!(loaded_config.revision().expect("invalid revision"), Revision::London);
        assert_eq!(loaded_config.threads(), Some(4));
        assert_eq!(loaded_config.cxx, "clang++");
        assert_eq!(loaded_config.toolchain_env, "MOEINGEVM");

        Configuration::delete().expect("failed to delete config file");
    }

    #[test]
    #[serial]
    fn test_invalid_updates_are_rejected() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::load().expect("failed to load config file");

        assert!(matches!(config.update("revision", "paris"), Err(Error::ParseError(_))));
        assert!(matches!(config.update("threads", "-1"), Err(Error::ParseError(_))));
        assert!(matches!(
            config.update("rpc_url", "http://localhost:8545"),
            Err(Error::Generic(_))
        ));

        // nothing was written
        assert_eq!(
            Configuration::load().expect("failed to load config file"),
            Configuration::default()
        );
    }

    #[test]
    #[serial]
    fn test_delete_configuration() {
        Configuration::delete().expect("failed to delete config file");
        let mut config = Configuration::load().expect("failed to load config file");
        config.update("library_name", "libcontracts.so").expect("failed to update library_name");

        Configuration::delete().expect("failed to delete config file");
        let config = Configuration::load().expect("failed to load config file");
        assert_eq!(config.library_name, "libevmaot.so");
    }
}
