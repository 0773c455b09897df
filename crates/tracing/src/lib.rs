//! Tracing setup for the evmaot binaries.
//!
//! [`EvmaotTracer`] assembles a [`tracing_subscriber`] registry from up to three layers: stdout,
//! journald and a size-rotated log file. Each layer has its own filter.

mod formatter;
mod layers;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard};

// re-export the subscriber so callers can name its filter types
pub use tracing;
pub use tracing_subscriber;

/// Configures and installs the global tracing subscriber.
#[derive(Debug, Clone)]
pub struct EvmaotTracer {
    stdout: LayerInfo,
    journald: Option<String>,
    file: Option<(LayerInfo, FileInfo)>,
}

impl EvmaotTracer {
    /// Creates a tracer that writes terminal formatted logs to stdout at `info`.
    pub fn new() -> Self {
        Self { stdout: LayerInfo::default(), journald: None, file: None }
    }

    /// Sets the stdout layer configuration.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Enables the journald layer with the given filter.
    pub fn with_journald(mut self, filter: String) -> Self {
        self.journald = Some(filter);
        self
    }

    /// Enables the file layer.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Default for EvmaotTracer {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of a single tracing layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    /// Creates a layer configuration.
    ///
    /// `default_directive` applies when `RUST_LOG` is unset. `filters` is a comma-separated list
    /// of extra directives, for example `evmaot_codegen=trace`.
    pub fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: LevelFilter::INFO.to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// A type that can install a global tracing subscriber.
pub trait Tracer {
    /// Installs the subscriber. The returned guard, if any, must be held for as long as file
    /// logging should continue.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

impl Tracer for EvmaotTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = layers::Layers::new();

        let default_directive = self.stdout.default_directive.parse().map_err(|e| {
            eyre::eyre!("invalid log directive '{}': {}", self.stdout.default_directive, e)
        })?;
        layers.stdout(
            self.stdout.format,
            default_directive,
            &self.stdout.filters,
            self.stdout.color,
        )?;

        if let Some(filter) = self.journald {
            layers.journald(&filter)?;
        }

        let file_guard = match self.file {
            Some((config, file_info)) => {
                Some(layers.file(config.format, &config.filters, file_info)?)
            }
            None => None,
        };

        // a subscriber may already be installed, e.g. by a test harness
        let _ = tracing_subscriber::registry().with(layers.into_inner()).try_init();
        Ok(file_guard)
    }
}

/// Installs a subscriber filtered by `RUST_LOG` that writes through the test harness.
///
/// Calling this more than once is harmless.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_bad_default_directive() {
        let tracer = EvmaotTracer::new().with_stdout(LayerInfo::new(
            LogFormat::Terminal,
            "evmaot=loud".to_string(),
            String::new(),
            None,
        ));
        assert!(tracer.init().is_err());
    }

    #[test]
    fn test_init_twice() {
        assert!(matches!(EvmaotTracer::default().init(), Ok(None)));
        assert!(matches!(EvmaotTracer::default().init(), Ok(None)));
        init_test_tracing();
    }

    #[test]
    fn test_log_format_names() {
        assert_eq!(LogFormat::Json.to_string(), "json");
        assert_eq!(LogFormat::LogFmt.to_string(), "logfmt");
        assert_eq!(LogFormat::Terminal.to_string(), "terminal");
    }
}
