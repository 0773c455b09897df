//! clap [Args](clap::Args) for logging configuration.

use clap::{ArgAction, Args, ValueEnum};
use evmaot_tracing::{
    tracing_subscriber::filter::Directive, EvmaotTracer, FileInfo, FileWorkerGuard, LayerInfo,
    LogFormat, Tracer,
};
use std::{
    fmt::{self, Display},
    path::PathBuf,
    str::FromStr,
};
use tracing::{level_filters::LevelFilter, Level};

const MB_TO_BYTES: u64 = 1024 * 1024;

/// The log configuration.
#[derive(Debug, Args)]
#[clap(next_help_heading = "LOGGING")]
pub(crate) struct LogArgs {
    /// The format to use for logs written to stdout.
    #[clap(long = "log.stdout.format", value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    pub(crate) log_stdout_format: LogFormat,

    /// The filter to use for logs written to stdout.
    #[clap(long = "log.stdout.filter", value_name = "FILTER", global = true, default_value = "")]
    pub(crate) log_stdout_filter: String,

    /// Write logs to a size-rotated file in this directory.
    #[clap(long = "log.file.directory", value_name = "PATH", global = true)]
    pub(crate) log_file_directory: Option<PathBuf>,

    /// The format to use for logs written to the log file.
    #[clap(long = "log.file.format", value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    pub(crate) log_file_format: LogFormat,

    /// The filter to use for logs written to the log file.
    #[clap(long = "log.file.filter", value_name = "FILTER", global = true, default_value = "debug")]
    pub(crate) log_file_filter: String,

    /// The maximum size (in MB) of one log file.
    #[clap(long = "log.file.max-size", value_name = "SIZE", global = true, default_value_t = 200)]
    pub(crate) log_file_max_size: u64,

    /// The maximum number of log files kept on disk.
    #[clap(long = "log.file.max-files", value_name = "COUNT", global = true, default_value_t = 5)]
    pub(crate) log_file_max_files: usize,

    /// Write logs to journald.
    #[clap(long = "log.journald", global = true)]
    pub(crate) journald: bool,

    /// The filter to use for logs written to journald.
    #[clap(
        long = "log.journald.filter",
        value_name = "FILTER",
        global = true,
        default_value = "error"
    )]
    pub(crate) journald_filter: String,

    /// Sets whether or not the formatter emits ANSI terminal escape codes for colors and other
    /// text formatting.
    #[clap(
        long,
        value_name = "COLOR",
        global = true,
        default_value_t = ColorMode::Always
    )]
    pub(crate) color: ColorMode,

    /// The verbosity settings for the tracer.
    #[clap(flatten)]
    pub(crate) verbosity: Verbosity,
}

impl LogArgs {
    /// Creates a [LayerInfo] instance.
    fn layer(&self, format: LogFormat, filter: String, use_color: bool) -> LayerInfo {
        LayerInfo::new(
            format,
            self.verbosity.directive().to_string(),
            filter,
            if use_color { Some(self.color.to_string()) } else { None },
        )
    }

    /// Initializes tracing with the configured options from cli args.
    pub(crate) fn init_tracing(&self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut tracer = EvmaotTracer::new();

        let stdout = self.layer(self.log_stdout_format, self.log_stdout_filter.clone(), true);
        tracer = tracer.with_stdout(stdout);

        if let Some(dir) = &self.log_file_directory {
            let file = self.layer(self.log_file_format, self.log_file_filter.clone(), false);
            let info = FileInfo::new(
                dir.clone(),
                self.log_file_max_size * MB_TO_BYTES,
                self.log_file_max_files,
            );
            tracer = tracer.with_file(file, info);
        }

        if self.journald {
            tracer = tracer.with_journald(self.journald_filter.clone());
        }

        let guard = tracer.init()?;
        Ok(guard)
    }
}

/// The color mode for the cli.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub(crate) enum ColorMode {
    /// Colors on
    Always,
    /// Colors on if the output is a terminal
    Auto,
    /// Colors off
    Never,
}

impl Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Always => write!(f, "always"),
            ColorMode::Auto => write!(f, "auto"),
            ColorMode::Never => write!(f, "never"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(ColorMode::Always),
            "auto" => Ok(ColorMode::Auto),
            "never" => Ok(ColorMode::Never),
            _ => Err(format!("Invalid color mode: {}", s)),
        }
    }
}

/// The verbosity settings for the cli.
#[derive(Debug, Copy, Clone, Args)]
#[clap(next_help_heading = "DISPLAY")]
pub(crate) struct Verbosity {
    /// Set the minimum log level.
    ///
    /// -v     Warnings & Errors
    /// -vv    Info
    /// -vvv   Debug
    /// -vvvv  Traces (warning: very verbose!)
    #[clap(short, long, action = ArgAction::Count, global = true, default_value_t = 1, verbatim_doc_comment, help_heading = "DISPLAY")]
    verbosity: u8,

    /// Silence all log output.
    #[clap(long, alias = "silent", short = 'q', global = true, help_heading = "DISPLAY")]
    quiet: bool,
}

impl Verbosity {
    /// Returns the level the verbosity flags select, ignoring `--quiet`.
    pub(crate) fn level(&self) -> Level {
        match self.verbosity.saturating_sub(1) {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Get the corresponding [Directive] for the given verbosity, or none if the verbosity
    /// corresponds to silent.
    pub(crate) fn directive(&self) -> Directive {
        if self.quiet {
            LevelFilter::OFF.into()
        } else {
            self.level().into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        let verbosity = Verbosity { verbosity: 1, quiet: false };
        assert_eq!(verbosity.level(), Level::WARN);
        assert_eq!(verbosity.directive().to_string(), "warn");

        let verbosity = Verbosity { verbosity: 3, quiet: false };
        assert_eq!(verbosity.level(), Level::DEBUG);

        let verbosity = Verbosity { verbosity: 3, quiet: true };
        assert_eq!(verbosity.directive().to_string(), "off");
    }

    #[test]
    fn test_color_mode_round_trip() {
        for mode in [ColorMode::Always, ColorMode::Auto, ColorMode::Never] {
            assert_eq!(mode.to_string().parse::<ColorMode>(), Ok(mode));
        }
    }
}
