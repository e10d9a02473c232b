use clap::{Args, ValueEnum};
use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Diagnostics flags shared by every subcommand.
///
/// Diagnostics always go to stderr; stdout is reserved for frames, headers
/// and spans, which may be raw bytes.
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Diagnostics format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Explicit diagnostics level: off, error, warn, info, debug, trace.
    #[arg(
        long,
        value_name = "LEVEL",
        global = true,
        conflicts_with_all = ["verbose", "quiet"]
    )]
    pub log_level: Option<LevelFilter>,

    /// More diagnostics per repetition: -v frame summaries, -vv each frame,
    /// -vvv every source read.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// No diagnostics. Command errors are still printed.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl LogArgs {
    /// Level the subscriber filters at. Without flags only warnings and
    /// errors are shown.
    pub fn level(&self) -> LevelFilter {
        if let Some(level) = self.log_level {
            return level;
        }
        if self.quiet {
            return LevelFilter::OFF;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

pub fn init_logging(args: &LogArgs) {
    let level = args.level();
    if level == LevelFilter::OFF {
        return;
    }

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(level == LevelFilter::TRACE);

    // A second init (tests) keeps the first subscriber.
    let _ = match args.log_format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
