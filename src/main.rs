use clap::{ArgAction, Parser};
use maff_compress::Compression;
use maff_compress::cli::Preference;
use maff_config::Config;
use maff_render::Layout;
use maff2html::{Options, batch};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Convert MAFF web archives into self-contained HTML documents.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Archives, or directories to search for `.maff` files.
    #[arg(value_name = "PATHS", default_value = ".")]
    paths: Vec<PathBuf>,
    /// Compress the output; FORMAT is `bzip2` or `xz` (default from config).
    #[arg(short = 'z', long, value_name = "FORMAT", num_args = 0..=1, require_equals = true)]
    compress: Option<Option<String>>,
    /// Shorthand for `--compress=xz`.
    #[arg(long)]
    lzma: bool,
    /// Output layout: `framed` or `banner`.
    #[arg(long, value_name = "LAYOUT")]
    layout: Option<String>,
    /// Replace existing outputs instead of skipping their archives.
    #[arg(long)]
    overwrite: bool,
    /// Don't copy the archive modification time to the output.
    #[arg(long)]
    no_preserve_timestamps: bool,
    /// Read configuration from FILE instead of the default locations.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// More output; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}
impl Cli {
    fn options(&self, config: &Config) -> Result<Options, String> {
        let preference = if self.lzma {
            Preference::Explicit(Compression::Xz)
        } else {
            Preference::try_from(self.compress.clone()).map_err(|e| (*e).to_string())?
        };
        let mut options = Options::new(config, preference.resolve(&config.compression));
        if let Some(layout) = &self.layout {
            options.layout = layout.parse::<Layout>().map_err(|e| (*e).to_string())?;
        }
        options.overwrite |= self.overwrite;
        options.preserve_timestamps &= !self.no_preserve_timestamps;
        Ok(options)
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = ?e, "Could not load configuration");
            return ExitCode::from(2);
        },
    };
    let options = match cli.options(&config) {
        Ok(options) => options,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        },
    };
    tracing::debug!(?options, "Resolved options");

    let summary = batch::run(&cli.paths, &options);
    if summary.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
