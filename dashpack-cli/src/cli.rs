// dashpack-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use dashpack_core::config::{CoreConfig, CoreConfigBuilder};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Dashpack: MKV to DASH packaging tool",
    long_about = "Transcodes every stream of a Matroska file with ffmpeg and packages the \
                  renditions into a DASH presentation with shaka packager."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging, including every external command line
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Also write the log to dashpack_run_<timestamp>.log in this directory
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts and packages one .mkv file
    Convert(ConvertArgs),
    /// Packages the conversion results of an earlier run without transcoding
    Package(PackageArgs),
    /// Reports whether ffprobe, ffmpeg and packager can be started
    Check(CheckArgs),
}

impl Commands {
    /// True when the command writes a JSON result to stdout.
    pub fn prints_result(&self) -> bool {
        match self {
            Commands::Convert(args) => args.print_result,
            Commands::Package(args) => args.print_result,
            Commands::Check(_) => false,
        }
    }
}

/// Work directory and tool locations shared by all commands.
///
/// Values given here override `DASHPACK_*` environment variables.
#[derive(Args, Debug, Default)]
pub struct ToolArgs {
    /// Root for data.json, converted.json and the per-run directories
    #[arg(short = 'w', long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Path to ffprobe (default: bin/ffprobe)
    #[arg(long, value_name = "PATH")]
    pub ffprobe: Option<PathBuf>,

    /// Path to ffmpeg (default: bin/ffmpeg)
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to shaka packager (default: bin/packager)
    #[arg(long, value_name = "PATH")]
    pub packager: Option<PathBuf>,
}

impl ToolArgs {
    pub fn builder(&self) -> CoreConfigBuilder {
        let mut builder = CoreConfigBuilder::new().env_overrides();
        if let Some(dir) = &self.work_dir {
            builder = builder.work_dir(dir.clone());
        }
        if let Some(path) = &self.ffprobe {
            builder = builder.ffprobe_path(path.clone());
        }
        if let Some(path) = &self.ffmpeg {
            builder = builder.ffmpeg_path(path.clone());
        }
        if let Some(path) = &self.packager {
            builder = builder.packager_path(path.clone());
        }
        builder
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// The .mkv file to convert
    #[arg(required = true, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub tools: ToolArgs,

    /// Comma-separated codec types to skip (default: mjpeg,png,ttf,otf)
    #[arg(long, value_delimiter = ',', value_name = "TYPES")]
    pub skip_codecs: Option<Vec<String>>,

    /// x264 constant rate factor for the video rendition (0-51)
    #[arg(long, value_name = "CRF", value_parser = clap::value_parser!(u8).range(0..=51))]
    pub crf: Option<u8>,

    /// x264 preset for the video rendition (default: fast)
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Print the final result as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub print_result: bool,

    /// Do not draw the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl ConvertArgs {
    pub fn to_config(&self) -> CoreConfig {
        let mut builder = self.tools.builder();
        if let Some(types) = &self.skip_codecs {
            builder = builder.skip_codec_types(types.iter().map(String::as_str));
        }
        if let Some(crf) = self.crf {
            builder = builder.video_crf(crf);
        }
        if let Some(preset) = &self.preset {
            builder = builder.video_preset(preset);
        }
        builder.build()
    }
}

#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Run id (timestamp directory name) whose conversion results to package
    #[arg(long, required = true, value_name = "RUN_ID")]
    pub run_id: String,

    #[command(flatten)]
    pub tools: ToolArgs,

    /// Print the final result as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub print_result: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub tools: ToolArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_flags_override_defaults() {
        let cli = Cli::parse_from([
            "dashpack",
            "convert",
            "movie.mkv",
            "--work-dir",
            "/srv/work",
            "--packager",
            "/opt/packager",
            "--skip-codecs",
            "mjpeg,subtitle",
            "--crf",
            "20",
        ]);
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        let config = args.to_config();
        assert_eq!(config.work_dir, PathBuf::from("/srv/work"));
        assert_eq!(config.packager_path, PathBuf::from("/opt/packager"));
        assert!(config.skip_codec_types.contains("subtitle"));
        assert!(!config.skip_codec_types.contains("ttf"));
        assert_eq!(config.video.crf, 20);
    }

    #[test]
    fn crf_out_of_range_is_rejected() {
        let parsed = Cli::try_parse_from(["dashpack", "convert", "a.mkv", "--crf", "60"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn print_result_is_detected_per_command() {
        let cli = Cli::parse_from(["dashpack", "convert", "a.mkv", "--print-result"]);
        assert!(cli.command.prints_result());
        let cli = Cli::parse_from(["dashpack", "package", "--run-id", "1"]);
        assert!(!cli.command.prints_result());
        let cli = Cli::parse_from(["dashpack", "check"]);
        assert!(!cli.command.prints_result());
    }

    #[test]
    fn package_requires_run_id() {
        assert!(Cli::try_parse_from(["dashpack", "package"]).is_err());
        let cli = Cli::try_parse_from(["dashpack", "package", "--run-id", "20240601120000"]).unwrap();
        assert!(matches!(cli.command, Commands::Package(ref a) if a.run_id == "20240601120000"));
    }
}
