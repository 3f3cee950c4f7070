//! Application configuration, command line and the replay/export run.

use serde::{Deserialize, Serialize};
use sketchsnap_core::config::{ConfigError, SketchConfig};
use sketchsnap_core::sketchpad::{EXPORT_PREFIX, Sketchpad, export_file_name};
use sketchsnap_render::{
    AssetStore, FileAssetSource, FrameStats, RenderContext, RendererError, SoftwareRenderer,
};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::script::SessionScript;

pub const USAGE: &str = "\
usage: sketchsnap <script.json> [options]

options:
  --out-dir <dir>    directory for exported files (default: .)
  --icons <dir>      directory icon references are resolved against (default: .)
  --config <file>    JSON configuration file
  --stamp <millis>   timestamp used in output file names (default: now)
  --dump             also write the final document as JSON
  -h, --help         show this help";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
}

/// Application settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sketch: SketchConfig,
    /// Icon references are resolved relative to this directory.
    pub icon_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = read_to_string(path)?;
        let config: Self = serde_json::from_str(&json).map_err(|source| AppError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.sketch.validate().map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }
}

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub script: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub icon_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub stamp: Option<u128>,
    pub dump: bool,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(CliOptions),
    Help,
}

impl CliOptions {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Command, AppError> {
        let mut options = CliOptions::default();
        let mut script = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| AppError::Usage(format!("{flag} needs a value")))
            };
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "--out-dir" => options.out_dir = Some(value("--out-dir")?.into()),
                "--icons" => options.icon_dir = Some(value("--icons")?.into()),
                "--config" => options.config = Some(value("--config")?.into()),
                "--stamp" => {
                    let raw = value("--stamp")?;
                    let stamp = raw
                        .parse()
                        .map_err(|_| AppError::Usage(format!("invalid --stamp value {raw:?}")))?;
                    options.stamp = Some(stamp);
                }
                "--dump" => options.dump = true,
                flag if flag.starts_with('-') => {
                    return Err(AppError::Usage(format!("unknown option {flag}")));
                }
                path => {
                    if script.is_some() {
                        return Err(AppError::Usage(format!("unexpected argument {path}")));
                    }
                    script = Some(PathBuf::from(path));
                }
            }
        }

        options.script = script.ok_or_else(|| AppError::Usage("missing script path".into()))?;
        Ok(Command::Run(options))
    }
}

/// Files written by a run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub svg_path: PathBuf,
    pub png_path: PathBuf,
    pub dump_path: Option<PathBuf>,
    pub frame: FrameStats,
}

/// Replay a session script and write its exports.
pub fn run(options: &CliOptions) -> Result<RunOutput, AppError> {
    let config = match &options.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let out_dir = options
        .out_dir
        .clone()
        .or(config.out_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let icon_dir = options
        .icon_dir
        .clone()
        .or(config.icon_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let json = read_to_string(&options.script)?;
    let script = SessionScript::from_json(&json).map_err(|source| AppError::Json {
        path: options.script.clone(),
        source,
    })?;

    let mut pad = Sketchpad::new(config.sketch);
    script.replay(&mut pad);

    std::fs::create_dir_all(&out_dir).map_err(|source| AppError::Io {
        path: out_dir.clone(),
        source,
    })?;
    let stamp = options.stamp.unwrap_or_else(now_millis);

    let svg_path = out_dir.join(export_file_name(EXPORT_PREFIX, "svg", stamp));
    write(&svg_path, pad.export_vector().as_bytes())?;

    let (png, frame) = export_raster(&pad, &icon_dir)?;
    let png_path = out_dir.join(export_file_name(EXPORT_PREFIX, "png", stamp));
    write(&png_path, &png)?;
    log::info!("PNG export complete: {} bytes", png.len());

    let dump_path = if options.dump {
        let path = out_dir.join(export_file_name(EXPORT_PREFIX, "json", stamp));
        write(&path, pad.document().to_json()?.as_bytes())?;
        Some(path)
    } else {
        None
    };

    Ok(RunOutput {
        svg_path,
        png_path,
        dump_path,
        frame,
    })
}

/// Rasterise the current document to PNG bytes, loading icons from `icon_dir`.
pub fn export_raster(pad: &Sketchpad, icon_dir: &Path) -> Result<(Vec<u8>, FrameStats), AppError> {
    let list = pad.paint_list();
    let source = FileAssetSource::new(icon_dir);
    let mut assets = AssetStore::new();
    assets.request_all(&list, &source);
    let ready = assets.pump();
    log::debug!("{} icon(s) ready for export", ready.len());

    let config = pad.config();
    let ctx = RenderContext::new(&list, config.canvas_size())
        .with_background(config.background.into())
        .with_assets(&assets);
    let mut renderer = SoftwareRenderer::new();
    let (result, frame) = renderer.render_to_png(&ctx)?;
    for icon in &frame.failed {
        log::warn!("icon {icon} could not be loaded, drawn as placeholder");
    }
    Ok((result.encode()?, frame))
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

fn read_to_string(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    std::fs::write(path, bytes).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {}", path.display());
    Ok(())
}
