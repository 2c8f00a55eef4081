//! Application configuration and the load/report loop, with builder pattern.

use crate::errors::AppError;
use crate::slot::{ModelSlot, SCALE_STEP};
use crate::vertex;
use serde::Deserialize;
use splatter_data::{DeriveOptions, Model};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Settings that can come from a JSON config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub derive: DeriveOptions,
    pub scale_step: f32,
    pub initial_scale: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            derive: DeriveOptions::default(),
            scale_step: SCALE_STEP,
            initial_scale: 1.0,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
    pub enable_tracy: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_tracy: false,
        }
    }
}

/// How loaded models are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Builder for configuring and running the application.
pub struct AppBuilder {
    config: AppConfig,
    logging: LoggingConfig,
    scale: Option<f32>,
    scale_steps: i32,
    report_format: ReportFormat,
    dump_path: Option<PathBuf>,
}

impl AppBuilder {
    /// Create a new AppBuilder with default settings.
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            logging: LoggingConfig::default(),
            scale: None,
            scale_steps: 0,
            report_format: ReportFormat::Text,
            dump_path: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure logging.
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = config;
        self
    }

    /// Override the display scale each model starts with.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Scale steps applied after loading, positive grows, negative shrinks.
    pub fn with_scale_steps(mut self, steps: i32) -> Self {
        self.scale_steps = steps;
        self
    }

    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Write the packed vertex buffer of the final model to `path`.
    pub fn with_dump_path(mut self, path: PathBuf) -> Self {
        self.dump_path = Some(path);
        self
    }

    /// Load every file in order into a single model slot and report each.
    pub fn run(self, files: &[PathBuf]) -> Result<(), AppError> {
        self.init_logging();

        let mut slot = ModelSlot::new(self.config.derive).with_scale_step(self.config.scale_step);
        let initial_scale = self.scale.unwrap_or(self.config.initial_scale);
        let mut failed = 0;

        for path in files {
            let model = match slot.load(path) {
                Ok(model) => model,
                Err(e) => {
                    error!("Failed to load {}: {}", path.display(), e);
                    failed += 1;
                    continue;
                }
            };
            model.set_scale(initial_scale);
            self.apply_scale_steps(&mut slot);

            if let Some(model) = slot.model() {
                debug!("Uniforms: {:?}", vertex::ModelUniforms::from_model(model));
                self.report(path, model)?;
            }
        }

        let Some(model) = slot.model() else {
            return Err(AppError::NothingLoaded {
                failed,
                total: files.len(),
            });
        };

        if failed > 0 {
            warn!("{} of {} files failed to load", failed, files.len());
        }

        if let Some(dump_path) = &self.dump_path {
            let packed = vertex::pack(model);
            std::fs::write(dump_path, vertex::as_bytes(&packed))?;
            info!(
                "Wrote {} splat vertices to {}",
                packed.len(),
                dump_path.display()
            );
        }

        Ok(())
    }

    fn apply_scale_steps(&self, slot: &mut ModelSlot) {
        for _ in 0..self.scale_steps.unsigned_abs() {
            if self.scale_steps > 0 {
                slot.scale_up();
            } else {
                slot.scale_down();
            }
        }
    }

    fn report(&self, path: &Path, model: &Model) -> Result<(), AppError> {
        let summary = model.summary();
        match self.report_format {
            ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            ReportFormat::Text => {
                println!("{}", path.display());
                println!(
                    "  vertices: {} ({} faces, {})",
                    summary.vertices,
                    summary.faces,
                    if summary.flattened { "flattened" } else { "shared" }
                );
                println!(
                    "  normals: {}",
                    if summary.normals_synthesized {
                        "synthesized"
                    } else {
                        "from file"
                    }
                );
                println!(
                    "  midpoint: ({:.4}, {:.4}, {:.4})",
                    summary.midpoint[0], summary.midpoint[1], summary.midpoint[2]
                );
                println!(
                    "  length: {} (raw {:.4}, largest coordinate {:.4})",
                    summary.length, summary.raw_length, summary.largest_abs_coordinate
                );
                println!(
                    "  splat size: {:.4} .. {:.4}",
                    summary.min_splat_size, summary.max_splat_size
                );
                println!("  scale: {:.2}", summary.scale);
                if summary.skipped_lines > 0 {
                    println!("  skipped lines: {}", summary.skipped_lines);
                }
            }
        }
        Ok(())
    }

    fn init_logging(&self) {
        #[cfg(feature = "tracy")]
        {
            if self.logging.enable_tracy {
                use tracing_subscriber::Layer;
                use tracing_subscriber::layer::SubscriberExt;
                use tracing_subscriber::util::SubscriberInitExt;
                tracing_subscriber::registry()
                    .with(tracing_tracy::TracyLayer::default())
                    .with(
                        tracing_subscriber::fmt::layer().with_filter(
                            tracing_subscriber::EnvFilter::try_from_default_env()
                                .unwrap_or_else(|_| self.logging.level.clone().into()),
                        ),
                    )
                    .init();
                return;
            }
        }

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.logging.level)),
            )
            .with_target(false)
            // stdout carries the model reports, including `--json` output.
            .with_writer(std::io::stderr)
            .init();
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.scale_step, SCALE_STEP);
        assert_eq!(config.initial_scale, 1.0);
        assert_eq!(config.derive, DeriveOptions::default());
    }

    #[test]
    fn test_config_nested_options() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "scale_step": 0.1, "derive": { "splat_scale": 10.0, "z_span": "legacy" } }"#,
        )
        .unwrap();
        assert_eq!(config.scale_step, 0.1);
        assert_eq!(config.derive.splat_scale, 10.0);
        assert_eq!(config.derive.z_span, splatter_data::ZSpan::Legacy);
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::from_file(Path::new("/no/such/config.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
