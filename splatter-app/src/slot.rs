//! Ownership of the single active model.

use splatter_data::{DeriveOptions, Model, ObjError};
use std::path::Path;
use tracing::{debug, info};

/// Scale change for one `+`/`-` step.
pub const SCALE_STEP: f32 = 0.02;

/// Holds at most one loaded [`Model`].
///
/// A new model is fully built before it replaces the current one, so a failed
/// load leaves the previous model in place.
pub struct ModelSlot {
    model: Option<Model>,
    options: DeriveOptions,
    scale_step: f32,
}

impl ModelSlot {
    pub fn new(options: DeriveOptions) -> Self {
        Self {
            model: None,
            options,
            scale_step: SCALE_STEP,
        }
    }

    pub fn with_scale_step(mut self, step: f32) -> Self {
        self.scale_step = step;
        self
    }

    /// Load `path` and make it the active model.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&mut Model, ObjError> {
        let path = path.as_ref();
        let model = Model::load_with_options(path, &self.options)?;
        if self.model.is_some() {
            debug!("Replacing active model with {}", path.display());
        }
        info!("Active model: {}", path.display());
        Ok(self.model.insert(model))
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Grow the active model's display scale by one step.
    pub fn scale_up(&mut self) -> Option<f32> {
        let step = self.scale_step;
        self.adjust_scale(step)
    }

    /// Shrink the active model's display scale by one step, stopping at zero.
    pub fn scale_down(&mut self) -> Option<f32> {
        let step = self.scale_step;
        self.adjust_scale(-step)
    }

    fn adjust_scale(&mut self, delta: f32) -> Option<f32> {
        let model = self.model.as_mut()?;
        let scale = (model.scale() + delta).max(0.0);
        model.set_scale(scale);
        Some(scale)
    }
}

impl Default for ModelSlot {
    fn default() -> Self {
        Self::new(DeriveOptions::default())
    }
}
