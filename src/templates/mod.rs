//! On-disk template repository.
//!
//! Templates live under `<base>/<brand>/<model>.sc` as JSON with optional
//! `//` comment lines. A missing or malformed template is a recovered
//! condition: the switch falls back to the default layout.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::SwitchTemplate;

/// TemplateStore enumerates and loads per-model switch templates
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Brands with at least one template directory
    pub fn available_brands(&self) -> Vec<String> {
        let mut brands = Vec::new();
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(e) => e,
            Err(_) => return brands,
        };
        for entry in entries.flatten() {
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    brands.push(name.to_string());
                }
            }
        }
        brands.sort();
        brands
    }

    /// Models of a brand, derived from `.sc` filenames
    pub fn available_models(&self, brand: &str) -> Vec<String> {
        let mut models = Vec::new();
        let entries = match fs::read_dir(self.base_dir.join(brand)) {
            Ok(e) => e,
            Err(_) => return models,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("sc") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    models.push(stem.to_string());
                }
            }
        }
        models.sort();
        models
    }

    pub fn template_path(&self, brand: &str, model: &str) -> PathBuf {
        self.base_dir.join(brand).join(format!("{}.sc", model))
    }

    /// Load a template, stripping comment lines before parsing.
    /// Returns `None` when the file is absent or malformed.
    pub fn load(&self, brand: &str, model: &str) -> Option<SwitchTemplate> {
        let path = self.template_path(brand, model);
        if !path.exists() {
            tracing::warn!("Template {}/{} not found at {}", brand, model, path.display());
            return None;
        }
        match read_template(&path) {
            Ok(template) => {
                tracing::info!("Template {}/{} loaded", brand, model);
                Some(template)
            }
            Err(e) => {
                tracing::error!("Failed to load template {}: {}", path.display(), e);
                None
            }
        }
    }
}

fn read_template(path: &Path) -> anyhow::Result<SwitchTemplate> {
    let raw = fs::read_to_string(path)?;
    let stripped: Vec<&str> = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect();
    let template = serde_json::from_str(&stripped.join("\n"))?;
    Ok(template)
}
