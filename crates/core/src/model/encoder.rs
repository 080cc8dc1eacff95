use anyhow::{ensure, Context};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Maps classifier output indices back to the label text used during training.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> anyhow::Result<Self> {
        let encoder = Self { classes };
        encoder.validate()?;
        Ok(encoder)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read label encoder {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("invalid label encoder {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let encoder: LabelEncoder =
            serde_json::from_str(raw).context("label encoder is not valid JSON")?;
        encoder.validate()?;
        Ok(encoder)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.classes.is_empty(), "label encoder has no classes");
        let mut seen = HashSet::new();
        for class in &self.classes {
            ensure!(seen.insert(class.as_str()), "duplicate class label: {class}");
        }
        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn inverse_transform(&self, class_idx: usize) -> anyhow::Result<&str> {
        self.classes
            .get(class_idx)
            .map(String::as_str)
            .with_context(|| {
                format!(
                    "class index {class_idx} out of range for label encoder ({} classes)",
                    self.classes.len()
                )
            })
    }
}
