pub mod encoder;
pub mod features;
pub mod forest;

use crate::config::Settings;
use crate::domain::calendar::DateFeature;
use crate::domain::state::StateLabel;
use anyhow::ensure;
use encoder::LabelEncoder;
use forest::ForestClassifier;

pub trait StateClassifier: Send + Sync + std::fmt::Debug {
    fn n_classes(&self) -> usize;

    /// Returns the index of the predicted class.
    fn predict_class(&self, features: &DateFeature) -> anyhow::Result<usize>;
}

/// Classifier and label decoder, loaded once and shared read-only.
#[derive(Debug)]
pub struct Models {
    classifier: Box<dyn StateClassifier>,
    encoder: LabelEncoder,
}

impl Models {
    pub fn new(
        classifier: impl StateClassifier + 'static,
        encoder: LabelEncoder,
    ) -> anyhow::Result<Self> {
        ensure!(
            classifier.n_classes() == encoder.len(),
            "classifier predicts {} classes but label encoder has {}",
            classifier.n_classes(),
            encoder.len()
        );
        Ok(Self {
            classifier: Box::new(classifier),
            encoder,
        })
    }

    pub fn load(settings: &Settings) -> anyhow::Result<Self> {
        let classifier = ForestClassifier::load(&settings.model_path)?;
        let encoder = LabelEncoder::load(&settings.label_encoder_path)?;

        tracing::info!(
            model_path = %settings.model_path.display(),
            label_encoder_path = %settings.label_encoder_path.display(),
            n_trees = classifier.n_trees(),
            n_features = classifier.n_features(),
            classes = ?encoder.classes(),
            "model and label encoder loaded"
        );

        Self::new(classifier, encoder)
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn predict(&self, features: &DateFeature) -> anyhow::Result<StateLabel> {
        let class_idx = self.classifier.predict_class(features)?;
        let text = self.encoder.inverse_transform(class_idx)?;
        Ok(StateLabel::from_decoded(text))
    }
}
