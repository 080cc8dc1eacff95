use crate::domain::calendar::DateFeature;
use crate::model::features::FeatureLayout;
use crate::model::StateClassifier;
use anyhow::{ensure, Context};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
struct ForestArtifact {
    feature_names: Vec<String>,
    n_classes: usize,
    trees: Vec<TreeArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
struct TreeArtifact {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

/// Ensemble of binary decision trees exported from the training pipeline.
///
/// Each tree routes the input left when `x[feature] <= threshold`. Leaf values are per-class
/// weights; they are normalized per tree and averaged, and the heaviest class wins (ties go
/// to the lowest class index). A plain decision tree is an ensemble of one.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    layout: FeatureLayout,
    n_classes: usize,
    trees: Vec<Vec<Node>>,
}

impl ForestClassifier {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("invalid model artifact {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let artifact: ForestArtifact = serde_json::from_str(raw)
            .context("model artifact is not valid JSON for forest schema")?;

        let layout = FeatureLayout::from_names(&artifact.feature_names)?;
        ensure!(artifact.n_classes >= 1, "n_classes must be >= 1");
        ensure!(!artifact.trees.is_empty(), "model must contain at least one tree");

        let mut trees = Vec::with_capacity(artifact.trees.len());
        for (idx, tree) in artifact.trees.into_iter().enumerate() {
            validate_tree(&tree.nodes, layout.len(), artifact.n_classes)
                .with_context(|| format!("tree {idx} is malformed"))?;
            trees.push(tree.nodes);
        }

        Ok(Self {
            layout,
            n_classes: artifact.n_classes,
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.layout.len()
    }
}

impl StateClassifier for ForestClassifier {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_class(&self, features: &DateFeature) -> anyhow::Result<usize> {
        let x = self.layout.encode(features);
        let mut votes = vec![0.0_f64; self.n_classes];

        for nodes in &self.trees {
            let leaf = walk(nodes, &x)?;
            let total: f64 = leaf.iter().sum();
            for (acc, v) in votes.iter_mut().zip(leaf) {
                *acc += if total > 0.0 { v / total } else { 0.0 };
            }
        }

        let mut best = 0;
        for (idx, v) in votes.iter().enumerate() {
            if *v > votes[best] {
                best = idx;
            }
        }
        Ok(best)
    }
}

fn walk<'a>(nodes: &'a [Node], x: &[f64]) -> anyhow::Result<&'a [f64]> {
    let mut idx = 0;
    // Children always come after their parent, so this visits at most nodes.len() nodes.
    for _ in 0..nodes.len() {
        match &nodes[idx] {
            Node::Leaf { value } => return Ok(value.as_slice()),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                idx = if x[*feature] <= *threshold { *left } else { *right };
            }
        }
    }
    anyhow::bail!("tree walk did not reach a leaf")
}

fn validate_tree(nodes: &[Node], n_features: usize, n_classes: usize) -> anyhow::Result<()> {
    ensure!(!nodes.is_empty(), "tree must contain at least one node");

    for (idx, node) in nodes.iter().enumerate() {
        match node {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                ensure!(
                    *feature < n_features,
                    "node {idx}: feature index {feature} out of range (n_features={n_features})"
                );
                ensure!(threshold.is_finite(), "node {idx}: threshold must be finite");
                for child in [*left, *right] {
                    ensure!(
                        child > idx && child < nodes.len(),
                        "node {idx}: child index {child} must point forward within the tree"
                    );
                }
            }
            Node::Leaf { value } => {
                ensure!(
                    value.len() == n_classes,
                    "node {idx}: leaf has {} values, expected {n_classes}",
                    value.len()
                );
                ensure!(
                    value.iter().all(|v| v.is_finite() && *v >= 0.0),
                    "node {idx}: leaf values must be finite and non-negative"
                );
            }
        }
    }
    Ok(())
}
