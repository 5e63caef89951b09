use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    /// Shrinkage applied per boosting round by the decision-tree family.
    /// Ignored by the other families.
    pub learning_rate: f64,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model families and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelType {
    LogisticRegression {
        /// L2 regularization strength.
        penalty: f64,
        max_iterations: u64,
    },
    DecisionTree {
        max_depth: u32,
        min_leaf_size: usize,
        /// Boosting rounds; 1 fits a single tree.
        num_boost_round: u32,
    },
    Knn {
        neighbors: usize,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::LogisticRegression {
            penalty: 1.0,
            max_iterations: 100,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logistic" | "logistic_regression" => Ok(ModelType::LogisticRegression {
                penalty: 1.0,
                max_iterations: 100,
            }),
            "tree" | "decision_tree" => Ok(ModelType::DecisionTree {
                max_depth: 6,
                min_leaf_size: 1,
                num_boost_round: 1,
            }),
            "knn" | "nearest_neighbors" => Ok(ModelType::Knn { neighbors: 5 }),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: logistic, tree, knn",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f64, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::default(),
        }
    }
}
