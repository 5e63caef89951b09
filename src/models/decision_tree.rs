use anyhow::{anyhow, Result};
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;

use crate::config::{ModelConfig, ModelType};
use crate::data_handling::{LABEL_NOISE, LABEL_QUOTATION};
use crate::models::classifier_trait::ClassifierModel;

/// CART-style decision tree classifier.
///
/// Backed by gradient-boosted trees with log-likelihood loss; the default
/// single boosting round fits one tree. `predict` output from this loss is
/// already a probability of the positive class.
pub struct DecisionTreeClassifier {
    model: Option<GBDT>,
    params: ModelConfig,
}

impl DecisionTreeClassifier {
    pub fn new(params: ModelConfig) -> Self {
        DecisionTreeClassifier {
            model: None,
            params,
        }
    }

    fn to_data_vec(x: &Array2<f64>, y: Option<&[i32]>) -> DataVec {
        let mut data = DataVec::new();
        for row in 0..x.nrows() {
            let features = x.row(row).iter().map(|&v| v as f32).collect::<Vec<f32>>();
            let label = y.map(|labels| labels[row] as f32).unwrap_or(0.0);
            data.push(Data::new_training_data(features, 1.0, label, None));
        }
        data
    }
}

impl ClassifierModel for DecisionTreeClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[i32]) -> Result<()> {
        let ModelType::DecisionTree {
            max_depth,
            min_leaf_size,
            num_boost_round,
        } = self.params.model_type
        else {
            return Err(anyhow!(
                "Expected DecisionTree params, got {:?}",
                self.params.model_type
            ));
        };

        let mut config = Config::new();
        config.set_feature_size(x.ncols());
        config.set_shrinkage(self.params.learning_rate as f32);
        config.set_max_depth(max_depth);
        config.set_min_leaf_size(min_leaf_size);
        config.set_iterations(num_boost_round as usize);
        config.set_loss("LogLikelyhood");

        let mut gbdt = GBDT::new(&config);
        let mut train = Self::to_data_vec(x, Some(y));
        gbdt.fit(&mut train);

        log::debug!(
            "Fitted decision tree on {} rows (max_depth={}, min_leaf_size={}, rounds={})",
            x.nrows(),
            max_depth,
            min_leaf_size,
            num_boost_round
        );
        self.model = Some(gbdt);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<i32>> {
        let probs = self.predict_proba(x)?;
        Ok(probs
            .iter()
            .map(|&p| if p >= 0.5 { LABEL_QUOTATION } else { LABEL_NOISE })
            .collect())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("decision tree model has not been fitted"))?;
        let test = Self::to_data_vec(x, None);
        let predictions = model.predict(&test);
        Ok(predictions.iter().map(|&p| p as f64).collect())
    }

    fn name(&self) -> &str {
        "decision_tree"
    }
}
