use crate::config::ModelConfig;
use crate::models::classifier_trait::ClassifierModel;

/// Build a boxed classifier model from a `ModelConfig`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_model(params: ModelConfig) -> Box<dyn ClassifierModel> {
    match params.model_type {
        crate::config::ModelType::LogisticRegression { .. } => {
            Box::new(crate::models::logistic::LogisticClassifier::new(params))
        }

        crate::config::ModelType::DecisionTree { .. } => {
            Box::new(crate::models::decision_tree::DecisionTreeClassifier::new(
                params,
            ))
        }

        crate::config::ModelType::Knn { .. } => {
            Box::new(crate::models::knn::KnnClassifier::new(params))
        }
    }
}
