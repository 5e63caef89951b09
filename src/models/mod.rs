pub mod decision_tree;
pub mod knn;
pub mod logistic;

pub mod classifier_trait;
pub mod factory;

pub use classifier_trait::ClassifierModel;
