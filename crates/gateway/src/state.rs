use inference::{LabelNames, PredictionService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub labels: Arc<LabelNames>,
}

impl AppState {
    pub fn new(service: PredictionService, labels: LabelNames) -> Self {
        Self {
            service: Arc::new(service),
            labels: Arc::new(labels),
        }
    }
}
