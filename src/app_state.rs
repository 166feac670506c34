use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{
    correlator::Correlator, ledger::ProcessedJobLedger, messenger::MessageSink,
    rekognition::LabelDetector, sns::SubscriptionConfirmer, taxonomy::SuspicionTaxonomy,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub detector: Arc<dyn LabelDetector>,
    pub messenger: Arc<dyn MessageSink>,
    pub ledger: Arc<dyn ProcessedJobLedger>,
    pub confirmer: Arc<SubscriptionConfirmer>,
    pub taxonomy: Arc<SuspicionTaxonomy>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        detector: Arc<dyn LabelDetector>,
        messenger: Arc<dyn MessageSink>,
        ledger: Arc<dyn ProcessedJobLedger>,
        confirmer: SubscriptionConfirmer,
    ) -> Self {
        let taxonomy = SuspicionTaxonomy::with_extra_keywords(&config.extra_suspicious_labels);
        Self {
            config: Arc::new(config),
            detector,
            messenger,
            ledger,
            confirmer: Arc::new(confirmer),
            taxonomy: Arc::new(taxonomy),
        }
    }

    pub fn correlator(&self) -> Correlator<'_> {
        Correlator {
            detector: self.detector.as_ref(),
            messenger: self.messenger.as_ref(),
            ledger: self.ledger.as_ref(),
            taxonomy: &self.taxonomy,
            recipient_id: &self.config.fb_messenger_psid,
        }
    }
}
