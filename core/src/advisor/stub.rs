//! Canned advisor for tests and offline runs. Never touches the network.

use super::{parse_advisor_response, AdvisorInsights, AdvisorRequest, NarrativeAdvisor};
use crate::error::{AnalysisError, AnalysisResult};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct StaticAdvisor {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StaticAdvisor {
    /// Answer every request with `text`, parsed like a real response.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every request as an unavailable advisor.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Err(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NarrativeAdvisor for StaticAdvisor {
    fn name(&self) -> &'static str {
        "static"
    }

    fn summarize(&self, _request: &AdvisorRequest) -> AnalysisResult<AdvisorInsights> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => parse_advisor_response(text),
            Err(reason) => Err(AnalysisError::AdvisorUnavailable {
                reason: reason.clone(),
            }),
        }
    }
}
