//! Document extraction agent.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use agentrun_core::UserId;

use super::{Agent, AgentError};

/// Placeholder document extraction agent. Produces no result.
pub struct DocumentExtractor {
    user_id: UserId,
    delay: Duration,
}

impl DocumentExtractor {
    pub fn new(user_id: UserId, delay: Duration) -> Self {
        Self { user_id, delay }
    }
}

#[async_trait]
impl Agent for DocumentExtractor {
    fn name(&self) -> &'static str {
        "document-extractor"
    }

    async fn run(&self) -> Result<Option<String>, AgentError> {
        info!(agent = self.name(), user = %self.user_id, "Hello, I am a document-extractor agent");
        tokio::time::sleep(self.delay).await;
        info!(agent = self.name(), user = %self.user_id, "complete");
        Ok(None)
    }
}
