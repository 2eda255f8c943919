use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

/// `Logger` backed by `tracing`, tagging every event with the component
/// that emitted it.
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("shopping-lists")
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "shopping_lists", component = self.component, "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: "shopping_lists", component = self.component, "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: "shopping_lists", component = self.component, "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: "shopping_lists", component = self.component, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn should_default_to_service_component() {
        assert_eq!(TracingLogger::default().component(), "shopping-lists");
    }

    #[test]
    fn should_log_through_trait_object_without_subscriber() {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new("sessions"));

        logger.info("opened");
        logger.warn("conflict");
        logger.error("failed");
        logger.debug("subscribed");
    }
}
