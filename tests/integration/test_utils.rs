//! Shared helpers: a handler that records every command it receives.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use xaheen::command::CliCommand;
use xaheen::error::CliError;
use xaheen::handler::{handler_constructor, DomainHandler, HandlerFactory};

pub type Calls = Arc<Mutex<Vec<CliCommand>>>;

pub struct RecordingHandler {
    domain: String,
    actions: Vec<String>,
    calls: Calls,
}

#[async_trait]
impl DomainHandler for RecordingHandler {
    fn domain(&self) -> &str {
        &self.domain
    }

    fn supported_actions(&self) -> Vec<String> {
        self.actions.clone()
    }

    async fn execute(&self, command: CliCommand) -> Result<(), CliError> {
        self.calls.lock().push(command);
        Ok(())
    }
}

/// Register a recording handler for `domain` and return its call log.
pub fn register_recording(factory: &HandlerFactory, domain: &str, actions: &[&str]) -> Calls {
    let calls = Calls::default();
    let log = Arc::clone(&calls);
    let domain_name = domain.to_string();
    let actions: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
    factory.register_handler(
        domain,
        handler_constructor(move |_| {
            Ok(Arc::new(RecordingHandler {
                domain: domain_name.clone(),
                actions: actions.clone(),
                calls: Arc::clone(&log),
            }) as Arc<dyn DomainHandler>)
        }),
    );
    calls
}
