//! Declarative expectations for one test run.

use std::sync::Arc;

use hostbench_config::SharedDataPerRequest;

use crate::agent_config::{AgentConfigSetter, EnvVarsAgentConfigSetter};

/// What a test case expects from one run of the subject process.
///
/// Unset expectations fall back to the test environment's defaults.
#[derive(Debug, Clone)]
pub struct TestProperties {
    transaction_name: Option<String>,
    transaction_type: Option<String>,
    agent_config_setter: Arc<dyn AgentConfigSetter>,
    shared_data_per_request: SharedDataPerRequest,
}

impl TestProperties {
    /// Creates properties for a request payload, with agent options passed as env vars.
    #[must_use]
    pub fn new(shared_data_per_request: SharedDataPerRequest) -> Self {
        Self {
            transaction_name: None,
            transaction_type: None,
            agent_config_setter: Arc::new(EnvVarsAgentConfigSetter::new()),
            shared_data_per_request,
        }
    }

    /// Creates properties that run `class::method` as app code.
    #[must_use]
    pub fn for_app_code(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::new(SharedDataPerRequest::new(class, method))
    }

    /// Expects the root transaction to carry `name`.
    #[must_use]
    pub fn with_transaction_name(mut self, name: impl Into<String>) -> Self {
        self.transaction_name = Some(name.into());
        self
    }

    /// Expects the root transaction to carry `transaction_type`.
    #[must_use]
    pub fn with_transaction_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }

    /// Replaces how agent configuration reaches the subject.
    #[must_use]
    pub fn with_agent_config_setter(mut self, setter: impl AgentConfigSetter + 'static) -> Self {
        self.agent_config_setter = Arc::new(setter);
        self
    }

    /// Expected root transaction name, if set explicitly.
    #[must_use]
    pub fn transaction_name(&self) -> Option<&str> {
        self.transaction_name.as_deref()
    }

    /// Expected root transaction type, if set explicitly.
    #[must_use]
    pub fn transaction_type(&self) -> Option<&str> {
        self.transaction_type.as_deref()
    }

    /// Agent configuration channel.
    #[must_use]
    pub fn agent_config_setter(&self) -> &dyn AgentConfigSetter {
        self.agent_config_setter.as_ref()
    }

    /// Payload delivered to the request.
    #[must_use]
    pub const fn shared_data_per_request(&self) -> &SharedDataPerRequest {
        &self.shared_data_per_request
    }
}
