//! Tool registration and dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::value::RawValue;

use crate::cancel::CancelToken;
use crate::types::{RegistrationError, ToolCallResult, ToolDefinition};

/// Failures reported by tool handlers.
///
/// Only the rendered message crosses the protocol boundary.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Probe(#[from] sysprobe::ProbeError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(String),
}

/// `Ok(None)` means the tool succeeded without content.
pub type ToolOutcome = Result<Option<ToolCallResult>, ToolError>;

pub type ToolFuture = Pin<Box<dyn Future<Output = ToolOutcome> + Send>>;

/// Async tool handler: raw arguments plus the ambient cancellation signal.
pub type ToolHandler = Arc<dyn Fn(Option<Box<RawValue>>, CancelToken) -> ToolFuture + Send + Sync>;

/// Wrap an async function as a [`ToolHandler`].
pub fn handler<F, Fut>(f: F) -> ToolHandler
where
    F: Fn(Option<Box<RawValue>>, CancelToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ToolOutcome> + Send + 'static,
{
    Arc::new(move |arguments, cancel| Box::pin(f(arguments, cancel)))
}

/// A validated tool definition bound to its handler.
#[derive(Clone)]
pub struct ToolRegistration {
    pub definition: ToolDefinition,
    pub handler: ToolHandler,
}

impl ToolRegistration {
    /// Validate a definition and fill in the default input schema.
    pub fn new(
        mut definition: ToolDefinition,
        handler: ToolHandler,
    ) -> Result<Self, RegistrationError> {
        if definition.name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if definition.input_schema.is_none() {
            definition.input_schema = Some(ToolDefinition::default_schema());
        }
        Ok(Self {
            definition,
            handler,
        })
    }

    pub async fn call(&self, arguments: Option<Box<RawValue>>, cancel: CancelToken) -> ToolOutcome {
        (self.handler)(arguments, cancel).await
    }
}

impl std::fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Name-keyed tool store that lists in registration order.
///
/// Names are unique; a duplicate registration is rejected and leaves the
/// registry untouched.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolRegistration>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        definition: ToolDefinition,
        handler: ToolHandler,
    ) -> Result<(), RegistrationError> {
        let registration = ToolRegistration::new(definition, handler)?;
        let name = registration.definition.name.clone();
        if self.tools.contains_key(&name) {
            return Err(RegistrationError::Duplicate(name));
        }

        tracing::debug!("Registered tool {name}");
        self.tools.insert(name.clone(), registration);
        self.order.push(name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolRegistration> {
        self.tools.get(name)
    }

    /// All registrations, in registration order.
    pub fn list(&self) -> Vec<&ToolRegistration> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.list()
            .into_iter()
            .map(|registration| registration.definition.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
