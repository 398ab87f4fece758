//! Policy lifecycle orchestration.
//!
//! One invocation performs exactly one operation, in a fixed order:
//! validate the request, load credentials, establish a session, read
//! and parse the policy document when applying, then dispatch a single
//! apply or delete call. Every failure is terminal; nothing is retried
//! here.

use crate::action::Action;
use crate::client::{DirectoryService, ServiceError};
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::policy::Policy;
use std::path::Path;
use tracing::{debug, info};

pub struct Orchestrator<S> {
    service: S,
    treat_missing_as_deleted: bool,
}

impl<S: DirectoryService> Orchestrator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            treat_missing_as_deleted: true,
        }
    }

    /// Whether deleting a policy the service no longer has counts as
    /// success (the default) or surfaces as an operation failure.
    pub fn treat_missing_as_deleted(mut self, enabled: bool) -> Self {
        self.treat_missing_as_deleted = enabled;
        self
    }

    /// Run the action to completion against the directory service.
    ///
    /// A delete request with an incomplete key fails here, before the
    /// credentials file is touched and before anything reaches the
    /// network.
    pub async fn run(&self, credentials_file: &Path, action: &Action) -> Result<()> {
        if let Action::Delete { key } = action {
            if let Some(component) = key.missing_component() {
                return Err(Error::IncompleteKey(component));
            }
        }

        let credentials = Credentials::load(credentials_file)?;
        debug!(host = %credentials.host, "credentials loaded");

        let session = self
            .service
            .authenticate(&credentials)
            .await
            .map_err(Error::Connection)?;
        debug!("session established");

        match action {
            Action::Apply { policy_file } => {
                let policy = load_policy(policy_file)?;
                self.service
                    .apply(&session, &policy)
                    .await
                    .map_err(Error::Operation)?;
                info!(policy = %policy.key(), "policy applied");
            }
            Action::Delete { key } => {
                match self.service.delete(&session, key).await {
                    Ok(()) => {}
                    Err(ServiceError::NotFound) if self.treat_missing_as_deleted => {
                        debug!(policy = %key, "policy already absent");
                    }
                    Err(err) => return Err(Error::Operation(err)),
                }
                info!(policy = %key, "policy deleted");
            }
        }

        Ok(())
    }
}

fn load_policy(path: &Path) -> Result<Policy> {
    let path = std::path::absolute(path).map_err(|source| Error::PolicyPath {
        path: path.display().to_string(),
        source,
    })?;

    let text = std::fs::read_to_string(&path).map_err(|source| Error::PolicyRead {
        path: path.display().to_string(),
        source,
    })?;

    let policy = Policy::parse(&text)?;
    debug!(policy = %policy.key(), rules = policy.rules.len(), "policy document parsed");
    Ok(policy)
}
