use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthOperation {
    CheckAccess,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthError {
    #[error("{message}")]
    CheckFailed { message: String },

    #[error("authorization service unavailable")]
    Unavailable,
}

/// `Ok(true)` when the current identity holds a role permitted to register
/// cases; `Ok(false)` when the check completed and denied.
pub type AuthResult = Result<bool, AuthError>;

impl Operation for AuthOperation {
    type Output = AuthResult;
}

/// Role-check collaborator. The ambient identity lives with the shell; the
/// core only sees the decision.
#[derive(Debug, Clone)]
pub struct Auth<Ev> {
    context: CapabilityContext<AuthOperation, Ev>,
}

impl<Ev> Capability<Ev> for Auth<Ev> {
    type Operation = AuthOperation;
    type MappedSelf<MappedEv> = Auth<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + Copy + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Auth::new(self.context.map_event(f))
    }
}

impl<Ev> Auth<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<AuthOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn check_access<F>(&self, make_event: F)
    where
        F: FnOnce(AuthResult) -> Ev + Send + Sync + 'static,
        Ev: Send,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(AuthOperation::CheckAccess).await;
            context.update_app(make_event(result));
        });
    }
}
