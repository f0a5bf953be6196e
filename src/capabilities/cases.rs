use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The seven fields of one registration attempt, already flattened to their
/// wire strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCaseRequest {
    pub court_id: String,
    pub description: String,
    pub case_type: String,
    pub petitioner: String,
    pub respondent: String,
    pub start_date: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCaseResponse {
    pub status: bool,
    #[serde(default)]
    pub new_case_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CasesError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("{message}")]
    Service { message: String },
}

pub type CasesResult = Result<CreateCaseResponse, CasesError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CasesOperation {
    Create(CreateCaseRequest),
}

impl Operation for CasesOperation {
    type Output = CasesResult;
}

/// Case-creation collaborator. Persistence, identifiers and timeout policy
/// all belong to the shell side.
#[derive(Debug, Clone)]
pub struct Cases<Ev> {
    context: CapabilityContext<CasesOperation, Ev>,
}

impl<Ev> Capability<Ev> for Cases<Ev> {
    type Operation = CasesOperation;
    type MappedSelf<MappedEv> = Cases<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + Copy + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Cases::new(self.context.map_event(f))
    }
}

impl<Ev> Cases<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<CasesOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn create<F>(&self, request: CreateCaseRequest, make_event: F)
    where
        F: FnOnce(CasesResult) -> Ev + Send + Sync + 'static,
        Ev: Send,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(CasesOperation::Create(request))
                .await;
            context.update_app(make_event(result));
        });
    }
}
