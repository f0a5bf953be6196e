// lib.rs - Docket case-registration core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};

pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to register a case.";
pub const ALL_FIELDS_REQUIRED_MESSAGE: &str = "All fields are required.";
pub const GENERIC_ERROR_MESSAGE: &str = "An unknown error occurred.";
pub const UNKNOWN_CASE_ID: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Authorization,
    Validation,
    Submission,
    Network,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Authorization => "FORBIDDEN",
            Self::Validation => "VALIDATION_ERROR",
            Self::Submission => "SUBMISSION_FAILED",
            Self::Network => "NETWORK_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn generic_message(self) -> &'static str {
        match self {
            Self::Authorization => PERMISSION_DENIED_MESSAGE,
            Self::Validation => ALL_FIELDS_REQUIRED_MESSAGE,
            Self::Submission | Self::Network | Self::Unknown => GENERIC_ERROR_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Collaborator-supplied text when there is any, the kind's generic
    /// fallback otherwise.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        if self.message.is_empty() {
            self.kind.generic_message().into()
        } else {
            self.message.clone()
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<capabilities::AuthError> for AppError {
    fn from(e: capabilities::AuthError) -> Self {
        let kind = match &e {
            capabilities::AuthError::CheckFailed { .. } => ErrorKind::Authorization,
            capabilities::AuthError::Unavailable => ErrorKind::Network,
        };
        Self::new(kind, e.to_string())
    }
}

impl From<capabilities::CasesError> for AppError {
    fn from(e: capabilities::CasesError) -> Self {
        let kind = match &e {
            capabilities::CasesError::Network { .. } | capabilities::CasesError::Timeout => {
                ErrorKind::Network
            }
            capabilities::CasesError::Service { .. } => ErrorKind::Unknown,
        };
        Self::new(kind, e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    Civil,
    Criminal,
    Family,
}

impl CaseType {
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "civil" => Some(Self::Civil),
            "criminal" => Some(Self::Criminal),
            "family" => Some(Self::Family),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Civil => "Civil",
            Self::Criminal => "Criminal",
            Self::Family => "Family",
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Open,
    UnderInvestigation,
    Closed,
}

impl CaseStatus {
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "open" => Some(Self::Open),
            "under_investigation" => Some(Self::UnderInvestigation),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::UnderInvestigation => "Under Investigation",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    CourtId,
    Description,
    CaseType,
    Petitioner,
    Respondent,
    StartDate,
    Status,
}

/// In-memory form state for one registration session. Written only by
/// `FieldChanged` handling and by the reset after a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDraft {
    pub court_id: String,
    pub description: String,
    pub case_type: Option<CaseType>,
    pub petitioner: String,
    pub respondent: String,
    pub start_date: String,
    pub status: Option<CaseStatus>,
}

impl CaseDraft {
    pub fn set_field(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::CourtId => self.court_id = value.to_owned(),
            DraftField::Description => self.description = value.to_owned(),
            DraftField::CaseType => self.case_type = CaseType::from_str(value),
            DraftField::Petitioner => self.petitioner = value.to_owned(),
            DraftField::Respondent => self.respondent = value.to_owned(),
            DraftField::StartDate => self.start_date = value.to_owned(),
            DraftField::Status => self.status = CaseStatus::from_str(value),
        }
    }

    /// True iff every required field holds a value. String fields must be
    /// non-empty; select fields must carry a valid choice. No normalization
    /// beyond that.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.court_id.is_empty()
            && !self.description.is_empty()
            && self.case_type.is_some()
            && !self.petitioner.is_empty()
            && !self.respondent.is_empty()
            && !self.start_date.is_empty()
            && self.status.is_some()
    }

    #[must_use]
    pub fn to_request(&self) -> Option<capabilities::CreateCaseRequest> {
        if !self.is_complete() {
            return None;
        }
        Some(capabilities::CreateCaseRequest {
            court_id: self.court_id.clone(),
            description: self.description.clone(),
            case_type: self.case_type?.as_str().to_owned(),
            petitioner: self.petitioner.clone(),
            respondent: self.respondent.clone(),
            start_date: self.start_date.clone(),
            status: self.status?.as_str().to_owned(),
        })
    }

    // Single assignment: the reset can never leave a partially cleared form.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    #[default]
    Loading,
    Denied {
        message: String,
    },
    Granted,
}

impl AccessState {
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
}

impl SubmissionState {
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::InFlight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Warning => 4000,
            Self::Success | Self::Error => 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl ToastMessage {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at_ms: get_current_time_ms(),
            duration_ms: kind.default_duration_ms(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) > self.duration_ms
    }
}

#[must_use]
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Default)]
pub struct Model {
    pub access: AccessState,
    pub submission: SubmissionState,
    pub draft: CaseDraft,
    pub active_toast: Option<ToastMessage>,
    pub access_check_started: bool,
}

impl Model {
    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(message, kind));
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }

    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.access.is_granted() && !self.submission.is_in_flight()
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    AppStarted,
    AccessCheckCompleted(capabilities::AuthResult),
    FieldChanged { field: DraftField, value: String },
    SubmitRequested,
    SubmissionCompleted(Box<capabilities::CasesResult>),
    ToastDismissed,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::AccessCheckCompleted(_) => "access_check_completed",
            Self::FieldChanged { .. } => "field_changed",
            Self::SubmitRequested => "submit_requested",
            Self::SubmissionCompleted(_) => "submission_completed",
            Self::ToastDismissed => "toast_dismissed",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormView {
    pub court_id: String,
    pub description: String,
    pub case_type: Option<CaseType>,
    pub petitioner: String,
    pub respondent: String,
    pub start_date: String,
    pub status: Option<CaseStatus>,
    pub is_submitting: bool,
    pub can_submit: bool,
}

// Form fields exist only in the Ready variant, so neither the waiting nor the
// denied screen can expose an input or a submit affordance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Denied { message: String },
    Ready { form: FormView },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            message: t.message.clone(),
            kind: t.kind,
            duration_ms: t.duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub state: ViewState,
    pub toast: Option<ToastView>,
}

pub mod app {
    use super::*;
    use crate::capabilities::Capabilities;

    #[derive(Default)]
    pub struct App;

    impl App {
        fn build_form_view(model: &Model) -> FormView {
            FormView {
                court_id: model.draft.court_id.clone(),
                description: model.draft.description.clone(),
                case_type: model.draft.case_type,
                petitioner: model.draft.petitioner.clone(),
                respondent: model.draft.respondent.clone(),
                start_date: model.draft.start_date.clone(),
                status: model.draft.status,
                is_submitting: model.submission.is_in_flight(),
                can_submit: model.can_submit(),
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            tracing::debug!(event = event.name(), "handling event");

            match event {
                Event::AppStarted => {
                    if model.access_check_started {
                        tracing::warn!("duplicate app start; access check already requested");
                        return;
                    }
                    model.access_check_started = true;

                    // The waiting screen renders immediately; the decision
                    // arrives later as AccessCheckCompleted.
                    caps.auth.check_access(Event::AccessCheckCompleted);
                    caps.render.render();
                }

                Event::AccessCheckCompleted(result) => {
                    if model.access.is_resolved() {
                        tracing::warn!("access already resolved; result ignored");
                        return;
                    }

                    model.access = match result {
                        Ok(true) => AccessState::Granted,
                        Ok(false) => AccessState::Denied {
                            message: PERMISSION_DENIED_MESSAGE.into(),
                        },
                        Err(e) => {
                            tracing::error!(error = %e, "access check failed");
                            AccessState::Denied {
                                message: AppError::from(e).user_facing_message(),
                            }
                        }
                    };

                    caps.render.render();
                }

                Event::FieldChanged { field, value } => {
                    if !model.access.is_granted() {
                        tracing::warn!(?field, "field edit before access granted; ignored");
                        return;
                    }

                    model.draft.set_field(field, &value);
                    caps.render.render();
                }

                Event::SubmitRequested => {
                    if !model.access.is_granted() {
                        tracing::warn!("submit without access; ignored");
                        return;
                    }

                    // Validation runs before the in-flight guard, so a
                    // rejected draft never touches SubmissionState and no
                    // request is spent on it.
                    let Some(request) = model.draft.to_request() else {
                        model.show_toast(ALL_FIELDS_REQUIRED_MESSAGE, ToastKind::Error);
                        caps.render.render();
                        return;
                    };

                    if model.submission.is_in_flight() {
                        tracing::warn!("submission already in flight; ignored");
                        return;
                    }

                    model.submission = SubmissionState::InFlight;
                    caps.cases
                        .create(request, |result| Event::SubmissionCompleted(Box::new(result)));
                    caps.render.render();
                }

                Event::SubmissionCompleted(result) => {
                    // Idle is restored before the outcome is inspected so no
                    // path can leave the form stuck mid-submission.
                    model.submission = SubmissionState::Idle;

                    match *result {
                        Ok(response) if response.status => {
                            let case_id = response
                                .new_case_id
                                .unwrap_or_else(|| UNKNOWN_CASE_ID.into());
                            model.draft.clear();
                            model.show_toast(
                                format!("Case registered successfully with Case ID: {case_id}"),
                                ToastKind::Success,
                            );
                        }
                        Ok(response) => {
                            let error = AppError::new(
                                ErrorKind::Submission,
                                response.error.unwrap_or_default(),
                            );
                            model.show_toast(
                                format!("Failed to register case: {}", error.user_facing_message()),
                                ToastKind::Error,
                            );
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "case submission failed");
                            model.show_toast(
                                AppError::from(e).user_facing_message(),
                                ToastKind::Error,
                            );
                        }
                    }

                    caps.render.render();
                }

                Event::ToastDismissed => {
                    model.clear_toast();
                    caps.render.render();
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            let state = match &model.access {
                AccessState::Loading => ViewState::Loading,
                AccessState::Denied { message } => ViewState::Denied {
                    message: message.clone(),
                },
                AccessState::Granted => ViewState::Ready {
                    form: Self::build_form_view(model),
                },
            };

            ViewModel {
                state,
                toast: model.active_toast.as_ref().map(ToastView::from),
            }
        }
    }
}
