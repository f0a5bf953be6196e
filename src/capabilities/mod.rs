mod auth;
mod cases;

pub use self::auth::{Auth, AuthError, AuthOperation, AuthResult};
pub use self::cases::{
    Cases, CasesError, CasesOperation, CasesResult, CreateCaseRequest, CreateCaseResponse,
};

pub use crux_core::render::Render;

use crate::app::App;
use crate::Event;

pub type AppRender = Render<Event>;
pub type AppAuth = Auth<Event>;
pub type AppCases = Cases<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: AppRender,
    pub auth: AppAuth,
    pub cases: AppCases,
}
