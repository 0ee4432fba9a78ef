use client::{ApiError, DefinitionsView, SaveOutcome, SelectOutcome};
use serde_json::Value;

pub enum Msg {
    LoadDefinitions,
    DefinitionsLoaded(Result<DefinitionsView, ApiError>),
    Select(String),
    ValueResolved(SelectOutcome),
    Edit(Value),
    Save,
    SaveResolved(SaveOutcome),
    TokenInput(String),
    UsernameInput(String),
    PasswordInput(String),
    TenantInput(String),
    ApplyToken,
    Login,
    LoginResolved(Result<(), ApiError>),
    Logout,
    Refresh,
    Reset,
    Dismiss(u64),
}
