use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("Auth::{}", .0)]
    Auth(#[from] scola_core::auth::AuthError),

    #[error("Session::{}", .0)]
    Session(#[from] scola_core::session::SessionError),

    #[error("Client::{}", .0)]
    Client(#[from] scola_api_client::ClientError),

    #[error("Json::{}", .0)]
    Json(#[from] serde_json::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),
}
