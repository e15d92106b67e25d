pub mod base;
pub mod modules;
pub mod utils;
pub mod workflow;

use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub use base::portal::Rejection;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum Error {
    /// The settings file is missing or one of its lines is malformed
    Config(String),
    /// The portal answered but refused the request (wrong password, unknown period, ...)
    Rejected(Rejection),
    /// The page was fetched fine but contained nothing to work with
    EmptyResult(String),
    /// Happens if the request could not be sent or the response could not be read
    Network(String),
    /// A download was answered with a non-success status code (the [u16] is the status)
    FetchFailed(u16),
    /// A submission was answered with anything but 200 (the [u16] is the status)
    SubmitFailed(u16),
    /// Happens if anything goes wrong with parsing
    Parsing(String),
    DateTime(String),
    FileSystem(String),
    InvalidInput(String),
    /// The student hit Ctrl-C while a prompt was waiting for an answer
    Interrupted,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Invalid settings! ({e})"),
            Error::Rejected(rejection) => write!(f, "{rejection}"),
            Error::EmptyResult(e) => write!(f, "{e}"),
            Error::Network(e) => write!(f, "Network error! ({e})"),
            Error::FetchFailed(_) => write!(f, "Could not fetch file"),
            Error::SubmitFailed(_) => write!(f, "Failed to submit file"),
            Error::Parsing(e) => write!(f, "Parsing failed! ({e})"),
            Error::DateTime(e) => write!(f, "Invalid due date! ({e})"),
            Error::FileSystem(e) => write!(f, "File system error! ({e})"),
            Error::InvalidInput(e) => write!(f, "Invalid input! ({e})"),
            Error::Interrupted => write!(f, "Exiting..."),
        }
    }
}

impl std::error::Error for Error {}
