use std::fmt::{self, Debug, Display};
use std::io;

use crate::network::NodeId;

/// Provides `NetSirError` and maps other errors to it
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum NetSirError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    /// The report destination is unusable.
    ReportError(String),
    /// Invalid parameters or selections. Raised before any simulation work starts.
    ConfigError(String),
    /// A node removal was requested on a graph with no nodes left.
    EmptyGraph,
    UnknownNode(NodeId),
    CannotMakeEdgeToSelf,
    EdgeAlreadyExists,
}

impl NetSirError {
    /// Convenience constructor for configuration errors.
    pub fn config(message: impl Into<String>) -> Self {
        NetSirError::ConfigError(message.into())
    }

    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, NetSirError::ConfigError(_))
    }
}

impl From<io::Error> for NetSirError {
    fn from(error: io::Error) -> Self {
        NetSirError::IoError(error)
    }
}

impl From<serde_json::Error> for NetSirError {
    fn from(error: serde_json::Error) -> Self {
        NetSirError::JsonError(error)
    }
}

impl From<csv::Error> for NetSirError {
    fn from(error: csv::Error) -> Self {
        NetSirError::CSVError(error)
    }
}

impl std::error::Error for NetSirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetSirError::IoError(e) => Some(e),
            NetSirError::JsonError(e) => Some(e),
            NetSirError::CSVError(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for NetSirError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetSirError::IoError(e) => write!(f, "I/O error: {e}"),
            NetSirError::JsonError(e) => write!(f, "invalid JSON configuration: {e}"),
            NetSirError::CSVError(e) => write!(f, "CSV error: {e}"),
            NetSirError::ReportError(message) => write!(f, "report error: {message}"),
            NetSirError::ConfigError(message) => write!(f, "configuration error: {message}"),
            NetSirError::EmptyGraph => write!(f, "cannot remove a node from an empty graph"),
            NetSirError::UnknownNode(node) => write!(f, "node {node} is not in the graph"),
            NetSirError::CannotMakeEdgeToSelf => write!(f, "self-loops are not allowed"),
            NetSirError::EdgeAlreadyExists => write!(f, "edge already exists"),
        }
    }
}
