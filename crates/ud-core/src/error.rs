use crate::id::{ConnectorId, NodeId};
use std::fmt;

/// Which end of a relationship an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

/// Failure to build a connector. Nothing has been drawn when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The named endpoint node does not exist.
    UnresolvedEndpoint { endpoint: Endpoint, name: NodeId },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnresolvedEndpoint { endpoint, name } => {
                write!(f, "unresolved {endpoint} node '{name}'")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Failure of a registry operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    Build(BuildError),
    DuplicateNode(NodeId),
    UnknownNode(NodeId),
    DuplicateConnector(ConnectorId),
    UnknownConnector(ConnectorId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Build(err) => write!(f, "build failed: {err}"),
            RegistryError::DuplicateNode(name) => write!(f, "node '{name}' already exists"),
            RegistryError::UnknownNode(name) => write!(f, "no node named '{name}'"),
            RegistryError::DuplicateConnector(id) => write!(f, "{id} is already registered"),
            RegistryError::UnknownConnector(id) => write!(f, "{id} is not registered"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Build(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BuildError> for RegistryError {
    fn from(err: BuildError) -> Self {
        RegistryError::Build(err)
    }
}

/// Failure to encode or decode a diagram snapshot.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    MsgPackEncode(rmp_serde::encode::Error),
    MsgPackDecode(rmp_serde::decode::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Json(err) => write!(f, "json: {err}"),
            CodecError::MsgPackEncode(err) => write!(f, "msgpack encode: {err}"),
            CodecError::MsgPackDecode(err) => write!(f, "msgpack decode: {err}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Json(err) => Some(err),
            CodecError::MsgPackEncode(err) => Some(err),
            CodecError::MsgPackDecode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Json(err)
    }
}

impl From<rmp_serde::encode::Error> for CodecError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        CodecError::MsgPackEncode(err)
    }
}

impl From<rmp_serde::decode::Error> for CodecError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        CodecError::MsgPackDecode(err)
    }
}
