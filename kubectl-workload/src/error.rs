use std::fmt;

use thiserror::Error;

use crate::workload::WorkloadKind;

/// Errors surfaced by a [`Cluster`](crate::cluster::Cluster) implementation.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: String, name: String },

    #[error("{kind} \"{name}\" already exists")]
    AlreadyExists { kind: String, name: String },

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("{0}")]
    Other(String),
}

impl ApiError {
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn already_exists(
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::AlreadyExists {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A single failed lookup of an explicitly named workload.
#[derive(Debug)]
pub struct FetchFailure {
    pub kind: WorkloadKind,
    pub name: String,
    pub source: ApiError,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.name, self.source)
    }
}

#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("{0}")]
    Usage(String),

    #[error("Error processing the request: {}", join_failures(.0))]
    Fetch(Vec<FetchFailure>),

    #[error("Error listing {kind}s: {source}")]
    List {
        kind: WorkloadKind,
        #[source]
        source: ApiError,
    },

    #[error("Error accessing snapshot record in namespace {namespace}: {source}")]
    Snapshot {
        namespace: String,
        #[source]
        source: ApiError,
    },

    #[error("Snapshot entry {key} is not valid: {source}")]
    CorruptSnapshot {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Snapshot entry {key} holds invalid scale {scale}")]
    InvalidScale { key: String, scale: i64 },

    #[error(
        "No saved scale for {kind} {name}: it was never stopped with kubectl-workload"
    )]
    MissingSnapshot { kind: WorkloadKind, name: String },

    #[error("Error updating the {kind} {name}: {source}")]
    Scale {
        kind: WorkloadKind,
        name: String,
        #[source]
        source: ApiError,
    },

    #[error("Output error: {0}")]
    Output(String),
}

impl WorkloadError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Process exit code for this error. Every failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

fn join_failures(failures: &[FetchFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = WorkloadError> = std::result::Result<T, E>;
