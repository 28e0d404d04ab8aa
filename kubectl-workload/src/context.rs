use tracing::warn;

use crate::error::{Result, WorkloadError};
use crate::workload::{UnknownKind, WorkloadKind};

/// What to do with the selected workloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Print the current state only.
    List,
    /// Save the current scale, then scale to zero.
    Stop,
    /// Restore the saved scale.
    Start,
}

impl Action {
    pub fn from_flags(stop: bool, start: bool) -> Result<Self> {
        match (stop, start) {
            (true, true) => Err(WorkloadError::usage(
                "Only one of --stop / --start is possible at a time",
            )),
            (true, false) => Ok(Action::Stop),
            (false, true) => Ok(Action::Start),
            (false, false) => Ok(Action::List),
        }
    }
}

/// Which workloads a command targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Named {
        kind: WorkloadKind,
        names: Vec<String>,
    },
    /// Every deployment, then every statefulset, in the namespace.
    AllKinds,
}

impl Selection {
    /// Resolve positional `KIND NAME...` targets.
    pub fn from_targets(all_kinds: bool, targets: &[String]) -> Result<Self> {
        if all_kinds {
            if !targets.is_empty() {
                warn!(?targets, "--all-kinds is set, ignoring targets");
            }
            return Ok(Selection::AllKinds);
        }
        let (kind, names) = targets.split_first().ok_or_else(|| {
            WorkloadError::usage(
                "No argument provided and --all-kinds is not set. Nothing to do.",
            )
        })?;
        let kind: WorkloadKind = kind
            .parse()
            .map_err(|e: UnknownKind| WorkloadError::usage(e.to_string()))?;
        if names.is_empty() {
            return Err(WorkloadError::usage(format!(
                "No {kind} name specified. Nothing to do"
            )));
        }
        Ok(Selection::Named {
            kind,
            names: names.to_vec(),
        })
    }
}

/// Request-scoped state threaded through every operation.
pub struct WorkloadContext<C> {
    pub cluster: C,
    pub namespace: String,
    pub action: Action,
    pub selection: Selection,
}

impl<C> WorkloadContext<C> {
    pub fn new(
        cluster: C,
        namespace: impl Into<String>,
        action: Action,
        selection: Selection,
    ) -> Self {
        Self {
            cluster,
            namespace: namespace.into(),
            action,
            selection,
        }
    }
}

/// Validated command line input, built before any API call is made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkloadRequest {
    pub namespace: String,
    pub action: Action,
    pub selection: Selection,
}

impl WorkloadRequest {
    pub fn new(
        namespace: impl Into<String>,
        all_kinds: bool,
        stop: bool,
        start: bool,
        targets: &[String],
    ) -> Result<Self> {
        let action = Action::from_flags(stop, start)?;
        let selection = Selection::from_targets(all_kinds, targets)?;
        Ok(Self {
            namespace: namespace.into(),
            action,
            selection,
        })
    }

    pub fn into_context<C>(self, cluster: C) -> WorkloadContext<C> {
        WorkloadContext::new(
            cluster,
            self.namespace,
            self.action,
            self.selection,
        )
    }
}
