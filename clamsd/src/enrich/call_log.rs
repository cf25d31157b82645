use std::fmt;
use crate::mist::ApiError;

/// Which step of a search issued a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    ClientSearch,
    ApLookup,
}

impl CallKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ClientSearch => "Client Search API",
            Self::ApLookup => "AP Lookup API",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Ok,
    /// The call itself failed
    Failed { kind: &'static str, message: String },
    /// The call succeeded but yielded no usable AP name
    Unresolved(String),
}

impl CallOutcome {
    pub fn from_error(err: &ApiError) -> Self {
        Self::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Failed { kind, message } => write!(f, "failed ({}): {}", kind, message),
            Self::Unresolved(reason) => write!(f, "unresolved: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallLogEntry {
    pub kind: CallKind,
    pub url: String,
    pub outcome: CallOutcome,
}

/// Every outbound URL of one request cycle, in call order
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Vec<CallLogEntry>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: CallKind, url: &str, outcome: CallOutcome) {
        self.entries.push(CallLogEntry {
            kind,
            url: url.to_string(),
            outcome,
        });
    }

    /// Replace the outcome of the most recent call
    pub fn amend_last(&mut self, outcome: CallOutcome) {
        if let Some(entry) = self.entries.last_mut() {
            entry.outcome = outcome;
        }
    }

    pub fn entries(&self) -> &[CallLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}
