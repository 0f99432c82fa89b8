use serde::{Deserialize, Serialize};

/// A single entry in the product tree.
///
/// Nodes arrive from imported snapshots and are never validated beyond
/// field presence: absent fields normalize to sentinel defaults
/// (`unknown` status, `Unassigned` team, `Unset` priority) at read time
/// rather than rejecting the node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Open string in practice; the analyzer only recognizes the
    /// [`NodeKind`] set.
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Present only on `job`-typed nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_data: Option<JobData>,
}

/// Extra payload carried by job (epic) nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobData {
    /// Numeric-as-string story point estimate. Unparsable values are
    /// skipped during aggregation, never an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_content: Option<String>,
}

/// The node kinds the analyzer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Product,
    Goal,
    Job,
    WorkItem,
}

impl NodeKind {
    /// Parse a raw type string. `work` is accepted as an alias for
    /// `work_item`; anything else is unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "product" => Some(Self::Product),
            "goal" => Some(Self::Goal),
            "job" => Some(Self::Job),
            "work_item" | "work" => Some(Self::WorkItem),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Goal => "goal",
            Self::Job => "job",
            Self::WorkItem => "work_item",
        }
    }
}

impl Node {
    pub fn kind(&self) -> Option<NodeKind> {
        NodeKind::parse(&self.node_type)
    }

    /// Status with the absent case normalized to `unknown`.
    pub fn status_or_unknown(&self) -> &str {
        match self.status.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "unknown",
        }
    }

    /// Priority with the absent case normalized to `Unset`.
    pub fn priority_or_unset(&self) -> &str {
        match self.priority.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "Unset",
        }
    }

    /// Team with the absent case normalized to `Unassigned`.
    pub fn team_or_unassigned(&self) -> &str {
        match self.team.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "Unassigned",
        }
    }

    pub fn has_description(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
    }

    pub fn has_priority(&self) -> bool {
        self.priority.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn has_team(&self) -> bool {
        self.team.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Effort estimate parsed as a number, if the node carries one.
    pub fn effort_estimate(&self) -> Option<f64> {
        self.job_data
            .as_ref()
            .and_then(|d| d.effort_estimate.as_deref())
            .and_then(|e| e.trim().parse::<f64>().ok())
    }

    pub fn has_job_content(&self) -> bool {
        self.job_data
            .as_ref()
            .and_then(|d| d.job_content.as_deref())
            .is_some_and(|c| !c.is_empty())
    }
}
