//! Rule-based tree analysis.
//!
//! Backs the chat endpoint when no local language model is reachable.
//! A query is classified into a [`ReportKind`] by priority-ordered
//! substring tests over the lowercased text, then rendered as a markdown
//! report over the tree snapshot. Every category copes with an absent
//! tree by returning a fixed instructive message; nothing here errors.

mod reports;

use crate::models::ProductTree;

/// The report categories the analyzer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Goals,
    Jobs,
    WorkItems,
    Priorities,
    Teams,
    /// Node-type and status breakdown of the whole tree.
    Structure,
    /// Advisory findings (missing fields, blockers, in-flight work).
    Suggestions,
    /// Status distribution with completion/blocked/active insights.
    Status,
    /// Generic "what I can do with your tree" prompt.
    TreeOverview,
    /// Catch-all capability listing for unrecognized queries.
    Help,
}

/// Map a free-text query to a report category.
///
/// First match wins, so "analyze goal status" is a goals report, not a
/// status report.
pub fn classify(query: &str) -> ReportKind {
    let q = query.to_lowercase();
    if q.contains("goal") {
        ReportKind::Goals
    } else if q.contains("job") || q.contains("epic") {
        ReportKind::Jobs
    } else if q.contains("work item") || q.contains("story") {
        ReportKind::WorkItems
    } else if q.contains("priority") {
        ReportKind::Priorities
    } else if q.contains("team") {
        ReportKind::Teams
    } else if q.contains("product tree") || q.contains("tree") {
        if q.contains("analyze") || q.contains("analysis") {
            ReportKind::Structure
        } else if q.contains("suggest") || q.contains("recommend") {
            ReportKind::Suggestions
        } else if q.contains("status") {
            ReportKind::Status
        } else {
            ReportKind::TreeOverview
        }
    } else {
        ReportKind::Help
    }
}

/// Render the report for `query` against an optional tree snapshot.
pub fn analyze(query: &str, tree: Option<&ProductTree>) -> String {
    match classify(query) {
        ReportKind::Goals => reports::goals(tree),
        ReportKind::Jobs => reports::jobs(tree),
        ReportKind::WorkItems => reports::work_items(tree),
        ReportKind::Priorities => reports::priorities(tree),
        ReportKind::Teams => reports::teams(tree),
        ReportKind::Structure => reports::structure(tree),
        ReportKind::Suggestions => reports::suggestions(tree),
        ReportKind::Status => reports::status(tree),
        ReportKind::TreeOverview => reports::tree_overview(tree),
        ReportKind::Help => reports::help(query),
    }
}

/// Count occurrences preserving the order of first appearance.
///
/// The goal and work-item breakdowns list statuses in the order they
/// first occur in the node list, so a sorted map is not enough here.
pub(crate) fn count_in_order<I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        let value = value.into();
        match counts.iter_mut().find(|(key, _)| *key == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
}

/// `in_progress` -> `In Progress`.
pub(crate) fn humanize(status: &str) -> String {
    status
        .replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Percentage of `count` over `total`. Callers guard against an empty
/// total before building any breakdown.
pub(crate) fn pct(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_priority_order() {
        assert_eq!(classify("show me my GOALS"), ReportKind::Goals);
        assert_eq!(classify("epic breakdown"), ReportKind::Jobs);
        assert_eq!(classify("list every story"), ReportKind::WorkItems);
        assert_eq!(classify("priority spread"), ReportKind::Priorities);
        assert_eq!(classify("team load"), ReportKind::Teams);
        // Goal outranks the tree branch even when both keywords appear.
        assert_eq!(classify("analyze goal status in the tree"), ReportKind::Goals);
    }

    #[test]
    fn tree_branch_sub_dispatch() {
        assert_eq!(classify("analyze my product tree"), ReportKind::Structure);
        assert_eq!(classify("tree analysis please"), ReportKind::Structure);
        assert_eq!(classify("suggest tree improvements"), ReportKind::Suggestions);
        assert_eq!(classify("recommend changes to the tree"), ReportKind::Suggestions);
        assert_eq!(classify("tree status"), ReportKind::Status);
        assert_eq!(classify("tell me about the tree"), ReportKind::TreeOverview);
        // "analyze" wins over "status" inside the tree branch.
        assert_eq!(classify("analyze tree status"), ReportKind::Structure);
    }

    #[test]
    fn unrecognized_queries_fall_through_to_help() {
        assert_eq!(classify("what's the weather"), ReportKind::Help);
    }

    #[test]
    fn humanize_title_cases_and_strips_underscores() {
        assert_eq!(humanize("in_progress"), "In Progress");
        assert_eq!(humanize("BLOCKED"), "Blocked");
        assert_eq!(humanize("unknown"), "Unknown");
    }

    #[test]
    fn count_in_order_keeps_first_appearance_order() {
        let counts = count_in_order(["b", "a", "b", "c", "a", "b"]);
        assert_eq!(
            counts,
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }
}
