//! Markdown report renderers, one per [`super::ReportKind`].
//!
//! All percentages are over the filtered set and rendered with one
//! decimal digit. Filtered reports return an early "none found" message
//! on an empty set, so no renderer ever divides by zero.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::models::{NodeKind, ProductTree};

use super::{count_in_order, humanize, pct};

const EMPTY_TREE: &str = "Your product tree appears to be empty. Consider adding some products, \
     goals, and work items to get started.";

pub fn structure(tree: Option<&ProductTree>) -> String {
    let Some(tree) = tree else {
        return "I'd be happy to analyze your product tree! Please import a Product Tree \
                XML file first so I can provide specific insights."
            .to_string();
    };
    if tree.nodes.is_empty() {
        return EMPTY_TREE.to_string();
    }

    let total = tree.nodes.len();
    let mut out = String::from("## Product Tree Analysis\n\n");
    let _ = writeln!(out, "**Total Nodes:** {}", total);

    let kind_counts = |kind: NodeKind| tree.nodes_of_kind(kind).len();
    let parts: Vec<String> = [
        (NodeKind::Product, "products"),
        (NodeKind::Goal, "goals"),
        (NodeKind::Job, "jobs"),
        (NodeKind::WorkItem, "work items"),
    ]
    .iter()
    .filter_map(|(kind, label)| {
        let count = kind_counts(*kind);
        (count > 0).then(|| format!("{} {}", count, label))
    })
    .collect();
    let _ = writeln!(out, "**Structure:** {}", parts.join(", "));
    out.push('\n');

    let status_counts = count_in_order(tree.nodes.iter().map(|n| n.status_or_unknown()));
    if !status_counts.is_empty() {
        out.push_str("**Status Distribution:**\n");
        for (status, count) in &status_counts {
            let _ = writeln!(
                out,
                "- {}: {} ({:.1}%)",
                humanize(status),
                count,
                pct(*count, total)
            );
        }
    }

    out
}

pub fn suggestions(tree: Option<&ProductTree>) -> String {
    let Some(tree) = tree else {
        return "To provide improvement suggestions, please import a Product Tree XML \
                file first."
            .to_string();
    };
    if tree.nodes.is_empty() {
        return EMPTY_TREE.to_string();
    }

    let mut out = String::from("## Improvement Suggestions\n\n");
    let empty = out.len();

    let missing_descriptions = tree.nodes.iter().filter(|n| !n.has_description()).count();
    if missing_descriptions > 0 {
        let _ = write!(
            out,
            "**📝 Add Descriptions:** {} nodes are missing descriptions. Adding clear \
             descriptions helps team members understand the purpose and scope of each item.\n\n",
            missing_descriptions
        );
    }

    let missing_priorities = tree.nodes.iter().filter(|n| !n.has_priority()).count();
    if missing_priorities > 0 {
        let _ = write!(
            out,
            "**⚡ Set Priorities:** {} nodes don't have priority levels. Consider setting \
             P0 (critical), P1 (high), P2 (medium), or P3 (low) priorities.\n\n",
            missing_priorities
        );
    }

    let missing_teams = tree.nodes.iter().filter(|n| !n.has_team()).count();
    if missing_teams > 0 {
        let _ = write!(
            out,
            "**👥 Assign Teams:** {} nodes don't have assigned teams. Assigning teams \
             helps with accountability and resource planning.\n\n",
            missing_teams
        );
    }

    let blocked = tree
        .nodes
        .iter()
        .filter(|n| n.status_or_unknown() == "blocked")
        .count();
    if blocked > 0 {
        let _ = write!(
            out,
            "**🚫 Address Blockers:** {} items are currently blocked. Review these items \
             and identify actions to unblock them.\n\n",
            blocked
        );
    }

    let in_progress = tree
        .nodes
        .iter()
        .filter(|n| matches!(n.status_or_unknown(), "in_progress" | "active"))
        .count();
    if in_progress > 0 {
        let _ = write!(
            out,
            "**🔄 Monitor Progress:** {} items are currently in progress. Regular status \
             updates help keep stakeholders informed.\n\n",
            in_progress
        );
    }

    if out.len() == empty {
        out.push_str(
            "**✅ Great job!** Your product tree looks well-structured. Consider regular \
             reviews to keep it updated and aligned with your goals.",
        );
    }

    out
}

pub fn status(tree: Option<&ProductTree>) -> String {
    let Some(tree) = tree else {
        return "Please import a Product Tree XML file to analyze status distribution."
            .to_string();
    };
    if tree.nodes.is_empty() {
        return EMPTY_TREE.to_string();
    }

    let total = tree.nodes.len();
    let mut status_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &tree.nodes {
        *status_counts.entry(node.status_or_unknown()).or_default() += 1;
    }

    let mut out = String::from("## Status Analysis\n\n");
    for (status, count) in &status_counts {
        let _ = writeln!(
            out,
            "**{}:** {} items ({:.1}%)",
            humanize(status),
            count,
            pct(*count, total)
        );
    }

    out.push_str("\n**Insights:**\n");
    if let Some(&completed) = status_counts.get("completed") {
        let _ = writeln!(out, "- Completion rate: {:.1}%", pct(completed, total));
    }
    if let Some(&blocked) = status_counts.get("blocked") {
        let _ = writeln!(
            out,
            "- Blocked items: {:.1}% (consider addressing blockers)",
            pct(blocked, total)
        );
    }
    if let Some(&in_progress) = status_counts.get("in_progress") {
        let _ = writeln!(out, "- Active work: {:.1}%", pct(in_progress, total));
    }

    out
}

pub fn goals(tree: Option<&ProductTree>) -> String {
    let Some(tree) = tree else {
        return "Please import a Product Tree XML file to analyze goals.".to_string();
    };
    let goals = tree.nodes_of_kind(NodeKind::Goal);
    if goals.is_empty() {
        return "No goals found in your product tree. Consider adding strategic goals to \
                guide your product development."
            .to_string();
    }

    let mut out = String::from("## Goals Analysis\n\n");
    let _ = write!(out, "**Total Goals:** {}\n\n", goals.len());

    out.push_str("**Goal Status:**\n");
    for (status, count) in count_in_order(goals.iter().map(|g| g.status_or_unknown())) {
        let _ = writeln!(
            out,
            "- {}: {} ({:.1}%)",
            humanize(&status),
            count,
            pct(count, goals.len())
        );
    }

    let without_description = goals.iter().filter(|g| !g.has_description()).count();
    if without_description > 0 {
        let _ = writeln!(
            out,
            "\n**⚠️ Goals without descriptions:** {}",
            without_description
        );
        out.push_str(
            "Consider adding clear descriptions to help team members understand the \
             goal's purpose and success criteria.\n",
        );
    }

    out
}

pub fn jobs(tree: Option<&ProductTree>) -> String {
    let Some(tree) = tree else {
        return "Please import a Product Tree XML file to analyze jobs/epics.".to_string();
    };
    let jobs = tree.nodes_of_kind(NodeKind::Job);
    if jobs.is_empty() {
        return "No jobs/epics found in your product tree. Consider breaking down goals \
                into specific jobs/epics."
            .to_string();
    }

    let mut out = String::from("## Jobs/Epics Analysis\n\n");
    let _ = write!(out, "**Total Jobs/Epics:** {}\n\n", jobs.len());

    // A job only counts as estimated when its estimate parses as a number;
    // a present-but-garbage value is treated the same as a missing one.
    let estimates: Vec<f64> = jobs.iter().filter_map(|j| j.effort_estimate()).collect();
    if !estimates.is_empty() {
        let _ = writeln!(
            out,
            "**Jobs with effort estimates:** {}/{}",
            estimates.len(),
            jobs.len()
        );
        let total_effort: f64 = estimates.iter().sum();
        if total_effort > 0.0 {
            let _ = writeln!(out, "**Total estimated effort:** {} story points", total_effort);
        }
    } else {
        out.push_str(
            "**⚠️ No effort estimates found.** Consider adding story point estimates to \
             help with planning and resource allocation.\n",
        );
    }

    let with_content = jobs.iter().filter(|j| j.has_job_content()).count();
    let _ = writeln!(
        out,
        "\n**Jobs with detailed content:** {}/{}",
        with_content,
        jobs.len()
    );
    if with_content < jobs.len() {
        out.push_str(
            "Consider adding detailed job content (user stories, acceptance criteria) to \
             help developers understand requirements.\n",
        );
    }

    out
}

pub fn work_items(tree: Option<&ProductTree>) -> String {
    let Some(tree) = tree else {
        return "Please import a Product Tree XML file to analyze work items/stories."
            .to_string();
    };
    let items = tree.nodes_of_kind(NodeKind::WorkItem);
    if items.is_empty() {
        return "No work items/stories found in your product tree. Consider breaking down \
                jobs/epics into specific work items."
            .to_string();
    }

    let mut out = String::from("## Work Items/Stories Analysis\n\n");
    let _ = write!(out, "**Total Work Items:** {}\n\n", items.len());

    out.push_str("**Status Distribution:**\n");
    for (status, count) in count_in_order(items.iter().map(|i| i.status_or_unknown())) {
        let _ = writeln!(
            out,
            "- {}: {} ({:.1}%)",
            humanize(&status),
            count,
            pct(count, items.len())
        );
    }

    // Only worth showing when someone other than the fallback
    // "Unassigned" team holds work.
    let team_counts = count_in_order(items.iter().map(|i| i.team_or_unassigned()));
    if team_counts.len() > 1 {
        out.push_str("\n**Team Distribution:**\n");
        for (team, count) in &team_counts {
            let _ = writeln!(out, "- {}: {} ({:.1}%)", team, count, pct(*count, items.len()));
        }
    }

    out
}

pub fn priorities(tree: Option<&ProductTree>) -> String {
    let Some(tree) = tree else {
        return "Please import a Product Tree XML file to analyze priorities.".to_string();
    };
    if tree.nodes.is_empty() {
        return EMPTY_TREE.to_string();
    }

    let total = tree.nodes.len();
    let count_of = |priority: &str| {
        tree.nodes
            .iter()
            .filter(|n| n.priority_or_unset() == priority)
            .count()
    };

    let mut out = String::from("## Priority Analysis\n\n");
    for priority in ["P0", "P1", "P2", "P3", "Unset"] {
        let count = count_of(priority);
        if count > 0 {
            let _ = writeln!(
                out,
                "**{}:** {} items ({:.1}%)",
                priority,
                count,
                pct(count, total)
            );
        }
    }

    let high_priority = count_of("P0") + count_of("P1");
    if high_priority > 0 {
        let _ = writeln!(
            out,
            "\n**High Priority Items (P0+P1):** {} ({:.1}%)",
            high_priority,
            pct(high_priority, total)
        );
    }

    let unset = count_of("Unset");
    if unset > 0 {
        let _ = writeln!(out, "\n**⚠️ Items without priorities:** {}", unset);
        out.push_str(
            "Consider setting priorities to help with resource allocation and planning.\n",
        );
    }

    out
}

pub fn teams(tree: Option<&ProductTree>) -> String {
    let Some(tree) = tree else {
        return "Please import a Product Tree XML file to analyze team distribution."
            .to_string();
    };
    if tree.nodes.is_empty() {
        return EMPTY_TREE.to_string();
    }

    let total = tree.nodes.len();
    let mut team_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &tree.nodes {
        *team_counts.entry(node.team_or_unassigned()).or_default() += 1;
    }

    let mut out = String::from("## Team Analysis\n\n");
    for (team, count) in &team_counts {
        let _ = writeln!(out, "**{}:** {} items ({:.1}%)", team, count, pct(*count, total));
    }

    if let Some(&unassigned) = team_counts.get("Unassigned") {
        let _ = writeln!(
            out,
            "\n**⚠️ Unassigned items:** {} ({:.1}%)",
            unassigned,
            pct(unassigned, total)
        );
        out.push_str(
            "Consider assigning teams to improve accountability and resource planning.\n",
        );
    }

    out
}

pub fn tree_overview(tree: Option<&ProductTree>) -> String {
    match tree {
        None => "I'm here to help you manage your product tree! Import a Product Tree XML \
                 file and I can provide insights, suggestions, and analysis."
            .to_string(),
        Some(_) => "I can help you analyze your product tree structure, suggest \
                    improvements, and provide insights about your goals, jobs, and work \
                    items. What would you like to know?"
            .to_string(),
    }
}

pub fn help(query: &str) -> String {
    format!(
        "I understand you're asking about: '{}'. I'm specialized in product tree \
         management and can help you with:\n\n- Analyzing your product tree structure\n\
         - Suggesting improvements\n- Reviewing status and priorities\n- Team \
         distribution analysis\n- Goal and job analysis\n\nPlease import a Product Tree \
         XML file first, then ask me specific questions about your product tree!",
        query
    )
}
