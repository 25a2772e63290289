//! Pretty output formatting.

use chorequest_core::quest::{Assignment, Child, Quest, Reward};

use crate::seed::SeedReport;

/// Format a child for display.
pub fn format_child(child: &Child) -> String {
    format!(
        "{}\n  ID: {}\n  Parent: {}\n  XP: {}  Gold: {}",
        child.name, child.id, child.parent_id, child.xp, child.gold
    )
}

/// Format a quest for display.
pub fn format_quest(quest: &Quest) -> String {
    let mut output = format!(
        "{} [+{} XP, +{} gold]\n  ID: {}",
        quest.title, quest.xp_reward, quest.gold_reward, quest.id
    );
    if let Some(desc) = &quest.description {
        output.push_str(&format!("\n  Description: {}", desc));
    }
    output
}

pub fn format_reward(reward: &Reward) -> String {
    format!(
        "{} (unlocks at {} XP)\n  ID: {}",
        reward.name, reward.xp_threshold, reward.id
    )
}

/// Format an assignment for display.
pub fn format_assignment(assignment: &Assignment) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Child: {}\n  Assigned: {}",
        assignment.quest.title,
        assignment.status,
        assignment.id,
        assignment.child_id,
        assignment.created_at.to_rfc3339()
    );
    if let Some(completed_at) = assignment.completed_at {
        output.push_str(&format!("\n  Completed: {}", completed_at.to_rfc3339()));
    }
    output
}

pub fn format_children(children: &[Child]) -> String {
    format_list("CHILDREN", "No children found.", children, format_child)
}

pub fn format_quests(quests: &[Quest]) -> String {
    format_list("QUESTS", "No quests found.", quests, format_quest)
}

pub fn format_rewards(rewards: &[Reward]) -> String {
    format_list("REWARDS", "No rewards found.", rewards, format_reward)
}

pub fn format_assignments(assignments: &[Assignment]) -> String {
    format_list(
        "ASSIGNMENTS",
        "No assignments found.",
        assignments,
        format_assignment,
    )
}

/// Format the result of `seed`.
pub fn format_seed_report(report: &SeedReport) -> String {
    let mut output = format!("Seeded parent {}\n", report.parent_id);
    output.push_str(&"-".repeat(40));
    output.push_str(&format!("\n{}\n", format_child(&report.child)));
    for quest in &report.quests {
        output.push_str(&format!("\n{}\n", format_quest(quest)));
    }
    output.push_str(&format!("\n{}\n", format_reward(&report.reward)));
    output.push_str(&format!("\n{}", format_assignment(&report.assignment)));
    output
}

fn format_list<T>(title: &str, empty: &str, items: &[T], format: fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let mut output = format!("{} ({})\n", title, items.len());
    output.push_str(&"-".repeat(40));
    for item in items {
        output.push_str(&format!("\n{}", format(item)));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_children(&[]), "No children found.");
        assert_eq!(format_assignments(&[]), "No assignments found.");
    }

    #[test]
    fn test_format_quest_includes_description() {
        let quest =
            Quest::new("parent-1", "Clean Room", 50, 10).with_description("Tidy up and vacuum");
        let output = format_quest(&quest);

        assert!(output.starts_with("Clean Room [+50 XP, +10 gold]"));
        assert!(output.contains("Description: Tidy up and vacuum"));
    }

    #[test]
    fn test_format_assignment_shows_status() {
        let quest = Quest::new("parent-1", "Do Dishes", 30, 8);
        let assignment = Assignment::new(uuid::Uuid::new_v4(), quest, chrono::Utc::now());

        let output = format_assignment(&assignment);
        assert!(output.starts_with("Do Dishes [ASSIGNED]"));
        assert!(!output.contains("Completed:"));
    }
}
