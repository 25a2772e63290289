//! Demo data for a fresh table.
//!
//! Creates one child, two quests, one reward and assigns the first quest,
//! going through the repository so every write is validated and guarded.

use chorequest_core::quest::{Assignment, Child, NewChild, NewQuest, NewReward, Quest, Reward};
use chorequest_core::storage::{ChoreRepository, EntityStore, Result};
use serde::Serialize;

/// Everything `seed` created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub parent_id: String,
    pub child: Child,
    pub quests: Vec<Quest>,
    pub reward: Reward,
    pub assignment: Assignment,
}

fn seed_quests(parent_id: &str) -> [NewQuest; 2] {
    [
        NewQuest::new(parent_id, "Clean Room", 50, 10).with_description("Tidy up and vacuum"),
        NewQuest::new(parent_id, "Do Dishes", 30, 8).with_description("Load and run dishwasher"),
    ]
}

/// Seeds the demo family under `parent_id`.
///
/// Every run creates fresh ids, so seeding twice yields two families.
pub async fn seed<S: EntityStore>(
    repo: &ChoreRepository<S>,
    parent_id: &str,
) -> Result<SeedReport> {
    tracing::info!(parent_id, "Seeding demo data");

    let child = repo.create_child(NewChild::new(parent_id, "Alex")).await?;

    let mut quests = Vec::new();
    for request in seed_quests(parent_id) {
        quests.push(repo.create_quest(request).await?);
    }

    let reward = repo
        .create_reward(NewReward::new(parent_id, "Movie Night", 200))
        .await?;

    let assignment = repo.assign_quest(quests[0].id, child.id).await?;

    tracing::info!(
        parent_id,
        child_id = %child.id,
        assignment_id = %assignment.id,
        "Seed complete"
    );

    Ok(SeedReport {
        parent_id: parent_id.to_string(),
        child,
        quests,
        reward,
        assignment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorequest_core::quest::AssignmentStatus;
    use chorequest_core::storage::InMemoryStore;

    #[tokio::test]
    async fn test_seed_creates_demo_family() {
        let repo = ChoreRepository::new(InMemoryStore::new());

        let report = seed(&repo, "parent-1").await.unwrap();

        let children = repo.list_children("parent-1").await.unwrap();
        assert_eq!(children, vec![report.child.clone()]);
        assert_eq!(children[0].name, "Alex");

        let mut titles: Vec<_> = repo
            .list_quests("parent-1")
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.title)
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["Clean Room", "Do Dishes"]);

        let rewards = repo.list_rewards("parent-1").await.unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].xp_threshold, 200);

        assert_eq!(report.assignment.quest.title, "Clean Room");
        assert_eq!(report.assignment.status, AssignmentStatus::Assigned);
        let assignments = repo
            .list_assignments_for_child(report.child.id)
            .await
            .unwrap();
        assert_eq!(assignments, vec![report.assignment]);
    }

    #[tokio::test]
    async fn test_seeded_assignment_can_be_completed() {
        let repo = ChoreRepository::new(InMemoryStore::new());
        let report = seed(&repo, "parent-1").await.unwrap();

        repo.complete_assignment(report.assignment.id).await.unwrap();

        let child = repo.get_child(report.child.id).await.unwrap();
        assert_eq!((child.xp, child.gold), (50, 10));
    }

    #[tokio::test]
    async fn test_seed_rejects_blank_parent() {
        let repo = ChoreRepository::new(InMemoryStore::new());
        assert!(seed(&repo, " ").await.is_err());
        assert!(repo.store().is_empty().await);
    }
}
