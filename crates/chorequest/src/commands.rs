//! Executes parsed commands against a repository.

use chorequest_core::quest::{NewChild, NewQuest, NewReward};
use chorequest_core::storage::{ChoreRepository, EntityStore, Result};

use crate::cli::assignments::AssignmentsAction;
use crate::cli::children::ChildrenAction;
use crate::cli::quests::QuestsAction;
use crate::cli::rewards::RewardsAction;
use crate::cli::{Commands, OutputFormat};
use crate::output::{pretty, render};
use crate::seed;

/// Runs one command and returns its formatted output.
pub async fn execute<S: EntityStore>(
    repo: &ChoreRepository<S>,
    command: Commands,
    format: OutputFormat,
    default_seed_parent: &str,
) -> Result<String> {
    let output = match command {
        Commands::Children(cmd) => match cmd.action {
            ChildrenAction::Create { parent, name } => {
                let child = repo.create_child(NewChild::new(parent, name)).await?;
                render(&child, format, |c| format!("Created:\n{}", pretty::format_child(c)))
            }
            ChildrenAction::List { parent } => {
                let children = repo.list_children(&parent).await?;
                render(children.as_slice(), format, pretty::format_children)
            }
            ChildrenAction::Get { id } => {
                let child = repo.get_child(id).await?;
                render(&child, format, pretty::format_child)
            }
        },
        Commands::Quests(cmd) => match cmd.action {
            QuestsAction::Create {
                parent,
                title,
                description,
                xp,
                gold,
            } => {
                let mut request = NewQuest::new(parent, title, xp, gold);
                if let Some(description) = description {
                    request = request.with_description(description);
                }
                let quest = repo.create_quest(request).await?;
                render(&quest, format, |q| format!("Created:\n{}", pretty::format_quest(q)))
            }
            QuestsAction::List { parent } => {
                let quests = repo.list_quests(&parent).await?;
                render(quests.as_slice(), format, pretty::format_quests)
            }
            QuestsAction::Get { id } => {
                let quest = repo.get_quest_by_id(id).await?;
                render(&quest, format, pretty::format_quest)
            }
        },
        Commands::Rewards(cmd) => match cmd.action {
            RewardsAction::Create {
                parent,
                name,
                xp_threshold,
            } => {
                let reward = repo
                    .create_reward(NewReward::new(parent, name, xp_threshold))
                    .await?;
                render(&reward, format, |r| {
                    format!("Created:\n{}", pretty::format_reward(r))
                })
            }
            RewardsAction::List { parent } => {
                let rewards = repo.list_rewards(&parent).await?;
                render(rewards.as_slice(), format, pretty::format_rewards)
            }
            RewardsAction::Unlocked { child } => {
                let rewards = repo.list_unlocked_rewards(child).await?;
                render(rewards.as_slice(), format, pretty::format_rewards)
            }
        },
        Commands::Assignments(cmd) => match cmd.action {
            AssignmentsAction::Assign { quest, child } => {
                let assignment = repo.assign_quest(quest, child).await?;
                render(&assignment, format, |a| {
                    format!("Assigned:\n{}", pretty::format_assignment(a))
                })
            }
            AssignmentsAction::List { child, quest } => {
                let assignments = match (child, quest) {
                    (Some(child), _) => repo.list_assignments_for_child(child).await?,
                    (None, Some(quest)) => repo.list_assignments_for_quest(quest).await?,
                    (None, None) => Vec::new(),
                };
                render(assignments.as_slice(), format, pretty::format_assignments)
            }
            AssignmentsAction::Get { child, id } => {
                let assignment = repo.get_assignment(child, id).await?;
                render(&assignment, format, pretty::format_assignment)
            }
            AssignmentsAction::Complete { id } => {
                let assignment = repo.complete_assignment(id).await?;
                render(&assignment, format, |a| {
                    format!("Completed:\n{}", pretty::format_assignment(a))
                })
            }
        },
        Commands::Purchase { child, item, price } => {
            let updated = repo.purchase_item(child, &item, price).await?;
            render(&updated, format, |c| {
                format!("Purchased {} for {} gold\n{}", item, price, pretty::format_child(c))
            })
        }
        Commands::Seed { parent } => {
            let parent = parent.unwrap_or_else(|| default_seed_parent.to_string());
            let report = seed::seed(repo, &parent).await?;
            render(&report, format, pretty::format_seed_report)
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use chorequest_core::quest::Child;
    use chorequest_core::storage::{InMemoryStore, RepositoryError};
    use clap::Parser;

    async fn run(repo: &ChoreRepository<InMemoryStore>, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("chorequest").chain(args.iter().copied()))
            .unwrap();
        execute(repo, cli.command, cli.format, "parent-1").await
    }

    #[tokio::test]
    async fn test_create_child_as_json() {
        let repo = ChoreRepository::new(InMemoryStore::new());

        let output = run(
            &repo,
            &["--format", "json", "children", "create", "--parent", "p", "--name", "Alex"],
        )
        .await
        .unwrap();

        let child: Child = serde_json::from_str(&output).unwrap();
        assert_eq!(child.name, "Alex");
        assert_eq!(repo.list_children("p").await.unwrap(), vec![child]);
    }

    #[tokio::test]
    async fn test_seed_uses_default_parent() {
        let repo = ChoreRepository::new(InMemoryStore::new());

        let output = run(&repo, &["seed"]).await.unwrap();

        assert!(output.starts_with("Seeded parent parent-1"));
        assert_eq!(repo.list_quests("parent-1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_purchase_error_is_returned() {
        let repo = ChoreRepository::new(InMemoryStore::new());
        let child = repo
            .create_child(NewChild::new("parent-1", "Alex"))
            .await
            .unwrap();
        let id = child.id.to_string();

        let result = run(
            &repo,
            &["purchase", "--child", &id, "--item", "Ice Cream", "--price", "15"],
        )
        .await;

        assert!(matches!(
            result,
            Err(RepositoryError::InsufficientFunds { price_gold: 15, .. })
        ));
    }

    #[tokio::test]
    async fn test_list_assignments_by_quest() {
        let repo = ChoreRepository::new(InMemoryStore::new());
        let report = seed::seed(&repo, "parent-1").await.unwrap();
        let quest = report.assignment.quest.id.to_string();

        let output = run(&repo, &["assignments", "list", "--quest", &quest])
            .await
            .unwrap();

        assert!(output.starts_with("ASSIGNMENTS (1)"));
    }
}
