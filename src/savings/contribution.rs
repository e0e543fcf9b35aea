//! The savings allocation engine: applying a contribution to a new or existing goal.
//!
//! The arithmetic lives in [start_goal], [top_up] and [rebaseline], which know
//! nothing about the database. [contribute] loads the goal, applies one of them
//! and writes the result back inside a single immediate transaction.

use std::fmt::Display;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    auth::UserID,
    html::format_currency,
    money::Money,
    savings::{
        GoalDetails, GoalId, SavingsGoal,
        db::{create_goal, delete_goal_by_name, get_goal, get_goal_by_name, update_goal},
    },
};

/// What a contribution should do.
#[derive(Debug, Clone, PartialEq)]
pub enum ContributionMode {
    /// Start a new goal, replacing any goal of the same name.
    CreateNew(GoalDetails),
    /// Add to the saved amount of an existing goal.
    AddToExisting(GoalId),
    /// Change a goal's details and set its saved amount to the contributed amount.
    Edit(GoalId, GoalDetails),
}

/// A request to contribute to a savings goal.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionRequest {
    /// Which goal to contribute to and how.
    pub mode: ContributionMode,
    /// The amount contributed, which must be positive.
    ///
    /// When editing, this is the new saved amount rather than an increment.
    pub amount_to_add: Money,
}

/// How a contribution was applied.
///
/// The `Display` implementation gives the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A goal was created with the full contribution.
    Created,
    /// A goal was created, but the contribution exceeded its target and only `needed` was kept.
    CreatedExcessIgnored {
        /// The target of the new goal.
        needed: Money,
    },
    /// The contribution was added and the goal is still active.
    Added,
    /// The contribution exactly completed the goal.
    Completed,
    /// The goal was completed and the rest of the contribution was not kept.
    CompletedExcessIgnored {
        /// The amount that was still needed before the contribution.
        needed: Money,
    },
    /// The goal was edited and is still active.
    Updated,
    /// The goal was edited and its saved amount was capped at the target.
    CappedToTarget,
}

impl Outcome {
    /// Whether less than the contributed amount was kept.
    pub fn was_capped(&self) -> bool {
        matches!(
            self,
            Outcome::CreatedExcessIgnored { .. }
                | Outcome::CompletedExcessIgnored { .. }
                | Outcome::CappedToTarget
        )
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Created => f.write_str("New savings goal created successfully."),
            Outcome::CreatedExcessIgnored { needed } => write!(
                f,
                "New goal created. Only {} needed; extra ignored.",
                format_currency(*needed)
            ),
            Outcome::Added => f.write_str("Amount added to existing goal."),
            Outcome::Completed => f.write_str("Goal completed!"),
            Outcome::CompletedExcessIgnored { needed } => write!(
                f,
                "Only {} was needed; goal completed!",
                format_currency(*needed)
            ),
            Outcome::Updated => f.write_str("Savings goal updated successfully."),
            Outcome::CappedToTarget => f.write_str("Goal reached! Amount capped to target."),
        }
    }
}

/// The goal after a contribution and how the contribution was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    /// The goal as it was saved.
    pub goal: SavingsGoal,
    /// How the contribution was applied.
    pub outcome: Outcome,
}

/// The saved amount of a new goal with target `target_amount`.
pub fn start_goal(target_amount: Money, amount_to_add: Money) -> (Money, Outcome) {
    if amount_to_add > target_amount {
        (
            target_amount,
            Outcome::CreatedExcessIgnored {
                needed: target_amount,
            },
        )
    } else {
        (amount_to_add, Outcome::Created)
    }
}

/// The saved amount of a goal after adding `amount_to_add`, capped at `target_amount`.
pub fn top_up(
    target_amount: Money,
    current_amount: Money,
    amount_to_add: Money,
) -> (Money, Outcome) {
    let needed = target_amount - current_amount;

    if amount_to_add > needed {
        (target_amount, Outcome::CompletedExcessIgnored { needed })
    } else if amount_to_add == needed {
        (target_amount, Outcome::Completed)
    } else {
        (current_amount + amount_to_add, Outcome::Added)
    }
}

/// The saved amount of an edited goal, which is `amount_to_add` capped at `target_amount`.
pub fn rebaseline(target_amount: Money, amount_to_add: Money) -> (Money, Outcome) {
    if amount_to_add >= target_amount {
        (target_amount, Outcome::CappedToTarget)
    } else {
        (amount_to_add, Outcome::Updated)
    }
}

/// Apply `request` to `owner`'s goals and save the result.
///
/// New goals are stamped with `now` as their creation time. Target dates
/// before `today` are rejected.
///
/// The goal is read and written inside one immediate transaction, so the write
/// lock is held from the read onwards and concurrent contributions to the same
/// goal cannot overwrite each other. Nothing is saved if an error is returned.
///
/// # Errors
///
/// Returns:
/// - [Error::NonPositiveAmount] if the amount to add or the target amount is not positive,
/// - [Error::PastTargetDate] if the target date is before `today`,
/// - [Error::MissingGoal] if the goal to add to or edit does not exist or belongs to another user,
/// - [Error::DuplicateGoalName] if an edit gives a goal the name of another of `owner`'s goals,
/// - [Error::SqlError] if there was an unexpected SQL error.
pub fn contribute(
    request: ContributionRequest,
    owner: UserID,
    now: OffsetDateTime,
    today: Date,
    connection: &Connection,
) -> Result<Contribution, Error> {
    validate_request(&request, today)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;
    let amount_to_add = request.amount_to_add;

    let contribution = match request.mode {
        ContributionMode::CreateNew(details) => {
            if let Some(replaced) = get_goal_by_name(owner, &details.name, &transaction)? {
                tracing::info!(
                    "Replacing savings goal {} \"{}\" of user {owner}",
                    replaced.id,
                    replaced.name
                );
                delete_goal_by_name(owner, &details.name, &transaction)?;
            }

            let (current_amount, outcome) = start_goal(details.target_amount, amount_to_add);
            let goal = create_goal(owner, &details, current_amount, now, &transaction)?;

            Contribution { goal, outcome }
        }
        ContributionMode::AddToExisting(goal_id) => {
            let mut goal = get_goal(owner, goal_id, &transaction)?;
            let (current_amount, outcome) =
                top_up(goal.target_amount, goal.current_amount, amount_to_add);
            goal.current_amount = current_amount;
            update_goal(&goal, &transaction)?;

            Contribution { goal, outcome }
        }
        ContributionMode::Edit(goal_id, details) => {
            let goal = get_goal(owner, goal_id, &transaction)?;
            let (current_amount, outcome) = rebaseline(details.target_amount, amount_to_add);
            let goal = SavingsGoal {
                name: details.name,
                target_amount: details.target_amount,
                current_amount,
                target_date: details.target_date,
                ..goal
            };
            update_goal(&goal, &transaction)?;

            Contribution { goal, outcome }
        }
    };

    transaction.commit()?;

    tracing::debug!(
        "Savings goal {} of user {owner}: {:?}",
        contribution.goal.id,
        contribution.outcome
    );

    Ok(contribution)
}

fn validate_request(request: &ContributionRequest, today: Date) -> Result<(), Error> {
    if !request.amount_to_add.is_positive() {
        return Err(Error::NonPositiveAmount(request.amount_to_add));
    }

    let details = match &request.mode {
        ContributionMode::CreateNew(details) | ContributionMode::Edit(_, details) => details,
        ContributionMode::AddToExisting(_) => return Ok(()),
    };

    if !details.target_amount.is_positive() {
        return Err(Error::NonPositiveAmount(details.target_amount));
    }

    if details.target_date < today {
        return Err(Error::PastTargetDate(details.target_date));
    }

    Ok(())
}
