//! Core savings goal types and the values derived from them.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, auth::UserID, money::Money};

/// Database identifier for a savings goal.
pub type GoalId = i64;

/// A validated, non-empty savings goal name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct GoalName(String);

impl GoalName {
    /// Create a goal name with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyGoalName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyGoalName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a goal name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for GoalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for GoalName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalName::new(s)
    }
}

impl Display for GoalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a goal still needs contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    /// Less than the target has been saved.
    Active,
    /// The saved amount equals the target.
    Complete,
}

impl Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalStatus::Active => f.write_str("Active"),
            GoalStatus::Complete => f.write_str("Complete"),
        }
    }
}

/// The user-editable fields of a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDetails {
    /// What the user is saving for.
    pub name: GoalName,
    /// How much the user wants to save, always positive.
    pub target_amount: Money,
    /// When the user wants to reach the target.
    pub target_date: Date,
}

/// A named amount of money a user is saving towards.
///
/// `current_amount` never exceeds `target_amount`: contributions beyond the
/// target are ignored rather than stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsGoal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The user the goal belongs to.
    pub owner: UserID,
    /// What the user is saving for, unique among the owner's goals.
    pub name: GoalName,
    /// How much the user wants to save.
    pub target_amount: Money,
    /// How much has been saved so far.
    pub current_amount: Money,
    /// When the user wants to reach the target.
    pub target_date: Date,
    /// When the goal was created, in UTC.
    pub created_at: OffsetDateTime,
}

impl SavingsGoal {
    /// The whole percentage of the target that has been saved, from 0 to 100.
    ///
    /// A goal with a zero target has made no progress.
    pub fn progress_percentage(&self) -> u8 {
        progress_percentage(self.current_amount, self.target_amount)
    }

    /// The number of days from `today` until the target date, negative once the date has passed.
    pub fn days_remaining(&self, today: Date) -> i64 {
        (self.target_date - today).whole_days()
    }

    /// Whether the goal has reached its target.
    pub fn status(&self) -> GoalStatus {
        if self.current_amount < self.target_amount {
            GoalStatus::Active
        } else {
            GoalStatus::Complete
        }
    }

    /// How much more must be saved to reach the target.
    pub fn amount_needed(&self) -> Money {
        self.target_amount - self.current_amount
    }
}

/// `saved` as a whole percentage of `target`, rounded down and clamped to [0, 100].
pub(crate) fn progress_percentage(saved: Money, target: Money) -> u8 {
    if target.cents() == 0 {
        return 0;
    }

    let percentage = i128::from(saved.cents()) * 100 / i128::from(target.cents());

    // Clamped to [0, 100] so the cast cannot truncate.
    percentage.clamp(0, 100) as u8
}

/// The combined progress of all of a user's goals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SavingsTotals {
    /// The sum of every goal's target.
    pub total_target: Money,
    /// The sum of every goal's saved amount.
    pub total_saved: Money,
    /// How much is left to save across all goals, never negative.
    pub remaining: Money,
}

impl SavingsTotals {
    /// Build the totals from the summed targets and saved amounts.
    pub fn new(total_target: Money, total_saved: Money) -> Self {
        let remaining = if total_saved < total_target {
            total_target - total_saved
        } else {
            Money::ZERO
        };

        Self {
            total_target,
            total_saved,
            remaining,
        }
    }
}

#[cfg(test)]
mod goal_name_tests {
    use crate::{Error, savings::GoalName};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(GoalName::new(""), Err(Error::EmptyGoalName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(GoalName::new("\n\t \r"), Err(Error::EmptyGoalName));
    }

    #[test]
    fn new_trims_name() {
        assert_eq!(GoalName::new("  Holiday ").unwrap().as_ref(), "Holiday");
    }
}
