//! Savings goals and the engine that applies contributions to them.
//!
//! A contribution either starts a new goal, tops up an existing one or, when
//! editing, resets the saved amount. In every case the saved amount is capped
//! at the goal's target, see [contribute].

mod contribution;
mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod export;
mod form;
mod list;

pub use contribution::{
    Contribution, ContributionMode, ContributionRequest, Outcome, contribute, rebaseline,
    start_goal, top_up,
};
pub use create::contribute_endpoint;
pub use db::{
    create_goal, create_savings_goal_table, delete_goal, delete_goal_by_name, get_goal,
    get_goal_by_name, get_goals, get_goals_by_target_date, get_savings_totals, update_goal,
};
pub use delete::delete_goal_endpoint;
pub use domain::{GoalDetails, GoalId, GoalName, GoalStatus, SavingsGoal, SavingsTotals};
pub use edit::{get_edit_goal_page, update_goal_endpoint};
pub use export::export_savings;
pub use form::{ContributionErrors, ContributionForm};
pub use list::get_savings_page;
