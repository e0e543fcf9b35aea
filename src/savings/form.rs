//! The contribution form: parsing what the user typed and rendering the form.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    endpoints,
    form::{INVALID_DATE_MESSAGE, non_blank, parse_date, parse_positive_amount},
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, date_input, dollar_input, field_error,
        submit_button,
    },
    savings::{
        ContributionMode, ContributionRequest, GoalDetails, GoalId, GoalName, SavingsGoal,
    },
};

pub(super) const NAME_REQUIRED: &str = "A name is required for a new goal.";
pub(super) const TARGET_AMOUNT_REQUIRED: &str = "A target amount is required for a new goal.";
pub(super) const TARGET_DATE_REQUIRED: &str = "A target date is required for a new goal.";
pub(super) const TARGET_DATE_IN_PAST: &str = "Target date cannot be in the past.";
pub(super) const TARGET_AMOUNT_NOT_POSITIVE: &str = "Target amount must be a positive number.";
pub(super) const AMOUNT_TO_ADD_NOT_POSITIVE: &str = "Amount to add must be a positive number.";
const UNKNOWN_GOAL: &str = "Choose a goal from the list.";

/// The raw values submitted with the contribution form.
///
/// Every field is optional so that missing fields produce a message on the
/// form rather than a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributionForm {
    /// The ID of the goal to add to, or blank to create a new goal.
    pub existing_goal: Option<String>,
    /// The name of a new goal, or the new name of an edited goal.
    pub name: Option<String>,
    /// The target of a new or edited goal.
    pub target_amount: Option<String>,
    /// The target date of a new or edited goal.
    pub target_date: Option<String>,
    /// The amount to add, or the new saved amount of an edited goal.
    pub amount_to_add: Option<String>,
}

/// Validation messages for each field of the contribution form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributionErrors {
    /// Problem with the selected goal.
    pub existing_goal: Option<String>,
    /// Problem with the goal name.
    pub name: Option<String>,
    /// Problem with the target amount.
    pub target_amount: Option<String>,
    /// Problem with the target date.
    pub target_date: Option<String>,
    /// Problem with the amount to add.
    pub amount_to_add: Option<String>,
}

impl ContributionErrors {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl ContributionForm {
    /// Fill the form with the values of `goal` for editing.
    ///
    /// The amount to add starts as the goal's saved amount, since editing sets
    /// the saved amount rather than adding to it.
    pub fn from_goal(goal: &SavingsGoal) -> Self {
        Self {
            existing_goal: None,
            name: Some(goal.name.to_string()),
            target_amount: Some(goal.target_amount.to_string()),
            target_date: Some(goal.target_date.to_string()),
            amount_to_add: Some(goal.current_amount.to_string()),
        }
    }

    /// Validate the form and build the contribution it describes.
    ///
    /// `editing` is the goal being edited, if any. Without it, a blank
    /// `existing_goal` creates a new goal and any other value adds to that goal.
    /// Target dates before `today` are rejected.
    ///
    /// # Errors
    ///
    /// Returns a message for every field that is invalid.
    pub fn parse(
        &self,
        editing: Option<GoalId>,
        today: Date,
    ) -> Result<ContributionRequest, ContributionErrors> {
        let mut errors = ContributionErrors::default();

        let amount_to_add = parse_positive_amount(
            non_blank(&self.amount_to_add),
            AMOUNT_TO_ADD_NOT_POSITIVE,
        )
        .map_err(|message| errors.amount_to_add = Some(message))
        .ok();

        let existing_goal = match (editing, non_blank(&self.existing_goal)) {
            (Some(_), _) | (None, None) => None,
            (None, Some(raw_id)) => match raw_id.parse::<GoalId>() {
                Ok(goal_id) => Some(goal_id),
                Err(_) => {
                    errors.existing_goal = Some(UNKNOWN_GOAL.to_owned());
                    return Err(errors);
                }
            },
        };

        let mode = match (editing, existing_goal) {
            (None, Some(goal_id)) => Some(ContributionMode::AddToExisting(goal_id)),
            (None, None) => self
                .parse_details(today, &mut errors)
                .map(ContributionMode::CreateNew),
            (Some(goal_id), _) => self
                .parse_details(today, &mut errors)
                .map(|details| ContributionMode::Edit(goal_id, details)),
        };

        match (mode, amount_to_add) {
            (Some(mode), Some(amount_to_add)) if errors.is_empty() => Ok(ContributionRequest {
                mode,
                amount_to_add,
            }),
            _ => Err(errors),
        }
    }

    fn parse_details(&self, today: Date, errors: &mut ContributionErrors) -> Option<GoalDetails> {
        let name = match non_blank(&self.name).map(GoalName::new) {
            Some(Ok(name)) => Some(name),
            Some(Err(_)) | None => {
                errors.name = Some(NAME_REQUIRED.to_owned());
                None
            }
        };

        let target_amount = match non_blank(&self.target_amount) {
            None => {
                errors.target_amount = Some(TARGET_AMOUNT_REQUIRED.to_owned());
                None
            }
            Some(raw) => parse_positive_amount(Some(raw), TARGET_AMOUNT_NOT_POSITIVE)
                .map_err(|message| errors.target_amount = Some(message))
                .ok(),
        };

        let target_date = match non_blank(&self.target_date).map(parse_date) {
            None => {
                errors.target_date = Some(TARGET_DATE_REQUIRED.to_owned());
                None
            }
            Some(Err(_)) => {
                errors.target_date = Some(INVALID_DATE_MESSAGE.to_owned());
                None
            }
            Some(Ok(date)) if date < today => {
                errors.target_date = Some(TARGET_DATE_IN_PAST.to_owned());
                None
            }
            Some(Ok(date)) => Some(date),
        };

        Some(GoalDetails {
            name: name?,
            target_amount: target_amount?,
            target_date: target_date?,
        })
    }
}

/// Where the contribution form is sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum FormAction {
    /// Create a goal or add to an existing one.
    Contribute,
    /// Edit the goal with the given ID.
    Edit(GoalId),
}

/// Render the contribution form.
///
/// `goals` fills the "existing goal" select and is ignored when editing.
pub(super) fn contribution_form_view(
    action: FormAction,
    form: &ContributionForm,
    errors: &ContributionErrors,
    goals: &[SavingsGoal],
    today: Date,
) -> Markup {
    let (post_url, put_url) = match action {
        FormAction::Contribute => (Some(endpoints::SAVINGS_API), None),
        FormAction::Edit(goal_id) => (
            None,
            Some(endpoints::format_endpoint(endpoints::SAVINGS_GOAL, goal_id)),
        ),
    };
    let is_editing = put_url.is_some();
    let selected_goal = non_blank(&form.existing_goal);
    let (amount_label, button_label) = if is_editing {
        ("Amount Saved", "Update Goal")
    } else {
        ("Amount to Save / Add", "Save")
    };

    html! {
        form
            hx-post=[post_url]
            hx-put=[put_url]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            @if !is_editing {
                div
                {
                    label for="existing_goal" class=(FORM_LABEL_STYLE) { "Goal" }

                    select name="existing_goal" id="existing_goal" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[selected_goal.is_none()] { "Create new goal" }

                        @for goal in goals {
                            @let goal_id = goal.id.to_string();
                            option
                                value=(goal_id)
                                selected[selected_goal == Some(goal_id.as_str())]
                            {
                                (goal.name) " (" (goal.status()) ")"
                            }
                        }
                    }

                    (field_error(errors.existing_goal.as_deref()))
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "The fields below are only needed when creating a new goal."
                }
            }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Goal Name" }

                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="e.g. Holiday Fund"
                    required[is_editing]
                    value=[form.name.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.name.as_deref()))
            }

            (dollar_input(
                "target_amount",
                "Target Amount",
                form.target_amount.as_deref(),
                is_editing,
                errors.target_amount.as_deref(),
            ))

            (date_input(
                "target_date",
                "Target Date",
                form.target_date.as_deref(),
                (Some(today), None),
                is_editing,
                errors.target_date.as_deref(),
            ))

            (dollar_input(
                "amount_to_add",
                amount_label,
                form.amount_to_add.as_deref(),
                true,
                errors.amount_to_add.as_deref(),
            ))

            (submit_button(button_label))
        }
    }
}
