//! The form for recording and editing expenses.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    choice::{Choice, choice_select},
    endpoints,
    error::capitalise_first_char,
    expense::{Expense, ExpenseCategory, ExpenseDetails, ExpenseId, PaymentSource},
    form::{INVALID_DATE_MESSAGE, non_blank, parse_date, parse_positive_amount},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, date_input, dollar_input, submit_button},
};

pub(super) const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive number.";
pub(super) const DATE_REQUIRED: &str = "Enter the date of the expense.";
const SOURCE_REQUIRED: &str = "Choose how the expense was paid.";

/// The raw fields of the expense form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// The code of the category, e.g. "FOOD". Blank means "OTHER".
    pub category: Option<String>,
    /// The amount spent.
    pub amount: Option<String>,
    /// The date of the expense in the format "YYYY-MM-DD".
    pub date_incurred: Option<String>,
    /// The code of the payment source, e.g. "CREDIT_CARD".
    pub source: Option<String>,
    /// An optional note.
    pub description: Option<String>,
}

/// Messages for the fields of an [ExpenseForm] that are invalid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseErrors {
    /// Problem with the category.
    pub category: Option<String>,
    /// Problem with the amount.
    pub amount: Option<String>,
    /// Problem with the date.
    pub date_incurred: Option<String>,
    /// Problem with the payment source.
    pub source: Option<String>,
}

fn choice_message(error: Error) -> String {
    capitalise_first_char(&error.to_string())
}

impl ExpenseForm {
    /// Fill the form with the values of `expense` for editing.
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            category: Some(expense.category.code().to_owned()),
            amount: Some(expense.amount.to_string()),
            date_incurred: Some(expense.date_incurred.to_string()),
            source: Some(expense.source.code().to_owned()),
            description: expense.description.clone(),
        }
    }

    /// Validate the form.
    ///
    /// Whether the date is in the future is not checked here.
    ///
    /// # Errors
    ///
    /// Returns a message for every field that is invalid.
    pub fn parse(&self) -> Result<ExpenseDetails, ExpenseErrors> {
        let mut errors = ExpenseErrors::default();

        let category = match non_blank(&self.category) {
            None => Some(ExpenseCategory::default()),
            Some(code) => ExpenseCategory::from_code(code)
                .map_err(|error| errors.category = Some(choice_message(error)))
                .ok(),
        };

        let source = match non_blank(&self.source) {
            None => {
                errors.source = Some(SOURCE_REQUIRED.to_owned());
                None
            }
            Some(code) => PaymentSource::from_code(code)
                .map_err(|error| errors.source = Some(choice_message(error)))
                .ok(),
        };

        let amount = parse_positive_amount(non_blank(&self.amount), AMOUNT_NOT_POSITIVE)
            .map_err(|message| errors.amount = Some(message))
            .ok();

        let date_incurred = match non_blank(&self.date_incurred).map(parse_date) {
            None => {
                errors.date_incurred = Some(DATE_REQUIRED.to_owned());
                None
            }
            Some(Err(_)) => {
                errors.date_incurred = Some(INVALID_DATE_MESSAGE.to_owned());
                None
            }
            Some(Ok(date)) => Some(date),
        };

        match (category, amount, date_incurred, source) {
            (Some(category), Some(amount), Some(date_incurred), Some(source)) => {
                Ok(ExpenseDetails {
                    category,
                    amount,
                    date_incurred,
                    source,
                    description: non_blank(&self.description).map(str::to_owned),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Where the expense form is sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum FormAction {
    Create,
    Edit(ExpenseId),
}

/// Render the expense form. Dates after `today` cannot be picked.
pub(super) fn expense_form_view(
    action: FormAction,
    form: &ExpenseForm,
    errors: &ExpenseErrors,
    today: Date,
) -> Markup {
    let (post_url, put_url, button_label) = match action {
        FormAction::Create => (Some(endpoints::EXPENSES_API), None, "Add Expense"),
        FormAction::Edit(expense_id) => (
            None,
            Some(endpoints::format_endpoint(endpoints::EXPENSE, expense_id)),
            "Update Expense",
        ),
    };
    let category = non_blank(&form.category).unwrap_or(ExpenseCategory::default().code());

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
            (choice_select::<ExpenseCategory>(
                "category",
                "Category",
                Some(category),
                errors.category.as_deref(),
            ))

            (dollar_input(
                "amount",
                "Amount",
                form.amount.as_deref(),
                true,
                errors.amount.as_deref(),
            ))

            (date_input(
                "date_incurred",
                "Date",
                form.date_incurred.as_deref(),
                (None, Some(today)),
                true,
                errors.date_incurred.as_deref(),
            ))

            (choice_select::<PaymentSource>(
                "source",
                "Paid With",
                form.source.as_deref(),
                errors.source.as_deref(),
            ))

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description (optional)" }

                input
                    type="text"
                    name="description"
                    id="description"
                    value=[form.description.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (submit_button(button_label))
        }
    }
}
