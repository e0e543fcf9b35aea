//! The form for recording and editing income.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    choice::{Choice, choice_select},
    endpoints,
    error::capitalise_first_char,
    form::{INVALID_DATE_MESSAGE, non_blank, parse_date, parse_positive_amount},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, date_input, dollar_input, submit_button},
    income::{Income, IncomeDetails, IncomeId, IncomeType},
};

pub(super) const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive number.";
pub(super) const DATE_REQUIRED: &str = "Enter the date the income was received.";
const TYPE_REQUIRED: &str = "Choose the type of income.";

/// The raw fields of the income form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeForm {
    /// The code of the income type, e.g. "SALARY".
    pub income_type: Option<String>,
    /// The amount received.
    pub amount: Option<String>,
    /// The date received in the format "YYYY-MM-DD".
    pub date_received: Option<String>,
    /// An optional note.
    pub description: Option<String>,
}

/// Messages for the fields of an [IncomeForm] that are invalid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomeErrors {
    /// Problem with the income type.
    pub income_type: Option<String>,
    /// Problem with the amount.
    pub amount: Option<String>,
    /// Problem with the date received.
    pub date_received: Option<String>,
}

impl IncomeForm {
    /// Fill the form with the values of `income` for editing.
    pub fn from_income(income: &Income) -> Self {
        Self {
            income_type: Some(income.income_type.code().to_owned()),
            amount: Some(income.amount.to_string()),
            date_received: Some(income.date_received.to_string()),
            description: income.description.clone(),
        }
    }

    /// Validate the form.
    ///
    /// Whether the date is in the future is not checked here.
    ///
    /// # Errors
    ///
    /// Returns a message for every field that is invalid.
    pub fn parse(&self) -> Result<IncomeDetails, IncomeErrors> {
        let mut errors = IncomeErrors::default();

        let income_type = match non_blank(&self.income_type) {
            None => {
                errors.income_type = Some(TYPE_REQUIRED.to_owned());
                None
            }
            Some(code) => IncomeType::from_code(code)
                .map_err(|error| errors.income_type = Some(capitalise_first_char(&error.to_string())))
                .ok(),
        };

        let amount = parse_positive_amount(non_blank(&self.amount), AMOUNT_NOT_POSITIVE)
            .map_err(|message| errors.amount = Some(message))
            .ok();

        let date_received = match non_blank(&self.date_received).map(parse_date) {
            None => {
                errors.date_received = Some(DATE_REQUIRED.to_owned());
                None
            }
            Some(Err(_)) => {
                errors.date_received = Some(INVALID_DATE_MESSAGE.to_owned());
                None
            }
            Some(Ok(date)) => Some(date),
        };

        match (income_type, amount, date_received) {
            (Some(income_type), Some(amount), Some(date_received)) => Ok(IncomeDetails {
                income_type,
                amount,
                date_received,
                description: non_blank(&self.description).map(str::to_owned),
            }),
            _ => Err(errors),
        }
    }
}

/// Where the income form is sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum FormAction {
    Create,
    Edit(IncomeId),
}

/// Render the income form. Dates after `today` cannot be picked.
pub(super) fn income_form_view(
    action: FormAction,
    form: &IncomeForm,
    errors: &IncomeErrors,
    today: Date,
) -> Markup {
    let (post_url, put_url, button_label) = match action {
        FormAction::Create => (Some(endpoints::INCOME_API), None, "Add Income"),
        FormAction::Edit(income_id) => (
            None,
            Some(endpoints::format_endpoint(endpoints::INCOME, income_id)),
            "Update Income",
        ),
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
            (choice_select::<IncomeType>(
                "income_type",
                "Type",
                form.income_type.as_deref(),
                errors.income_type.as_deref(),
            ))

            (dollar_input("amount", "Amount", form.amount.as_deref(), true, errors.amount.as_deref()))

            (date_input(
                "date_received",
                "Date Received",
                form.date_received.as_deref(),
                (None, Some(today)),
                true,
                errors.date_received.as_deref(),
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

#[cfg(test)]
mod income_form_tests {
    use time::macros::date;

    use crate::{
        income::{
            IncomeDetails, IncomeErrors, IncomeForm, IncomeType,
            form::{AMOUNT_NOT_POSITIVE, DATE_REQUIRED},
        },
        money::Money,
    };

    #[test]
    fn parses_valid_form() {
        let form = IncomeForm {
            income_type: Some("RENTAL".to_owned()),
            amount: Some("1234.5".to_owned()),
            date_received: Some("2025-03-01".to_owned()),
            description: Some("  ".to_owned()),
        };

        assert_eq!(
            form.parse(),
            Ok(IncomeDetails {
                income_type: IncomeType::Rental,
                amount: Money::from_cents(123_450),
                date_received: date!(2025 - 03 - 01),
                description: None,
            })
        );
    }

    #[test]
    fn reports_every_invalid_field() {
        let form = IncomeForm {
            income_type: Some("LOTTERY".to_owned()),
            amount: Some("0".to_owned()),
            date_received: None,
            description: None,
        };

        assert_eq!(
            form.parse(),
            Err(IncomeErrors {
                income_type: Some("\"LOTTERY\" is not a valid choice".to_owned()),
                amount: Some(AMOUNT_NOT_POSITIVE.to_owned()),
                date_received: Some(DATE_REQUIRED.to_owned()),
            })
        );
    }

    #[test]
    fn rejects_more_than_two_decimal_places() {
        let form = IncomeForm {
            income_type: Some("SALARY".to_owned()),
            amount: Some("10.001".to_owned()),
            date_received: Some("2025-03-01".to_owned()),
            description: None,
        };

        let errors = form.parse().unwrap_err();

        assert_eq!(
            errors.amount,
            Some("10.001 has more than two decimal places".to_owned())
        );
    }
}
