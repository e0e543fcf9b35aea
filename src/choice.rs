//! Fixed lists of options, such as income types, that are stored as codes and shown as labels.

use maud::{Markup, html};
use rusqlite::types::{FromSqlError, FromSqlResult, ValueRef};

use crate::{
    Error,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error},
};

/// An enum whose variants are offered to the user as a fixed list of options.
///
/// Codes are upper case, e.g. "CREDIT_CARD", and are what is stored in the
/// database and sent by forms. Labels are what the user sees, e.g. "Credit Card".
pub trait Choice: Copy + PartialEq + Sized + 'static {
    /// Every variant, in the order they should be offered.
    const ALL: &'static [Self];

    /// The stable code for the variant.
    fn code(self) -> &'static str;

    /// The human readable name for the variant.
    fn label(self) -> &'static str;

    /// Find the variant with the code `code`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidChoice] if no variant has that code.
    fn from_code(code: &str) -> Result<Self, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.code() == code)
            .ok_or_else(|| Error::InvalidChoice(code.to_owned()))
    }
}

/// Read a choice stored as its code.
pub(crate) fn choice_from_sql<C: Choice>(value: ValueRef<'_>) -> FromSqlResult<C> {
    let code = value.as_str()?;

    C::from_code(code).map_err(|error| FromSqlError::Other(Box::new(error)))
}

/// A labelled select with one option per variant of `C`.
///
/// `selected` is the code of the selected option, if any.
pub fn choice_select<C: Choice>(
    name: &str,
    label: &str,
    selected: Option<&str>,
    error_message: Option<&str>,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select name=(name) id=(name) required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for choice in C::ALL {
                    option value=(choice.code()) selected[selected == Some(choice.code())]
                    {
                        (choice.label())
                    }
                }
            }

            (field_error(error_message))
        }
    }
}

#[cfg(test)]
mod choice_tests {
    use maud::html;
    use scraper::Html;

    use crate::{
        Error,
        choice::{Choice, choice_select},
        test_utils::{assert_form_select, get_selected_option, must_get_form},
    };

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Colour {
        Red,
        DarkBlue,
    }

    impl Choice for Colour {
        const ALL: &'static [Self] = &[Colour::Red, Colour::DarkBlue];

        fn code(self) -> &'static str {
            match self {
                Colour::Red => "RED",
                Colour::DarkBlue => "DARK_BLUE",
            }
        }

        fn label(self) -> &'static str {
            match self {
                Colour::Red => "Red",
                Colour::DarkBlue => "Dark Blue",
            }
        }
    }

    #[test]
    fn finds_variant_by_code() {
        assert_eq!(Colour::from_code("DARK_BLUE"), Ok(Colour::DarkBlue));
        assert_eq!(
            Colour::from_code("Dark Blue"),
            Err(Error::InvalidChoice("Dark Blue".to_owned()))
        );
    }

    #[test]
    fn select_lists_every_code_and_marks_selected() {
        let markup = html! {
            form { (choice_select::<Colour>("colour", "Colour", Some("DARK_BLUE"), None)) }
        };
        let html = Html::parse_fragment(&markup.into_string());
        let form = must_get_form(&html);

        assert_form_select(&form, "colour", &["RED", "DARK_BLUE"]);
        assert_eq!(
            get_selected_option(&form, "colour"),
            Some("DARK_BLUE".to_owned())
        );
    }
}
