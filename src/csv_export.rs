//! Writing tables of user data as downloadable CSV files.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::Error;

/// A CSV file ready to be sent to the client as a download.
#[derive(Debug)]
pub struct CsvDownload {
    file_name: String,
    contents: Vec<u8>,
}

impl CsvDownload {
    /// Write `headers` followed by one line per row in `rows`.
    ///
    /// # Errors
    ///
    /// Returns [Error::CSVExportError] if a record could not be written.
    pub fn new<R, I>(file_name: &str, headers: &[&str], rows: R) -> Result<Self, Error>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = String>,
    {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(headers)?;

        for row in rows {
            writer.write_record(row.into_iter().collect::<Vec<_>>())?;
        }

        let contents = writer
            .into_inner()
            .map_err(|error| Error::CSVExportError(error.to_string()))?;

        Ok(Self {
            file_name: file_name.to_owned(),
            contents,
        })
    }
}

impl IntoResponse for CsvDownload {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);
        let disposition = match HeaderValue::from_str(&disposition) {
            Ok(value) => value,
            Err(error) => {
                tracing::error!("invalid CSV file name {}: {error}", self.file_name);
                HeaderValue::from_static("attachment")
            }
        };

        (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/csv; charset=utf-8"),
                ),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.contents,
        )
            .into_response()
    }
}

#[cfg(test)]
mod csv_export_tests {
    use axum::response::IntoResponse;

    use crate::{
        csv_export::CsvDownload,
        test_utils::{assert_content_type, get_body_text, get_header},
    };

    #[tokio::test]
    async fn writes_header_then_rows() {
        let download = CsvDownload::new(
            "income.csv",
            &["Type", "Amount"],
            vec![
                vec!["Salary".to_owned(), "100.00".to_owned()],
                vec!["Other".to_owned(), "5.50".to_owned()],
            ],
        )
        .unwrap();

        let response = download.into_response();

        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"income.csv\""
        );
        assert_eq!(
            get_body_text(response).await,
            "Type,Amount\nSalary,100.00\nOther,5.50\n"
        );
    }

    #[tokio::test]
    async fn quotes_fields_with_commas() {
        let download = CsvDownload::new(
            "expenses.csv",
            &["Description"],
            vec![vec!["Coffee, beans".to_owned()]],
        )
        .unwrap();

        let body = get_body_text(download.into_response()).await;

        assert_eq!(body, "Description\n\"Coffee, beans\"\n");
    }

    #[tokio::test]
    async fn empty_table_has_only_headers() {
        let download =
            CsvDownload::new("savings.csv", &["Goal Name"], Vec::<Vec<String>>::new()).unwrap();

        let body = get_body_text(download.into_response()).await;

        assert_eq!(body, "Goal Name\n");
    }
}
