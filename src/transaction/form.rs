//! Reads the vendor transaction fields from a submitted form.

use axum::{
    Form,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};

use crate::{
    Error,
    transaction::{NewVendorTransaction, id::parse_leading_integer},
};

/// The form data for recording a vendor transaction.
///
/// Every field is optional here so that a missing field can be reported as
/// [Error::InvalidInput] rather than as a deserialization failure. A field that
/// is present but empty counts as present.
///
/// Both `application/x-www-form-urlencoded` and `multipart/form-data` bodies
/// are accepted. If a field is sent more than once, the last value is kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InsertTransactionForm {
    /// The vendor that paid, sent as `vendorID`.
    pub vendor_id: Option<String>,
    /// The date as entered by the collector.
    pub date: Option<String>,
    /// The amount collected, as text.
    pub amount: Option<String>,
    /// The collector that recorded the payment.
    pub collector_id: Option<String>,
}

impl InsertTransactionForm {
    /// Check that every field is present and convert the amount to an integer.
    ///
    /// The amount is read as the integer at the start of the text, so "42abc"
    /// becomes 42 and "abc" becomes 0.
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if any field is missing.
    pub fn validate(self) -> Result<NewVendorTransaction, Error> {
        match (self.vendor_id, self.date, self.amount, self.collector_id) {
            (Some(vendor_id), Some(date), Some(amount), Some(collector_id)) => {
                Ok(NewVendorTransaction {
                    vendor_id,
                    date,
                    amount: parse_leading_integer(&amount),
                    collector_id,
                })
            }
            _ => Err(Error::InvalidInput),
        }
    }

    /// Store `value` in the field called `name`, replacing any earlier value.
    ///
    /// Unknown field names are ignored.
    fn set_field(&mut self, name: &str, value: String) {
        let slot = match name {
            "vendorID" => &mut self.vendor_id,
            "date" => &mut self.date,
            "amount" => &mut self.amount,
            "collector_id" => &mut self.collector_id,
            _ => return,
        };

        *slot = Some(value);
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
        let mut form = Self::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(error) => {
                    tracing::debug!("Could not read multipart form field: {error}");
                    return Err(Error::InvalidInput);
                }
            };

            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field.text().await {
                Ok(text) => form.set_field(&name, text),
                Err(error) => {
                    tracing::debug!("Could not read data from multipart form field: {error}");
                    return Err(Error::InvalidInput);
                }
            }
        }

        Ok(form)
    }
}

impl<S> FromRequest<S> for InsertTransactionForm
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|content_type| content_type.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(request, state)
                .await
                .map_err(|rejection| {
                    tracing::debug!("Could not parse multipart form: {rejection}");
                    Error::InvalidInput
                })?;

            return Self::from_multipart(multipart).await;
        }

        // Read as ordered pairs so repeated keys resolve to the last value and
        // empty values stay present.
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, state)
            .await
            .map_err(|rejection| {
                tracing::debug!("Could not parse form: {rejection}");
                Error::InvalidInput
            })?;

        let mut form = Self::default();
        for (name, value) in pairs {
            form.set_field(&name, value);
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        extract::{FromRequest, Request},
    };

    use crate::{
        Error,
        transaction::{NewVendorTransaction, form::InsertTransactionForm},
    };

    fn complete_form() -> InsertTransactionForm {
        InsertTransactionForm {
            vendor_id: Some("V-17".to_owned()),
            date: Some("2024-10-06".to_owned()),
            amount: Some("42abc".to_owned()),
            collector_id: Some("C-3".to_owned()),
        }
    }

    async fn must_extract(content_type: &str, body: String) -> Result<InsertTransactionForm, Error> {
        let request = Request::builder()
            .method("POST")
            .uri("/insert_transaction")
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();

        InsertTransactionForm::from_request(request, &()).await
    }

    #[test]
    fn validate_coerces_amount() {
        let got = complete_form().validate();

        assert_eq!(
            got,
            Ok(NewVendorTransaction {
                vendor_id: "V-17".to_owned(),
                date: "2024-10-06".to_owned(),
                amount: 42,
                collector_id: "C-3".to_owned(),
            })
        );
    }

    #[test]
    fn validate_non_numeric_amount_is_zero() {
        let form = InsertTransactionForm {
            amount: Some("abc".to_owned()),
            ..complete_form()
        };

        assert_eq!(form.validate().map(|transaction| transaction.amount), Ok(0));
    }

    #[test]
    fn validate_fails_on_any_missing_field() {
        let forms = [
            InsertTransactionForm {
                vendor_id: None,
                ..complete_form()
            },
            InsertTransactionForm {
                date: None,
                ..complete_form()
            },
            InsertTransactionForm {
                amount: None,
                ..complete_form()
            },
            InsertTransactionForm {
                collector_id: None,
                ..complete_form()
            },
            InsertTransactionForm::default(),
        ];

        for form in forms {
            assert_eq!(
                form.clone().validate(),
                Err(Error::InvalidInput),
                "form {form:?} should be invalid"
            );
        }
    }

    #[tokio::test]
    async fn extracts_url_encoded_form() {
        let got = must_extract(
            "application/x-www-form-urlencoded",
            "vendorID=V-17&date=2024-10-06&amount=42abc&collector_id=C-3".to_owned(),
        )
        .await;

        assert_eq!(got, Ok(complete_form()));
    }

    #[tokio::test]
    async fn empty_values_count_as_present() {
        let got = must_extract(
            "application/x-www-form-urlencoded",
            "vendorID=&date=&amount=&collector_id=".to_owned(),
        )
        .await;

        assert_eq!(
            got,
            Ok(InsertTransactionForm {
                vendor_id: Some(String::new()),
                date: Some(String::new()),
                amount: Some(String::new()),
                collector_id: Some(String::new()),
            })
        );
    }

    #[tokio::test]
    async fn missing_values_are_none() {
        let got = must_extract(
            "application/x-www-form-urlencoded",
            "vendorID=V-17&amount=5".to_owned(),
        )
        .await;

        assert_eq!(
            got,
            Ok(InsertTransactionForm {
                vendor_id: Some("V-17".to_owned()),
                date: None,
                amount: Some("5".to_owned()),
                collector_id: None,
            })
        );
    }

    #[tokio::test]
    async fn extracts_multipart_form() {
        let boundary = "MY_BOUNDARY123456789";
        let mut lines = Vec::new();
        for (name, value) in [
            ("vendorID", "V-17"),
            ("date", "2024-10-06"),
            ("amount", "42abc"),
            ("collector_id", "C-3"),
            ("ignored", "whatever"),
        ] {
            lines.push(format!("--{boundary}"));
            lines.push(format!("Content-Disposition: form-data; name=\"{name}\""));
            lines.push(String::new());
            lines.push(value.to_owned());
        }
        lines.push(format!("--{boundary}--"));

        let got = must_extract(
            &format!("multipart/form-data; boundary={boundary}"),
            lines.join("\r\n"),
        )
        .await;

        assert_eq!(got, Ok(complete_form()));
    }

    #[tokio::test]
    async fn repeated_url_encoded_field_keeps_last_value() {
        let got = must_extract(
            "application/x-www-form-urlencoded",
            "vendorID=V-1&vendorID=V-17&date=2024-10-06&amount=42abc&collector_id=C-3".to_owned(),
        )
        .await;

        assert_eq!(got, Ok(complete_form()));
    }

    #[tokio::test]
    async fn repeated_multipart_field_keeps_last_value() {
        let boundary = "MY_BOUNDARY123456789";
        let mut lines = Vec::new();
        for (name, value) in [
            ("vendorID", "V-1"),
            ("vendorID", "V-17"),
            ("date", "2024-10-06"),
            ("amount", "42abc"),
            ("collector_id", "C-3"),
        ] {
            lines.push(format!("--{boundary}"));
            lines.push(format!("Content-Disposition: form-data; name=\"{name}\""));
            lines.push(String::new());
            lines.push(value.to_owned());
        }
        lines.push(format!("--{boundary}--"));

        let got = must_extract(
            &format!("multipart/form-data; boundary={boundary}"),
            lines.join("\r\n"),
        )
        .await;

        assert_eq!(got, Ok(complete_form()));
    }

    #[tokio::test]
    async fn unsupported_content_type_is_invalid_input() {
        let got = must_extract(
            "application/json",
            r#"{"vendorID":"V-17","date":"2024-10-06","amount":"1","collector_id":"C-3"}"#
                .to_owned(),
        )
        .await;

        assert_eq!(got, Err(Error::InvalidInput));
    }
}
