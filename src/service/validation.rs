//! User-creation payload validation.

use crate::error::{AppError, ValidationErrors};
use crate::model::{NewUser, Social};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn is_valid_email(s: &str) -> bool {
    s.len() <= 254 && email_regex().is_match(s)
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a raw user-creation body. Every failed constraint is reported, not just the first.
    /// Extra top-level fields are ignored; values are passed through unchanged.
    pub fn validate_new_user(body: &Value) -> Result<NewUser, AppError> {
        let obj = body
            .as_object()
            .ok_or_else(|| AppError::BadRequest("body must be a JSON object".into()))?;
        let mut errors = ValidationErrors::default();

        let firstname = required_text(obj, "firstname", &mut errors);
        let lastname = required_text(obj, "lastname", &mut errors);
        let email = required_text(obj, "email", &mut errors);
        if let Some(e) = email.as_deref() {
            if !is_valid_email(e) {
                errors.push("email", "must be a valid email");
            }
        }
        let social = social(obj.get("social"), &mut errors);

        match (firstname, lastname, email) {
            (Some(firstname), Some(lastname), Some(email)) if errors.is_empty() => Ok(NewUser {
                firstname,
                lastname,
                email,
                social,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

fn required_text(obj: &Map<String, Value>, field: &str, errors: &mut ValidationErrors) -> Option<String> {
    match obj.get(field) {
        None => {
            errors.push(field, "is required");
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(field, "must not be empty");
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(field, "must be a string");
            None
        }
    }
}

/// Absent `social` is an empty profile. Present `social` must be an object; `null` counts as present.
/// Unknown keys inside it are dropped.
fn social(value: Option<&Value>, errors: &mut ValidationErrors) -> Social {
    let mut social = Social::default();
    let obj = match value {
        None => return social,
        Some(Value::Object(obj)) => obj,
        Some(_) => {
            errors.push("social", "must be an object");
            return social;
        }
    };
    for field in Social::FIELDS {
        let Some(v) = obj.get(field) else { continue };
        match v {
            Value::String(s) => {
                if let Some(slot) = social.slot_mut(field) {
                    *slot = Some(s.clone());
                }
            }
            _ => errors.push(format!("social.{}", field), "must be a string"),
        }
    }
    social
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_errors(body: Value) -> ValidationErrors {
        match RequestValidator::validate_new_user(&body) {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_minimal_payload() {
        let user = RequestValidator::validate_new_user(&json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com"
        }))
        .unwrap();
        assert_eq!(user.firstname, "Ada");
        assert!(user.social.is_empty());
    }

    #[test]
    fn empty_social_is_valid() {
        let user = RequestValidator::validate_new_user(&json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com",
            "social": {}
        }))
        .unwrap();
        assert_eq!(user.social, Social::default());
    }

    #[test]
    fn keeps_known_social_fields_and_drops_unknown() {
        let user = RequestValidator::validate_new_user(&json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com",
            "social": { "github": "ada", "website": "https://ada.dev", "myspace": "ada" },
            "nickname": "countess"
        }))
        .unwrap();
        assert_eq!(user.social.github.as_deref(), Some("ada"));
        assert_eq!(user.social.website.as_deref(), Some("https://ada.dev"));
        assert!(user.social.twitter.is_none());
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = field_errors(json!({}));
        assert!(errors.has_field("firstname"));
        assert!(errors.has_field("lastname"));
        assert!(errors.has_field("email"));
    }

    #[test]
    fn rejects_blank_names() {
        let errors = field_errors(json!({
            "firstname": "  ",
            "lastname": "Lovelace",
            "email": "ada@example.com"
        }));
        assert_eq!(errors.fields.len(), 1);
        assert_eq!(errors.fields[0].field, "firstname");
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["ada", "ada@", "@example.com", "ada@example", "ada example@x.com"] {
            let errors = field_errors(json!({
                "firstname": "Ada",
                "lastname": "Lovelace",
                "email": email
            }));
            assert!(errors.has_field("email"), "{email} should be rejected");
        }
    }

    #[test]
    fn rejects_non_string_social_member() {
        let errors = field_errors(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com",
            "social": { "twitter": 42, "github": null }
        }));
        assert!(errors.has_field("social.twitter"));
        assert!(errors.has_field("social.github"));
    }

    #[test]
    fn rejects_non_object_social() {
        for social in [json!("ada"), Value::Null, json!(["ada"])] {
            let errors = field_errors(json!({
                "firstname": "Ada",
                "lastname": "Lovelace",
                "email": "ada@example.com",
                "social": social
            }));
            assert!(errors.has_field("social"));
        }
    }

    #[test]
    fn non_object_body_is_bad_request() {
        let err = RequestValidator::validate_new_user(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("ada.lovelace+tag@mail.example.co.uk"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada@-example.com"));
    }
}
