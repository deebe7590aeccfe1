//! Registration and login forms
//!
//! Raw field values as submitted plus the validation result. Passwords are
//! never serialized, so a re-rendered form comes back with them empty.

use kernel::validator::{
    EMAIL_RX, USERNAME_RX, Validator, equal_to, matches, min_chars, not_blank,
};
use serde::{Deserialize, Serialize};

pub const BLANK: &str = "This field cannot be empty";
pub const MIN_PASSWORD_CHARS: usize = 8;

/// `POST /user/register`
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(rename = "confirm-password", skip_serializing)]
    pub confirm_password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl RegisterForm {
    /// Run every rule; true if the form is valid
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;

        v.check_field(not_blank(&self.username), "username", BLANK);
        v.check_field(
            matches(&self.username, &USERNAME_RX),
            "username",
            "This field must be 3-30 letters, digits, '_', '.' or '-'",
        );
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(not_blank(&self.password), "password", BLANK);
        v.check_field(
            min_chars(&self.password, MIN_PASSWORD_CHARS),
            "password",
            "This field must be at least 8 characters long",
        );
        v.check_field(not_blank(&self.confirm_password), "confirm_password", BLANK);
        v.check_field(
            equal_to(&self.confirm_password, &self.password),
            "confirm_password",
            "Passwords do not match",
        );

        v.valid()
    }
}

/// `POST /user/login`
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl LoginForm {
    /// Run every rule; true if the form is valid
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;

        v.check_field(not_blank(&self.username), "username", BLANK);
        v.check_field(
            matches(&self.username, &USERNAME_RX),
            "username",
            "This field must be a valid user name",
        );
        v.check_field(not_blank(&self.password), "password", BLANK);

        v.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_register_valid() {
        let mut form = register("alice", "alice@example.com", "password123", "password123");
        assert!(form.validate());
    }

    #[test]
    fn test_register_reports_every_problem() {
        let mut form = register("", "not-an-email", "short", "different");
        assert!(!form.validate());

        let errors = &form.validator.field_errors;
        assert_eq!(errors["username"].len(), 2);
        assert_eq!(errors["username"][0], BLANK);
        assert_eq!(errors["email"].len(), 1);
        assert_eq!(errors["password"].len(), 1);
        assert_eq!(errors["confirm_password"], vec!["Passwords do not match"]);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut form = LoginForm::default();
        assert!(!form.validate());
        assert!(form.validator.field_error("username").is_some());
        assert_eq!(form.validator.field_error("password"), Some(BLANK));

        let mut form = LoginForm {
            username: "alice".into(),
            password: "x".into(),
            ..Default::default()
        };
        assert!(form.validate());
    }

    #[test]
    fn test_passwords_are_not_serialized() {
        let form = register("alice", "alice@example.com", "password123", "password123");
        let json = serde_json::to_value(&form).unwrap();

        assert_eq!(json["username"], "alice");
        assert!(json.get("password").is_none());
        assert!(json.get("confirm-password").is_none());
    }
}
