//! Client-side rules for account forms
//!
//! Every rule runs on every submit so all problems are reported at once.
//! The backend validates again; these checks only save a round trip.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const REGISTER_USERNAME_MAX_CHARS: usize = 50;
pub const CHANGE_USERNAME_MAX_CHARS: usize = 30;
pub const PASSWORD_MIN_CHARS: usize = 8;
/// bcrypt ignores input past 72 bytes
pub const PASSWORD_MAX_CHARS: usize = 72;

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All rule failures for a submitted form
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("form has {} invalid field(s)", .errors.len())]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Messages for one field, in rule order
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn check_username(errors: &mut FormErrors, field: &'static str, raw: &str, max_chars: usize) -> String {
    let username = raw.trim().to_string();
    let len = username.chars().count();
    if len < USERNAME_MIN_CHARS {
        errors.push(field, format!("Name must be at least {} characters", USERNAME_MIN_CHARS));
    }
    if len > max_chars {
        errors.push(field, format!("Name cannot exceed {} characters", max_chars));
    }
    username
}

fn check_email(errors: &mut FormErrors, field: &'static str, raw: &str) -> String {
    let email = raw.trim().to_string();
    if !is_valid_email(&email) {
        errors.push(field, "Please enter a valid email address");
    }
    email
}

fn check_password(errors: &mut FormErrors, field: &'static str, password: &str) {
    let len = password.chars().count();
    if len < PASSWORD_MIN_CHARS {
        errors.push(field, format!("Password must be at least {} characters", PASSWORD_MIN_CHARS));
    }
    if len > PASSWORD_MAX_CHARS {
        errors.push(field, format!("Password cannot exceed {} characters", PASSWORD_MAX_CHARS));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push(field, "Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(field, "Password must contain at least one number");
    }
}

/// Pragmatic address check: one `@`, a dotted domain, no empty labels
pub fn is_valid_email(email: &str) -> bool {
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .map(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false);

    labels_ok && tld_ok
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Registration payload after normalisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, FormErrors> {
        let mut errors = FormErrors::default();
        let username = check_username(&mut errors, "username", &self.username, REGISTER_USERNAME_MAX_CHARS);
        let email = check_email(&mut errors, "email", &self.email).to_lowercase();
        check_password(&mut errors, "password", &self.password);
        if self.password != self.confirm_password {
            errors.push("confirmPassword", "Passwords do not match");
        }

        errors.into_result(Registration {
            username,
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginCredentials, FormErrors> {
        let mut errors = FormErrors::default();
        let email = check_email(&mut errors, "email", &self.email).to_lowercase();
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result(LoginCredentials {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUsernameForm {
    pub new_username: String,
}

impl ChangeUsernameForm {
    /// Trimmed username ready to submit
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::default();
        let username = check_username(&mut errors, "newUsername", &self.new_username, CHANGE_USERNAME_MAX_CHARS);
        errors.into_result(username)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEmailForm {
    pub new_email: String,
}

impl ChangeEmailForm {
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::default();
        let email = check_email(&mut errors, "newEmail", &self.new_email);
        errors.into_result(email)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.old_password.is_empty() {
            errors.push("oldPassword", "Password is required");
        }
        check_password(&mut errors, "newPassword", &self.new_password);
        if self.confirm_new_password.is_empty() {
            errors.push("confirmNewPassword", "Password is required");
        } else if self.confirm_new_password != self.new_password {
            errors.push("confirmNewPassword", "Passwords do not match");
        }
        errors.into_result(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_registration_is_normalised() {
        let form = register("  gardener ", " Green.Thumb@Example.COM ", "Sprout123", "Sprout123");
        let registration = form.validate().unwrap();
        assert_eq!(registration.username, "gardener");
        assert_eq!(registration.email, "green.thumb@example.com");
    }

    #[test]
    fn test_registration_reports_every_field() {
        let errors = register(" ab ", "not-an-email", "short", "different").validate().unwrap_err();

        assert!(errors.has_field("username"));
        assert!(errors.has_field("email"));
        assert!(errors.has_field("confirmPassword"));
        assert_eq!(
            errors.for_field("password"),
            vec![
                "Password must be at least 8 characters",
                "Password must contain at least one uppercase letter",
                "Password must contain at least one number",
            ]
        );
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: " Gardener@Example.com".to_string(),
            password: "anything".to_string(),
        };
        let credentials = form.validate().unwrap();
        assert_eq!(credentials.email, "gardener@example.com");

        let errors = LoginForm::default().validate().unwrap_err();
        assert!(errors.has_field("email"));
        assert_eq!(errors.for_field("password"), vec!["Password is required"]);
    }

    #[test]
    fn test_length_limits() {
        let long_name = "x".repeat(51);
        let errors = register(&long_name, "a@b.co", "Sprout123", "Sprout123").validate().unwrap_err();
        assert_eq!(errors.for_field("username"), vec!["Name cannot exceed 50 characters"]);

        let long_password = format!("A1{}", "x".repeat(71));
        let errors = register("gardener", "a@b.co", &long_password, &long_password).validate().unwrap_err();
        assert_eq!(errors.for_field("password"), vec!["Password cannot exceed 72 characters"]);

        let form = ChangeUsernameForm {
            new_username: "y".repeat(31),
        };
        assert!(form.validate().is_err());
        let form = ChangeUsernameForm {
            new_username: format!(" {} ", "y".repeat(30)),
        };
        assert_eq!(form.validate().unwrap().len(), 30);
    }

    #[test]
    fn test_email_rules() {
        for good in ["a@b.co", "first.last+tag@mail.example.org", "x_y@sub-domain.io"] {
            assert!(is_valid_email(good), "{} should be valid", good);
        }
        for bad in ["", "plain", "@b.co", "a@b", "a@b.c", "a@@b.co", "a@.b.co", ".a@b.co", "a..b@c.co", "a b@c.co", "a@b-.co"] {
            assert!(!is_valid_email(bad), "{} should be invalid", bad);
        }

        let form = ChangeEmailForm {
            new_email: " New@Example.com ".to_string(),
        };
        assert_eq!(form.validate().unwrap(), "New@Example.com");
    }

    #[test]
    fn test_change_password() {
        let ok = ChangePasswordForm {
            old_password: "whatever".to_string(),
            new_password: "Sprout123".to_string(),
            confirm_new_password: "Sprout123".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = ChangePasswordForm::default().validate().unwrap_err();
        assert_eq!(empty.for_field("oldPassword"), vec!["Password is required"]);
        assert_eq!(empty.for_field("confirmNewPassword"), vec!["Password is required"]);
        assert!(empty.has_field("newPassword"));

        let mismatch = ChangePasswordForm {
            confirm_new_password: "Sprout124".to_string(),
            ..ok
        };
        let errors = mismatch.validate().unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.to_string(), "form has 1 invalid field(s)");
    }
}
