//! Input validation for account forms

pub mod forms;

pub use forms::{
    is_valid_email, ChangeEmailForm, ChangePasswordForm, ChangeUsernameForm, FieldError, FormErrors,
    LoginCredentials, LoginForm, RegisterForm, Registration,
};
