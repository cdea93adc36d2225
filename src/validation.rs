//! Form validation with English and Persian messages
//!
//! Each validator checks every field and reports all failures at once, in
//! the locale the form is rendered in.

use serde::Serialize;
use thiserror::Error;

use crate::api::LoginMethod;
use crate::routing::Locale;
use crate::security::{Sanitizer, SanitizerError};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;
pub const OTP_LENGTH: usize = 6;

struct Messages {
    required: &'static str,
    email: &'static str,
    password: &'static str,
    confirm_password: &'static str,
    username: &'static str,
    username_chars: &'static str,
    otp: &'static str,
}

const EN: Messages = Messages {
    required: "This field is required",
    email: "Please enter a valid email address",
    password: "Password must be at least 6 characters",
    confirm_password: "Passwords must match",
    username: "Username must be at least 3 characters",
    username_chars: "Username contains invalid characters",
    otp: "OTP must be 6 digits",
};

const FA: Messages = Messages {
    required: "این فیلد الزامی است",
    email: "لطفاً یک آدرس ایمیل معتبر وارد کنید",
    password: "رمز عبور باید حداقل 6 کاراکتر باشد",
    confirm_password: "رمزهای عبور باید مطابقت داشته باشند",
    username: "نام کاربری باید حداقل 3 کاراکتر باشد",
    username_chars: "نام کاربری شامل کاراکترهای نامعتبر است",
    otp: "کد تایید باید 6 رقم باشد",
};

fn messages(locale: Locale) -> &'static Messages {
    match locale {
        Locale::En => &EN,
        Locale::Fa => &FA,
    }
}

fn max_length_message(locale: Locale, max: usize) -> String {
    match locale {
        Locale::En => format!("Must be no more than {} characters", max),
        Locale::Fa => format!("باید حداکثر {} کاراکتر باشد", max),
    }
}

/// One failed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// All field failures of a form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid form: {}", summary(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message reported for `field`
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub username: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: Option<String>,
    pub login_method: LoginMethod,
}

/// Loose address check: one `@`, a local part, and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    }
}

fn check_email(email: &str, t: &Messages, errors: &mut Vec<FieldError>) {
    if email.trim().is_empty() {
        errors.push(FieldError::new("email", t.required));
    } else if !is_valid_email(email.trim()) {
        errors.push(FieldError::new("email", t.email));
    }
}

fn check_password(password: &str, t: &Messages, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new("password", t.required));
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new("password", t.password));
    }
}

pub fn validate_signup(form: &SignupForm, locale: Locale) -> Result<(), ValidationError> {
    let t = messages(locale);
    let mut errors = Vec::new();

    check_email(&form.email, t, &mut errors);
    check_password(&form.password, t, &mut errors);

    if form.confirm_password.is_empty() {
        errors.push(FieldError::new("confirmPassword", t.required));
    } else if form.confirm_password != form.password {
        errors.push(FieldError::new("confirmPassword", t.confirm_password));
    }

    let username = form.username.trim();
    if username.is_empty() {
        errors.push(FieldError::new("username", t.required));
    } else if username.chars().count() < MIN_USERNAME_LENGTH {
        errors.push(FieldError::new("username", t.username));
    } else {
        match Sanitizer::validate_input_with_max_length(username, MAX_USERNAME_LENGTH) {
            Ok(()) => {}
            Err(SanitizerError::TooLong(max)) => {
                errors.push(FieldError::new("username", max_length_message(locale, max)))
            }
            Err(_) => errors.push(FieldError::new("username", t.username_chars)),
        }
    }

    finish(errors)
}

/// Password rules only apply to password logins
pub fn validate_login(form: &LoginForm, locale: Locale) -> Result<(), ValidationError> {
    let t = messages(locale);
    let mut errors = Vec::new();

    check_email(&form.email, t, &mut errors);
    if form.login_method == LoginMethod::Password {
        check_password(form.password.as_deref().unwrap_or_default(), t, &mut errors);
    }

    finish(errors)
}

pub fn validate_otp(code: &str, locale: Locale) -> Result<(), ValidationError> {
    let t = messages(locale);
    let code = code.trim();

    if code.is_empty() {
        return finish(vec![FieldError::new("otp", t.required)]);
    }
    if code.len() != OTP_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return finish(vec![FieldError::new("otp", t.otp)]);
    }
    Ok(())
}

/// Email step of the OTP login
pub fn validate_otp_email(email: &str, locale: Locale) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    check_email(email, messages(locale), &mut errors);
    finish(errors)
}
