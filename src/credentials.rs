//! 登录与注册表单的客户端校验

use crate::validation::ValidationErrors;
use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CredentialField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

fn check_email(errors: &mut ValidationErrors<CredentialField>, email: &str) {
    if !EMAIL_RE.is_match(email.trim()) {
        errors.add(CredentialField::Email, "Invalid email address");
    }
}

fn check_password_len(errors: &mut ValidationErrors<CredentialField>, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            CredentialField::Password,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
}

impl LoginInput {
    pub fn validate(&self) -> Result<(), ValidationErrors<CredentialField>> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        check_password_len(&mut errors, &self.password);
        errors.into_result(())
    }
}

impl RegisterInput {
    pub fn validate(&self) -> Result<(), ValidationErrors<CredentialField>> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().chars().count() < MIN_NAME_LEN {
            errors.add(
                CredentialField::Name,
                format!("Name must be at least {} characters", MIN_NAME_LEN),
            );
        }
        check_email(&mut errors, &self.email);
        check_password_len(&mut errors, &self.password);

        let has_lower = self.password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = self.password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = self.password.chars().any(|c| c.is_ascii_digit());
        if !(has_lower && has_upper && has_digit) {
            errors.add(
                CredentialField::Password,
                "Password must contain uppercase, lowercase, and numbers",
            );
        }

        if self.password != self.confirm_password {
            errors.add(CredentialField::ConfirmPassword, "Passwords don't match");
        }

        errors.into_result(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_email_shape_and_length() {
        let errors = LoginInput {
            email: "not-an-email".into(),
            password: "short".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get(CredentialField::Email), Some("Invalid email address"));
        assert_eq!(
            errors.get(CredentialField::Password),
            Some("Password must be at least 8 characters")
        );

        assert!(LoginInput {
            email: " ada@example.com ".into(),
            password: "whatever1".into(),
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn register_password_rules() {
        let mut input = RegisterInput {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "alllowercase1".into(),
            confirm_password: "alllowercase1".into(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(
            errors.get(CredentialField::Password),
            Some("Password must contain uppercase, lowercase, and numbers")
        );

        input.password = "Mixed123".into();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.get(CredentialField::ConfirmPassword), Some("Passwords don't match"));

        input.confirm_password = "Mixed123".into();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn register_name_length() {
        let errors = RegisterInput {
            name: " A ".into(),
            email: "a@b.io".into(),
            password: "Mixed123".into(),
            confirm_password: "Mixed123".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(CredentialField::Name).is_some());
    }
}
