//! Field-level validation for the signup form.

use std::collections::BTreeMap;

use sweet_home_core::Email;

/// Shortest password the signup form accepts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A form field that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignupField {
    Username,
    Email,
    Password,
    Confirm,
}

/// Errors keyed by field, one message per field.
pub type FieldErrors = BTreeMap<SignupField, &'static str>;

/// What the shopper typed into the signup form.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl SignupForm {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the message for each field that fails, keyed by field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if Email::parse(&self.email).is_err() {
            errors.insert(SignupField::Email, "Invalid email");
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.insert(SignupField::Password, "Minimum 8 characters");
        }
        if self.password != self.confirm {
            errors.insert(SignupField::Confirm, "Passwords must match");
        }
        if self.username.trim().is_empty() {
            errors.insert(SignupField::Username, "Username required");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SignupForm {
        SignupForm {
            username: "maya".to_string(),
            email: "maya@sweets.test".to_string(),
            password: "caramel42".to_string(),
            confirm: "caramel42".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_every_rule_reported() {
        let form = SignupForm {
            username: "   ".to_string(),
            email: "maya@localhost".to_string(),
            password: "short".to_string(),
            confirm: "other".to_string(),
        };
        let errors = form.validate().err().unwrap_or_default();
        assert_eq!(errors.get(&SignupField::Username), Some(&"Username required"));
        assert_eq!(errors.get(&SignupField::Email), Some(&"Invalid email"));
        assert_eq!(errors.get(&SignupField::Password), Some(&"Minimum 8 characters"));
        assert_eq!(errors.get(&SignupField::Confirm), Some(&"Passwords must match"));
    }

    #[test]
    fn test_single_failure() {
        let form = SignupForm {
            confirm: "caramel43".to_string(),
            ..valid()
        };
        let errors = form.validate().err().unwrap_or_default();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(&SignupField::Confirm));
    }

    #[test]
    fn test_password_length_boundary() {
        let form = SignupForm {
            password: "12345678".to_string(),
            confirm: "12345678".to_string(),
            ..valid()
        };
        assert!(form.validate().is_ok());
    }
}
