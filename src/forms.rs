// Form validation done by the presentation shell before any provider or
// store call. Failures are `AppError::Validation` rendered on the form.

use serde::Deserialize;

use crate::domains::{parse_date, NewInfoContact, NewNetworkingContact, ResponseGrade};
use crate::error::{AppError, AppResult};
use crate::session::SignUp;

pub const MIN_PASSWORD_LENGTH: usize = 6;

fn required(value: &str, label: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", label)));
    }
    Ok(value.to_string())
}

fn valid_date(date: &str) -> AppResult<String> {
    let date = required(date, "Date")?;
    if parse_date(&date).is_none() {
        return Err(AppError::Validation(format!(
            "Date must be formatted YYYY-MM-DD, got {}",
            date
        )));
    }
    Ok(date)
}

fn check_password_length(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordChangeForm {
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChangeForm {
    /// Confirmation is checked before length
    pub fn validate(&self) -> AppResult<&str> {
        if self.new_password != self.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        check_password_length(&self.new_password)?;
        Ok(&self.new_password)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl SignUpForm {
    pub fn validate(self) -> AppResult<SignUp> {
        let name = required(&self.name, "Name")?;
        let email = required(&self.email, "Email")?;
        let phone = required(&self.phone, "Phone")?;
        if let Some(password) = &self.password {
            check_password_length(password)?;
        }
        Ok(SignUp {
            name,
            email,
            phone,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> AppResult<(String, &str)> {
        let email = required(&self.email, "Email")?;
        if self.password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        Ok((email, &self.password))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkingForm {
    pub name: String,
    pub details: String,
    #[serde(default)]
    pub remarks: String,
    pub date: String,
}

impl NetworkingForm {
    pub fn validate(self) -> AppResult<NewNetworkingContact> {
        Ok(NewNetworkingContact {
            name: required(&self.name, "Name")?,
            details: required(&self.details, "Details")?,
            remarks: self.remarks.trim().to_string(),
            date: valid_date(&self.date)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkipForm {
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfoForm {
    pub networking_id: String,
    pub response: String,
    #[serde(default)]
    pub remarks: String,
    pub date: String,
}

impl InfoForm {
    pub fn validate(self) -> AppResult<NewInfoContact> {
        Ok(NewInfoContact {
            networking_id: required(&self.networking_id, "Contact")?,
            response: self.response.parse::<ResponseGrade>()?,
            remarks: self.remarks.trim().to_string(),
            date: valid_date(&self.date)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password_form(new: &str, confirm: &str) -> PasswordChangeForm {
        PasswordChangeForm {
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_password_length_boundary() {
        assert!(matches!(
            password_form("abcde", "abcde").validate(),
            Err(AppError::Validation(_))
        ));
        assert_eq!(password_form("abcdef", "abcdef").validate().unwrap(), "abcdef");
    }

    #[test]
    fn test_password_mismatch_reported_first() {
        let err = password_form("abc", "abd").validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Passwords do not match");
    }

    #[test]
    fn test_networking_required_fields() {
        let form = NetworkingForm {
            name: "  ".to_string(),
            details: "VP Sales".to_string(),
            remarks: String::new(),
            date: "2024-01-05".to_string(),
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));

        let form = NetworkingForm {
            name: "Bob".to_string(),
            details: "VP Sales".to_string(),
            remarks: " met at expo ".to_string(),
            date: "2024-01-05".to_string(),
        };
        let contact = form.validate().unwrap();
        assert_eq!(contact.name, "Bob");
        assert_eq!(contact.remarks, "met at expo");
    }

    #[test]
    fn test_date_format_enforced() {
        let form = NetworkingForm {
            name: "Bob".to_string(),
            details: "VP Sales".to_string(),
            remarks: String::new(),
            date: "01/05/2024".to_string(),
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_info_form_grade() {
        let form = InfoForm {
            networking_id: "abc".to_string(),
            response: "excellent".to_string(),
            remarks: String::new(),
            date: "2024-01-05".to_string(),
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));

        let form = InfoForm {
            networking_id: "abc".to_string(),
            response: "neutral".to_string(),
            remarks: String::new(),
            date: "2024-01-05".to_string(),
        };
        assert_eq!(form.validate().unwrap().response, ResponseGrade::Neutral);
    }

    #[test]
    fn test_sign_up_form() {
        let form = SignUpForm {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: "".to_string(),
            password: None,
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));

        let form = SignUpForm {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: "555-0100".to_string(),
            password: Some("short".to_string()),
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            email: " jane@x.com ".to_string(),
            password: "".to_string(),
        };
        assert!(form.validate().is_err());
        let form = LoginForm {
            email: " jane@x.com ".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(form.validate().unwrap().0, "jane@x.com");
    }
}
