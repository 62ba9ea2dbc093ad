use sea_orm::{ConnectionTrait, DbErr};

use super::{Fields, FieldErrors, RawForm};
use crate::auth;

/// Fields a registration must fill in. Applied uniformly by `validate_registration`.
pub const REGISTRATION_REQUIRED: &[&str] = &["email", "first_name", "last_name", "password"];

/// Registration fields that may be echoed back (never the password).
pub const REGISTRATION_ECHO: &[&str] = &["email", "first_name", "last_name"];

const NAME_MAX: usize = 150;
const EMAIL_MAX: usize = 254;

#[derive(Debug, Clone, PartialEq)]
pub struct LoginDraft {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationDraft {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub fn validate_login(raw: &RawForm) -> Result<LoginDraft, FieldErrors> {
    let mut fields = Fields::new(raw);
    let username = fields.required("username");
    // passwords are taken as typed
    let password = raw.get("password").filter(|p| !p.is_empty());
    if password.is_none() {
        fields.error("password", super::MSG_REQUIRED);
    }
    match (username, password) {
        (Some(username), Some(password)) => Ok(LoginDraft {
            username: username.to_string(),
            password: password.clone(),
        }),
        _ => Err(fields.into_errors()),
    }
}

/// Validate a registration. The outer error is a database failure while
/// checking that the email is free.
pub async fn validate_registration<C: ConnectionTrait>(
    raw: &RawForm,
    db: &C,
) -> Result<Result<RegistrationDraft, FieldErrors>, DbErr> {
    let mut fields = Fields::new(raw);

    for name in REGISTRATION_REQUIRED {
        fields.required(name);
    }

    let email = fields.optional("email");
    let first_name = fields.optional("first_name");
    let last_name = fields.optional("last_name");

    fields.max_length("email", email, EMAIL_MAX);
    fields.max_length("first_name", first_name, NAME_MAX);
    fields.max_length("last_name", last_name, NAME_MAX);

    if !email.is_empty() {
        if !is_plausible_email(email) {
            fields.error("email", "Enter a valid email address.");
        } else if auth::username_taken(db, email).await? {
            fields.error("email", "A user with that email already exists.");
        }
    }

    if fields.has_errors() {
        return Ok(Err(fields.into_errors()));
    }

    Ok(Ok(RegistrationDraft {
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        password: raw.get("password").cloned().unwrap_or_default(),
    }))
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::MSG_REQUIRED;

    fn raw(pairs: &[(&str, &str)]) -> RawForm {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn login_needs_both_fields() {
        let errors = validate_login(&raw(&[("username", "test")])).unwrap_err();
        assert_eq!(errors["password"], vec![MSG_REQUIRED.to_string()]);

        let draft = validate_login(&raw(&[("username", "test"), ("password", " 123456 ")])).unwrap();
        assert_eq!(draft.password, " 123456 ");
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(is_plausible_email("test2@test.pl"));
        assert!(!is_plausible_email("test2.test.pl"));
        assert!(!is_plausible_email("@test.pl"));
        assert!(!is_plausible_email("test@localhost"));
    }
}
