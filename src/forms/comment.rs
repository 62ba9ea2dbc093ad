use super::{Fields, FieldErrors, RawForm};

const MESSAGE_MAX: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct CommentDraft {
    pub message: String,
}

pub fn validate(raw: &RawForm) -> Result<CommentDraft, FieldErrors> {
    let mut fields = Fields::new(raw);
    match fields.text("message", MESSAGE_MAX) {
        Some(message) => Ok(CommentDraft { message }),
        None => Err(fields.into_errors()),
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
    fn message_is_required() {
        let errors = validate(&raw(&[])).unwrap_err();
        assert_eq!(errors["message"], vec![MSG_REQUIRED.to_string()]);
    }

    #[test]
    fn message_is_capped_at_500_characters() {
        assert!(validate(&raw(&[("message", &"x".repeat(500))])).is_ok());
        assert!(validate(&raw(&[("message", &"x".repeat(501))])).is_err());
    }

    #[test]
    fn valid_message_is_trimmed() {
        let draft = validate(&raw(&[("message", "  hi  ")])).unwrap();
        assert_eq!(draft.message, "hi");
    }
}
