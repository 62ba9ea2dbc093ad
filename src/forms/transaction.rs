use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{Fields, FieldErrors, RawForm, MSG_NUMBER};

const COMMENT_MAX: usize = 500;
const MAX_DIGITS: usize = 10;
const DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// Amount in minor units (hundredths).
    pub amount_cents: i64,
    pub comment: String,
}

pub fn validate(raw: &RawForm) -> Result<TransactionDraft, FieldErrors> {
    let mut fields = Fields::new(raw);

    let amount_cents = fields.required("amount").and_then(|value| match to_cents(value) {
        Ok(cents) => Some(cents),
        Err(message) => {
            fields.error("amount", message);
            None
        }
    });

    let comment = fields.optional("comment");
    let comment_ok = fields.max_length("comment", comment, COMMENT_MAX);

    match amount_cents {
        Some(amount_cents) if comment_ok => Ok(TransactionDraft {
            amount_cents,
            comment: comment.to_string(),
        }),
        _ => Err(fields.into_errors()),
    }
}

/// Parse a decimal amount with at most 2 fraction digits and 10 digits in total.
fn to_cents(value: &str) -> Result<i64, String> {
    let amount = Decimal::from_str(value).map_err(|_| MSG_NUMBER.to_string())?;

    // "1.500" counts three places, as typed
    if amount.scale() > DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            DECIMAL_PLACES
        ));
    }

    let mut scaled = amount;
    scaled.rescale(DECIMAL_PLACES);
    let mantissa = scaled.mantissa();
    if mantissa.unsigned_abs().to_string().len() > MAX_DIGITS {
        return Err(format!(
            "Ensure that there are no more than {} digits in total.",
            MAX_DIGITS
        ));
    }

    mantissa.to_i64().ok_or_else(|| MSG_NUMBER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::MSG_REQUIRED;

    fn raw(pairs: &[(&str, &str)]) -> RawForm {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn amount_is_required_comment_is_not() {
        let errors = validate(&raw(&[("comment", "for the roof")])).unwrap_err();
        assert_eq!(errors["amount"], vec![MSG_REQUIRED.to_string()]);
        assert!(!errors.contains_key("comment"));

        let draft = validate(&raw(&[("amount", "100")])).unwrap();
        assert_eq!(draft.amount_cents, 10000);
        assert_eq!(draft.comment, "");
    }

    #[test]
    fn amounts_convert_to_minor_units() {
        assert_eq!(to_cents("12.5"), Ok(1250));
        assert_eq!(to_cents("0.01"), Ok(1));
        assert_eq!(to_cents("1.50"), Ok(150));
        assert_eq!(to_cents("99999999.99"), Ok(9_999_999_999));
    }

    #[test]
    fn amount_precision_is_bounded() {
        assert!(to_cents("1.234").is_err());
        assert!(to_cents("1.500").is_err());
        assert!(to_cents("10.000").is_err());
        assert!(to_cents("123456789").is_err());
        assert_eq!(to_cents("ten"), Err(MSG_NUMBER.to_string()));
    }
}
