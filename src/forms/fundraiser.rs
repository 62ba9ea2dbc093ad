use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use std::collections::BTreeMap;

use super::{echo, Fields, FieldErrors, RawForm, DATETIME_OUTPUT_FORMAT, MSG_CHOICE};
use crate::entities::{category, fundraiser};

pub const FIELDS: &[&str] = &[
    "name",
    "description",
    "purpose",
    "active",
    "start_date",
    "end_date",
    "category",
];

const NAME_MAX: usize = 50;

/// A validated fundraiser submission, not yet tied to an owner.
#[derive(Debug, Clone, PartialEq)]
pub struct FundraiserDraft {
    pub name: String,
    pub description: String,
    pub purpose: i32,
    pub active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub category_id: i32,
}

/// Validate a create/update submission. The outer error is a database
/// failure while checking the category; the inner one is the field errors.
pub async fn validate<C: ConnectionTrait>(
    raw: &RawForm,
    db: &C,
) -> Result<Result<FundraiserDraft, FieldErrors>, DbErr> {
    let mut fields = Fields::new(raw);

    let name = fields.text("name", NAME_MAX);
    let description = fields.required("description").map(str::to_string);

    let purpose = match fields.integer("purpose") {
        Some(value) if value < 0 => {
            fields.error("purpose", "Ensure this value is greater than or equal to 0.");
            None
        }
        Some(value) => match i32::try_from(value) {
            Ok(value) => Some(value),
            Err(_) => {
                fields.error("purpose", "Ensure this value is less than or equal to 2147483647.");
                None
            }
        },
        None => None,
    };

    let active = fields.checkbox("active");
    let start_date = fields.datetime("start_date");
    let end_date = fields.datetime("end_date");

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end <= start {
            fields.error("end_date", "The end date must be after the start date.");
        }
    }

    let category_id = match fields.integer("category").map(i32::try_from) {
        Some(Ok(id)) => {
            if category::Entity::find_by_id(id).one(db).await?.is_some() {
                Some(id)
            } else {
                fields.error("category", MSG_CHOICE);
                None
            }
        }
        Some(Err(_)) => {
            fields.error("category", MSG_CHOICE);
            None
        }
        None => None,
    };

    if fields.has_errors() {
        return Ok(Err(fields.into_errors()));
    }

    match (name, description, purpose, start_date, end_date, category_id) {
        (Some(name), Some(description), Some(purpose), Some(start_date), Some(end_date), Some(category_id)) => {
            Ok(Ok(FundraiserDraft {
                name,
                description,
                purpose,
                active,
                start_date,
                end_date,
                category_id,
            }))
        }
        // every missing value above has recorded an error
        _ => Ok(Err(fields.into_errors())),
    }
}

/// Values for an edit form pre-filled from a stored fundraiser.
pub fn initial(fundraiser: &fundraiser::Model) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    values.insert("name".to_string(), fundraiser.name.clone());
    values.insert("description".to_string(), fundraiser.description.clone());
    values.insert("purpose".to_string(), fundraiser.purpose.to_string());
    if fundraiser.active {
        values.insert("active".to_string(), "on".to_string());
    }
    values.insert(
        "start_date".to_string(),
        fundraiser.start_date.format(DATETIME_OUTPUT_FORMAT).to_string(),
    );
    values.insert(
        "end_date".to_string(),
        fundraiser.end_date.format(DATETIME_OUTPUT_FORMAT).to_string(),
    );
    values.insert("category".to_string(), fundraiser.category_id.to_string());
    values
}

/// Submitted values for redisplay after a failed validation.
pub fn submitted(raw: &RawForm) -> BTreeMap<String, String> {
    echo(raw, FIELDS)
}
