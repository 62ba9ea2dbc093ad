//! Reads and writes behind the request handlers and the admin binary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::entities::{category, comment, fundraiser, static_page, transaction};
use crate::error::AppError;
use crate::forms::comment::CommentDraft;
use crate::forms::fundraiser::FundraiserDraft;
use crate::forms::transaction::TransactionDraft;

/// Recognised ballot values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// `"up"` and `"down"`; anything else is not a vote.
    pub fn parse(value: &str) -> Option<Vote> {
        match value {
            "up" => Some(Vote::Up),
            "down" => Some(Vote::Down),
            _ => None,
        }
    }
}

/// All fundraisers, newest first.
fn newest_first() -> Select<fundraiser::Entity> {
    fundraiser::Entity::find().order_by_desc(fundraiser::Column::Id)
}

/// Fundraisers that are active and inside their date window at `now`, newest first.
pub fn open_fundraisers(now: DateTime<Utc>) -> Select<fundraiser::Entity> {
    newest_first()
        .filter(fundraiser::Column::Active.eq(true))
        .filter(fundraiser::Column::StartDate.lte(now))
        .filter(fundraiser::Column::EndDate.gte(now))
}

pub async fn list_open<C: ConnectionTrait>(db: &C) -> Result<Vec<fundraiser::Model>, DbErr> {
    open_fundraisers(Utc::now()).all(db).await
}

/// Everything `owner_id` owns, whatever its status.
pub async fn list_owned<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
) -> Result<Vec<fundraiser::Model>, DbErr> {
    newest_first()
        .filter(fundraiser::Column::OwnerId.eq(owner_id))
        .all(db)
        .await
}

pub async fn list_open_in_category<C: ConnectionTrait>(
    db: &C,
    category_id: i32,
) -> Result<Vec<fundraiser::Model>, DbErr> {
    open_fundraisers(Utc::now())
        .filter(fundraiser::Column::CategoryId.eq(category_id))
        .all(db)
        .await
}

pub async fn find_fundraiser<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<fundraiser::Model, AppError> {
    fundraiser::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("fundraiser {}", id)))
}

pub async fn find_category_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
) -> Result<category::Model, AppError> {
    category::Entity::find()
        .filter(category::Column::Slug.eq(slug))
        .order_by_asc(category::Column::Id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {}", slug)))
}

pub async fn create_fundraiser<C: ConnectionTrait>(
    db: &C,
    draft: FundraiserDraft,
    owner_id: i32,
) -> Result<fundraiser::Model, DbErr> {
    let mut model = fundraiser::ActiveModel {
        owner_id: Set(owner_id),
        ..Default::default()
    };
    apply_draft(&mut model, draft);
    model.insert(db).await
}

pub async fn update_fundraiser<C: ConnectionTrait>(
    db: &C,
    existing: fundraiser::Model,
    draft: FundraiserDraft,
) -> Result<fundraiser::Model, DbErr> {
    let mut model = existing.into_active_model();
    apply_draft(&mut model, draft);
    model.update(db).await
}

fn apply_draft(model: &mut fundraiser::ActiveModel, draft: FundraiserDraft) {
    model.name = Set(draft.name);
    model.description = Set(draft.description);
    model.purpose = Set(draft.purpose);
    model.active = Set(draft.active);
    model.start_date = Set(draft.start_date);
    model.end_date = Set(draft.end_date);
    model.category_id = Set(draft.category_id);
}

/// Add one vote as a single `col = col + 1` update.
pub async fn record_vote<C: ConnectionTrait>(
    db: &C,
    fundraiser_id: i32,
    vote: Vote,
) -> Result<(), DbErr> {
    let column = match vote {
        Vote::Up => fundraiser::Column::VotesPositive,
        Vote::Down => fundraiser::Column::VotesNegative,
    };
    fundraiser::Entity::update_many()
        .col_expr(column, Expr::col(column).add(1))
        .col_expr(fundraiser::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(fundraiser::Column::Id.eq(fundraiser_id))
        .exec(db)
        .await?;
    Ok(())
}

pub async fn add_comment<C: ConnectionTrait>(
    db: &C,
    fundraiser_id: i32,
    user_id: Option<i32>,
    draft: CommentDraft,
) -> Result<comment::Model, DbErr> {
    comment::ActiveModel {
        message: Set(draft.message),
        fundraiser_id: Set(fundraiser_id),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn add_transaction<C: ConnectionTrait>(
    db: &C,
    fundraiser_id: i32,
    user_id: Option<i32>,
    draft: TransactionDraft,
) -> Result<transaction::Model, DbErr> {
    transaction::ActiveModel {
        fundraiser_id: Set(fundraiser_id),
        comment: Set(draft.comment),
        amount_cents: Set(draft.amount_cents),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn comments_for<C: ConnectionTrait>(
    db: &C,
    fundraiser_id: i32,
) -> Result<Vec<comment::Model>, DbErr> {
    comment::Entity::find()
        .filter(comment::Column::FundraiserId.eq(fundraiser_id))
        .order_by_desc(comment::Column::Id)
        .all(db)
        .await
}

/// SUM of every pledge on the fundraiser; zero when there are none.
pub async fn transaction_sum<C: ConnectionTrait>(
    db: &C,
    fundraiser_id: i32,
) -> Result<Decimal, DbErr> {
    // Postgres widens SUM(bigint) to numeric, so cast back for a uniform i64
    let total = SimpleExpr::FunctionCall(Func::cast_as(
        Func::sum(Expr::col(transaction::Column::AmountCents)),
        Alias::new("BIGINT"),
    ));

    let cents: Option<Option<i64>> = transaction::Entity::find()
        .select_only()
        .column_as(total, "total")
        .filter(transaction::Column::FundraiserId.eq(fundraiser_id))
        .into_tuple()
        .one(db)
        .await?;

    Ok(transaction::cents_to_amount(cents.flatten().unwrap_or(0)))
}

/// Category names and page titles share the 50-character column width.
const TITLE_MAX: usize = 50;

/// Trimmed `value`, rejected when blank or wider than its column.
fn checked_title<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidRequest(format!("{} must not be blank", field)));
    }
    let length = value.chars().count();
    if length > TITLE_MAX {
        return Err(AppError::InvalidRequest(format!(
            "{} has {} characters, at most {} allowed",
            field, length, TITLE_MAX
        )));
    }
    Ok(value)
}

pub async fn create_category<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<category::Model, AppError> {
    let name = checked_title("category name", name)?;
    Ok(category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn rename_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
    name: &str,
) -> Result<category::Model, AppError> {
    let name = checked_title("category name", name)?;
    let existing = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {}", id)))?;
    let mut model = existing.into_active_model();
    model.name = Set(name.to_string());
    Ok(model.update(db).await?)
}

pub async fn create_static_page<C: ConnectionTrait>(
    db: &C,
    title: &str,
    body: &str,
) -> Result<static_page::Model, AppError> {
    let title = checked_title("page title", title)?;
    Ok(static_page::ActiveModel {
        title: Set(title.to_string()),
        body: Set(body.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn find_static_page<C: ConnectionTrait>(
    db: &C,
    slug: &str,
) -> Result<static_page::Model, AppError> {
    static_page::Entity::find()
        .filter(static_page::Column::Slug.eq(slug))
        .order_by_asc(static_page::Column::Id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("page {}", slug)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_must_fit_their_column() {
        assert_eq!(checked_title("name", "  Health  ").unwrap(), "Health");
        assert!(checked_title("name", &"x".repeat(50)).is_ok());
        assert!(matches!(
            checked_title("name", &"x".repeat(51)),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(checked_title("name", "   "), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn only_up_and_down_are_votes() {
        assert_eq!(Vote::parse("up"), Some(Vote::Up));
        assert_eq!(Vote::parse("down"), Some(Vote::Down));
        assert_eq!(Vote::parse("not set"), None);
        assert_eq!(Vote::parse("UP"), None);
        assert_eq!(Vote::parse(""), None);
    }
}
