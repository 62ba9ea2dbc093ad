use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A pledge ledger row. No money moves; the amount is only recorded.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub fundraiser_id: i32,
    pub comment: String,
    #[serde(skip_serializing)]
    pub amount_cents: i64, // minor units, see `amount()`
    pub user_id: Option<i32>, // None for anonymous pledges
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fundraiser::Entity",
        from = "Column::FundraiserId",
        to = "super::fundraiser::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Fundraiser,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::fundraiser::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fundraiser.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        super::touch(&mut self.created_at, &mut self.updated_at, insert);
        Ok(self)
    }
}

impl Model {
    /// Pledged amount with two fraction digits.
    pub fn amount(&self) -> Decimal {
        cents_to_amount(self.amount_cents)
    }
}

pub fn cents_to_amount(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_keep_two_fraction_digits() {
        assert_eq!(cents_to_amount(10000).to_string(), "100.00");
        assert_eq!(cents_to_amount(1250).to_string(), "12.50");
        assert_eq!(cents_to_amount(0).to_string(), "0.00");
    }
}
