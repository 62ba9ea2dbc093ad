use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::Serialize;

use crate::slug;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "fundraisers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub name: String,
    pub slug: String, // always slugify(name)
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub purpose: i32, // funding goal, never negative
    pub active: bool,
    pub category_id: i32,
    pub owner_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub votes_positive: i32,
    pub votes_negative: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        slug::refresh(&self.name, &mut self.slug);
        super::touch(&mut self.created_at, &mut self.updated_at, insert);
        if insert {
            if self.votes_positive.is_not_set() {
                self.votes_positive = ActiveValue::Set(0);
            }
            if self.votes_negative.is_not_set() {
                self.votes_negative = ActiveValue::Set(0);
            }
        }
        Ok(self)
    }
}

impl Model {
    /// Active and inside its start/end window at `now`.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.start_date <= now && now <= self.end_date
    }

    pub fn label(&self) -> String {
        format!("({}){}", self.id, self.name)
    }
}
