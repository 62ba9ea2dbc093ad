use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::slug;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub name: String,
    pub slug: String, // always slugify(name)
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fundraiser::Entity")]
    Fundraisers,
}

impl Related<super::fundraiser::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fundraisers.def()
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
        Ok(self)
    }
}

impl Model {
    pub fn label(&self) -> String {
        format!("({}){}", self.id, self.name)
    }
}
