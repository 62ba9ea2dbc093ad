use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string_len(150).not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Users::FirstName).string_len(150).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(150).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::Token).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(Sessions::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_user")
                            .from(Sessions::Table, Sessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Categories::Slug).string_len(50).not_null())
                    .col(timestamp(Categories::CreatedAt))
                    .col(timestamp(Categories::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_slug")
                    .table(Categories::Table)
                    .col(Categories::Slug)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Fundraisers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fundraisers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fundraisers::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Fundraisers::Slug).string_len(50).not_null())
                    .col(ColumnDef::new(Fundraisers::Description).text().not_null())
                    .col(ColumnDef::new(Fundraisers::Purpose).integer().not_null())
                    .col(ColumnDef::new(Fundraisers::Active).boolean().not_null().default(false))
                    .col(ColumnDef::new(Fundraisers::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Fundraisers::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Fundraisers::StartDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Fundraisers::EndDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Fundraisers::VotesPositive).integer().not_null().default(0))
                    .col(ColumnDef::new(Fundraisers::VotesNegative).integer().not_null().default(0))
                    .col(timestamp(Fundraisers::CreatedAt))
                    .col(timestamp(Fundraisers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fundraisers_category")
                            .from(Fundraisers::Table, Fundraisers::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fundraisers_owner")
                            .from(Fundraisers::Table, Fundraisers::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::Message).string_len(500).not_null())
                    .col(ColumnDef::new(Comments::UserId).integer().null())
                    .col(ColumnDef::new(Comments::FundraiserId).integer().not_null())
                    .col(timestamp(Comments::CreatedAt))
                    .col(timestamp(Comments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_user")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_fundraiser")
                            .from(Comments::Table, Comments::FundraiserId)
                            .to(Fundraisers::Table, Fundraisers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::FundraiserId).integer().not_null())
                    .col(ColumnDef::new(Transactions::Comment).string_len(500).not_null().default(""))
                    .col(ColumnDef::new(Transactions::AmountCents).big_integer().not_null()) // minor units, 2 fraction digits
                    .col(ColumnDef::new(Transactions::UserId).integer().null())
                    .col(timestamp(Transactions::CreatedAt))
                    .col(timestamp(Transactions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_fundraiser")
                            .from(Transactions::Table, Transactions::FundraiserId)
                            .to(Fundraisers::Table, Fundraisers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_user")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StaticPages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaticPages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StaticPages::Title).string_len(50).not_null())
                    .col(ColumnDef::new(StaticPages::Slug).string_len(50).not_null())
                    .col(ColumnDef::new(StaticPages::Body).text().not_null())
                    .col(timestamp(StaticPages::CreatedAt))
                    .col(timestamp(StaticPages::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_static_pages_slug")
                    .table(StaticPages::Table)
                    .col(StaticPages::Slug)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StaticPages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fundraisers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

// created_at / updated_at share one definition
fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Token,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Slug,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Fundraisers {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Purpose,
    Active,
    CategoryId,
    OwnerId,
    StartDate,
    EndDate,
    VotesPositive,
    VotesNegative,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    Message,
    UserId,
    FundraiserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    FundraiserId,
    Comment,
    AmountCents,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StaticPages {
    Table,
    Id,
    Title,
    Slug,
    Body,
    CreatedAt,
    UpdatedAt,
}
