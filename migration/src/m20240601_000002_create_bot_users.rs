use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // user_id comes from the messaging platform, so no auto increment here.
        manager
            .create_table(
                Table::create()
                    .table(BotUsers::Table)
                    .if_not_exists()
                    .col(big_integer(BotUsers::UserId).primary_key())
                    .col(string_null(BotUsers::Username))
                    .col(string_null(BotUsers::FirstName))
                    .col(string_null(BotUsers::LastName))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BotUsers::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum BotUsers {
    Table,
    UserId,
    Username,
    FirstName,
    LastName,
}
