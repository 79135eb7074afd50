use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.has_column("movies", "uploaded_at").await? {
            return Ok(());
        }

        manager
            .alter_table(
                Table::alter()
                    .table(Movies::Table)
                    .add_column(big_integer_null(Movies::UploadedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(Table::alter().table(Movies::Table).drop_column(Movies::UploadedAt).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    UploadedAt,
}
