use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_uniq(Movies::Title))
                    .col(string_null(Movies::PosterUrl))
                    .col(string_null(Movies::File480p))
                    .col(string_null(Movies::File720p))
                    .col(string_null(Movies::File1080p))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    PosterUrl,
    #[sea_orm(iden = "file_480p")]
    File480p,
    #[sea_orm(iden = "file_720p")]
    File720p,
    #[sea_orm(iden = "file_1080p")]
    File1080p,
}
