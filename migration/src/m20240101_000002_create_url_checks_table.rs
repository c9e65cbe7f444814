use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UrlChecks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UrlChecks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UrlChecks::UrlId).integer().not_null())
                    .col(ColumnDef::new(UrlChecks::StatusCode).integer())
                    .col(ColumnDef::new(UrlChecks::H1).string_len(255))
                    .col(ColumnDef::new(UrlChecks::Title).string_len(255))
                    .col(ColumnDef::new(UrlChecks::Description).string_len(255))
                    .col(
                        ColumnDef::new(UrlChecks::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_url_checks_url_id")
                            .from(UrlChecks::Table, UrlChecks::UrlId)
                            .to(Urls::Table, Urls::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 详情页按站点查询检查历史
        manager
            .create_index(
                Index::create()
                    .name("idx_url_checks_url_id_created_at")
                    .table(UrlChecks::Table)
                    .col(UrlChecks::UrlId)
                    .col(UrlChecks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UrlChecks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UrlChecks {
    Table,
    Id,
    UrlId,
    StatusCode,
    H1,
    Title,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Urls {
    Table,
    Id,
}
