use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Borrows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Borrows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Borrows::UserId).integer().not_null())
                    .col(ColumnDef::new(Borrows::BookId).integer().not_null())
                    .col(ColumnDef::new(Borrows::Status).string().not_null())
                    .col(
                        ColumnDef::new(Borrows::BorrowedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Borrows::ReturnedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Borrows::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Borrows::Table, Borrows::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Borrows::Table)
                    .col(Borrows::UserId)
                    .name("idx_borrows_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Borrows::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Borrows {
    Table,
    Id,
    UserId,
    BookId,
    Status,
    BorrowedAt,
    ReturnedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Books {
    Table,
    Id,
}
