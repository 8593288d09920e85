use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Items {
    Table,
    UserId,
    Inventory,
    ItemKey,
    Payload,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Items::UserId).string().not_null())
                    .col(ColumnDef::new(Items::Inventory).string().not_null())
                    .col(ColumnDef::new(Items::ItemKey).string().not_null())
                    .col(ColumnDef::new(Items::Payload).text().not_null())
                    .primary_key(
                        Index::create()
                            .col(Items::UserId)
                            .col(Items::Inventory)
                            .col(Items::ItemKey),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-items-user_id")
                    .table(Items::Table)
                    .col(Items::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await
    }
}
