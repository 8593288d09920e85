use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait, sea_query::OnConflict,
};

use super::{ItemStore, record_key};
use crate::{Record, ResultEngine};

mod items {
    use sea_orm::entity::prelude::*;

    /// One stored item. `payload` is the JSON text of its record.
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "items")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub user_id: String,
        #[sea_orm(primary_key, auto_increment = false)]
        pub inventory: String,
        #[sea_orm(primary_key, auto_increment = false)]
        pub item_key: String,
        pub payload: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Stores items in a SQL database through sea-orm.
///
/// The schema comes from the `migration` crate. In read-only mode writes are
/// logged and skipped while reads keep working.
#[derive(Clone, Debug)]
pub struct DatabaseStore {
    database: DatabaseConnection,
    read_only: bool,
}

impl DatabaseStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            database,
            read_only: false,
        }
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    fn skip_write(&self, action: &str, username: &str, inventory: &str) -> bool {
        if self.read_only {
            tracing::warn!(username, inventory, "read-only store: skipping {action}");
        }
        self.read_only
    }
}

impl ItemStore for DatabaseStore {
    async fn load(&self, username: &str, inventory: &str) -> ResultEngine<Vec<Record>> {
        let rows = items::Entity::find()
            .filter(items::Column::UserId.eq(username))
            .filter(items::Column::Inventory.eq(inventory))
            .order_by_asc(items::Column::ItemKey)
            .all(&self.database)
            .await?;

        rows.iter()
            .map(|row| -> ResultEngine<Record> { Ok(serde_json::from_str(&row.payload)?) })
            .collect()
    }

    async fn save(&self, username: &str, inventory: &str, records: &[Record]) -> ResultEngine<()> {
        if self.skip_write("save", username, inventory) {
            return Ok(());
        }

        let rows = records
            .iter()
            .map(|record| -> ResultEngine<items::ActiveModel> {
                Ok(items::ActiveModel {
                    user_id: ActiveValue::Set(username.to_string()),
                    inventory: ActiveValue::Set(inventory.to_string()),
                    item_key: ActiveValue::Set(record_key(record)?.to_string()),
                    payload: ActiveValue::Set(serde_json::to_string(record)?),
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;

        let db_tx = self.database.begin().await?;
        for row in rows {
            items::Entity::insert(row)
                .on_conflict(
                    OnConflict::columns([
                        items::Column::UserId,
                        items::Column::Inventory,
                        items::Column::ItemKey,
                    ])
                    .update_column(items::Column::Payload)
                    .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;
        }
        db_tx.commit().await?;

        tracing::debug!(username, inventory, count = records.len(), "saved items");
        Ok(())
    }

    async fn delete(&self, username: &str, inventory: &str, key: &str) -> ResultEngine<()> {
        if self.skip_write("delete", username, inventory) {
            return Ok(());
        }

        items::Entity::delete_many()
            .filter(items::Column::UserId.eq(username))
            .filter(items::Column::Inventory.eq(inventory))
            .filter(items::Column::ItemKey.eq(key))
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn remove_inventory(&self, username: &str, inventory: &str) -> ResultEngine<()> {
        if self.skip_write("inventory removal", username, inventory) {
            return Ok(());
        }

        let result = items::Entity::delete_many()
            .filter(items::Column::UserId.eq(username))
            .filter(items::Column::Inventory.eq(inventory))
            .exec(&self.database)
            .await?;
        tracing::debug!(username, inventory, rows = result.rows_affected, "removed inventory");
        Ok(())
    }

    async fn inventories(&self, username: &str) -> ResultEngine<Vec<String>> {
        let names = items::Entity::find()
            .select_only()
            .column(items::Column::Inventory)
            .distinct()
            .filter(items::Column::UserId.eq(username))
            .order_by_asc(items::Column::Inventory)
            .into_tuple::<String>()
            .all(&self.database)
            .await?;
        Ok(names)
    }
}
