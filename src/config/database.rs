use crate::constants::{
    CHAT_COL_NAME, NOTIFICATION_COL_NAME, REFRESH_TOKEN_COL_NAME, SESSION_COL_NAME,
    TRANSACTION_COL_NAME, USER_COL_NAME,
};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
    error::Error as MongoError,
    options::{ClientOptions, IndexOptions},
};
use std::time::Duration;

pub async fn connect_to_database(uri: &str) -> Result<Client, MongoError> {
    let mut client_options = ClientOptions::parse(uri).await?;
    client_options.app_name = Some("mentorhub".to_string());
    client_options.retry_writes = Some(true);
    Client::with_options(client_options)
}

pub fn get_collection<T>(database: &Database, collection_name: &str) -> Collection<T>
where
    T: serde::de::DeserializeOwned + serde::Serialize + Unpin + Send + Sync,
{
    database.collection::<T>(collection_name)
}

async fn create_index(
    database: &Database,
    collection_name: &str,
    keys: Document,
    options: Option<IndexOptions>,
) -> Result<(), MongoError> {
    let index = match options {
        Some(options) => IndexModel::builder().keys(keys).options(options).build(),
        None => IndexModel::builder().keys(keys).build(),
    };
    database
        .collection::<Document>(collection_name)
        .create_index(index)
        .await?;
    Ok(())
}

async fn create_partial_unique_index(
    database: &Database,
    collection_name: &str,
    field: &str,
) -> Result<(), MongoError> {
    let options = IndexOptions::builder()
        .unique(true)
        .partial_filter_expression(doc! { field: { "$exists": true, "$type": "string" } })
        .build();
    create_index(database, collection_name, doc! { field: 1 }, Some(options)).await
}

pub async fn create_indexes(database: &Database) -> Result<(), MongoError> {
    create_partial_unique_index(database, USER_COL_NAME, "email").await?;
    create_index(
        database,
        USER_COL_NAME,
        doc! { "mentor_profile.status": 1, "mentor_profile.hourly_rate": 1 },
        None,
    )
    .await?;

    create_index(
        database,
        SESSION_COL_NAME,
        doc! { "mentor": 1, "scheduled_date": 1, "status": 1 },
        None,
    )
    .await?;
    create_index(database, SESSION_COL_NAME, doc! { "mentees": 1, "starts_at": -1 }, None)
        .await?;

    create_partial_unique_index(database, TRANSACTION_COL_NAME, "idempotency_key").await?;
    create_index(
        database,
        TRANSACTION_COL_NAME,
        doc! { "user": 1, "created_at": -1 },
        None,
    )
    .await?;

    create_index(
        database,
        NOTIFICATION_COL_NAME,
        doc! { "user": 1, "is_read": 1, "created_at": -1 },
        None,
    )
    .await?;

    create_partial_unique_index(database, CHAT_COL_NAME, "pair_key").await?;
    create_index(
        database,
        CHAT_COL_NAME,
        doc! { "participants": 1, "last_message_at": -1 },
        None,
    )
    .await?;

    create_index(database, REFRESH_TOKEN_COL_NAME, doc! { "user": 1 }, None).await?;
    create_index(
        database,
        REFRESH_TOKEN_COL_NAME,
        doc! { "expires_at": 1 },
        Some(
            IndexOptions::builder()
                .expire_after(Duration::from_secs(0))
                .build(),
        ),
    )
    .await?;

    Ok(())
}
