use thiserror::Error;

/// Object storage failures (cover images).
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Generic(String),
}

/// Relational store failures (the catalog table).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Store backend error: {0}")]
    Generic(String),
}

/// Rejected client input. The `Display` text is what the caller sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title и genre обязательны")]
    MissingTitleOrGenre,

    #[error("id обязателен")]
    MissingId,

    #[error("id должен быть целым числом")]
    InvalidId,

    #[error("некорректная строка запроса: {0}")]
    InvalidQuery(String),

    #[error("некорректное тело запроса: {0}")]
    InvalidBody(String),

    #[error("поле {0} должно быть строкой")]
    NotAString(&'static str),

    #[error("rating должен быть числом")]
    InvalidRating,

    #[error("year должен быть целым числом")]
    InvalidYear,

    #[error("is_new должен быть логическим значением")]
    InvalidIsNew,

    #[error("cover_base64 содержит некорректные данные")]
    InvalidCover,

    #[error("cover_ext некорректен")]
    InvalidCoverExt,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid schema name: {0:?}")]
    InvalidSchemaName(String),

    #[error("Missing setting: {0}")]
    Missing(&'static str),
}
