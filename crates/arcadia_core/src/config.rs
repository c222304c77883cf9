use crate::schema::SchemaName;

/// Settings shared by the store and storage backends.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Postgres connection string.
    pub database_url: String,

    /// Object storage access key id. Also names the account in public cover URLs.
    pub storage_access_key: String,

    pub storage_secret_key: String,

    /// Schema holding the `games` table.
    ///
    /// Defaults to `public`.
    pub schema_name: SchemaName,

    pub covers: CoverConfig,
}

/// Where cover images go and how their public URLs are built.
#[derive(Clone, Debug)]
pub struct CoverConfig {
    /// S3-compatible endpoint the covers are uploaded to.
    ///
    /// Defaults to `https://bucket.poehali.dev`.
    pub storage_endpoint: String,

    /// Defaults to `files`.
    pub bucket: String,

    /// Origin of the CDN serving the bucket.
    ///
    /// Defaults to `https://cdn.poehali.dev`.
    pub cdn_origin: String,

    /// Key prefix for uploaded covers, without a trailing slash.
    ///
    /// Defaults to `games/covers`.
    pub key_prefix: String,
}

pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://bucket.poehali.dev";
pub const DEFAULT_BUCKET: &str = "files";
pub const DEFAULT_CDN_ORIGIN: &str = "https://cdn.poehali.dev";
pub const DEFAULT_COVER_PREFIX: &str = "games/covers";

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            storage_endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            cdn_origin: DEFAULT_CDN_ORIGIN.to_string(),
            key_prefix: DEFAULT_COVER_PREFIX.to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn new(
        database_url: impl Into<String>,
        storage_access_key: impl Into<String>,
        storage_secret_key: impl Into<String>,
    ) -> Self {
        Self {
            database_url: database_url.into(),
            storage_access_key: storage_access_key.into(),
            storage_secret_key: storage_secret_key.into(),
            schema_name: SchemaName::default(),
            covers: CoverConfig::default(),
        }
    }

    pub fn with_schema(mut self, schema_name: SchemaName) -> Self {
        self.schema_name = schema_name;
        self
    }

    pub fn with_covers(mut self, covers: CoverConfig) -> Self {
        self.covers = covers;
        self
    }
}
