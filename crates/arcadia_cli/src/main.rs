use arcadia_core::prelude::*;
use arcadia_fs::FileSystemCoverStorage;
use arcadia_postgres::PostgresGameStore;
use arcadia_s3::S3CoverStorage;
use arcadia_server::{CatalogServer, CatalogServerConfig, FileMount};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arcadia")]
#[command(about = "Games catalog server")]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Schema holding the `games` table
    #[arg(long, env = "MAIN_DB_SCHEMA", default_value = "public")]
    schema: SchemaName,

    #[arg(long, env = "AWS_ACCESS_KEY_ID", default_value = "")]
    access_key: String,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", default_value = "", hide_env_values = true)]
    secret_key: String,

    /// Where cover images are stored
    #[arg(long, env = "ARCADIA_STORAGE", value_enum, default_value_t = StorageKind::S3)]
    storage: StorageKind,

    #[arg(long, env = "ARCADIA_S3_ENDPOINT", default_value = DEFAULT_STORAGE_ENDPOINT)]
    s3_endpoint: String,

    #[arg(long, env = "ARCADIA_BUCKET", default_value = DEFAULT_BUCKET)]
    bucket: String,

    #[arg(long, env = "ARCADIA_CDN_ORIGIN", default_value = DEFAULT_CDN_ORIGIN)]
    cdn_origin: String,

    /// Root directory for `--storage fs`
    #[arg(long, env = "ARCADIA_FS_ROOT", default_value = "./arcadia_data")]
    fs_root: PathBuf,

    /// Path the fs root is served under by this server
    #[arg(long, env = "ARCADIA_FS_ROUTE", default_value = "/files")]
    fs_route: String,

    /// Public base URL of the served fs root, for cover links.
    /// Defaults to `http://localhost:<port><fs-route>`
    #[arg(long, env = "ARCADIA_FS_BASE_URL")]
    fs_base_url: Option<String>,

    /// Delete an uploaded cover if saving its game fails
    #[arg(long, env = "ARCADIA_CLEANUP_ORPHANS")]
    cleanup_orphans: bool,

    /// Path of the catalog endpoint
    #[arg(long, env = "ARCADIA_ROUTE", default_value = "/")]
    route: String,

    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StorageKind {
    S3,
    Fs,
}

impl Cli {
    fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new(&self.database_url, &self.access_key, &self.secret_key)
            .with_schema(self.schema.clone())
            .with_covers(CoverConfig {
                storage_endpoint: self.s3_endpoint.clone(),
                bucket: self.bucket.clone(),
                cdn_origin: self.cdn_origin.clone(),
                ..Default::default()
            })
    }

    fn fs_base_url(&self) -> String {
        self.fs_base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}{}", self.port, self.fs_route))
    }

    fn server_config(&self) -> CatalogServerConfig {
        let files = (self.storage == StorageKind::Fs)
            .then(|| FileMount::new(&self.fs_route, &self.fs_root));
        CatalogServerConfig {
            route: self.route.clone(),
            cleanup_orphaned_covers: self.cleanup_orphans,
            files,
            ..Default::default()
        }
    }
}

async fn serve(server: CatalogServer, games: PostgresGameStore, covers: impl CoverStorage, port: u16) -> anyhow::Result<()> {
    let app = server.build(games, covers);

    let addr = format!("0.0.0.0:{port}");
    info!("Server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = cli.catalog_config();
    let server = CatalogServer::new(cli.server_config());

    let games = PostgresGameStore::connect(&config).await?;
    info!(schema = %config.schema_name, "Connected to database");

    match cli.storage {
        StorageKind::S3 => {
            if config.storage_access_key.is_empty() || config.storage_secret_key.is_empty() {
                return Err(ConfigError::Missing("AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY").into());
            }
            let covers = S3CoverStorage::from_config(&config);
            serve(server, games, covers, cli.port).await
        }
        StorageKind::Fs => {
            warn!("Storing covers on the local file system, this is meant for development only");
            let covers = FileSystemCoverStorage::new(&cli.fs_root, cli.fs_base_url());
            serve(server, games, covers, cli.port).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_into_configs() {
        let cli = Cli::try_parse_from([
            "arcadia",
            "--database-url",
            "postgres://localhost/games",
            "--schema",
            "t_catalog",
            "--access-key",
            "AKID",
            "--secret-key",
            "secret",
            "--bucket",
            "media",
            "--cleanup-orphans",
        ])
        .unwrap();

        let config = cli.catalog_config();
        assert_eq!(config.database_url, "postgres://localhost/games");
        assert_eq!(config.schema_name.as_str(), "t_catalog");
        assert_eq!(config.covers.bucket, "media");
        assert_eq!(config.covers.key_prefix, DEFAULT_COVER_PREFIX);
        assert_eq!(cli.storage, StorageKind::S3);

        let server = cli.server_config();
        assert!(server.cleanup_orphaned_covers);
        assert_eq!(server.route, "/");
        assert!(server.files.is_none());
    }

    #[test]
    fn fs_storage_serves_its_root() {
        let cli = Cli::try_parse_from([
            "arcadia",
            "--database-url",
            "postgres://localhost/games",
            "--storage",
            "fs",
            "--fs-root",
            "/srv/covers",
            "--port",
            "8080",
        ])
        .unwrap();

        assert_eq!(cli.fs_base_url(), "http://localhost:8080/files");
        let files = cli.server_config().files.unwrap();
        assert_eq!(files.route, "/files");
        assert_eq!(files.root, PathBuf::from("/srv/covers"));
    }

    #[test]
    fn rejects_unsafe_schema_names() {
        let result = Cli::try_parse_from([
            "arcadia",
            "--database-url",
            "postgres://localhost/games",
            "--schema",
            "public; DROP TABLE games",
        ]);
        assert!(result.is_err());
    }
}
