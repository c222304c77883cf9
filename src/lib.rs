pub use arcadia_core::*;

#[cfg(feature = "server")]
pub mod server {
    pub use arcadia_server::*;
}

#[cfg(feature = "postgres")]
pub mod postgres {
    pub use arcadia_postgres::*;
}

#[cfg(feature = "s3")]
pub mod s3 {
    pub use arcadia_s3::*;
}

#[cfg(feature = "fs")]
pub mod fs {
    pub use arcadia_fs::*;
}

#[cfg(feature = "memory")]
pub mod memory {
    pub use arcadia_memory::*;
}

pub mod prelude {
    pub use arcadia_core::prelude::*;

    #[cfg(feature = "server")]
    pub use arcadia_server::prelude::*;

    #[cfg(feature = "postgres")]
    pub use arcadia_postgres::PostgresGameStore;

    #[cfg(feature = "s3")]
    pub use arcadia_s3::S3CoverStorage;

    #[cfg(feature = "fs")]
    pub use arcadia_fs::FileSystemCoverStorage;

    #[cfg(feature = "memory")]
    pub use arcadia_memory::{InMemoryCoverStorage, InMemoryGameStore};
}
