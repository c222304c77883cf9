pub mod config;
pub mod cover;
pub mod error;
pub mod game;
pub mod schema;
pub mod traits;

pub mod prelude {
    pub use super::config::*;
    pub use super::cover::*;
    pub use super::error::*;
    pub use super::game::*;
    pub use super::schema::*;
    pub use super::traits::*;
}
