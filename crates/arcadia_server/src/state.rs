use arcadia_core::traits::{CoverStorage, GameStore};

#[derive(Clone)]
pub struct AppState<G: GameStore + Clone, C: CoverStorage + Clone> {
    pub games: G,
    pub covers: C,
    /// Delete an uploaded cover again when the row insert fails.
    pub cleanup_orphaned_covers: bool,
}
