use thiserror::Error;

/// Domain errors surfaced at the world's mutation boundary. Conditions
/// recoverable inside a tick (stale targets, missing tiles, empty harvests)
/// are plain return values, not errors.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown {class} species '{species}'")]
    UnknownSpecies {
        class: &'static str,
        species: String,
    },
}
