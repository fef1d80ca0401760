use serde::Serialize;
use thiserror::Error;

/// An actor's asset could not be found in the registry; the actor is not created.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("missing asset `{asset}` for actor `{actor}`")]
pub struct MissingAssetError {
    pub actor: String,
    pub asset: String,
}
