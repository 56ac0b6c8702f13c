//! Status probe: what this instance is connected to.

use crate::state::AppState;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    pub status: &'static str,
    pub runtime: &'static str,
    pub version: &'static str,
    pub db: bool,
    pub storage: bool,
    pub db_error: String,
}

pub fn status(state: &AppState) -> StatusBody {
    StatusBody {
        status: "ok",
        runtime: "rust",
        version: env!("CARGO_PKG_VERSION"),
        db: state.db.is_some(),
        storage: state.objects.is_some(),
        db_error: state.startup_error.clone().unwrap_or_default(),
    }
}
