use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw form state as typed by the user: `section -> field -> text`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub active: Vec<String>,
    #[serde(default)]
    pub sections: BTreeMap<String, BTreeMap<String, String>>,
}
