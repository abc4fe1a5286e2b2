use serde::{Deserialize, Serialize};

use crate::Region;

/// One row of the exported store list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    #[serde(rename = "s_name")]
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: String,
    #[serde(rename = "lot")]
    pub longitude: String,
    #[serde(rename = "addr")]
    pub address: String,
    #[serde(rename = "sido_name")]
    pub region: Region,
    #[serde(rename = "gugun_name")]
    pub subregion: String,
}

impl StoreRecord {
    /// Identity used to drop a store seen twice in one run.
    pub fn key(&self) -> (String, String, String) {
        (
            self.name.clone(),
            self.latitude.clone(),
            self.longitude.clone(),
        )
    }
}
