use std::{collections::BTreeMap, fs::read_to_string, path::Path, time::Duration};

use anyhow::{Context, Result};

use super::driver::{DriverError, PageDriver, RawEntry};

/// Serves a capture written by an earlier live run.
pub struct ReplayDriver {
    pages: BTreeMap<String, Vec<RawEntry>>,
    selected: Option<String>,
    loaded: bool,
}

impl ReplayDriver {
    pub fn new(pages: BTreeMap<String, Vec<RawEntry>>) -> Self {
        Self {
            pages,
            selected: None,
            loaded: false,
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let raw = read_to_string(path)
            .with_context(|| format!("failed to read capture {}", path.display()))?;
        let pages = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse capture {}", path.display()))?;
        Ok(Self::new(pages))
    }
}

impl PageDriver for ReplayDriver {
    fn select_region(&mut self, code: &str) -> Result<(), DriverError> {
        if !self.pages.contains_key(code) {
            return Err(DriverError::Selection {
                code: code.to_string(),
                reason: "not in capture".to_string(),
            });
        }
        self.selected = Some(code.to_string());
        self.loaded = false;
        Ok(())
    }

    fn select_all_subdivisions(&mut self) -> Result<(), DriverError> {
        match self.selected {
            Some(_) => Ok(()),
            None => Err(DriverError::Selection {
                code: String::new(),
                reason: "no region selected".to_string(),
            }),
        }
    }

    fn wait_for_load_complete(&mut self, _timeout: Duration) -> Result<(), DriverError> {
        self.loaded = self.selected.is_some();
        Ok(())
    }

    fn list_visible_entries(&mut self) -> Result<Vec<RawEntry>, DriverError> {
        match (&self.selected, self.loaded) {
            (Some(code), true) => Ok(self.pages[code].clone()),
            _ => Err(DriverError::Load {
                reason: "store list has not loaded".to_string(),
            }),
        }
    }

    fn reset_selection(&mut self) -> Result<(), DriverError> {
        self.selected = None;
        self.loaded = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use _model::Region;

    use super::*;
    use crate::stores::collect;

    const CAPTURE: &str = r#"{
        "01": [
            {"name": "역삼", "latitude": "37.5", "longitude": "127.0",
             "address_text": "서울특별시 강남구 역삼동\n1522-3232"}
        ],
        "17": [
            {"name": "세종청사", "latitude": "36.5", "longitude": "127.2",
             "address_text": "세종특별자치시 도움6로 11"},
            {"name": "좌표없음", "address_text": "세종특별자치시 한누리대로"}
        ]
    }"#;

    #[test]
    fn replays_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.json");
        write(&path, CAPTURE).unwrap();

        let mut driver = ReplayDriver::open(&path).unwrap();
        let collection = collect(&mut driver, &Region::all(), Duration::from_secs(1)).unwrap();

        let records = collection.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region, Region::Seoul);
        assert_eq!(records[0].subregion, "강남구");
        assert_eq!(records[1].region, Region::Sejong);
        assert_eq!(records[1].subregion, "세종");

        // every region missing from the capture failed on its own
        assert_eq!(collection.failed().count(), 15);
    }

    #[test]
    fn list_requires_load() {
        let mut driver = ReplayDriver::new(BTreeMap::from([("05".to_string(), Vec::new())]));
        assert!(driver.list_visible_entries().is_err());
        driver.select_region("05").unwrap();
        assert!(driver.list_visible_entries().is_err());
        driver.wait_for_load_complete(Duration::ZERO).unwrap();
        assert_eq!(driver.list_visible_entries().unwrap(), Vec::new());
    }

    #[test]
    fn missing_file() {
        assert!(ReplayDriver::open(Path::new("/nonexistent/capture.json")).is_err());
    }
}
