use std::{collections::BTreeMap, io, time::Duration};

use _model::Region;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;
use ureq::{Agent, ErrorKind};

use crate::{config::Config, utils::agent};

use super::driver::{DriverError, PageDriver, RawEntry};

/// Drives the store map through the same form post its own search panel
/// makes, so no browser is needed.
pub struct GetStoreDriver {
    agent: Agent,
    endpoint: String,
    region: Option<String>,
    subdivision: Option<String>,
    entries: Option<Vec<RawEntry>>,
    captures: BTreeMap<String, Vec<RawEntry>>,
}

impl GetStoreDriver {
    pub fn new(agent: Agent, endpoint: &str) -> Self {
        Self {
            agent,
            endpoint: endpoint.to_string(),
            region: None,
            subdivision: None,
            entries: None,
            captures: BTreeMap::new(),
        }
    }

    /// Opens the map page first; the store list endpoint expects its session.
    pub fn connect(config: &Config) -> Result<Self> {
        let agent = agent(&config.user_agent, config.load_timeout());
        agent
            .get(&config.map_url)
            .call()
            .with_context(|| format!("failed to open {}", config.map_url))?;
        debug!(url = %config.map_url, "session opened");

        Ok(Self::new(agent, &config.endpoint))
    }

    /// Every list loaded so far, keyed by region code.
    pub fn captures(&self) -> &BTreeMap<String, Vec<RawEntry>> {
        &self.captures
    }

    fn post(&self, code: &str, gugun: &str, timeout: Duration) -> Result<Vec<RawEntry>, DriverError> {
        let response = self
            .agent
            .post(&self.endpoint)
            .timeout(timeout)
            .set("X-Requested-With", "XMLHttpRequest")
            .send_form(&form(code, gugun))
            .map_err(|e| match e {
                ureq::Error::Transport(t) if is_timeout(&t) => DriverError::LoadTimeout { timeout },
                e => DriverError::Load {
                    reason: e.to_string(),
                },
            })?;

        let body: GetStoreResponse = response.into_json().map_err(|e| match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                DriverError::LoadTimeout { timeout }
            }
            _ => DriverError::Load {
                reason: format!("unreadable store list: {e}"),
            },
        })?;

        Ok(body.list.into_iter().map(RawStore::into_entry).collect())
    }
}

impl PageDriver for GetStoreDriver {
    fn select_region(&mut self, code: &str) -> Result<(), DriverError> {
        if Region::from_code(code).is_none() {
            return Err(DriverError::Selection {
                code: code.to_string(),
                reason: "not offered by the store map".to_string(),
            });
        }
        self.region = Some(code.to_string());
        self.subdivision = None;
        self.entries = None;
        Ok(())
    }

    fn select_all_subdivisions(&mut self) -> Result<(), DriverError> {
        if self.region.is_none() {
            return Err(DriverError::Selection {
                code: String::new(),
                reason: "no region selected".to_string(),
            });
        }
        self.subdivision = Some(String::new());
        Ok(())
    }

    fn wait_for_load_complete(&mut self, timeout: Duration) -> Result<(), DriverError> {
        let (code, gugun) = match (&self.region, &self.subdivision) {
            (Some(code), Some(gugun)) => (code.clone(), gugun.clone()),
            _ => {
                return Err(DriverError::Load {
                    reason: "nothing selected".to_string(),
                })
            }
        };

        let entries = self.post(&code, &gugun, timeout)?;
        debug!(code = %code, count = entries.len(), "store list loaded");
        self.captures.insert(code, entries.clone());
        self.entries = Some(entries);
        Ok(())
    }

    fn list_visible_entries(&mut self) -> Result<Vec<RawEntry>, DriverError> {
        self.entries.clone().ok_or_else(|| DriverError::Load {
            reason: "store list has not loaded".to_string(),
        })
    }

    fn reset_selection(&mut self) -> Result<(), DriverError> {
        self.region = None;
        self.subdivision = None;
        self.entries = None;
        Ok(())
    }
}

fn form<'a>(code: &'a str, gugun: &'a str) -> [(&'static str, &'a str); 20] {
    [
        ("in_biz_cds", "0"),
        ("in_scodes", "0"),
        ("ins_lat", "37.5665"),
        ("ins_lng", "126.9780"),
        ("search_text", ""),
        ("p_sido_cd", code),
        ("p_gugun_cd", gugun),
        ("isError", "true"),
        ("in_distance", "0"),
        ("in_biz_cd", ""),
        ("new_bool", "0"),
        ("whcroad_yn", "0"),
        ("sexn_use_yn", "0"),
        ("biz_cat_cd", ""),
        ("biz_cat_chk", ""),
        ("p_grad_cd", "0"),
        ("s_code", ""),
        ("s_sido_cd", ""),
        ("s_gugun_cd", ""),
        ("rndCod", "V0K7O7"),
    ]
}

fn is_timeout(t: &ureq::Transport) -> bool {
    if t.kind() != ErrorKind::Io {
        return false;
    }
    std::error::Error::source(t)
        .and_then(|x| x.downcast_ref::<io::Error>())
        .is_some_and(|x| matches!(x.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock))
}

#[derive(Deserialize)]
struct GetStoreResponse {
    #[serde(default)]
    list: Vec<RawStore>,
}

#[derive(Deserialize)]
struct RawStore {
    #[serde(default, deserialize_with = "text")]
    s_name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    lat: Option<String>,
    #[serde(default, deserialize_with = "text")]
    lot: Option<String>,
    #[serde(default, deserialize_with = "text")]
    doro_address: Option<String>,
    #[serde(default, deserialize_with = "text")]
    addr: Option<String>,
    #[serde(default, deserialize_with = "text")]
    tel: Option<String>,
}

impl RawStore {
    /// Lays the fields out the way the result panel shows them: road
    /// address first, phone number below.
    fn into_entry(self) -> RawEntry {
        let address = self
            .doro_address
            .filter(|x| !x.trim().is_empty())
            .or(self.addr);
        let address_text = address.map(|x| match self.tel {
            Some(tel) if !tel.is_empty() => format!("{x}\n{tel}"),
            _ => x,
        });

        RawEntry {
            name: self.s_name,
            latitude: self.lat,
            longitude: self.lot,
            address_text,
        }
    }
}

/// The endpoint is loose about types; coordinates show up as both strings
/// and numbers.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(x) => Some(x),
        x => Some(x.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> GetStoreDriver {
        GetStoreDriver::new(Agent::new(), "http://127.0.0.1:9/store/getStore.do")
    }

    #[test]
    fn parses_store_list() {
        let body = r#"{
            "list": [
                {"s_name": "역삼아레나빌딩", "lat": "37.501087", "lot": 127.043069,
                 "doro_address": "서울특별시 강남구 언주로 425 (역삼동)", "addr": "서울특별시 강남구 역삼동 736-1",
                 "tel": "1522-3232"},
                {"s_name": "주소없음", "lat": null, "lot": "127.0"},
                {"s_name": "지번만", "lat": 35.1, "lot": 129.0, "doro_address": " ", "addr": "부산광역시 중구 남포동"}
            ]
        }"#;
        let response: GetStoreResponse = serde_json::from_str(body).unwrap();
        let entries: Vec<_> = response.list.into_iter().map(RawStore::into_entry).collect();

        assert_eq!(
            entries[0],
            RawEntry {
                name: Some("역삼아레나빌딩".to_string()),
                latitude: Some("37.501087".to_string()),
                longitude: Some("127.043069".to_string()),
                address_text: Some("서울특별시 강남구 언주로 425 (역삼동)\n1522-3232".to_string()),
            }
        );
        assert_eq!(entries[1].latitude, None);
        assert_eq!(entries[1].address_text, None);
        assert_eq!(
            entries[2].address_text.as_deref(),
            Some("부산광역시 중구 남포동")
        );
    }

    #[test]
    fn empty_body() {
        let response: GetStoreResponse = serde_json::from_str("{}").unwrap();
        assert!(response.list.is_empty());
    }

    #[test]
    fn selection_state() {
        let mut driver = offline();
        assert!(matches!(
            driver.select_region("99"),
            Err(DriverError::Selection { .. })
        ));
        assert!(matches!(
            driver.select_all_subdivisions(),
            Err(DriverError::Selection { .. })
        ));
        assert!(matches!(
            driver.wait_for_load_complete(Duration::from_millis(10)),
            Err(DriverError::Load { .. })
        ));
        assert!(driver.list_visible_entries().is_err());

        driver.select_region("17").unwrap();
        driver.select_all_subdivisions().unwrap();
        assert_eq!(driver.region.as_deref(), Some("17"));
        assert_eq!(driver.subdivision.as_deref(), Some(""));

        driver.reset_selection().unwrap();
        assert_eq!(driver.region, None);
        assert!(driver.captures().is_empty());
    }

    #[test]
    fn unreachable_endpoint_is_recoverable() {
        let mut driver = offline();
        driver.select_region("01").unwrap();
        driver.select_all_subdivisions().unwrap();
        let err = driver
            .wait_for_load_complete(Duration::from_millis(500))
            .unwrap_err();
        assert!(!err.is_fatal());
    }
}
