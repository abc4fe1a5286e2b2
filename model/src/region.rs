use core::fmt;
use std::str::FromStr;

use anyhow::bail;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Top-level administrative divisions, in the order the store map lists them.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Region {
    Seoul,
    Gwangju,
    Daegu,
    Daejeon,
    Busan,
    Ulsan,
    Incheon,
    Gyeonggi,
    Gangwon,
    Gyeongnam,
    Gyeongbuk,
    Jeonnam,
    Jeonbuk,
    Chungnam,
    Chungbuk,
    Jeju,
    Sejong,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(x) = Self::from_code(s) {
            return Ok(x);
        }
        match Self::all().into_iter().find(|x| x.name() == s) {
            Some(x) => Ok(x),
            None => bail!("Unknown region: {s}"),
        }
    }
}

impl From<Region> for &'static str {
    fn from(region: Region) -> Self {
        region.name()
    }
}

impl TryFrom<String> for Region {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match Region::all().into_iter().find(|x| x.name() == s) {
            Some(x) => Ok(x),
            None => bail!("Not a canonical region name: {s}"),
        }
    }
}

impl Region {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Seoul,
            Self::Gwangju,
            Self::Daegu,
            Self::Daejeon,
            Self::Busan,
            Self::Ulsan,
            Self::Incheon,
            Self::Gyeonggi,
            Self::Gangwon,
            Self::Gyeongnam,
            Self::Gyeongbuk,
            Self::Jeonnam,
            Self::Jeonbuk,
            Self::Chungnam,
            Self::Chungbuk,
            Self::Jeju,
            Self::Sejong,
        ]
    }

    /// The `sido_cd` the store map uses for this region.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Seoul => "01",
            Self::Gwangju => "02",
            Self::Daegu => "03",
            Self::Daejeon => "04",
            Self::Busan => "05",
            Self::Ulsan => "06",
            Self::Incheon => "07",
            Self::Gyeonggi => "08",
            Self::Gangwon => "09",
            Self::Gyeongnam => "10",
            Self::Gyeongbuk => "11",
            Self::Jeonnam => "12",
            Self::Jeonbuk => "13",
            Self::Chungnam => "14",
            Self::Chungbuk => "15",
            Self::Jeju => "16",
            Self::Sejong => "17",
        }
    }

    /// Canonical display name, as written to `sido_name`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Seoul => "서울",
            Self::Gwangju => "광주",
            Self::Daegu => "대구",
            Self::Daejeon => "대전",
            Self::Busan => "부산",
            Self::Ulsan => "울산",
            Self::Incheon => "인천",
            Self::Gyeonggi => "경기",
            Self::Gangwon => "강원",
            Self::Gyeongnam => "경남",
            Self::Gyeongbuk => "경북",
            Self::Jeonnam => "전남",
            Self::Jeonbuk => "전북",
            Self::Chungnam => "충남",
            Self::Chungbuk => "충북",
            Self::Jeju => "제주",
            Self::Sejong => "세종",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|x| x.code() == code)
    }

    /// Sejong is a single city-level entity with no districts below it.
    pub fn has_subdivisions(&self) -> bool {
        !matches!(self, Self::Sejong)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn canonical_map() {
        let all = Region::all();
        assert_eq!(all.len(), 17);

        let codes: BTreeSet<_> = all.iter().map(|x| x.code()).collect();
        let names: BTreeSet<_> = all.iter().map(|x| x.name()).collect();
        assert_eq!(codes.len(), 17);
        assert_eq!(names.len(), 17);

        // iteration order follows the codes
        let ordered: Vec<_> = all.iter().map(|x| x.code()).collect();
        let mut sorted = ordered.clone();
        sorted.sort();
        assert_eq!(ordered, sorted);
    }

    #[test]
    fn lookup() {
        assert_eq!(Region::from_code("01"), Some(Region::Seoul));
        assert_eq!(Region::from_code("08"), Some(Region::Gyeonggi));
        assert_eq!(Region::from_code("17"), Some(Region::Sejong));
        assert_eq!(Region::from_code("18"), None);
        assert_eq!(Region::from_code("1"), None);

        assert_eq!("05".parse::<Region>().unwrap(), Region::Busan);
        assert_eq!("부산".parse::<Region>().unwrap(), Region::Busan);
        assert!("부산광역시".parse::<Region>().is_err());
    }

    #[test]
    fn only_sejong_lacks_subdivisions() {
        let flat: Vec<_> = Region::all()
            .into_iter()
            .filter(|x| !x.has_subdivisions())
            .collect();
        assert_eq!(flat, vec![Region::Sejong]);
    }

    #[test]
    fn serializes_as_name() {
        assert_eq!(serde_json::to_string(&Region::Jeju).unwrap(), r#""제주""#);
        assert_eq!(
            serde_json::from_str::<Region>(r#""충북""#).unwrap(),
            Region::Chungbuk
        );
        assert!(serde_json::from_str::<Region>(r#""기타""#).is_err());
    }
}
