use crate::Region;

/// First line of a possibly multi-line address block, trimmed.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim()
}

/// District or county for an address. Best effort: the second whitespace
/// token, which holds for both road-name and lot-number addresses.
pub fn subregion(address: &str, region: Region) -> String {
    if !region.has_subdivisions() {
        return region.name().to_string();
    }

    address
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_of_details() {
        assert_eq!(
            first_line("  서울특별시 강남구 테헤란로 101  \n1522-3232"),
            "서울특별시 강남구 테헤란로 101"
        );
        assert_eq!(first_line("single"), "single");
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("\nsecond"), "");
    }

    #[test]
    fn second_token() {
        assert_eq!(
            subregion("경기도 성남시 분당구 정자동", Region::Gyeonggi),
            "성남시"
        );
        assert_eq!(subregion("서울특별시   마포구", Region::Seoul), "마포구");
        assert_eq!(subregion("제주특별자치도", Region::Jeju), "");
        assert_eq!(subregion("", Region::Busan), "");
    }

    #[test]
    fn sejong_uses_own_name() {
        assert_eq!(subregion("세종특별자치시 한누리대로 2150", Region::Sejong), "세종");
        assert_eq!(subregion("", Region::Sejong), "세종");
    }
}
