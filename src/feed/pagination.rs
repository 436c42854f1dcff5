//! Pagination parameter resolution for the public feed
//!
//! Bad input never fails a feed read: unusable values fall back to
//! defaults and oversized limits are clamped, not rejected.

/// Page used when the parameter is absent or unusable
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the parameter is absent or unusable
pub const DEFAULT_LIMIT: u32 = 10;
/// Hard cap on page size; larger requests are silently reduced
pub const MAX_LIMIT: u32 = 50;

/// Lenient integer parse in the style of JavaScript's `parseInt`: optional
/// sign, then as many leading digits as are present; trailing text is
/// ignored, so `"5abc"` is 5 and `"1.5"` is 1.
fn leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    rest[..digits]
        .parse::<i64>()
        .ok()
        .map(|n| if negative { -n } else { n })
}

/// Resolve the `page` query parameter. Absent, non-numeric, and sub-1
/// values all resolve to page 1.
pub fn resolve_page(raw: Option<&str>) -> u32 {
    match raw.and_then(leading_int) {
        Some(page) if page >= 1 => page.min(i64::from(u32::MAX)) as u32,
        _ => DEFAULT_PAGE,
    }
}

/// Resolve the `limit` query parameter. Absent, non-numeric, and sub-1
/// values resolve to 10; anything above the cap is clamped to 50.
pub fn resolve_limit(raw: Option<&str>) -> u32 {
    match raw.and_then(leading_int) {
        Some(limit) if limit >= 1 => limit.min(i64::from(MAX_LIMIT)) as u32,
        _ => DEFAULT_LIMIT,
    }
}

/// Total page count, `ceil(total / limit)` with a floor of one so an empty
/// feed still reports a single (empty) page.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = (total + limit - 1) / limit;
    pages.clamp(1, u64::from(u32::MAX)) as u32
}
