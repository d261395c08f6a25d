use lru::LruCache;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::num::NonZeroUsize;

static RE_TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    // ISO8601/RFC3339 with fractional seconds and timezone variants:
    // 2025-08-07T06:41:18Z, 2025-08-07 06:41:18.123456+01:00, ...-0800
    Regex::new(r"\b\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d{1,9})?(?:Z|[+-](?:\d{2}(?::?\d{2})?|\d{4}))?\b").unwrap()
});

static RE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b[a-zA-Z][a-zA-Z0-9+.-]*://[^\s"']+\b"#).unwrap()
});

static RE_IPV6: Lazy<Regex> = Lazy::new(|| {
    // Full-form IPv6 only; shorthand forms collide with bare clock times
    Regex::new(r"\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b").unwrap()
});

static RE_IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(?::\d{1,5})?\b").unwrap()
});

// Must run after the IP masks so hh:mm:ss never eats part of an address.
static RE_CLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{2}:\d{2}:\d{2}(?:\.\d{1,9})?\b").unwrap()
});

static RE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

static RE_UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b").unwrap()
});

static RE_PATH: Lazy<Regex> = Lazy::new(|| {
    // Two or more segments; conservative to avoid overmatching bare slashes
    Regex::new(r"(?:~|\.{1,2})?/[\w.\-]+(?:/[\w.\-]+)+").unwrap()
});

static RE_HEX: Lazy<Regex> = Lazy::new(|| {
    // Long hex runs: request ids, digests, pointers
    Regex::new(r"\b[0-9a-fA-F]{16,}\b").unwrap()
});

// Numbers with common unit suffixes (duration/size/percent). Preserve suffix.
static RE_NUM_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b-?\d+(?:\.\d+)?(?:\s*)(ms|us|µs|ns|s|m|h|kb|mb|gb|kib|mib|gib|b|%)\b").unwrap()
});

static RE_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b-?\d+\.\d+\b").unwrap()
});

static RE_INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b-?\d+\b").unwrap()
});

fn mask_uncached(input: &str) -> String {
    // Order matters: timestamps, URLs, IPs, clocks, then identifiers, then numbers
    let s = RE_TIMESTAMP.replace_all(input, "<TS>");
    let s = RE_URL.replace_all(&s, "<URL>");
    let s = RE_IPV6.replace_all(&s, "<IP>");
    let s = RE_IPV4.replace_all(&s, "<IP>");
    let s = RE_CLOCK.replace_all(&s, "<TS>");
    let s = RE_EMAIL.replace_all(&s, "<EMAIL>");
    let s = RE_UUID.replace_all(&s, "<ID>");
    let s = RE_PATH.replace_all(&s, "<PATH>");
    let s = RE_HEX.replace_all(&s, "<HEX>");
    // Number+unit before generic float/int to avoid partial masking
    let s = RE_NUM_UNIT.replace_all(&s, "<NUM>$1");
    let s = RE_FLOAT.replace_all(&s, "<NUM>");
    let s = RE_INT.replace_all(&s, "<NUM>");
    s.into_owned()
}

const MASK_CACHE_SIZE: usize = 4096;

thread_local! {
    // Per-thread cache: log streams repeat the same templates heavily, and
    // thread-local avoids lock contention under rayon.
    static MASK_CACHE: RefCell<LruCache<String, String>> = RefCell::new(LruCache::new(
        NonZeroUsize::new(MASK_CACHE_SIZE).unwrap(),
    ));
}

/// Replace volatile tokens (timestamps, addresses, ids, numbers) with
/// stable placeholders so lines differing only in parameters collapse to
/// the same template.
pub fn mask_line(input: &str) -> String {
    MASK_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(masked) = cache.get(input) {
            return masked.clone();
        }
        let masked = mask_uncached(input);
        cache.put(input.to_string(), masked.clone());
        masked
    })
}

/// Signature used to group classified lines: the label plus the masked
/// line template.
pub fn pattern_signature(label: &str, text: &str) -> String {
    format!("{}: {}", label, mask_line(text))
}
