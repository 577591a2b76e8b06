//! Version parsing and ordering.
//!
//! Versions reported by pip, Homebrew, dpkg, rpm and winget are all
//! reduced to a dotted numeric release plus an optional pre/post marker,
//! and compared component by component as integers. `1.9.0 < 1.10.0`,
//! `1.0 == 1.0.0`, and `2.0.0rc1 < 2.0.0`.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Leading epoch (`1:` for dpkg/rpm, `1!` for PEP 440), the release, and the rest.
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+[:!])?(\d+(?:\.\d+)*)(.*)$").expect("VERSION_REGEX must compile")
});

/// A marker such as `rc1`, `.dev0`, `.post2`, `-beta.3`.
///
/// The marker must be followed by its number, a separator, or the end of
/// the string, so labels like `-amd64` or `-arm` are not read as `a`/`r`.
static SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[.\-_]?(dev|alpha|a|beta|b|preview|pre|rc|c|post|rev|r)(?:[.\-_]?(\d+))?(?:[.\-_+]|$)")
        .expect("SUFFIX_REGEX must compile")
});

/// Where a version sits relative to its plain release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Dev(u64),
    Alpha(u64),
    Beta(u64),
    Candidate(u64),
    Final,
    Post(u64),
}

/// A comparable package version.
#[derive(Debug, Clone)]
pub struct PackageVersion {
    raw: String,
    release: Vec<u64>,
    stage: Stage,
}

impl PackageVersion {
    /// Parse a version string.
    ///
    /// Returns `None` when the string does not start with a numeric
    /// release (after an optional `v` prefix and epoch).
    pub fn parse(input: &str) -> Option<Self> {
        let raw = input.trim();
        let body = raw
            .strip_prefix('v')
            .or_else(|| raw.strip_prefix('V'))
            .unwrap_or(raw);

        let caps = VERSION_REGEX.captures(body)?;
        let release = caps
            .get(1)?
            .as_str()
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        Some(Self {
            raw: raw.to_string(),
            release,
            stage: parse_stage(rest),
        })
    }

    /// Whether this is a dev/alpha/beta/rc version.
    pub fn is_prerelease(&self) -> bool {
        self.stage < Stage::Final
    }

    /// The string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn cmp_release(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

fn parse_stage(rest: &str) -> Stage {
    let lowered = rest.to_ascii_lowercase();
    let Some(caps) = SUFFIX_REGEX.captures(&lowered) else {
        // Debian revisions (`-1`, `+dfsg-2`), local labels (`+cpu`) and
        // build metadata do not move the release.
        return Stage::Final;
    };
    let n = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0);
    match caps.get(1).map(|m| m.as_str()).unwrap_or("") {
        "dev" => Stage::Dev(n),
        "alpha" | "a" => Stage::Alpha(n),
        "beta" | "b" => Stage::Beta(n),
        "preview" | "pre" | "rc" | "c" => Stage::Candidate(n),
        "post" | "r" | "rev" => Stage::Post(n),
        _ => Stage::Final,
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_release(other).then(self.stage.cmp(&other.stage))
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compare two version strings.
///
/// Falls back to exact string equality when either side is not a
/// parseable version: identical strings are `Equal`, anything else is
/// `None` (incomparable).
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    match (PackageVersion::parse(a), PackageVersion::parse(b)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ if a.trim() == b.trim() => Some(Ordering::Equal),
        _ => None,
    }
}

/// Whether `candidate` is strictly newer than `current`.
pub fn is_newer_version(candidate: &str, current: &str) -> bool {
    compare_versions(candidate, current) == Some(Ordering::Greater)
}

/// Reduce a distribution version to the release the upstream project published.
///
/// `2.25.1+dfsg-1` → `2.25.1`, `1:2.0-3.fc39` → `2.0`, `v18.17.0` → `18.17.0`.
/// PEP 440 markers survive: `2.0.0rc1` stays `2.0.0rc1`.
pub fn normalize_version(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let body = raw.strip_prefix('v').unwrap_or(raw);
    let caps = VERSION_REGEX.captures(body)?;
    let release = caps.get(1)?.as_str();
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    let lowered = rest.to_ascii_lowercase();
    // The match may swallow a trailing separator; stop at the marker's number.
    let marker_end = SUFFIX_REGEX
        .captures(&lowered)
        .and_then(|caps| caps.get(2).or_else(|| caps.get(1)))
        .map(|m| m.end());
    match marker_end {
        Some(end) => Some(format!("{}{}", release, &rest[..end])),
        None => Some(release.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> PackageVersion {
        PackageVersion::parse(s).unwrap()
    }

    #[test]
    fn numeric_components_compare_as_integers() {
        assert!(v("1.9.0") < v("1.10.0"));
        assert!(v("1.10") > v("1.9"));
        assert!(v("10.0.0") > v("9.99.99"));
    }

    #[test]
    fn naive_string_ordering_would_disagree() {
        assert!("1.9.0" > "1.10.0");
        assert!(!is_newer_version("1.9.0", "1.10.0"));
        assert!(is_newer_version("1.10.0", "1.9.0"));
    }

    #[test]
    fn missing_components_are_zero() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("2"), v("2.0.0.0"));
        assert!(v("1.0.1") > v("1.0"));
    }

    #[test]
    fn prerelease_sorts_before_release() {
        assert!(v("2.0.0rc1") < v("2.0.0"));
        assert!(v("2.0.0a1") < v("2.0.0b1"));
        assert!(v("2.0.0b2") < v("2.0.0rc1"));
        assert!(v("2.0.0.dev0") < v("2.0.0a1"));
        assert!(v("2.0.0-beta.3") < v("2.0.0"));
        assert!(v("2.0.0rc1").is_prerelease());
        assert!(!v("2.0.0").is_prerelease());
    }

    #[test]
    fn post_release_sorts_after_release() {
        assert!(v("1.0.post1") > v("1.0"));
        assert!(v("1.0.post1") < v("1.0.1"));
    }

    #[test]
    fn distro_revisions_do_not_change_release() {
        assert_eq!(v("2.25.1+dfsg-1"), v("2.25.1"));
        assert_eq!(v("1:2.0-3.fc39"), v("2.0"));
    }

    #[test]
    fn arch_labels_are_not_prerelease_markers() {
        assert_eq!(v("1.0.0-amd64"), v("1.0.0"));
        assert!(!v("1.0.0-amd64").is_prerelease());
        assert!(!v("3.2-arm64").is_prerelease());
        assert!(v("2.1.0-beta").is_prerelease());
        assert!(v("1.0.0-r2") > v("1.0.0"));
    }

    #[test]
    fn v_prefix_is_ignored() {
        assert_eq!(v("v18.17.0"), v("18.17.0"));
        assert_eq!(v("v18.17.0").as_str(), "v18.17.0");
    }

    #[test]
    fn non_numeric_versions_do_not_parse() {
        assert!(PackageVersion::parse("latest").is_none());
        assert!(PackageVersion::parse("").is_none());
    }

    #[test]
    fn compare_versions_falls_back_to_string_equality() {
        assert_eq!(compare_versions("HEAD", "HEAD"), Some(Ordering::Equal));
        assert_eq!(compare_versions("HEAD", "1.0"), None);
        assert_eq!(compare_versions("1.2", "1.10"), Some(Ordering::Less));
    }

    #[test]
    fn normalize_strips_distro_noise() {
        assert_eq!(normalize_version("2.25.1+dfsg-1").as_deref(), Some("2.25.1"));
        assert_eq!(normalize_version("1:2.0-3.fc39").as_deref(), Some("2.0"));
        assert_eq!(normalize_version("v18.17.0").as_deref(), Some("18.17.0"));
        assert_eq!(normalize_version(" 3.1.4 \n").as_deref(), Some("3.1.4"));
    }

    #[test]
    fn normalize_keeps_pep440_markers() {
        assert_eq!(normalize_version("2.0.0rc1").as_deref(), Some("2.0.0rc1"));
        assert_eq!(normalize_version("1.0.post1").as_deref(), Some("1.0.post1"));
        assert_eq!(normalize_version("2.0.0-beta.3").as_deref(), Some("2.0.0-beta.3"));
        assert_eq!(normalize_version("2.0.0rc1+local").as_deref(), Some("2.0.0rc1"));
    }

    #[test]
    fn normalize_drops_arch_labels() {
        assert_eq!(normalize_version("1.0.0-amd64").as_deref(), Some("1.0.0"));
    }

    #[test]
    fn normalize_rejects_non_versions() {
        assert!(normalize_version("Not installed").is_none());
    }
}
