use std::cmp::Ordering;

/// A NuGet version string reduced to its numeric dot segments
///
/// Pre-release and build qualifiers (`-beta.1`, `+sha`) are cut off first,
/// then each dot segment is read up to its first non-digit.
#[derive(Debug, Clone)]
pub struct NuGetVersion {
    pub original: String,
    segments: Vec<u64>,
}

impl NuGetVersion {
    pub fn parse(version: &str) -> Self {
        let release = version
            .split_once(['-', '+'])
            .map_or(version, |(release, _)| release);
        let segments = release.split('.').map(leading_number).collect();
        Self {
            original: version.to_string(),
            segments,
        }
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Compare numeric segments, treating missing segments as zero.
    pub fn compare(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| {
                let a = self.segments.get(i).copied().unwrap_or(0);
                let b = other.segments.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    pub fn is_stable(&self) -> bool {
        match semver::Version::parse(&self.original) {
            Ok(v) => v.pre.is_empty(),
            Err(_) => !self.original.contains('-'),
        }
    }
}

fn leading_number(part: &str) -> u64 {
    let digits: String = part
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

pub struct VersionComparator;

impl VersionComparator {
    /// Stable descending sort: equal versions keep their relative order.
    pub fn sort_newest_first(versions: Vec<String>) -> Vec<String> {
        let mut parsed: Vec<NuGetVersion> =
            versions.iter().map(|v| NuGetVersion::parse(v)).collect();
        parsed.sort_by(|a, b| b.compare(a));
        parsed.into_iter().map(|v| v.original).collect()
    }

    /// Get the newest version, preferring a stable release on ties
    pub fn get_latest(versions: &[String], stable_only: bool) -> Option<String> {
        versions
            .iter()
            .map(|v| NuGetVersion::parse(v))
            .filter(|v| !stable_only || v.is_stable())
            .max_by(|a, b| {
                a.compare(b)
                    .then_with(|| a.is_stable().cmp(&b.is_stable()))
            })
            .map(|v| v.original)
    }

    /// Check if version `a` is newer than version `b`
    pub fn is_newer(a: &str, b: &str) -> bool {
        NuGetVersion::parse(a).compare(&NuGetVersion::parse(b)) == Ordering::Greater
    }
}
