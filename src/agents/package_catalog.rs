use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One declaration parsed out of a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    pub name: String,
    pub version: String,
    /// Basename of the descriptor that declared the package.
    pub source_file: String,
}

/// One place a package is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConsumer {
    pub source_file: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub consumers: Vec<PackageConsumer>,
}

impl PackageInfo {
    /// Distinct declared versions, in first-seen order.
    pub fn distinct_versions(&self) -> Vec<&str> {
        self.consumers
            .iter()
            .map(|c| c.version.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// True when consumers disagree on the declared version.
    pub fn has_conflict(&self) -> bool {
        self.distinct_versions().len() > 1
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .consumers
                .iter()
                .any(|c| c.version.to_lowercase().contains(needle))
    }
}

/// Packages of one scan, keyed by name in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageCatalog {
    packages: IndexMap<String, PackageInfo>,
}

impl PackageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_references<I>(references: I) -> Self
    where
        I: IntoIterator<Item = PackageReference>,
    {
        let mut catalog = Self::new();
        catalog.extend(references);
        catalog
    }

    pub fn insert(&mut self, reference: PackageReference) {
        let PackageReference {
            name,
            version,
            source_file,
        } = reference;
        let consumer = PackageConsumer {
            source_file,
            version,
        };

        match self.packages.get_mut(&name) {
            Some(info) => info.consumers.push(consumer),
            None => {
                self.packages.insert(
                    name.clone(),
                    PackageInfo {
                        name,
                        consumers: vec![consumer],
                    },
                );
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PackageInfo> {
        self.packages.get(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageInfo> {
        self.packages.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Packages whose consumers disagree on the version.
    pub fn conflicts(&self) -> impl Iterator<Item = &PackageInfo> {
        self.iter().filter(|info| info.has_conflict())
    }

    /// Total number of declarations across all packages.
    pub fn consumer_count(&self) -> usize {
        self.iter().map(|info| info.consumers.len()).sum()
    }

    /// Owned, ordered list of the packages for message payloads.
    pub fn packages(&self) -> Vec<PackageInfo> {
        self.iter().cloned().collect()
    }

    /// Case-insensitive search over package names and consumer versions.
    ///
    /// An empty search returns this catalog itself, borrowed.
    pub fn filter(&self, search: &str) -> Cow<'_, PackageCatalog> {
        if search.is_empty() {
            return Cow::Borrowed(self);
        }

        let needle = search.to_lowercase();
        let packages = self
            .packages
            .iter()
            .filter(|(_, info)| info.matches(&needle))
            .map(|(name, info)| (name.clone(), info.clone()))
            .collect();

        Cow::Owned(PackageCatalog { packages })
    }
}

impl Extend<PackageReference> for PackageCatalog {
    fn extend<I: IntoIterator<Item = PackageReference>>(&mut self, references: I) {
        for reference in references {
            self.insert(reference);
        }
    }
}

impl FromIterator<PackageReference> for PackageCatalog {
    fn from_iter<I: IntoIterator<Item = PackageReference>>(references: I) -> Self {
        Self::from_references(references)
    }
}
