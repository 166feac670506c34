use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::job::DetectedLabel;

/// Label names treated as suspicious on their own.
const SUSPICIOUS_LABELS: &[&str] = &[
    "flare",
    "fire",
    "flame",
    "quake",
    "duel",
    "kicking",
    "punching",
    "fighting",
    "martial art",
    "wrestling",
    "boxing",
];

/// Label names reported under a different finding.
const MAPPED_LABELS: &[(&str, &str)] = &[("grand theft auto", "road conflict/fighting")];

/// Matched taxonomy entries, deduplicated and iterated alphabetically.
pub type SuspiciousFindings = BTreeSet<String>;

/// Keyword set used to decide which detected labels are suspicious.
#[derive(Debug, Clone)]
pub struct SuspicionTaxonomy {
    keywords: HashSet<String>,
    mapped: HashMap<String, String>,
}

impl Default for SuspicionTaxonomy {
    fn default() -> Self {
        Self {
            keywords: SUSPICIOUS_LABELS.iter().map(|s| s.to_string()).collect(),
            mapped: MAPPED_LABELS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl SuspicionTaxonomy {
    /// Built-in taxonomy extended with deployment-specific keywords.
    pub fn with_extra_keywords<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut taxonomy = Self::default();
        taxonomy.keywords.extend(
            extra
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        );
        taxonomy
    }

    /// Finding produced by a single label name, if any.
    ///
    /// Mapped terms win over plain keywords.
    pub fn match_label(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        if let Some(mapped) = self.mapped.get(&name) {
            return Some(mapped.as_str());
        }
        self.keywords.get(&name).map(String::as_str)
    }

    pub fn classify<'a, I>(&self, labels: I) -> SuspiciousFindings
    where
        I: IntoIterator<Item = &'a DetectedLabel>,
    {
        labels
            .into_iter()
            .filter_map(|label| self.match_label(&label.name))
            .map(str::to_string)
            .collect()
    }
}
