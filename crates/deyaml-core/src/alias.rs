//! Import alias resolution
//!
//! Namespaces whose trailing path segment is unique are imported under their
//! own name. When several namespaces share a trailing segment, each of them
//! gets an alias built from its trailing segments (`k8s.io/api/core/v1` becomes
//! `corev1`), widened segment by segment until no alias clashes with another
//! alias or with the name of an unaliased import.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::model::last_segment;
use crate::{log_op_end, log_op_start};

const FALLBACK_ALIAS: &str = "pkg";

/// Immutable `namespace -> alias` table; an empty alias means "not aliased"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    /// Raw alias for a namespace (`""` when unaliased)
    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.entries.get(namespace).map(String::as_str)
    }

    /// Non-empty alias for a namespace, if it has one
    pub fn alias(&self, namespace: &str) -> Option<&str> {
        self.get(namespace).filter(|alias| !alias.is_empty())
    }

    /// Identifier the namespace is referred to by in generated code
    pub fn import_name(&self, namespace: &str) -> String {
        match self.alias(namespace) {
            Some(alias) => alias.to_string(),
            None => sanitize(last_segment(namespace)),
        }
    }

    /// Entries sorted by namespace
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(namespace, alias)| (namespace.as_str(), alias.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of namespaces that carry a non-empty alias
    pub fn aliased_count(&self) -> usize {
        self.entries.values().filter(|alias| !alias.is_empty()).count()
    }
}

impl FromIterator<(String, String)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Compute the alias table for a set of namespaces
///
/// The result depends only on the set contents, not on iteration order.
///
/// # Example
///
/// ```
/// use deyaml_core::alias::resolve;
///
/// let aliases = resolve(["a/b/widget", "c/d/widget", "k8s.io/api/apps"]);
/// assert_eq!(aliases.get("a/b/widget"), Some("bwidget"));
/// assert_eq!(aliases.get("c/d/widget"), Some("dwidget"));
/// assert_eq!(aliases.get("k8s.io/api/apps"), Some(""));
/// ```
pub fn resolve<I, S>(namespaces: I) -> AliasTable
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    log_op_start!("resolve");
    let start = std::time::Instant::now();

    let namespaces: BTreeSet<String> = namespaces
        .into_iter()
        .map(|ns| ns.as_ref().to_string())
        .collect();

    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for namespace in &namespaces {
        groups
            .entry(last_segment(namespace))
            .or_default()
            .push(namespace.as_str());
    }

    let mut table: BTreeMap<String, String> = BTreeMap::new();
    let mut reserved: BTreeSet<String> = BTreeSet::new();
    let mut widths: BTreeMap<&str, usize> = BTreeMap::new();
    for (segment, members) in &groups {
        if let [only] = members.as_slice() {
            table.insert(only.to_string(), String::new());
            reserved.insert(sanitize(segment));
        } else {
            for member in members {
                widths.insert(*member, 2);
            }
        }
    }

    // Widen colliding aliases one segment at a time until they settle.
    loop {
        let candidates: BTreeMap<&str, String> = widths
            .iter()
            .map(|(namespace, width)| (*namespace, trailing_alias(namespace, *width)))
            .collect();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for alias in candidates.values() {
            *counts.entry(alias.as_str()).or_default() += 1;
        }

        let mut colliding = false;
        let mut progressed = false;
        for (namespace, alias) in &candidates {
            if counts[alias.as_str()] > 1 || reserved.contains(alias) {
                colliding = true;
                let width = widths.get_mut(namespace);
                if let Some(width) = width {
                    if *width < segment_count(namespace) {
                        *width += 1;
                        progressed = true;
                    }
                }
            }
        }
        if !colliding || !progressed {
            break;
        }
    }

    // Whatever still clashes after running out of segments gets a suffix.
    let mut used = reserved;
    for (namespace, width) in &widths {
        let base = trailing_alias(namespace, *width);
        let mut alias = base.clone();
        let mut n = 2;
        while used.contains(&alias) {
            alias = format!("{}{}", base, n);
            n += 1;
        }
        used.insert(alias.clone());
        table.insert(namespace.to_string(), alias);
    }

    let aliases = AliasTable { entries: table };
    log_op_end!(
        "resolve",
        duration_ms = start.elapsed().as_millis() as u64,
        namespace_count = aliases.len(),
        aliased_count = aliases.aliased_count()
    );
    aliases
}

fn segment_count(namespace: &str) -> usize {
    namespace.split('/').filter(|s| !s.is_empty()).count()
}

/// Concatenation of the last `width` segments, as a valid identifier
fn trailing_alias(namespace: &str, width: usize) -> String {
    let segments: Vec<&str> = namespace.split('/').filter(|s| !s.is_empty()).collect();
    let from = segments.len().saturating_sub(width);
    sanitize(&segments[from..].concat())
}

/// Drop characters not valid in an identifier; never starts with a digit
fn sanitize(raw: &str) -> String {
    let mut ident: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if ident.is_empty() {
        ident.push_str(FALLBACK_ALIAS);
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
