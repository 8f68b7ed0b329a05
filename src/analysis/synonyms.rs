//! Static synonym table for keyword matching
//!
//! Maps a canonical term to its lexical variants (abbreviations, alternate
//! spellings, related forms). Lookup is bidirectional: a variant resolves
//! to its canonical term plus all sibling variants. The table is built once
//! at startup and injected into the matcher; it is never mutated.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SynonymTable {
    /// canonical -> variants
    forward: HashMap<String, Vec<String>>,
    /// any member (canonical or variant) -> canonical
    reverse: HashMap<String, String>,
}

impl SynonymTable {
    /// Build a table from (canonical, variants) pairs. Terms are lowercased.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();

        for (canonical, variants) in entries {
            let canonical = canonical.into().to_lowercase();
            let variants: Vec<String> = variants.into_iter().map(|v| v.into().to_lowercase()).collect();

            reverse.insert(canonical.clone(), canonical.clone());
            for variant in &variants {
                reverse.insert(variant.clone(), canonical.clone());
            }
            forward.insert(canonical, variants);
        }

        Self { forward, reverse }
    }

    /// The built-in table shipped with the scorer.
    pub fn builtin() -> Self {
        Self::from_entries(vec![
            ("javascript", vec!["js", "ecmascript", "es6"]),
            ("typescript", vec!["ts"]),
            ("python", vec!["py", "python3"]),
            ("kubernetes", vec!["k8s", "kube"]),
            ("docker", vec!["containers", "containerization"]),
            ("postgresql", vec!["postgres", "psql"]),
            ("mysql", vec!["my-sql"]),
            ("mongodb", vec!["mongo"]),
            ("amazon web services", vec!["aws"]),
            ("google cloud", vec!["gcp", "google cloud platform"]),
            ("microsoft azure", vec!["azure"]),
            ("machine learning", vec!["ml"]),
            ("artificial intelligence", vec!["ai"]),
            ("natural language processing", vec!["nlp"]),
            ("continuous integration", vec!["ci", "ci/cd", "cicd"]),
            ("infrastructure as code", vec!["iac"]),
            ("react", vec!["reactjs", "react.js"]),
            ("vue", vec!["vuejs", "vue.js"]),
            ("angular", vec!["angularjs"]),
            ("node.js", vec!["node", "nodejs"]),
            ("c++", vec!["cpp"]),
            ("c#", vec!["csharp", "dotnet", ".net"]),
            ("golang", vec!["go"]),
            ("ruby on rails", vec!["rails", "ror"]),
            ("test driven development", vec!["tdd"]),
            ("object oriented programming", vec!["oop"]),
            ("user experience", vec!["ux"]),
            ("user interface", vec!["ui"]),
            ("search engine optimization", vec!["seo"]),
            ("project management", vec!["pm"]),
            ("quality assurance", vec!["qa"]),
            ("site reliability engineering", vec!["sre"]),
            ("version control", vec!["git", "svn"]),
            ("rest", vec!["restful", "rest api"]),
            ("graphql", vec!["gql"]),
        ])
    }

    /// All alternative spellings of `term`, excluding `term` itself.
    /// Returns the full synonym group whether `term` is canonical or a
    /// variant; unknown terms return an empty list.
    pub fn variants_of(&self, term: &str) -> Vec<String> {
        let term = term.to_lowercase();
        let canonical = match self.reverse.get(&term) {
            Some(c) => c,
            None => return Vec::new(),
        };

        let mut group: Vec<String> = Vec::new();
        if *canonical != term {
            group.push(canonical.clone());
        }
        if let Some(variants) = self.forward.get(canonical) {
            group.extend(variants.iter().filter(|v| **v != term).cloned());
        }
        group
    }

    /// Canonical form of `term`, if the table knows it.
    pub fn canonical(&self, term: &str) -> Option<&str> {
        self.reverse.get(&term.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_lookup() {
        let table = SynonymTable::builtin();
        let variants = table.variants_of("kubernetes");
        assert!(variants.contains(&"k8s".to_string()));
    }

    #[test]
    fn test_reverse_lookup_includes_canonical_and_siblings() {
        let table = SynonymTable::builtin();
        let variants = table.variants_of("k8s");
        assert!(variants.contains(&"kubernetes".to_string()));
        assert!(variants.contains(&"kube".to_string()));
    }

    #[test]
    fn test_unknown_term_is_empty() {
        let table = SynonymTable::builtin();
        assert!(table.variants_of("underwater basket weaving").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let table = SynonymTable::builtin();
        assert_eq!(table.canonical("AWS"), Some("amazon web services"));
    }

    #[test]
    fn test_fixture_table() {
        let table = SynonymTable::from_entries(vec![("alpha", vec!["a1", "a2"])]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.variants_of("a1"), vec!["alpha".to_string(), "a2".to_string()]);
    }
}
