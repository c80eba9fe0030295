//! Word tables consulted while lexing and elaborating.

use std::collections::HashMap;

use netar_core::DeviceKind;

use crate::tokens::Keyword;

/// The keyword and device-type tables of the topology language.
///
/// Built once and passed by reference to every parse. The tables are
/// immutable after construction, so one `Grammar` can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct Grammar {
    keywords: HashMap<&'static str, Keyword>,
    device_kinds: HashMap<&'static str, DeviceKind>,
}

impl Grammar {
    pub fn new() -> Self {
        let keywords = Keyword::ALL
            .into_iter()
            .map(|keyword| (keyword.as_str(), keyword))
            .collect();
        let device_kinds = DeviceKind::KNOWN
            .into_iter()
            .filter_map(|kind| known_kind_name(&kind).map(|name| (name, kind)))
            .collect();

        Self {
            keywords,
            device_kinds,
        }
    }

    /// Look up a whole word in the keyword table. Matching is case-sensitive.
    pub fn keyword(&self, word: &str) -> Option<Keyword> {
        self.keywords.get(word).copied()
    }

    /// Resolve a device type name.
    ///
    /// Names outside the table are carried through as [`DeviceKind::Other`]
    /// and never rejected.
    pub fn device_kind(&self, name: &str) -> DeviceKind {
        self.device_kinds
            .get(name)
            .cloned()
            .unwrap_or_else(|| DeviceKind::Other(name.to_string()))
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

fn known_kind_name(kind: &DeviceKind) -> Option<&'static str> {
    match kind {
        DeviceKind::Pc => Some("pc"),
        DeviceKind::Laptop => Some("laptop"),
        DeviceKind::Router => Some("router"),
        DeviceKind::Switch => Some("switch"),
        DeviceKind::Firewall => Some("firewall"),
        DeviceKind::Server => Some("server"),
        DeviceKind::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_whole_word_and_case_sensitive() {
        let grammar = Grammar::new();
        assert_eq!(grammar.keyword("device"), Some(Keyword::Device));
        assert_eq!(grammar.keyword("Device"), None);
        assert_eq!(grammar.keyword("devices"), None);
    }

    #[test]
    fn test_device_kind_lookup() {
        let grammar = Grammar::new();
        assert_eq!(grammar.device_kind("router"), DeviceKind::Router);
        assert_eq!(
            grammar.device_kind("accesspoint"),
            DeviceKind::Other("accesspoint".to_string())
        );
    }

    #[test]
    fn test_grammar_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Grammar>();
    }

    #[test]
    fn test_kind_names_agree_with_core() {
        for kind in DeviceKind::KNOWN {
            assert_eq!(known_kind_name(&kind), Some(kind.as_str()));
        }
    }
}
