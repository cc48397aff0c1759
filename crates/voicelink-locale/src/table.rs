//! Raw `name=value` phrase table parsing.

use std::collections::HashMap;

/// Parsed contents of one `.lang` resource.
#[derive(Debug, Clone, Default)]
pub struct PhraseTable {
    entries: HashMap<String, String>,
}

impl PhraseTable {
    /// Parses `name=value` lines. Blank lines and lines without `=` are
    /// ignored; a repeated name overwrites the earlier value. Only the
    /// first `=` splits, so values may themselves contain `=`.
    pub fn parse(contents: &str) -> Self {
        let mut entries = HashMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };
            entries.insert(name.to_string(), value.to_string());
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_lines() {
        let table = PhraseTable::parse("greeting=Hello there\nfarewell=Bye\n");
        assert_eq!(table.get("greeting"), Some("Hello there"));
        assert_eq!(table.get("farewell"), Some("Bye"));
    }

    #[test]
    fn ignores_blank_and_malformed_lines() {
        let table = PhraseTable::parse("\n   \nnot a phrase line\nok=yes\n");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("ok"), Some("yes"));
    }

    #[test]
    fn later_duplicate_wins() {
        let table = PhraseTable::parse("key=first\nkey=second\n");
        assert_eq!(table.get("key"), Some("second"));
    }

    #[test]
    fn value_keeps_embedded_equals() {
        let table = PhraseTable::parse("formula=a=b\n");
        assert_eq!(table.get("formula"), Some("a=b"));
    }

    #[test]
    fn absent_name_yields_none() {
        let table = PhraseTable::parse("ok=yes\n");
        assert_eq!(table.get("missing"), None);
    }
}
