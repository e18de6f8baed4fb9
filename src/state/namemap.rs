//! Bidirectional mapping between backend ids and IRC names.
//!
//! Backend display names are arbitrary text; IRC names must avoid a set of
//! reserved characters and be unique under rfc1459 case folding. Each session
//! owns one map for nicks and one for channels.

use std::collections::HashMap;

use qqirc_proto::irc_to_lower;

/// Characters that may not appear in a generated name.
const RESERVED: &[char] = &[
    '#', ' ', '\u{3000}', '\t', '!', '~', '@', '$', '&', ',', ':',
];

/// Replacement for reserved characters.
const FILLER: char = '_';

/// Replace reserved and control characters with the filler.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if RESERVED.contains(&c) || c.is_control() {
                FILLER
            } else {
                c
            }
        })
        .collect()
}

/// What a map names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Nick,
    Channel,
}

/// Rename refused because another entity owns the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTaken {
    pub owner: String,
}

#[derive(Debug)]
pub struct UniqNameMap {
    kind: NameKind,
    /// backend id -> IRC name
    to_irc: HashMap<String, String>,
    /// folded IRC name -> backend id
    to_backend: HashMap<String, String>,
}

impl UniqNameMap {
    pub fn new(kind: NameKind) -> Self {
        Self {
            kind,
            to_irc: HashMap::new(),
            to_backend: HashMap::new(),
        }
    }

    /// Map `id` to a name derived from `display`.
    ///
    /// Returns false when the id is absent or the display name is empty.
    /// An id that is already mapped keeps its name.
    pub fn register(&mut self, id: Option<&str>, display: &str) -> bool {
        let Some(id) = id else {
            return false;
        };
        if display.is_empty() {
            return false;
        }
        if self.to_irc.contains_key(id) {
            return true;
        }

        let base = match self.kind {
            NameKind::Nick => sanitize(display),
            NameKind::Channel => format!("#{}", sanitize(display)),
        };

        let mut suffix = 0usize;
        let name = loop {
            let candidate = if suffix == 0 {
                base.clone()
            } else {
                format!("{base}{suffix}")
            };
            if !self.to_backend.contains_key(&irc_to_lower(&candidate)) {
                break candidate;
            }
            suffix += 1;
        };

        self.insert(id, name);
        true
    }

    fn insert(&mut self, id: &str, name: String) {
        self.to_backend.insert(irc_to_lower(&name), id.to_owned());
        self.to_irc.insert(id.to_owned(), name);
    }

    /// IRC name of a registered id.
    pub fn irc_name(&self, id: &str) -> Option<&str> {
        self.to_irc.get(id).map(String::as_str)
    }

    /// Backend id owning an IRC name (case-insensitive).
    pub fn backend_id(&self, name: &str) -> Option<&str> {
        self.to_backend.get(&irc_to_lower(name)).map(String::as_str)
    }

    /// Canonical spelling of a known IRC name.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.backend_id(name).and_then(|id| self.irc_name(id))
    }

    /// Point `id` at `name`, retiring its previous name.
    ///
    /// `name` is taken verbatim. Fails if a different id owns it.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), NameTaken> {
        let key = irc_to_lower(name);
        if let Some(owner) = self.to_backend.get(&key)
            && owner != id
        {
            return Err(NameTaken {
                owner: owner.clone(),
            });
        }

        if let Some(old) = self.to_irc.remove(id) {
            self.to_backend.remove(&irc_to_lower(&old));
        }
        self.insert(id, name.to_owned());
        Ok(())
    }

    /// All `(backend id, IRC name)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.to_irc.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    /// Drop every mapping.
    pub fn clear(&mut self) {
        self.to_irc.clear();
        self.to_backend.clear();
    }

    pub fn len(&self) -> usize {
        self.to_irc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_irc.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let mut map = UniqNameMap::new(NameKind::Nick);
        assert!(map.register(Some("1"), "Bob"));
        assert!(map.register(Some("1"), "Robert"));
        assert_eq!(map.irc_name("1"), Some("Bob"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn collisions_get_smallest_suffix() {
        let mut map = UniqNameMap::new(NameKind::Nick);
        for id in ["1", "2", "3"] {
            assert!(map.register(Some(id), "Bob"));
        }
        assert_eq!(map.irc_name("1"), Some("Bob"));
        assert_eq!(map.irc_name("2"), Some("Bob1"));
        assert_eq!(map.irc_name("3"), Some("Bob2"));
    }

    #[test]
    fn collisions_are_case_insensitive() {
        let mut map = UniqNameMap::new(NameKind::Nick);
        map.register(Some("1"), "Bob");
        map.register(Some("2"), "bob");
        map.register(Some("3"), "x[]");
        map.register(Some("4"), "X{}");
        assert_eq!(map.irc_name("2"), Some("bob1"));
        assert_eq!(map.irc_name("4"), Some("X{}1"));
        assert_eq!(map.backend_id("BOB"), Some("1"));
    }

    #[test]
    fn distinct_ids_get_distinct_names() {
        let mut map = UniqNameMap::new(NameKind::Nick);
        let names = ["a b", "a_b", "a!b", "a@b", "A_B", "a~b", "a_b1"];
        for (i, name) in names.iter().enumerate() {
            assert!(map.register(Some(&i.to_string()), name));
        }
        let mut seen = std::collections::HashSet::new();
        for i in 0..names.len() {
            let name = map.irc_name(&i.to_string()).unwrap();
            assert!(seen.insert(irc_to_lower(name)), "duplicate {name}");
            assert_eq!(map.backend_id(name), Some(i.to_string().as_str()));
        }
    }

    #[test]
    fn sanitized_names_avoid_reserved_chars() {
        let raw = "#a b\u{3000}c\td!e~f@g$h&i,j:k\r\nl\x01";
        let clean = sanitize(raw);
        for c in ['#', ' ', '\u{3000}', '\t', '!', '~', '@', '$', '&', '\r', '\n', '\x01'] {
            assert!(!clean.contains(c), "{c:?} survived in {clean:?}");
        }
        assert_eq!(clean.chars().count(), raw.chars().count());
    }

    #[test]
    fn rejects_absent_id_and_empty_name() {
        let mut map = UniqNameMap::new(NameKind::Nick);
        assert!(!map.register(None, "Bob"));
        assert!(!map.register(Some("1"), ""));
        assert!(map.is_empty());
    }

    #[test]
    fn channels_carry_sigil() {
        let mut map = UniqNameMap::new(NameKind::Channel);
        map.register(Some("1001"), "1001");
        map.register(Some("1002"), "Rust Lang");
        assert_eq!(map.irc_name("1001"), Some("#1001"));
        assert_eq!(map.irc_name("1002"), Some("#Rust_Lang"));
        assert_eq!(map.backend_id("#rust_lang"), Some("1002"));
        assert_eq!(map.canonical("#RUST_LANG"), Some("#Rust_Lang"));
    }

    #[test]
    fn lookups_of_unknown_names_are_none() {
        let map = UniqNameMap::new(NameKind::Channel);
        assert_eq!(map.backend_id("#999999"), None);
        assert_eq!(map.irc_name("999999"), None);
    }

    #[test]
    fn rename_retires_old_name() {
        let mut map = UniqNameMap::new(NameKind::Nick);
        map.register(Some("10000"), "alice");
        map.rename("10000", "alice2").unwrap();
        assert_eq!(map.irc_name("10000"), Some("alice2"));
        assert_eq!(map.backend_id("alice"), None);

        map.register(Some("20001"), "alice");
        assert_eq!(map.irc_name("20001"), Some("alice"));
    }

    #[test]
    fn rename_refuses_foreign_name() {
        let mut map = UniqNameMap::new(NameKind::Nick);
        map.register(Some("10000"), "alice");
        map.register(Some("20001"), "Bob");
        assert_eq!(
            map.rename("10000", "BOB"),
            Err(NameTaken {
                owner: "20001".into()
            })
        );
        assert_eq!(map.irc_name("10000"), Some("alice"));
    }

    #[test]
    fn rename_case_change_and_unmapped_id() {
        let mut map = UniqNameMap::new(NameKind::Nick);
        map.register(Some("1"), "alice");
        map.rename("1", "Alice").unwrap();
        assert_eq!(map.irc_name("1"), Some("Alice"));
        assert_eq!(map.len(), 1);

        map.rename("2", "carol").unwrap();
        assert_eq!(map.backend_id("carol"), Some("2"));
    }
}
