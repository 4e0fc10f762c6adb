//! Identity keys matching declarations across two modules.
//!
//! Types are identified by their full name, methods by their full signature. Both are derived
//! from names only, so they do not depend on metadata token order.

use std::collections::HashMap;

use crate::graph::{MethodEntry, TypeEntry};

/// A declaration with an identity key
pub trait Identity {
    /// The key two declarations are matched by
    fn key(&self) -> &str;
}

impl Identity for TypeEntry {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Identity for MethodEntry {
    fn key(&self) -> &str {
        &self.signature
    }
}

/// Map every entry by its key. When two entries share a key, the later one wins.
pub fn key_map<T: Identity>(entries: &[T]) -> HashMap<&str, &T> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        map.insert(entry.key(), entry);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(signature: &str, has_body: bool) -> MethodEntry {
        MethodEntry {
            signature: signature.to_string(),
            has_body,
            instructions: Vec::new(),
        }
    }

    #[test]
    fn last_duplicate_wins() {
        let methods = vec![
            method("System.Void T::A()", true),
            method("System.Void T::B()", true),
            method("System.Void T::A()", false),
        ];

        let map = key_map(&methods);
        assert_eq!(map.len(), 2);
        assert!(!map["System.Void T::A()"].has_body);
        assert!(map["System.Void T::B()"].has_body);
    }

    #[test]
    fn exact_match_only() {
        let types = vec![TypeEntry {
            name: "Ns.Type".to_string(),
            methods: Vec::new(),
        }];

        let map = key_map(&types);
        assert!(map.contains_key("Ns.Type"));
        assert!(!map.contains_key("ns.type"));
        assert!(!map.contains_key("Ns.Type "));
    }
}
