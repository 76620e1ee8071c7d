//! Insertion-ordered map keyed by element symbol.
//!
//! Formula strings are rebuilt from element counts in the order the elements were first
//! seen, so the maps used throughout the crate keep their insertion order. Equality
//! ignores order: `{H: 2, O: 1}` equals `{O: 1, H: 2}`.
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

#[derive(Debug, Clone)]
pub struct ElementMap<V> {
    entries: Vec<(String, V)>,
}

/// element symbol -> number of atoms
pub type ElementCountMap = ElementMap<usize>;
/// element symbol -> percent of the molar mass
pub type PercentCompositionMap = ElementMap<f64>;
/// element symbol -> moles per unit of sample, normalised against the smallest one
pub type MoleRatioMap = ElementMap<f64>;

impl<V> Default for ElementMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> ElementMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(key, _)| key == symbol)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == symbol)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    /// Inserts a value. An existing key keeps its position and the old value is returned.
    pub fn insert(&mut self, symbol: impl Into<String>, value: V) -> Option<V> {
        let symbol = symbol.into();
        match self.get_mut(&symbol) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((symbol, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries
            .iter_mut()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Builds a new map with the same keys in the same order.
    pub fn map_values<W, F>(&self, mut f: F) -> ElementMap<W>
    where
        F: FnMut(&str, &V) -> W,
    {
        ElementMap {
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), f(key, value)))
                .collect(),
        }
    }
}

impl<V: PartialEq> PartialEq for ElementMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for ElementMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ElementMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V, const N: usize> From<[(&str, V); N]> for ElementMap<V> {
    fn from(pairs: [(&str, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a, V> IntoIterator for &'a ElementMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, V)>,
        fn(&'a (String, V)) -> (&'a str, &'a V),
    >;

    fn into_iter(self) -> Self::IntoIter {
        fn split<V>(entry: &(String, V)) -> (&str, &V) {
            (entry.0.as_str(), &entry.1)
        }
        self.entries
            .iter()
            .map(split::<V> as fn(&'a (String, V)) -> (&'a str, &'a V))
    }
}

impl<V: Serialize> Serialize for ElementMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<V: fmt::Display> fmt::Display for ElementMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let mut map = ElementCountMap::new();
        map.insert("O", 1);
        map.insert("H", 2);
        map.insert("O", 3);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["O", "H"]);
        assert_eq!(map.get("O"), Some(&3));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = ElementCountMap::from([("H", 2), ("O", 1)]);
        let b = ElementCountMap::from([("O", 1), ("H", 2)]);
        let c = ElementCountMap::from([("O", 1), ("H", 3)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, ElementCountMap::from([("H", 2)]));
    }

    #[test]
    fn test_serialize_as_object() {
        let map = ElementCountMap::from([("Ca", 1), ("O", 2), ("H", 2)]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Ca":1,"O":2,"H":2}"#);
        assert_eq!(map.to_string(), "{Ca: 1, O: 2, H: 2}");
    }

    #[test]
    fn test_map_values() {
        let map = ElementCountMap::from([("C", 6), ("H", 12)]);
        let halved = map.map_values(|_, count| *count as f64 / 2.0);
        assert_eq!(halved.get("C"), Some(&3.0));
        assert_eq!(halved.keys().collect::<Vec<_>>(), vec!["C", "H"]);
    }
}
