//! Utility traits for `QuadraticMap`

use crate::QuadraticMap;

/// Extension trait for map implementations that provides additional utility methods
pub trait MapExtensions<V> {
    /// Returns the live keys in bucket order
    fn keys(&self) -> Vec<String>;

    /// Returns the live values in bucket order
    fn values(&self) -> Vec<V>;
}

impl<V: Clone, H> MapExtensions<V> for QuadraticMap<V, H> {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_owned()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_and_values() {
        let map: QuadraticMap<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();

        let mut keys = map.keys();
        keys.sort(); // Sort for predictable comparison

        let mut values = map.values();
        values.sort_unstable();

        assert_eq!(keys, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_keys_skip_removed_entries() {
        let mut map = QuadraticMap::new();
        map.put("a", 1);
        map.put("b", 2);
        map.remove("a");

        assert_eq!(map.keys(), vec!["b".to_string()]);
        assert_eq!(map.values(), vec![2]);
    }
}
