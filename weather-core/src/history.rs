use serde_json::Value;

/// Most-recent-first list of resolved city names, unique, at most [`SearchHistory::CAPACITY`] long.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    pub const CAPACITY: usize = 5;

    pub fn new() -> Self {
        Self::default()
    }

    /// Move `city` to the front, dropping any earlier copy and the oldest overflow.
    pub fn record(&mut self, city: &str) {
        self.entries.retain(|c| c != city);
        self.entries.insert(0, city.to_string());
        self.entries.truncate(Self::CAPACITY);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a stored history. Anything but an array of strings yields an empty history.
    pub fn from_stored(value: &Value) -> Self {
        let Some(items) = value.as_array() else {
            return Self::default();
        };

        let mut entries: Vec<String> = Vec::with_capacity(Self::CAPACITY);
        for item in items {
            let Some(city) = item.as_str() else {
                return Self::default();
            };
            if !entries.iter().any(|c| c == city) {
                entries.push(city.to_string());
            }
        }
        entries.truncate(Self::CAPACITY);

        Self { entries }
    }

    pub fn to_stored(&self) -> Value {
        Value::from(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn repeated_city_moves_to_front() {
        let mut history = SearchHistory::new();
        history.record("Paris");
        history.record("London");
        history.record("Paris");

        assert_eq!(history.entries(), ["Paris", "London"]);
    }

    #[test]
    fn capped_at_five_dropping_oldest() {
        let mut history = SearchHistory::new();
        for city in ["A", "B", "C", "D", "E", "F"] {
            history.record(city);
        }

        assert_eq!(history.len(), SearchHistory::CAPACITY);
        assert_eq!(history.entries(), ["F", "E", "D", "C", "B"]);
    }

    #[test]
    fn never_duplicates_or_overflows() {
        let mut history = SearchHistory::new();
        let cities = ["Oslo", "Rome", "Oslo", "Lima", "Kyiv", "Rome", "Oslo", "Baku", "Nuuk", "Lima"];

        for city in cities {
            history.record(city);
            assert_eq!(history.get(0), Some(city));
            assert!(history.len() <= SearchHistory::CAPACITY);

            let mut sorted = history.entries().to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), history.len());
        }
    }

    #[test]
    fn from_stored_accepts_string_arrays() {
        let history = SearchHistory::from_stored(&json!(["Paris", "London"]));
        assert_eq!(history.entries(), ["Paris", "London"]);
        assert_eq!(history.to_stored(), json!(["Paris", "London"]));
    }

    #[test]
    fn from_stored_normalizes_hand_edited_values() {
        let history =
            SearchHistory::from_stored(&json!(["A", "B", "A", "C", "D", "E", "F", "G"]));
        assert_eq!(history.entries(), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn from_stored_rejects_other_shapes() {
        assert!(SearchHistory::from_stored(&json!({"city": "Paris"})).is_empty());
        assert!(SearchHistory::from_stored(&json!(["Paris", 42])).is_empty());
        assert!(SearchHistory::from_stored(&json!(true)).is_empty());
        assert!(SearchHistory::from_stored(&Value::Null).is_empty());
    }
}
