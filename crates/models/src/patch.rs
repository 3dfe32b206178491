use serde::{Deserialize, Deserializer};

/// Deserializes a field that distinguishes "absent" from "explicitly null".
///
/// Use together with `#[serde(default)]`: an absent field stays `None`, while
/// `null` becomes `Some(None)` and clears the stored value.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Changes {
        #[serde(default, deserialize_with = "super::double_option")]
        building: Option<Option<String>>,
    }

    #[test]
    fn test_absent_null_and_value() {
        let absent: Changes = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.building, None);

        let cleared: Changes = serde_json::from_str(r#"{"building":null}"#).unwrap();
        assert_eq!(cleared.building, Some(None));

        let set: Changes = serde_json::from_str(r#"{"building":"Block C"}"#).unwrap();
        assert_eq!(set.building, Some(Some("Block C".to_string())));
    }
}
