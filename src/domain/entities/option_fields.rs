use serde::{Deserialize, Deserializer, Serialize};

/// Tri-state field for PATCH payloads.
///
/// - `Unchanged` → key absent from the body
/// - `SetToNull` → key present with `null`
/// - `SetToValue` → key present with a value
///
/// Containing structs must use `#[serde(default)]` so absent keys land on
/// `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => OptionField::SetToValue(v),
            None => OptionField::SetToNull,
        })
    }
}

impl<T> OptionField<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Applies the patch to an optional target: unchanged keeps it,
    /// null clears it, a value replaces it.
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            OptionField::Unchanged => {}
            OptionField::SetToNull => *target = None,
            OptionField::SetToValue(v) => *target = Some(v),
        }
    }
}

impl<T> From<Option<Option<T>>> for OptionField<T> {
    fn from(opt: Option<Option<T>>) -> Self {
        match opt {
            None => OptionField::Unchanged,
            Some(None) => OptionField::SetToNull,
            Some(Some(v)) => OptionField::SetToValue(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Patch {
        live_url: OptionField<String>,
    }

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.live_url, OptionField::Unchanged);

        let null: Patch = serde_json::from_str(r#"{"live_url": null}"#).unwrap();
        assert_eq!(null.live_url, OptionField::SetToNull);

        let value: Patch = serde_json::from_str(r#"{"live_url": "https://x.dev"}"#).unwrap();
        assert_eq!(value.live_url, OptionField::SetToValue("https://x.dev".to_string()));
    }

    #[test]
    fn apply_to_updates_target() {
        let mut target = Some("old".to_string());
        OptionField::Unchanged.apply_to(&mut target);
        assert_eq!(target.as_deref(), Some("old"));

        OptionField::SetToValue("new".to_string()).apply_to(&mut target);
        assert_eq!(target.as_deref(), Some("new"));

        OptionField::<String>::SetToNull.apply_to(&mut target);
        assert!(target.is_none());
    }
}
