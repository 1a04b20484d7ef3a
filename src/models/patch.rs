use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Three-state field for partial updates: the key was omitted, the key was
/// an explicit `null`, or the key carried a value. `Option` alone conflates
/// the first two, and update semantics differ between them (an omitted vital
/// is left untouched, an explicit `null` clears it).
///
/// Works with `#[serde(default)]` on the containing struct field: a missing
/// key falls back to `Absent`, a present key deserializes to `Null` or
/// `Value`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// The key appeared in the payload, as `null` or as a value.
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// Merge over the stored value: absent keeps it, null clears it, a
    /// value replaces it.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Absent => current,
            Patch::Null => None,
            Patch::Value(v) => Some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            // Absent fields are expected to be skipped by the containing
            // struct (`skip_serializing_if = "Patch::is_absent"`); if one
            // gets here anyway it degrades to null.
            Patch::Null | Patch::Absent => serializer.serialize_none(),
        }
    }
}
