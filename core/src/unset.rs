//! A "not supplied" marker for partial updates.
//!
//! `Option` cannot serve here: for a profile update, an empty string is a
//! real value that clears the field server-side, and it must stay
//! distinguishable from "leave this field alone".

/// Either a caller-supplied value or the `Unset` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MaybeUnset<T> {
    #[default]
    Unset,
    Set(T),
}

impl<T> MaybeUnset<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, MaybeUnset::Set(_))
    }

    pub fn as_ref(&self) -> MaybeUnset<&T> {
        match self {
            MaybeUnset::Unset => MaybeUnset::Unset,
            MaybeUnset::Set(value) => MaybeUnset::Set(value),
        }
    }

    /// `Some` for a supplied value, `None` for `Unset`.
    pub fn into_option(self) -> Option<T> {
        match self {
            MaybeUnset::Unset => None,
            MaybeUnset::Set(value) => Some(value),
        }
    }
}

impl<T> From<T> for MaybeUnset<T> {
    fn from(value: T) -> Self {
        MaybeUnset::Set(value)
    }
}
