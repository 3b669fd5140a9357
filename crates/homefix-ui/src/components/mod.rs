//! Yew components rendered inside the preference provider.

pub(crate) mod preferences;
