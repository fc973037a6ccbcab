//! Options for building observation records.

use serde::{Deserialize, Serialize};

/// Options controlling how an [`ObservationInfo`](crate::ObservationInfo) is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationOptions {
    /// Fail on the first property that cannot be translated.
    ///
    /// When false, failures are logged and the property is left unset.
    pub pedantic: bool,

    /// Use the translator registered under this name instead of asking
    /// each registered translator in turn.
    pub translator: Option<String>,
}

impl ObservationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pedantic(mut self, enable: bool) -> Self {
        self.pedantic = enable;
        self
    }

    #[must_use]
    pub fn with_translator(mut self, name: impl Into<String>) -> Self {
        self.translator = Some(name.into());
        self
    }
}
