#![deny(unsafe_code)]

//! Standardized observation records.
//!
//! [`ObservationInfo`] picks a translator for a header (automatically, or by
//! name through [`ObservationOptions`]), resolves every standard property,
//! and remembers which header keywords were consumed.

pub mod error;
pub mod logging;
pub mod observation;
pub mod options;

pub use error::ObservationError;
pub use logging::{LogConfig, LogFormat, init_logging, subscriber_with_writer};
pub use observation::ObservationInfo;
pub use options::ObservationOptions;
