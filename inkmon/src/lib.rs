//!
//! Printer consumable checks for Nagios-compatible monitoring. The crate reads the HP LEDM
//! `ProductUsageDyn.xml` status document, extracts the remaining ink level of every consumable
//! and compares the levels against per-color warning and critical thresholds.
//!
//! Building blocks:
//! * [`matcher::TagMatcher`] - declarative matching of namespaced XML element paths with leaf callbacks.
//! * [`threshold::Evaluator`] - per-color threshold checks reduced to the single worst status.
//! * [`client::StatusClient`] - blocking HTTP(S) client via `ureq` crate.
//! * [`report::Report`] - plugin output line with performance data.
//!
//! The following feature flags are supported:
//! * `tls` - enable TLS support via `rustls` (default)
//! * `native-tls` - enable TLS support via `native-tls` crate
//! * `serde` - derive `Serialize`/`Deserialize` for the public data types
//!
//! Usage example:
//!
//!```rust,no_run
//! use inkmon::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let uri = util::endpoint_uri("192.168.1.20", false, util::PRODUCT_USAGE_PATH)?;
//!     let client = StatusClient::new(uri);
//!     let checks = FillLevelCheck::from_groups(&["black", "20", "10", "cyan", "20", "10"])?;
//!     let verdict = util::check_printer(&client, &Evaluator::new(checks))?;
//!     println!("{}", Report::from_verdict(&verdict));
//!     verdict.status.exit();
//! }
//!```

pub mod client;
pub mod consumable;
pub mod error;
pub mod matcher;
pub mod model;
pub mod namespace;
pub mod report;
pub mod threshold;
pub mod util;

pub mod prelude {
    //!
    //! Common imports
    //!
    pub use http::Uri;
    pub use num_traits::FromPrimitive as _;

    pub use crate::{
        client::{StatusClient, StatusClientBuilder},
        consumable::Consumable,
        matcher::{QName, TagMatcher},
        model::Status,
        namespace::Namespaces,
        report::Report,
        threshold::{Evaluator, FillLevelCheck, Outcome, Verdict},
        util,
    };

    #[cfg(any(feature = "tls", feature = "native-tls"))]
    pub use crate::client::TlsBackend;

    pub use super::error::InkError;
}
