//! YAML schema for custom feature specifications.
//!
//! ```yaml
//! - name: has_foo
//!   value: gold          # optional, emitted instead of `true`
//!   matchOn:
//!     - pciId: {vendor: ["15b3"]}
//!       loadedKMod: ["ib_uverbs"]
//!     - hostname: ["^node-a$"]
//! ```
//!
//! Every level rejects unknown fields so typos surface as decode errors.

mod feature;

pub use feature::*;
