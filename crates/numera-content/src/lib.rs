//! Numerology content: record validation, essay outline lint, corpus scanning.
//!
//! The record validator is the core. Essays and corpus scanning build on the
//! same schema so one configuration drives every check.

pub mod corpus;
pub mod essay;
pub mod library;
pub mod number;
pub mod outline;
pub mod record;
pub mod schema;
pub mod validation;

pub use corpus::*;
pub use essay::*;
pub use library::*;
pub use number::*;
pub use outline::*;
pub use record::*;
pub use schema::*;
pub use validation::*;
