//! Entity types and instances, and the two resolvers that sit on them.
//!
//! - [`ModelType`] / [`ModelClass`]: collection actions, for the type as a whole.
//! - [`Record`]: resource actions, for one instance.
//! - [`Snapshot`]: the immutable capture of a record handed to adapters.

pub mod model_type;
pub mod record;

pub use model_type::{CollectionContext, ModelClass, ModelType};
pub use record::{Record, ResourceContext, Snapshot};
