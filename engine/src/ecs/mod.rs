pub mod component;
pub mod entity;
pub mod error;
pub mod query;
pub mod registry;
pub(crate) mod storage;
pub(crate) mod util;

pub use component::Component;
pub use entity::Entity;
pub use error::EcsError;
pub use query::{Cursor, View, ViewIter};
pub use registry::{Config, Registry, TypeInfo, TypeRegistry};
