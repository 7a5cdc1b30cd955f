use std::fmt::Debug;

use serde::{Deserialize, Serialize};
pub use serde_with;
use utility::id::{HasId, Id};

pub mod component;
pub mod connection;
pub mod flight_price;
pub mod location;
pub mod placeholder;
pub mod template;

/// A value together with the primary key of the row it was read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "V: Serialize, V::IdType: Serialize",
    deserialize = "V: Deserialize<'de>, V::IdType: Deserialize<'de>"
))]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

/// Fixtures shared by the tests of the crates building on the model.
pub trait ExampleData {
    fn example_data() -> Self;
}
