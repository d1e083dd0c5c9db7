//! Deterministic entity ids.
//!
//! Ids are v4-shaped UUIDs built from the generator's own RNG stream,
//! so a seeded run reproduces its ids as well as its values.

use crate::{rng::RandomSource, types::EntityId};
use uuid::{Builder, Uuid};

pub fn uuid<R: RandomSource + ?Sized>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.next_bytes16()).into_uuid()
}

/// `prefix_<simple uuid>`, e.g. `cus_3f2a…`.
pub fn entity_id<R: RandomSource + ?Sized>(prefix: &str, rng: &mut R) -> EntityId {
    format!("{prefix}_{}", uuid(rng).simple())
}
