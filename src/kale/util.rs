//! Miscellaneous utility functionality.
//!
//! Specifically, nothing in here is Kale-related, even though
//! it might be useful outside of this crate.
use macro_pub::macro_pub;

/// Creates a map from the given key-value expressions.
///
/// The map type is inferred from the surrounding context, so any
/// collection implementing [`FromIterator`] over pairs can be built.
#[macro_pub]
macro_rules! map {
    ($($key:expr => $value:expr),* $(,)?) => {
        [$(($key, $value)),*].into_iter().collect()
    }
}
