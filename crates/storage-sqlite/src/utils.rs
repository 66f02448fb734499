//! Helpers shared by the SQLite repositories.

/// Largest id list bound into a single `IN (...)` clause.
///
/// SQLite caps the number of host parameters per statement (999 on older
/// builds), so hydration queries split their id lists into chunks of this size.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices small enough for one `IN (...)` clause each.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
