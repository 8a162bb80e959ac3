mod arbitrary;


/// Number of quickcheck cases: more on CI, very few with `test-fast`
/// (enabled by the `miri` feature).
pub(crate) fn test_count() -> u64 {
    if cfg!(feature = "test-fast") {
        10
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}
