/// Over-allocation applied whenever a mutation has to reallocate.
///
/// The slack is a fraction of the *requested* capacity, capped at
/// [`MAX_GROWTH_SLACK`](crate::MAX_GROWTH_SLACK) bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GrowthPolicy {
    /// Allocate exactly what was asked for.
    #[default]
    Fit,
    /// A quarter of the request on top.
    Grow25,
    /// Half of the request on top.
    Grow50,
    /// Double the request.
    Grow100,
}

impl GrowthPolicy {
    /// All policies, in the order of the empty singleton table.
    pub const ALL: [GrowthPolicy; 4] = [
        GrowthPolicy::Fit,
        GrowthPolicy::Grow25,
        GrowthPolicy::Grow50,
        GrowthPolicy::Grow100,
    ];

    /// Slack added on top of `requested`, before capping.
    #[must_use]
    pub const fn slack(self, requested: usize) -> usize {
        match self {
            GrowthPolicy::Fit => 0,
            GrowthPolicy::Grow25 => requested / 4,
            GrowthPolicy::Grow50 => requested / 2,
            GrowthPolicy::Grow100 => requested,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            GrowthPolicy::Fit => 0,
            GrowthPolicy::Grow25 => 1,
            GrowthPolicy::Grow50 => 2,
            GrowthPolicy::Grow100 => 3,
        }
    }
}

/// Construction options for [`SString::with_options`](crate::SString::with_options).
///
/// # Examples
///
/// ```rust
/// use sstring::{BufferOptions, GrowthPolicy, SString};
///
/// let s = SString::with_options(BufferOptions {
///     capacity: 64,
///     growth: GrowthPolicy::Grow50,
/// });
/// assert_eq!(s.capacity(), 64);
/// assert_eq!(s.growth_policy(), GrowthPolicy::Grow50);
/// ```
///
/// # Default
///
/// Zero capacity (the empty singleton) with [`GrowthPolicy::Fit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferOptions {
    /// Initial capacity in bytes, excluding the terminator.
    ///
    /// A capacity of zero yields the shared empty value for `growth`; no
    /// allocation happens until the first write.
    pub capacity: usize,

    /// Growth policy applied on every reallocation.
    pub growth: GrowthPolicy,
}
