pub use crate::ds::{FrequencyBuckets, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::lfu::LfuCache;
pub use crate::store::{HashMapStore, StoreCore, StoreMetrics, StoreMut};
pub use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};

#[cfg(feature = "concurrency")]
pub use crate::policy::lfu::ConcurrentLfuCache;
#[cfg(feature = "concurrency")]
pub use crate::traits::ConcurrentCache;
#[cfg(feature = "metrics")]
pub use crate::metrics::{LfuMetrics, LfuMetricsSnapshot};
