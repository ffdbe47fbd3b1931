pub mod lfu;

pub use lfu::LfuCache;
#[cfg(feature = "concurrency")]
pub use lfu::ConcurrentLfuCache;
