//! 有界并发的分发/汇总
//!
//! 把一组目标（通常是交换机 LID）切成连续的块，每块一个工作线程顺序处理，
//! 结果写入共享表，最后按调用方给出的原始顺序读回。

// 子模块声明
mod pool;
mod progress;
mod results;

// 重新导出公共接口
pub use pool::{Dispatcher, FALLBACK_CONCURRENCY, chunk_size, default_concurrency, dispatch};
pub use progress::Progress;
pub use results::DispatchResults;
