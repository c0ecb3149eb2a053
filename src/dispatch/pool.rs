//! 工作线程池
//!
//! 每个块一个线程，块内顺序执行阻塞调用。共享结果表只在写入单个目标的
//! 已算好结果时加锁，阻塞的外部调用期间绝不持锁。
//!
//! 没有超时与取消：外部命令挂起会让对应的工作线程一直阻塞。

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::thread;

use tracing::{debug, info};

use super::progress::Progress;
use super::results::DispatchResults;

/// 无法获取逻辑核数时使用的并发度
pub const FALLBACK_CONCURRENCY: usize = 32;

/// 默认并发度：主机逻辑核数。
pub fn default_concurrency() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_CONCURRENCY)
}

/// 块大小：目标数多于并发度时为 `ceil(N / C)`，否则每块一个目标。
pub fn chunk_size(targets: usize, concurrency: usize) -> usize {
    let concurrency = concurrency.max(1);
    if targets > concurrency {
        targets.div_ceil(concurrency)
    } else {
        1
    }
}

/// 有界并发分发器
#[derive(Debug, Clone)]
pub struct Dispatcher {
    concurrency: usize,
    progress: Progress,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(default_concurrency())
    }
}

impl Dispatcher {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            progress: Progress::Silent,
        }
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 对每个目标恰好调用一次 `worker`，返回按目标索引的结果。
    ///
    /// `worker` 返回 `None` 只影响该目标，同一块里的后续目标照常处理。
    #[tracing::instrument(skip_all, fields(targets = targets.len(), concurrency = self.concurrency))]
    pub fn run<T, R, F>(&self, targets: &[T], worker: F) -> DispatchResults<T, R>
    where
        T: Clone + Eq + Hash + Display + Send + Sync,
        R: Send,
        F: Fn(&T) -> Option<R> + Sync,
    {
        let chunk = chunk_size(targets.len(), self.concurrency);
        let workers = targets.len().div_ceil(chunk);
        info!(
            nthreads = self.concurrency,
            targets = targets.len(),
            chunk_size = chunk,
            workers,
            "▶️  开始分发"
        );

        let store: Mutex<HashMap<T, Option<R>>> = Mutex::new(HashMap::with_capacity(targets.len()));
        let worker = &worker;
        let store_ref = &store;
        let progress = &self.progress;

        progress.begin();
        thread::scope(|s| {
            for (idx, part) in targets.chunks(chunk).enumerate() {
                s.spawn(move || {
                    debug!(worker = idx, size = part.len(), "工作线程启动");
                    for target in part {
                        progress.claim(target);
                        let out = worker(target);
                        if out.is_none() {
                            debug!(%target, "目标没有可用结果");
                        }
                        store_ref
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .insert(target.clone(), out);
                    }
                });
            }
        });
        progress.finish();

        let results = store.into_inner().unwrap_or_else(PoisonError::into_inner);
        info!(completed = results.len(), "✅ 分发完成");
        DispatchResults::new(targets.to_vec(), results)
    }
}

/// 便捷入口：用给定并发度、不输出进度地分发。
pub fn dispatch<T, R, F>(targets: &[T], worker: F, concurrency: usize) -> DispatchResults<T, R>
where
    T: Clone + Eq + Hash + Display + Send + Sync,
    R: Send,
    F: Fn(&T) -> Option<R> + Sync,
{
    Dispatcher::new(concurrency).run(targets, worker)
}
