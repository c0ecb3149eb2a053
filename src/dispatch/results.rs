//! 分发结果集合

use std::collections::HashMap;
use std::hash::Hash;

/// 按目标索引的结果集合。
///
/// `None` 表示该目标的外部调用失败或没有可用输出。重复出现的目标共享同一个槽位，
/// 以最后写入的结果为准。
#[derive(Debug)]
pub struct DispatchResults<T, R> {
    order: Vec<T>,
    results: HashMap<T, Option<R>>,
}

impl<T, R> DispatchResults<T, R>
where
    T: Eq + Hash,
{
    pub(crate) fn new(order: Vec<T>, results: HashMap<T, Option<R>>) -> Self {
        Self { order, results }
    }

    /// 目标的结果；未处理或失败时为 `None`。
    pub fn get(&self, target: &T) -> Option<&R> {
        self.results.get(target).and_then(Option::as_ref)
    }

    /// 该目标是否被某个工作线程处理过（无论成败）。
    pub fn contains(&self, target: &T) -> bool {
        self.results.contains_key(target)
    }

    /// 输入列表长度
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 按输入顺序遍历（与完成顺序无关）。
    pub fn iter(&self) -> impl Iterator<Item = (&T, Option<&R>)> {
        self.order.iter().map(|t| (t, self.get(t)))
    }

    /// 按首次出现的输入顺序取出所有结果，重复目标只出现一次。
    pub fn into_ordered(self) -> Vec<(T, Option<R>)> {
        let Self { order, mut results } = self;
        let mut out = Vec::with_capacity(results.len());
        for target in order {
            if let Some(result) = results.remove(&target) {
                out.push((target, result));
            }
        }
        out
    }
}
