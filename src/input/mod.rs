//! 静态输入文件
//!
//! - 节点列表：每行一个节点名；
//! - 配对文件：每行 `A, B`，建立 B → A 的反查。

// 子模块声明
mod files;

// 重新导出公共接口
pub use files::{InputError, PairMap, parse_node_list, read_node_list};
