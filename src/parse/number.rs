//! 数值字段解析

/// 交换机端口号
pub type PortNum = u32;

/// 解析十进制或带 `0x` 前缀的十六进制数字（`001`、`220`、`0x1f`）。
///
/// 空串或无法解析时返回 `None`。
pub fn parse_number(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}
