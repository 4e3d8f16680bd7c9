use serde::{Deserialize, Serialize};

/// 最後にユーザーが見ていたフィード先頭エントリの添字。
/// リフレッシュ後のビューポート復元に使う。
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrollAnchor(usize);

impl ScrollAnchor {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// キャッシュ長に収まる復元先を返す。長さを超えていれば末尾、
    /// キャッシュが空なら復元不要なので `None`。
    pub fn clamp(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else if self.0 < len {
            Some(self.0)
        } else {
            Some(len - 1)
        }
    }
}

/// 同期完了後にプレゼンテーション層へ渡すスクロール指示。
/// レイアウト完了後（次のレンダーパス）に適用される前提。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScrollDirective {
    ToTop,
    ToIndex(usize),
    None,
}
