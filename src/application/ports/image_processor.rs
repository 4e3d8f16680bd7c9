use crate::shared::error::AppError;

/// ダウンサンプリング・再エンコード済みの添付画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAttachment {
    /// base64 エンコード済みの JPEG ペイロード
    pub base64: String,
    pub width: u32,
    pub height: u32,
}

/// 添付画像の変換ポート。CPUバウンドな同期処理で、
/// バックグラウンド実行は呼び出し側（AttachmentEncoder）が担う。
pub trait ImageProcessor: Send + Sync {
    /// 最大バウンディングボックスに収め、向きを補正して再エンコードする
    fn process(&self, bytes: &[u8]) -> Result<EncodedAttachment, AppError>;

    /// 選択プレビュー用の小さいデコード
    fn preview(&self, bytes: &[u8]) -> Result<EncodedAttachment, AppError>;
}
