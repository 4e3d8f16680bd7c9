use crate::application::ports::image_processor::{EncodedAttachment, ImageProcessor};
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Clone)]
enum EncodeState {
    /// 画像未選択
    Idle,
    Encoding,
    Ready(EncodedAttachment),
    Failed(String),
}

/// 投稿フォームの添付画像をバックグラウンドでエンコードするワーカー。
///
/// 画像を選び直すと前のタスクは中断され差し替わる（タスクの積み上げ防止）。
/// 画面を離れるときは `cancel` で明示的に破棄する。
pub struct AttachmentEncoder {
    processor: Arc<dyn ImageProcessor>,
    state: Arc<RwLock<EncodeState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AttachmentEncoder {
    pub fn new(processor: Arc<dyn ImageProcessor>) -> Self {
        Self {
            processor,
            state: Arc::new(RwLock::new(EncodeState::Idle)),
            task: Mutex::new(None),
        }
    }

    /// 選択された画像のエンコードを開始する。進行中のエンコードは中断される。
    pub async fn begin(&self, bytes: Vec<u8>) {
        let mut task = self.task.lock().await;
        if let Some(previous) = task.take() {
            previous.abort();
        }

        *self.state.write().await = EncodeState::Encoding;

        let processor = Arc::clone(&self.processor);
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let result =
                tokio::task::spawn_blocking(move || processor.process(&bytes)).await;
            let next = match result {
                Ok(Ok(attachment)) => EncodeState::Ready(attachment),
                Ok(Err(err)) => {
                    warn!("attachment encoding failed: {err}");
                    EncodeState::Failed(err.to_string())
                }
                Err(err) => EncodeState::Failed(err.to_string()),
            };
            *state.write().await = next;
        });
        *task = Some(handle);
    }

    /// 送信を許可してよい状態か（画像未選択、またはエンコード完了）
    pub async fn ready_to_submit(&self) -> bool {
        matches!(
            &*self.state.read().await,
            EncodeState::Idle | EncodeState::Ready(_)
        )
    }

    /// エンコード結果を取り出す。
    /// 失敗していれば送信をブロックするエラーを返し、未選択なら `None`。
    pub async fn take_attachment(&self) -> Result<Option<EncodedAttachment>, AppError> {
        let mut state = self.state.write().await;
        match std::mem::replace(&mut *state, EncodeState::Idle) {
            EncodeState::Idle => Ok(None),
            EncodeState::Ready(attachment) => Ok(Some(attachment)),
            EncodeState::Encoding => {
                *state = EncodeState::Encoding;
                Err(AppError::ImageProcessing(
                    "image is still being processed".into(),
                ))
            }
            EncodeState::Failed(message) => Err(AppError::ImageProcessing(message)),
        }
    }

    /// 画面破棄時の明示キャンセル
    pub async fn cancel(&self) {
        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            handle.abort();
        }
        *self.state.write().await = EncodeState::Idle;
    }

    /// 進行中のエンコード完了を待つ（テストおよび送信直前のゲート用）
    pub async fn wait(&self) {
        let handle = self.task.lock().await.take();
        if let Some(handle) = handle {
            // 中断済みタスクの JoinError は状態に反映済みなので無視してよい
            let _ = handle.await;
        }
    }
}

impl Drop for AttachmentEncoder {
    fn drop(&mut self) {
        if let Ok(mut task) = self.task.try_lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }
    }
}
