use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub media: MediaConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// 一度の同期で取得する投稿数の上限
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub jpeg_quality: u8,
    pub preview_edge: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub min_password_len: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig { page_size: 50 },
            media: MediaConfig {
                max_width: 1200,
                max_height: 1600,
                jpeg_quality: 75,
                preview_edge: 400,
            },
            auth: AuthConfig {
                min_password_len: 6,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // 既定値
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("PAWFEED_FEED_PAGE_SIZE") {
            if let Some(value) = parse_usize(&v) {
                cfg.feed.page_size = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("PAWFEED_MEDIA_MAX_WIDTH") {
            if let Some(value) = parse_u32(&v) {
                cfg.media.max_width = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("PAWFEED_MEDIA_MAX_HEIGHT") {
            if let Some(value) = parse_u32(&v) {
                cfg.media.max_height = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("PAWFEED_MEDIA_JPEG_QUALITY") {
            if let Some(value) = parse_u32(&v) {
                cfg.media.jpeg_quality = value.clamp(1, 100) as u8;
            }
        }
        if let Ok(v) = std::env::var("PAWFEED_MEDIA_PREVIEW_EDGE") {
            if let Some(value) = parse_u32(&v) {
                cfg.media.preview_edge = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("PAWFEED_AUTH_MIN_PASSWORD_LEN") {
            if let Some(value) = parse_usize(&v) {
                cfg.auth.min_password_len = value.max(1);
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.feed.page_size == 0 {
            return Err("Feed page_size must be greater than 0".to_string());
        }
        if self.media.max_width == 0 || self.media.max_height == 0 {
            return Err("Media bounding box must be greater than 0".to_string());
        }
        if self.media.jpeg_quality == 0 || self.media.jpeg_quality > 100 {
            return Err("Media jpeg_quality must be in 1..=100".to_string());
        }
        if self.auth.min_password_len == 0 {
            return Err("Auth min_password_len must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}
