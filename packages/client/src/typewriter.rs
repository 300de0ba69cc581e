//! Character-by-character reveal of freshly posted messages.

use std::{
    io::Write,
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

/// Reveals text at a fixed number of characters per second.
///
/// The speed is shared with the prompt so that `speed <n>` takes effect on
/// the next message.
#[derive(Debug)]
pub struct Typewriter {
    enabled: bool,
    chars_per_second: AtomicU32,
}

impl Typewriter {
    pub fn new(enabled: bool, chars_per_second: u32) -> Self {
        Self {
            enabled,
            chars_per_second: AtomicU32::new(chars_per_second),
        }
    }

    pub fn speed(&self) -> u32 {
        self.chars_per_second.load(Ordering::Relaxed)
    }

    pub fn set_speed(&self, chars_per_second: u32) {
        self.chars_per_second
            .store(chars_per_second, Ordering::Relaxed);
    }

    /// Write `text` followed by a newline, one character at a time when enabled
    pub async fn type_out<W: Write + Send>(&self, out: &mut W, text: &str) -> std::io::Result<()> {
        let speed = self.speed();
        if !self.enabled || speed == 0 {
            writeln!(out, "{}", text)?;
            return out.flush();
        }

        let interval = Duration::from_secs(1) / speed;
        for ch in text.chars() {
            write!(out, "{}", ch)?;
            out.flush()?;
            tokio::time::sleep(interval).await;
        }
        writeln!(out)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_type_out_takes_length_over_speed() {
        // テスト項目: 文字数 / 速度 の時間をかけて全文が出力される
        // given (前提条件):
        let typewriter = Typewriter::new(true, 10);
        let mut out = Vec::new();
        let started = Instant::now();

        // when (操作):
        typewriter.type_out(&mut out, "0123456789").await.unwrap();

        // then (期待する結果):
        assert_eq!(String::from_utf8(out).unwrap(), "0123456789\n");
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_out_disabled_is_immediate() {
        // テスト項目: アニメーション無効時は待たずに全文が出力される
        // given (前提条件):
        let typewriter = Typewriter::new(false, 10);
        let mut out = Vec::new();
        let started = Instant::now();

        // when (操作):
        typewriter.type_out(&mut out, "Rates are on hold.").await.unwrap();

        // then (期待する結果):
        assert_eq!(String::from_utf8(out).unwrap(), "Rates are on hold.\n");
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_speed_applies_to_next_message() {
        // テスト項目: 速度変更が次のメッセージから反映される
        // given (前提条件):
        let typewriter = Typewriter::new(true, 10);
        typewriter.set_speed(100);
        let mut out = Vec::new();
        let started = Instant::now();

        // when (操作):
        typewriter.type_out(&mut out, "0123456789").await.unwrap();

        // then (期待する結果):
        assert_eq!(typewriter.speed(), 100);
        assert!(started.elapsed() < Duration::from_millis(200));
    }
}
