use std::pin::Pin;
use std::time::Duration;
use tokio::time::{sleep, Instant, Sleep};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// 可取消的計時器把手。每次 `arm` 都以新的計時器取代舊的。
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    timer: Option<Pin<Box<Sleep>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            timer: None,
        }
    }

    /// 重新計時；尚未觸發的舊計時器直接丟棄
    pub fn arm(&mut self) {
        self.timer = Some(Box::pin(sleep(self.window)));
    }

    pub fn cancel(&mut self) {
        self.timer = None;
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.as_ref().map(|timer| timer.deadline())
    }

    /// 等待計時器到期。未啟動時永遠不會完成。
    ///
    /// 可安全地在 `select!` 中被取消：計時器保留在把手裡，下次呼叫繼續等待。
    pub async fn elapsed(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.as_mut().await;
                self.timer = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_elapses_after_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();
        debouncer.arm();
        assert!(debouncer.is_armed());

        debouncer.elapsed().await;

        assert_eq!(start.elapsed(), Duration::from_millis(500));
        assert!(!debouncer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_resets_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();
        debouncer.arm();
        tokio::time::advance(Duration::from_millis(300)).await;
        debouncer.arm();

        debouncer.elapsed().await;

        assert_eq!(start.elapsed(), Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_disarms() {
        let mut debouncer = Debouncer::default();
        debouncer.arm();
        debouncer.cancel();
        assert!(!debouncer.is_armed());
        assert!(debouncer.deadline().is_none());

        let waited =
            tokio::time::timeout(Duration::from_secs(5), debouncer.elapsed()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_survives_cancelled_wait() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.arm();

        let early = tokio::time::timeout(Duration::from_millis(100), debouncer.elapsed()).await;
        assert!(early.is_err());
        assert!(debouncer.is_armed());

        debouncer.elapsed().await;
        assert!(!debouncer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unarmed_wait_stays_pending() {
        let mut debouncer = Debouncer::default();
        let mut wait = tokio_test::task::spawn(debouncer.elapsed());

        tokio_test::assert_pending!(wait.poll());
        tokio::time::advance(Duration::from_secs(60)).await;
        tokio_test::assert_pending!(wait.poll());
    }
}
