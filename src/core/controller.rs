//! Regeneration control: decides when the encoder runs and applies its results.
//!
//! Everything here runs on the task that owns the controller. Encodes are the
//! only work that leaves it; they run as spawned tasks and come back through
//! [`RegenerationController::next_wake`].

use crate::core::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::core::encode::encode;
use crate::core::normalizer::normalize;
use crate::domain::model::{
    DownloadLink, EncodeRequest, EncodeResult, FormState, GenerationState, ParamChange, QrImage,
    Status, DEFAULT_FILENAME_STEM, DEFAULT_MARGIN,
};
use crate::domain::ports::{Presenter, QrEncoder};
use crate::utils::error::{QrError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{Id, JoinError, JoinSet};

pub const GENERATED_MESSAGE: &str = "QR code generated.";
pub const GENERATING_MESSAGE: &str = "Generating...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// 自動模式的靜默時間
    pub debounce: Duration,
    /// PNG 的留白（模組數）
    pub margin: u32,
    /// 只套用最新序號的結果
    pub discard_stale: bool,
    pub filename_stem: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            margin: DEFAULT_MARGIN,
            discard_stale: true,
            filename_stem: DEFAULT_FILENAME_STEM.to_string(),
        }
    }
}

/// 觸發生成的來源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// 按鈕或 `:go`
    Button,
    /// Enter / Ctrl+Enter 之類的快捷鍵
    Shortcut,
    /// 自動模式的靜默計時到期
    Debounce,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Change(ParamChange),
    Submit(TriggerSource),
}

#[derive(Debug)]
pub struct Completion {
    pub sequence: u64,
    pub request: EncodeRequest,
    pub result: EncodeResult,
}

#[derive(Debug)]
pub enum Wake {
    DebounceElapsed,
    Completed(std::result::Result<(Id, Completion), JoinError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub image: QrImage,
    pub link: DownloadLink,
    pub request: EncodeRequest,
    pub sequence: u64,
}

pub struct RegenerationController<E: QrEncoder, P: Presenter> {
    encoder: Arc<E>,
    presenter: P,
    config: ControllerConfig,
    form: FormState,
    debouncer: Debouncer,
    in_flight: JoinSet<Completion>,
    /// 執行中任務對應的序號；任務 panic 時只剩 id 可查
    pending: HashMap<Id, u64>,
    issued: u64,
    state: GenerationState,
    current: Option<Rendered>,
    last_error: Option<QrError>,
    unavailable: Option<String>,
}

impl<E: QrEncoder, P: Presenter> RegenerationController<E, P> {
    /// 建立控制器並檢查編碼器。編碼器不可用時，所有觸發都只回報錯誤。
    pub fn new(encoder: Arc<E>, mut presenter: P, form: FormState, config: ControllerConfig) -> Self {
        let unavailable = match encoder.probe() {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("❌ QR encoder unavailable: {}", e);
                let err = QrError::EncoderUnavailable {
                    message: e.to_string(),
                };
                presenter.status(&Status::error(err.user_friendly_message()));
                Some(e.to_string())
            }
        };

        Self {
            encoder,
            presenter,
            debouncer: Debouncer::new(config.debounce),
            config,
            form,
            in_flight: JoinSet::new(),
            pending: HashMap::new(),
            issued: 0,
            state: GenerationState::Idle,
            current: None,
            last_error: None,
            unavailable,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.unavailable.is_none()
    }

    /// 編碼器無法使用時回傳對應錯誤
    pub fn ensure_enabled(&self) -> Result<()> {
        match &self.unavailable {
            None => Ok(()),
            Some(message) => Err(QrError::EncoderUnavailable {
                message: message.clone(),
            }),
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn current(&self) -> Option<&Rendered> {
        self.current.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn has_pending_debounce(&self) -> bool {
        self.debouncer.is_armed()
    }

    /// 取出最近一次觸發的錯誤（驗證失敗、編碼失敗或編碼器不可用）
    pub fn take_last_error(&mut self) -> Option<QrError> {
        self.last_error.take()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// 沒有待觸發的計時器，也沒有執行中的編碼
    pub fn is_idle(&self) -> bool {
        !self.debouncer.is_armed() && self.in_flight.is_empty()
    }

    pub fn last_sequence(&self) -> u64 {
        self.issued
    }

    pub fn handle(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Change(change) => self.apply(change),
            Trigger::Submit(source) => self.submit(source),
        }
    }

    /// 套用表單變更；自動模式下重新計時
    pub fn apply(&mut self, change: ParamChange) {
        // 切換自動模式本身不是參數變更
        let rearm = !matches!(change, ParamChange::AutoGenerate(_));
        tracing::debug!("Form change: {:?}", change);
        self.form.apply(change);

        if rearm && self.form.auto_generate && self.is_enabled() {
            self.debouncer.arm();
        }
    }

    /// 啟動時若為自動模式且已有文字，排一次延遲生成
    pub fn prime(&mut self) {
        if self.form.auto_generate && !self.form.text.trim().is_empty() && self.is_enabled() {
            self.debouncer.arm();
        }
    }

    /// 明確觸發：立即生成，不取消尚未到期的延遲生成
    pub fn submit(&mut self, source: TriggerSource) {
        self.generate(source);
    }

    fn generate(&mut self, source: TriggerSource) {
        if let Err(e) = self.ensure_enabled() {
            tracing::warn!("⚠️ Ignoring {:?} trigger: {}", source, e);
            self.presenter
                .status(&Status::error(e.user_friendly_message()));
            self.last_error = Some(e);
            return;
        }

        // 每次觸發都推進序號，讓較舊的執行中結果失效
        self.issued += 1;
        let sequence = self.issued;
        self.state = GenerationState::Validating;

        let request = match normalize(&self.form.text, self.form.mode)
            .and_then(|input| EncodeRequest::new(input.payload, &self.form, self.config.margin))
        {
            Ok(request) => request,
            Err(e) => {
                self.reject(e);
                return;
            }
        };

        tracing::info!(
            "🚀 Generating #{} ({:?}): format={}, size={}, ecc={}",
            sequence,
            source,
            request.format,
            request.size,
            request.ecc
        );
        self.state = GenerationState::Encoding;
        self.presenter.status(&Status::info(GENERATING_MESSAGE));

        let encoder = Arc::clone(&self.encoder);
        let task = self.in_flight.spawn(async move {
            let result = encode(encoder.as_ref(), &request).await;
            Completion {
                sequence,
                request,
                result,
            }
        });
        self.pending.insert(task.id(), sequence);
    }

    fn reject(&mut self, err: QrError) {
        tracing::debug!("Input rejected: {}", err);
        self.state = GenerationState::Rejected;
        self.current = None;
        self.presenter.clear();
        self.presenter.status(&Status::from(&err));
        self.last_error = Some(err);
    }

    /// 等待下一個事件：計時到期或某個編碼完成。沒有待處理工作時不會完成。
    pub async fn next_wake(&mut self) -> Wake {
        let debounce_armed = self.debouncer.is_armed();
        let encoding = !self.in_flight.is_empty();

        tokio::select! {
            () = self.debouncer.elapsed(), if debounce_armed => Wake::DebounceElapsed,
            Some(joined) = self.in_flight.join_next_with_id(), if encoding => Wake::Completed(joined),
            else => std::future::pending::<Wake>().await,
        }
    }

    pub fn handle_wake(&mut self, wake: Wake) {
        match wake {
            Wake::DebounceElapsed => self.generate(TriggerSource::Debounce),
            Wake::Completed(Ok((id, completion))) => {
                self.pending.remove(&id);
                self.complete(completion);
            }
            Wake::Completed(Err(e)) => {
                tracing::error!("❌ Encode task aborted: {}", e);
                let Some(sequence) = self.pending.remove(&e.id()) else {
                    return;
                };
                if !self.is_stale(sequence) {
                    self.fail(format!("encode task failed: {}", e));
                }
            }
        }
    }

    /// 把計時器與執行中的編碼全部處理完
    pub async fn settle(&mut self) {
        while !self.is_idle() {
            let wake = self.next_wake().await;
            self.handle_wake(wake);
        }
    }

    fn is_stale(&self, sequence: u64) -> bool {
        let stale = self.config.discard_stale && sequence != self.issued;
        if stale {
            tracing::debug!(
                "Discarding stale result #{} (latest is #{})",
                sequence,
                self.issued
            );
        }
        stale
    }

    fn complete(&mut self, completion: Completion) {
        if self.is_stale(completion.sequence) {
            return;
        }

        match completion.result {
            EncodeResult::Success(image) => {
                let link = DownloadLink::for_image(&image, &self.config.filename_stem);
                tracing::info!(
                    "✅ QR generated #{}; format={}",
                    completion.sequence,
                    image.format()
                );
                self.presenter.show(&image, &link);
                self.presenter.status(&Status::success(GENERATED_MESSAGE));
                self.state = GenerationState::Rendered;
                self.last_error = None;
                self.current = Some(Rendered {
                    image,
                    link,
                    request: completion.request,
                    sequence: completion.sequence,
                });
            }
            EncodeResult::Failure { reason } => self.fail(reason),
        }
    }

    fn fail(&mut self, reason: String) {
        let err = QrError::EncodeFailure { message: reason };
        tracing::error!("❌ {}", err);
        self.state = GenerationState::Failed;
        self.current = None;
        self.presenter.clear();
        self.presenter.status(&Status::from(&err));
        self.last_error = Some(err);
    }
}
