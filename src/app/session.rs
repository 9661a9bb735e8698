use crate::app::commands::{parse_command, Command, HELP};
use crate::app::presenter::TerminalPresenter;
use crate::core::controller::{RegenerationController, Trigger, TriggerSource};
use crate::core::export::{copy_data_url, copy_image, copy_status, save_download};
use crate::domain::model::{ParamChange, Status};
use crate::domain::ports::{Clipboard, Presenter, QrEncoder, Storage};
use crate::utils::error::{QrError, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 互動模式：一行一個輸入事件，與計時器、編碼完成事件交錯處理
pub struct Session<E, C, S, W>
where
    E: QrEncoder,
    C: Clipboard,
    S: Storage,
    W: Write + Send,
{
    controller: RegenerationController<E, TerminalPresenter<W>>,
    clipboard: C,
    storage: S,
}

impl<E, C, S, W> Session<E, C, S, W>
where
    E: QrEncoder,
    C: Clipboard,
    S: Storage,
    W: Write + Send,
{
    pub fn new(
        controller: RegenerationController<E, TerminalPresenter<W>>,
        clipboard: C,
        storage: S,
    ) -> Self {
        Self {
            controller,
            clipboard,
            storage,
        }
    }

    pub fn controller(&self) -> &RegenerationController<E, TerminalPresenter<W>> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RegenerationController<E, TerminalPresenter<W>> {
        &mut self.controller
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// 讀取輸入直到 `:quit` 或 EOF。EOF 時會等待尚未完成的生成。
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.controller.prime();
        tracing::info!("🚀 Interactive session started");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if self.handle_line(&line).await == Flow::Quit {
                        tracing::info!("👋 Session closed");
                        return Ok(());
                    }
                }
                wake = self.controller.next_wake() => self.controller.handle_wake(wake),
            }
        }

        self.controller.settle().await;
        tracing::info!("👋 Input closed, session finished");
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                self.status(Status::error(e.to_string()));
                return Flow::Continue;
            }
        };

        match command {
            Command::Change(change) => self.controller.handle(Trigger::Change(change)),
            Command::SubmitText(text) => {
                self.controller.handle(Trigger::Change(ParamChange::Text(text)));
                self.controller
                    .handle(Trigger::Submit(TriggerSource::Shortcut));
            }
            Command::Submit => self.controller.handle(Trigger::Submit(TriggerSource::Button)),
            Command::Copy => self.copy(false).await,
            Command::CopyDataUrl => self.copy(true).await,
            Command::Save(filename) => self.save(filename).await,
            Command::Help => self.controller.presenter_mut().note(HELP),
            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    fn status(&mut self, status: Status) {
        self.controller.presenter_mut().status(&status);
    }

    async fn copy(&mut self, data_url: bool) {
        let Some(rendered) = self.controller.current().cloned() else {
            self.status(Status::from(&QrError::export_failure("no QR code to copy yet")));
            return;
        };

        let outcome = if data_url {
            copy_data_url(&self.clipboard, &rendered.image).await
        } else {
            copy_image(&self.clipboard, &rendered.image).await
        };
        if let Err(e) = &outcome {
            tracing::warn!("⚠️ {}", e);
        }
        let status = copy_status(&outcome, &rendered.image);
        self.status(status);
    }

    async fn save(&mut self, filename: Option<String>) {
        let Some(rendered) = self.controller.current().cloned() else {
            self.status(Status::error("Save failed: no QR code to save yet"));
            return;
        };

        let filename = filename.unwrap_or_else(|| rendered.link.filename.clone());
        match save_download(&self.storage, &rendered.image, &filename).await {
            Ok(path) => self.status(Status::success(format!("Saved {}", path))),
            Err(QrError::ExportFailure { message }) => {
                self.status(Status::error(format!("Save failed: {}", message)))
            }
            Err(e) => self.status(Status::error(format!("Save failed: {}", e))),
        }
    }
}
