use crate::domain::model::ParamChange;
use crate::utils::error::{QrError, Result};

pub const HELP: &str = "\
Type text to change the input. Commands:
  !TEXT             set the text and generate now
  :go               generate now
  :size N           image width in pixels
  :ecc L|M|Q|H      error correction level
  :fg COLOR         foreground color (#rrggbb)
  :bg COLOR         background color (#rrggbb)
  :format png|svg   output format
  :mode url|text    input validation mode
  :auto on|off      auto-generate on changes
  :copy             copy the image (or SVG markup)
  :copy-url         copy the data URL
  :save [FILE]      write the download file
  :help             show this help
  :quit             exit
Start a line with '\\' to enter the rest literally (\\!hi, \\:hi).
'::' also enters text beginning with ':'.";

/// 互動模式中一行輸入對應的動作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Change(ParamChange),
    /// 設定文字後立即生成（等同在輸入框按下 Ctrl+Enter）
    SubmitText(String),
    Submit,
    Copy,
    CopyDataUrl,
    Save(Option<String>),
    Help,
    Quit,
}

fn invalid(command: &str, value: &str, reason: &str) -> QrError {
    QrError::InvalidConfigValueError {
        field: command.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(invalid(":auto", value, "expected on or off")),
    }
}

fn require<'a>(name: &str, arg: &'a str, usage: &str) -> Result<&'a str> {
    if arg.is_empty() {
        Err(invalid(&format!(":{}", name), arg, usage))
    } else {
        Ok(arg)
    }
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(text) = line.strip_prefix('\\') {
        return Ok(Command::Change(ParamChange::Text(text.to_string())));
    }
    if let Some(text) = line.strip_prefix("::") {
        return Ok(Command::Change(ParamChange::Text(format!(":{}", text))));
    }
    if let Some(text) = line.strip_prefix('!') {
        return Ok(Command::SubmitText(text.to_string()));
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Command::Change(ParamChange::Text(line.to_string())));
    };

    let mut parts = command.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let require_arg = |usage: &str| require(&name, arg, usage);

    let command = match name.as_str() {
        "go" | "generate" => Command::Submit,
        "size" => {
            let value = require_arg("expected a number of pixels")?;
            let size = value
                .parse::<u32>()
                .map_err(|_| invalid(":size", value, "expected a number of pixels"))?;
            Command::Change(ParamChange::Size(size))
        }
        "ecc" => Command::Change(ParamChange::Ecc(require_arg("expected L, M, Q or H")?.parse()?)),
        "fg" => Command::Change(ParamChange::Foreground(
            require_arg("expected a color")?.parse()?,
        )),
        "bg" => Command::Change(ParamChange::Background(
            require_arg("expected a color")?.parse()?,
        )),
        "format" => Command::Change(ParamChange::Format(
            require_arg("expected png or svg")?.parse()?,
        )),
        "mode" => Command::Change(ParamChange::Mode(require_arg("expected url or text")?.parse()?)),
        "auto" => Command::Change(ParamChange::AutoGenerate(parse_switch(require_arg(
            "expected on or off",
        )?)?)),
        "copy" => Command::Copy,
        "copy-url" | "copyurl" => Command::CopyDataUrl,
        "save" => Command::Save((!arg.is_empty()).then(|| arg.to_string())),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return Err(invalid("command", line, "unknown command; try :help")),
    };

    Ok(command)
}
