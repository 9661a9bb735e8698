//! Input normalization: turns raw form text into an encodable payload.

use crate::domain::model::{InputMode, NormalizedInput, UrlCandidate};
use crate::utils::error::{QrError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const DEFAULT_SCHEME_PREFIX: &str = "https://";

// 一個字母開頭，後接字母、數字、`+`、`.`、`-`，再接 `:`
static SCHEME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme pattern is a valid regex")
});

pub fn has_scheme(input: &str) -> bool {
    SCHEME_PATTERN.is_match(input)
}

impl UrlCandidate {
    /// 分類 URL 候選，不產生錯誤
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        let has_scheme = has_scheme(trimmed);
        let normalized = if has_scheme {
            trimmed.to_string()
        } else {
            format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed)
        };
        let is_valid = !trimmed.is_empty() && Url::parse(&normalized).is_ok();

        Self {
            has_scheme,
            normalized,
            is_valid,
        }
    }
}

/// 驗證並正規化輸入。純函式：相同輸入永遠得到相同結果。
pub fn normalize(raw: &str, mode: InputMode) -> Result<NormalizedInput> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(QrError::EmptyInput);
    }

    match mode {
        InputMode::Text => Ok(NormalizedInput {
            payload: trimmed.to_string(),
            mode,
            scheme_added: false,
        }),
        InputMode::Url => {
            let scheme_added = !has_scheme(trimmed);
            let candidate = if scheme_added {
                format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed)
            } else {
                trimmed.to_string()
            };

            // 只用來驗證，回傳的是原字串而非 Url 重新序列化的結果
            Url::parse(&candidate).map_err(|e| QrError::InvalidUrl {
                input: trimmed.to_string(),
                reason: e.to_string(),
            })?;

            Ok(NormalizedInput {
                payload: candidate,
                mode,
                scheme_added,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_url_mode_adds_https() {
        let normalized = normalize("example.com", InputMode::Url).unwrap();
        assert_eq!(normalized.payload, "https://example.com");
        assert!(normalized.scheme_added);
    }

    #[test]
    fn test_url_mode_keeps_existing_scheme() {
        let normalized = normalize("  ftp://files.example.com/a.txt ", InputMode::Url).unwrap();
        assert_eq!(normalized.payload, "ftp://files.example.com/a.txt");
        assert!(!normalized.scheme_added);

        let mail = normalize("mailto:someone@example.com", InputMode::Url).unwrap();
        assert_eq!(mail.payload, "mailto:someone@example.com");
    }

    #[test]
    fn test_url_mode_rejects_unparseable() {
        assert!(matches!(
            normalize("exa mple.com", InputMode::Url),
            Err(QrError::InvalidUrl { .. })
        ));
        assert!(matches!(
            normalize("http://[::1", InputMode::Url),
            Err(QrError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_text_mode_passes_through() {
        let normalized = normalize("  hello world \n", InputMode::Text).unwrap();
        assert_eq!(normalized.payload, "hello world");
        assert!(!normalized.scheme_added);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(normalize("", InputMode::Url), Err(QrError::EmptyInput)));
        assert!(matches!(normalize(" \t\n", InputMode::Text), Err(QrError::EmptyInput)));
    }

    #[test]
    fn test_scheme_detection() {
        assert!(has_scheme("https://a"));
        assert!(has_scheme("svn+ssh://a"));
        assert!(has_scheme("x-custom.v1:payload"));
        assert!(!has_scheme("1http://a"));
        assert!(!has_scheme("example.com/path:8080"));
        assert!(!has_scheme("://missing"));
    }

    #[test]
    fn test_classify_candidate() {
        let candidate = UrlCandidate::classify("example.com");
        assert!(!candidate.has_scheme);
        assert_eq!(candidate.normalized, "https://example.com");
        assert!(candidate.is_valid);

        let empty = UrlCandidate::classify("   ");
        assert!(!empty.is_valid);
    }

    proptest! {
        #[test]
        fn prop_whitespace_is_always_empty(ws in "[ \t\r\n]{0,12}", url_mode in any::<bool>()) {
            let mode = if url_mode { InputMode::Url } else { InputMode::Text };
            prop_assert!(matches!(normalize(&ws, mode), Err(QrError::EmptyInput)));
        }

        #[test]
        fn prop_schemeless_input_gets_https(s in "[a-zA-Z0-9][a-zA-Z0-9./?=&_%#~-]{0,30}") {
            let expected = format!("https://{}", s);
            let parses = Url::parse(&expected).is_ok();
            match normalize(&s, InputMode::Url) {
                Ok(normalized) => {
                    prop_assert!(parses);
                    prop_assert_eq!(normalized.payload, expected);
                }
                Err(err) => {
                    prop_assert!(!parses);
                    let is_invalid_url = matches!(err, QrError::InvalidUrl { .. });
                    prop_assert!(is_invalid_url);
                }
            }
        }

        #[test]
        fn prop_scheme_input_is_unchanged(
            scheme in "[a-z][a-z0-9+.-]{0,6}",
            rest in "//[a-z0-9]{1,10}\\.[a-z]{2,4}(/[a-z0-9]{0,8})?",
        ) {
            let input = format!("{}:{}", scheme, rest);
            if Url::parse(&input).is_ok() {
                prop_assert_eq!(normalize(&input, InputMode::Url).unwrap().payload, input);
            }
        }

        #[test]
        fn prop_normalize_is_deterministic(s in "\\PC{0,40}", url_mode in any::<bool>()) {
            let mode = if url_mode { InputMode::Url } else { InputMode::Text };
            let first = normalize(&s, mode).map(|n| n.payload).map_err(|e| e.to_string());
            let second = normalize(&s, mode).map(|n| n.payload).map_err(|e| e.to_string());
            prop_assert_eq!(first, second);
        }
    }
}
