//! URL 验证模块
//!
//! 目标地址必须能被解析为绝对 URL，并且不能是脚本类或本地协议

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 验证目标 URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. URL 可被解析为绝对地址
/// 3. 不是危险协议（javascript:, data:, file: 等）
///
/// Stricter than plain parsing: `javascript:`, `data:`, `file:`, `vbscript:`,
/// `about:` and `blob:` URLs parse fine but are still refused as
/// `DangerousProtocol`.
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    let scheme = format!("{}:", parsed.scheme());
    if DANGEROUS_PROTOCOLS.contains(&scheme.as_str()) {
        return Err(UrlValidationError::DangerousProtocol(scheme));
    }

    Ok(parsed)
}

/// Reduces a referrer to its origin (`scheme://host[:port]`).
///
/// Empty referrers map to `"direct"`. Text that is not a URL, or a URL with
/// an opaque origin, is kept verbatim after trimming.
pub fn referrer_origin(referrer: Option<&str>) -> String {
    let raw = match referrer.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return crate::storage::DIRECT_SOURCE.to_string(),
    };

    match Url::parse(raw) {
        Ok(parsed) if parsed.origin().is_tuple() => parsed.origin().ascii_serialization(),
        _ => raw.to_string(),
    }
}
