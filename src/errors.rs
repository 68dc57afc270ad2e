use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkstashError {
    LinkInvalidUrl(String),
    LinkInvalidValidity(String),
    LinkCodeTaken(String),
    LinkInvalidCode(String),
    NotFound(String),
    Expired(String),
    CodeGeneration(String),
    FileOperation(String),
    Serialization(String),
    DateParse(String),
    Config(String),
    DuplicateId(String),
}

impl LinkstashError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkstashError::LinkInvalidUrl(_) => "E001",
            LinkstashError::LinkInvalidValidity(_) => "E002",
            LinkstashError::LinkCodeTaken(_) => "E003",
            LinkstashError::LinkInvalidCode(_) => "E004",
            LinkstashError::NotFound(_) => "E005",
            LinkstashError::Expired(_) => "E006",
            LinkstashError::CodeGeneration(_) => "E007",
            LinkstashError::FileOperation(_) => "E008",
            LinkstashError::Serialization(_) => "E009",
            LinkstashError::DateParse(_) => "E010",
            LinkstashError::Config(_) => "E011",
            LinkstashError::DuplicateId(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkstashError::LinkInvalidUrl(_) => "Invalid URL",
            LinkstashError::LinkInvalidValidity(_) => "Invalid Validity",
            LinkstashError::LinkCodeTaken(_) => "Short Code Taken",
            LinkstashError::LinkInvalidCode(_) => "Invalid Short Code",
            LinkstashError::NotFound(_) => "Resource Not Found",
            LinkstashError::Expired(_) => "Link Expired",
            LinkstashError::CodeGeneration(_) => "Code Generation Error",
            LinkstashError::FileOperation(_) => "File Operation Error",
            LinkstashError::Serialization(_) => "Serialization Error",
            LinkstashError::DateParse(_) => "Date Parse Error",
            LinkstashError::Config(_) => "Configuration Error",
            LinkstashError::DuplicateId(_) => "Duplicate Record",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkstashError::LinkInvalidUrl(msg)
            | LinkstashError::LinkInvalidValidity(msg)
            | LinkstashError::LinkCodeTaken(msg)
            | LinkstashError::LinkInvalidCode(msg)
            | LinkstashError::NotFound(msg)
            | LinkstashError::Expired(msg)
            | LinkstashError::CodeGeneration(msg)
            | LinkstashError::FileOperation(msg)
            | LinkstashError::Serialization(msg)
            | LinkstashError::DateParse(msg)
            | LinkstashError::Config(msg)
            | LinkstashError::DuplicateId(msg) => msg,
        }
    }

    /// Whether the error was caused by rejected input on create.
    ///
    /// Validation errors are reported before any mutation happens and are
    /// never retried automatically.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LinkstashError::LinkInvalidUrl(_)
                | LinkstashError::LinkInvalidValidity(_)
                | LinkstashError::LinkCodeTaken(_)
                | LinkstashError::LinkInvalidCode(_)
        )
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkstashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkstashError {}

// 便捷的构造函数
impl LinkstashError {
    pub fn link_invalid_url<T: Into<String>>(msg: T) -> Self {
        LinkstashError::LinkInvalidUrl(msg.into())
    }

    pub fn link_invalid_validity<T: Into<String>>(msg: T) -> Self {
        LinkstashError::LinkInvalidValidity(msg.into())
    }

    pub fn link_code_taken<T: Into<String>>(msg: T) -> Self {
        LinkstashError::LinkCodeTaken(msg.into())
    }

    pub fn link_invalid_code<T: Into<String>>(msg: T) -> Self {
        LinkstashError::LinkInvalidCode(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkstashError::NotFound(msg.into())
    }

    pub fn expired<T: Into<String>>(msg: T) -> Self {
        LinkstashError::Expired(msg.into())
    }

    pub fn code_generation<T: Into<String>>(msg: T) -> Self {
        LinkstashError::CodeGeneration(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkstashError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkstashError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        LinkstashError::DateParse(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkstashError::Config(msg.into())
    }

    pub fn duplicate_id<T: Into<String>>(msg: T) -> Self {
        LinkstashError::DuplicateId(msg.into())
    }
}

impl From<std::io::Error> for LinkstashError {
    fn from(err: std::io::Error) -> Self {
        LinkstashError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkstashError {
    fn from(err: serde_json::Error) -> Self {
        LinkstashError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LinkstashError {
    fn from(err: chrono::ParseError) -> Self {
        LinkstashError::DateParse(err.to_string())
    }
}

impl From<config::ConfigError> for LinkstashError {
    fn from(err: config::ConfigError) -> Self {
        LinkstashError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkstashError>;
