pub mod url_validator;

/// 短码字母表：大小写字母 + 数字，共 62 个符号
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default length of generated short codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Checks a user-supplied short code against `^[a-zA-Z0-9]+$`.
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Trait for producing candidate short codes.
///
/// Implementations are pure generators: they never look at the store, so
/// uniqueness is checked (and generation retried) by the caller.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniform random codes over the 62-symbol alphabet.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    pub length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_length_and_alphabet() {
        for _ in 0..200 {
            let code = generate_random_code(6);
            assert_eq!(code.len(), 6);
            assert!(is_valid_short_code(&code), "unexpected code: {}", code);
        }
    }

    #[test]
    fn test_generate_random_code_zero_length() {
        assert_eq!(generate_random_code(0), "");
    }

    #[test]
    fn test_random_generator_never_produces_empty_codes() {
        let generator = RandomCodeGenerator::new(0);
        assert_eq!(generator.generate().len(), 1);
        assert_eq!(RandomCodeGenerator::default().generate().len(), 6);
    }

    #[test]
    fn test_is_valid_short_code() {
        assert!(is_valid_short_code("abc123"));
        assert!(is_valid_short_code("ABCxyz"));
        assert!(is_valid_short_code("7"));

        assert!(!is_valid_short_code(""));
        assert!(!is_valid_short_code("abc-123"));
        assert!(!is_valid_short_code("abc_123"));
        assert!(!is_valid_short_code("has space"));
        assert!(!is_valid_short_code("path/to"));
        assert!(!is_valid_short_code("ünï"));
    }
}
