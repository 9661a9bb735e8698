use crate::utils::error::{QrError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> QrError {
    QrError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.chars().any(char::is_control) {
        return Err(invalid(field_name, path, "Path contains control characters"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// 下載檔名只允許單一層級，且副檔名必須符合輸出格式
pub fn validate_file_name(field_name: &str, file: &str, allowed_extension: &str) -> Result<()> {
    validate_non_empty_string(field_name, file)?;

    if file.contains(['/', '\\']) || file == "." || file == ".." {
        return Err(invalid(
            field_name,
            file,
            "File name must not contain path separators",
        ));
    }

    let extension = std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| invalid(field_name, file, "File name has no extension"))?;

    if !extension.eq_ignore_ascii_case(allowed_extension) {
        return Err(invalid(
            field_name,
            file,
            format!("Expected a .{} file, got .{}", allowed_extension, extension),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty"));
    }
    Ok(())
}

pub fn validate_range<T>(field_name: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if !(min..=max).contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
