use anyhow::{Result, bail};

/// Validate an object or namespace name taken from a request path.
/// Rules: lowercase `[a-z0-9.-]`, max 253 chars, must start and end alphanumeric.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("name must not be empty");
    }
    if name.len() > 253 {
        bail!("name '{}' exceeds 253 characters (got {})", name, name.len());
    }
    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    if !name.starts_with(alnum) || !name.ends_with(alnum) {
        bail!("name '{}' must start and end with a letter or digit", name);
    }
    if !name.chars().all(|c| alnum(c) || c == '-' || c == '.') {
        bail!(
            "name '{}' must contain only lowercase letters, digits, '-' and '.'",
            name
        );
    }
    Ok(())
}
