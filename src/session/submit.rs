use crate::errors::VigilError;

/// Check a raw user-supplied repository reference against the expected
/// host: optional scheme, optional `www.`, then the host, then a slash and
/// any non-whitespace remainder.
pub fn validate_repository_url(raw: &str, expected_host: &str) -> Result<(), VigilError> {
    let pattern = format!(
        r"^(https?://)?(www\.)?{}/\S*$",
        regex::escape(expected_host)
    );
    let host_regex = regex::Regex::new(&pattern).unwrap();
    if host_regex.is_match(raw) {
        Ok(())
    } else {
        Err(VigilError::InvalidRepository(format!(
            "expected a {} repository URL, got: {}",
            expected_host, raw
        )))
    }
}

/// Derive the short display label: the last non-empty `/`-separated
/// segment, with a trailing `.git` suffix stripped.
pub fn display_label(url: &str) -> String {
    let segment = url
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or(url);
    segment.strip_suffix(".git").unwrap_or(segment).to_string()
}
