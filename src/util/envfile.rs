use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped; surrounding quotes are removed.
pub fn parse_env_str(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (idx, line) in content.lines().enumerate() {
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        if let Some(eq) = s.find('=') {
            let key = s[..eq].trim();
            let mut val = s[eq + 1..].trim().to_string();
            if val.len() >= 2
                && ((val.starts_with('"') && val.ends_with('"'))
                    || (val.starts_with('\'') && val.ends_with('\'')))
            {
                val = val[1..val.len() - 1].to_string();
            }
            map.insert(key.to_string(), val);
        } else {
            log::warn!("ignoring .env line {} without '=': {}", idx + 1, line);
        }
    }
    map
}

/// Parse a .env file at `path`, returning an empty map when it does not exist.
/// Does not modify the process environment.
pub fn parse_env_file_at(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(parse_env_str(&content))
}

/// Load `.env` from the current working directory into the process environment.
/// Existing variables are NOT overridden.
pub fn load_dotenv_if_present() -> Result<()> {
    let map = parse_env_file_at(Path::new(".env"))?;
    for (k, v) in map {
        if std::env::var_os(&k).is_none() {
            unsafe {
                std::env::set_var(&k, &v);
            }
        }
    }
    Ok(())
}

/// Generate a .env.template file with placeholder values and comments.
pub fn write_env_template(path: &Path) -> Result<()> {
    let mut f = fs::File::create(path)?;
    let template = r#"# niche_matcher environment configuration template
# Copy this file to .env and adjust. Any of these variables can also be set in the
# system environment, which takes precedence over .env.

# Product-id checklist: CSV file path or http(s) URL (e.g. a spreadsheet CSV export link)
CHECKLIST_URL=https://example.com/checklist.csv

# Folder holding the raw upload and the comparison workbook
UPLOAD_FOLDER=uploads

# Largest accepted upload in bytes (default 16 MiB)
#MAX_CONTENT_LENGTH=16777216

# Log level (error|warn|info|debug|trace)
#RUST_LOG=info
"#;
    f.write_all(template.as_bytes())?;
    Ok(())
}
