//! Stored-name generation shared by all providers.
//!
//! The current Unix timestamp in milliseconds is inserted before the last
//! extension: `report.pdf` becomes `report_1700000000000.pdf`, `README`
//! becomes `README_1700000000000`.

use chrono::Utc;

/// Timestamp-qualified name for a new upload.
pub fn generate_stored_name(file_name: &str) -> String {
    stored_name_at(file_name, Utc::now().timestamp_millis())
}

/// Same as [`generate_stored_name`] with an explicit timestamp.
pub fn stored_name_at(file_name: &str, timestamp_ms: i64) -> String {
    match file_name.rfind('.') {
        Some(dot) => {
            let (stem, extension) = file_name.split_at(dot);
            format!("{}_{}{}", stem, timestamp_ms, extension)
        }
        None => format!("{}_{}", file_name, timestamp_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_timestamp_before_extension() {
        assert_eq!(stored_name_at("report.pdf", 42), "report_42.pdf");
    }

    #[test]
    fn only_last_extension_is_kept_after_timestamp() {
        assert_eq!(stored_name_at("backup.tar.gz", 7), "backup.tar_7.gz");
    }

    #[test]
    fn appends_timestamp_without_extension() {
        assert_eq!(stored_name_at("README", 99), "README_99");
    }

    #[test]
    fn dotfiles_keep_their_extension() {
        assert_eq!(stored_name_at(".env", 5), "_5.env");
    }

    #[test]
    fn generated_names_preserve_extension_and_differ_from_input() {
        for name in ["a.txt", "minutes.docx", "no_extension", "trailing.", "x.y.z"] {
            let stored = generate_stored_name(name);
            assert_ne!(stored, name);
            if let Some(dot) = name.rfind('.') {
                assert!(stored.ends_with(&name[dot..]), "{} -> {}", name, stored);
            }
        }
    }
}
