//! Shortcut import from a YAML list of `{name, path}` pairs.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct ShortcutEntry {
    pub name: String,
    pub path: String,
}

pub fn read_entries(file: &Path) -> Result<Vec<(String, String)>, crate::CliError> {
    let text = std::fs::read_to_string(file)?;
    let entries: Vec<ShortcutEntry> = serde_yaml::from_str(&text)?;
    Ok(entries.into_iter().map(|e| (e.name, e.path)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_a_yaml_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "- name: t\n  path: /tmp\n- name: proj\n  path: /home/u/project"
        )
        .unwrap();

        let entries = read_entries(file.path()).unwrap();
        assert_eq!(
            entries,
            vec![
                ("t".to_string(), "/tmp".to_string()),
                ("proj".to_string(), "/home/u/project".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not: [a, list, of, shortcuts").unwrap();
        assert!(read_entries(file.path()).is_err());
    }
}
