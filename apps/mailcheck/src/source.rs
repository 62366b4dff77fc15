//! Address input: pasted text or a CSV/plain-text file

use mailcheck_errors::{Error, InputError};
use mailcheck_types::Address;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Where a bulk run takes its addresses from
#[derive(Debug, Clone)]
pub enum AddressSource {
    /// Addresses given on the command line
    Args(Vec<String>),
    /// Addresses piped on standard input
    Stdin,
    /// First column of a `.csv` or `.txt` file
    File(PathBuf),
}

impl AddressSource {
    /// Pick the source from the bulk command's arguments
    pub fn from_args(addresses: Vec<String>, file: Option<PathBuf>) -> Self {
        match file {
            Some(path) => Self::File(path),
            None if addresses.is_empty() => Self::Stdin,
            None => Self::Args(addresses),
        }
    }

    /// Run name suggested by the source (the file name, when there is one)
    pub fn suggested_name(&self) -> Option<String> {
        match self {
            Self::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Self::Args(_) | Self::Stdin => None,
        }
    }

    /// Read the addresses
    ///
    /// # Errors
    ///
    /// Returns an input error if the file has an unsupported extension, is
    /// larger than `max_file_bytes`, or cannot be read as UTF-8 text.
    pub async fn read(&self, max_file_bytes: u64) -> Result<Vec<Address>, Error> {
        match self {
            Self::Args(args) => Ok(split_pasted(&args.join("\n"))),
            Self::Stdin => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .map_err(|e| InputError::Unreadable {
                        path: "<stdin>".to_string(),
                        message: e.to_string(),
                    })?;
                Ok(split_pasted(&text))
            }
            Self::File(path) => read_file(path, max_file_bytes).await,
        }
    }
}

async fn read_file(path: &Path, max_file_bytes: u64) -> Result<Vec<Address>, Error> {
    let display = path.display().to_string();

    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("txt"));
    if !supported {
        return Err(InputError::UnsupportedFormat { path: display }.into());
    }

    let unreadable = |e: std::io::Error| InputError::Unreadable {
        path: display.clone(),
        message: e.to_string(),
    };

    let size = tokio::fs::metadata(path).await.map_err(unreadable)?.len();
    if size > max_file_bytes {
        return Err(InputError::FileTooLarge {
            path: display,
            size,
            limit: max_file_bytes,
        }
        .into());
    }

    let text = tokio::fs::read_to_string(path).await.map_err(unreadable)?;
    let addresses = parse_table(&text);
    tracing::debug!(path = %path.display(), count = addresses.len(), "addresses read from file");
    Ok(addresses)
}

/// Split free text on line breaks, commas, semicolons and whitespace
pub fn split_pasted(text: &str) -> Vec<Address> {
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// First comma-separated field of every non-empty line, unquoted
pub fn parse_table(text: &str) -> Vec<Address> {
    text.lines()
        .filter_map(|line| {
            let first = line.split(',').next().unwrap_or_default().trim();
            let unquoted = first.trim_matches(|c| c == '"' || c == '\'').trim();
            (!unquoted.is_empty()).then(|| unquoted.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pasted_text_splits_on_all_separators() {
        let parsed = split_pasted("a@x.com, b@x.com;c@x.com\n\nd@x.com\te@x.com ");
        assert_eq!(parsed, ["a@x.com", "b@x.com", "c@x.com", "d@x.com", "e@x.com"]);
    }

    #[test]
    fn pasted_duplicates_are_kept() {
        assert_eq!(split_pasted("a@x.com a@x.com"), ["a@x.com", "a@x.com"]);
    }

    #[test]
    fn table_takes_first_column_unquoted() {
        let text = "\"a@x.com\",Alice\r\nb@x.com,Bob,extra\n\n  'c@x.com'  \n,missing\n";
        assert_eq!(parse_table(text), ["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn file_name_becomes_suggested_name() {
        let source = AddressSource::from_args(vec![], Some(PathBuf::from("/tmp/leads.csv")));
        assert_eq!(source.suggested_name().as_deref(), Some("leads.csv"));
        assert!(AddressSource::from_args(vec!["a@x.com".into()], None)
            .suggested_name()
            .is_none());
        assert!(matches!(
            AddressSource::from_args(vec![], None),
            AddressSource::Stdin
        ));
    }

    #[tokio::test]
    async fn spreadsheet_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.xlsx");
        tokio::fs::write(&path, b"binary").await.unwrap();

        let err = AddressSource::File(path).read(1024).await.unwrap_err();
        assert!(matches!(err, Error::Input(InputError::UnsupportedFormat { .. })));
    }

    #[tokio::test]
    async fn oversized_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.csv");
        tokio::fs::write(&path, "a@x.com\n".repeat(100)).await.unwrap();

        let err = AddressSource::File(path).read(64).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Input(InputError::FileTooLarge { size: 800, limit: 64, .. })
        ));
    }

    #[tokio::test]
    async fn csv_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.CSV");
        tokio::fs::write(&path, "email,name\na@x.com,A\nb@x.com,B\n")
            .await
            .unwrap();

        let addresses = AddressSource::File(path).read(1024).await.unwrap();
        // A header row is passed through like any other line.
        assert_eq!(addresses, ["email", "a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn args_are_split_like_pasted_text() {
        let source = AddressSource::Args(vec!["a@x.com,b@x.com".into(), "c@x.com".into()]);
        assert_eq!(
            source.read(0).await.unwrap(),
            ["a@x.com", "b@x.com", "c@x.com"]
        );
    }
}
