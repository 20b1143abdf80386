//! Index token derivation.
//!
//! An input file `input12.csv` is paired with `output12.csv` and
//! `myoutput12.csv` through its index token, here `12`.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// How the index token is cut out of an input file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StripMode {
    /// Remove the marker once as a prefix and the extension once as a suffix.
    #[default]
    Affix,
    /// Trim any run of characters from the marker's and extension's character
    /// sets off both ends. Over-strips names like `inputs.csv`.
    CharSet,
}

/// Identifier shared by an input file and its reference/candidate outputs.
///
/// Kept as an `OsString` so names that are not valid UTF-8 still pair with
/// their reference files byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexToken(OsString);

impl IndexToken {
    pub fn new(token: impl Into<OsString>) -> Self {
        Self(token.into())
    }

    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }

    /// Lossy text form, for display and filtering.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        self.0.to_string_lossy()
    }

    /// `<prefix><index><extension>`, e.g. `output12.csv`.
    pub fn file_name(&self, prefix: &str, extension: &str) -> OsString {
        let mut name = OsString::from(prefix);
        name.push(&self.0);
        name.push(extension);
        name
    }
}

impl fmt::Display for IndexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Serialize for IndexToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

/// Derives the index token of `file_name`.
pub fn derive_index(file_name: &str, marker: &str, extension: &str, mode: StripMode) -> IndexToken {
    let token = match mode {
        StripMode::Affix => {
            let rest = file_name.strip_prefix(marker).unwrap_or(file_name);
            rest.strip_suffix(extension).unwrap_or(rest)
        }
        StripMode::CharSet => strip_chars(strip_chars(file_name, marker), extension),
    };
    IndexToken::new(token)
}

/// Derives the index token of a raw file name.
///
/// UTF-8 names go through [`derive_index`]. Other names are cut on their
/// bytes on Unix; elsewhere they have no index and `None` is returned.
pub fn derive_index_os(file_name: &OsStr, marker: &str, extension: &str, mode: StripMode) -> Option<IndexToken> {
    if let Some(name) = file_name.to_str() {
        return Some(derive_index(name, marker, extension, mode));
    }
    derive_index_bytes(file_name, marker, extension, mode)
}

#[cfg(unix)]
fn derive_index_bytes(file_name: &OsStr, marker: &str, extension: &str, mode: StripMode) -> Option<IndexToken> {
    use std::os::unix::ffi::OsStrExt;

    let bytes = file_name.as_bytes();
    let token = match mode {
        StripMode::Affix => {
            let rest = bytes.strip_prefix(marker.as_bytes()).unwrap_or(bytes);
            rest.strip_suffix(extension.as_bytes()).unwrap_or(rest)
        }
        StripMode::CharSet => strip_bytes(strip_bytes(bytes, marker), extension),
    };
    Some(IndexToken::new(OsStr::from_bytes(token)))
}

#[cfg(not(unix))]
fn derive_index_bytes(_: &OsStr, _: &str, _: &str, _: StripMode) -> Option<IndexToken> {
    None
}

fn strip_chars<'a>(text: &'a str, set: &str) -> &'a str {
    text.trim_matches(|c: char| set.contains(c))
}

/// Byte counterpart of [`strip_chars`]; only ASCII members of `set` match.
#[cfg(unix)]
fn strip_bytes<'a>(bytes: &'a [u8], set: &str) -> &'a [u8] {
    let in_set = |b: &u8| b.is_ascii() && set.contains(char::from(*b));
    let start = bytes.iter().position(|b| !in_set(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !in_set(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affix(name: &str) -> String {
        derive_index(name, "input", ".csv", StripMode::Affix).to_string()
    }

    fn char_set(name: &str) -> String {
        derive_index(name, "input", ".csv", StripMode::CharSet).to_string()
    }

    #[test]
    fn affix_removes_literal_prefix_and_suffix() {
        assert_eq!(affix("input1.csv"), "1");
        assert_eq!(affix("input12.csv"), "12");
        assert_eq!(affix("input_big-batch.csv"), "_big-batch");
        assert_eq!(affix("inputs.csv"), "s");
    }

    #[test]
    fn affix_leaves_missing_parts_alone() {
        assert_eq!(affix("input7.txt"), "7.txt");
        assert_eq!(affix("old_input3.csv"), "old_input3");
        assert_eq!(affix("input.csv"), "");
    }

    #[test]
    fn char_set_matches_affix_for_plain_numbers() {
        assert_eq!(char_set("input1.csv"), "1");
        assert_eq!(char_set("input42.csv"), "42");
    }

    #[test]
    fn char_set_over_strips() {
        // 's', 'v' and 'c' belong to ".csv"; 't' belongs to "input"
        assert_eq!(char_set("inputs.csv"), "");
        assert_eq!(char_set("inputv1c.csv"), "1");
        assert_eq!(char_set("inputtest3.csv"), "est3");
        assert_eq!(char_set("input_test.csv"), "_test");
    }

    #[test]
    fn token_builds_paired_names() {
        let token = IndexToken::new("3");
        assert_eq!(token.file_name("output", ".csv"), "output3.csv");
        assert_eq!(token.file_name("myoutput", ".csv"), "myoutput3.csv");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_keep_their_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"input\xff.csv");
        let token = derive_index_os(name, "input", ".csv", StripMode::Affix).unwrap();
        assert_eq!(token.as_os_str().as_bytes(), b"\xff");
        assert_eq!(token.file_name("output", ".csv").as_bytes(), b"output\xff.csv");

        let name = OsStr::from_bytes(b"input\xffs.csv");
        let token = derive_index_os(name, "input", ".csv", StripMode::CharSet).unwrap();
        assert_eq!(token.as_os_str().as_bytes(), b"\xff");
    }

    #[test]
    fn utf8_names_match_str_derivation() {
        let token = derive_index_os(OsStr::new("input12.csv"), "input", ".csv", StripMode::Affix);
        assert_eq!(token, Some(IndexToken::new("12")));
    }
}
