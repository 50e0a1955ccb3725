// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Parsing of the encryption tool's `--list` output.
//!
//! Each mounted volume is reported on its own line:
//!
//! ```text
//! 1: /srv/volumes/test /dev/mapper/veracrypt1 '/tmp/mount with spaces'
//! ```
//!
//! Any line without a numeric `N: ` prefix (banners, warnings, blank lines)
//! is ignored. The remainder of an indexed line is split with shell quoting
//! rules and must produce exactly three tokens.

use std::path::PathBuf;

use serde::Serialize;

use super::error::{EngineError, EngineResult};

/// One mounted volume as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub container_path: PathBuf,
    pub device_path: PathBuf,
    pub mount_path: PathBuf,
}

/// Parse the full stdout of a list invocation.
pub fn parse_list_output(text: &str) -> EngineResult<Vec<ListEntry>> {
    text.lines()
        .filter_map(strip_index)
        .map(parse_entry)
        .collect()
}

/// Returns the text after `N: ` for indexed lines, `None` for everything else.
fn strip_index(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix(": ")?;
    (!rest.is_empty()).then_some(rest)
}

fn parse_entry(rest: &str) -> EngineResult<ListEntry> {
    let tokens = shlex::split(rest).ok_or_else(|| EngineError::MalformedListLine {
        line: rest.to_string(),
        reason: "unbalanced quoting".to_string(),
    })?;

    match <[String; 3]>::try_from(tokens) {
        Ok([container, device, mount]) => Ok(ListEntry {
            container_path: PathBuf::from(container),
            device_path: PathBuf::from(device),
            mount_path: PathBuf::from(mount),
        }),
        Err(tokens) => Err(EngineError::MalformedListLine {
            line: rest.to_string(),
            reason: format!("expected 3 fields, found {}", tokens.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(container: &str, device: &str, mount: &str) -> ListEntry {
        ListEntry {
            container_path: PathBuf::from(container),
            device_path: PathBuf::from(device),
            mount_path: PathBuf::from(mount),
        }
    }

    #[test]
    fn parses_quoted_fields_and_skips_noise() {
        let output = "1: /foo/bar/baz.vc /dev/disk4 '/tmp/something with spaces'\n\n\
                      something completely different\n\
                      2: 'what about this' /dev/disk5 /tmp/somethingelse\n";

        let parsed = parse_list_output(output).unwrap();
        assert_eq!(
            parsed,
            vec![
                entry("/foo/bar/baz.vc", "/dev/disk4", "/tmp/something with spaces"),
                entry("what about this", "/dev/disk5", "/tmp/somethingelse"),
            ]
        );
    }

    #[test]
    fn double_quotes_are_unquoted() {
        let parsed = parse_list_output("12: \"/a b/c\" /dev/mapper/veracrypt12 /mnt/x\n").unwrap();
        assert_eq!(parsed, vec![entry("/a b/c", "/dev/mapper/veracrypt12", "/mnt/x")]);
    }

    #[test]
    fn empty_output_means_nothing_mounted() {
        assert!(parse_list_output("").unwrap().is_empty());
        assert!(parse_list_output("Error: No volumes mounted.\n").unwrap().is_empty());
    }

    #[test]
    fn lines_without_separator_are_ignored() {
        let output = "1:/no/space /dev/x /mnt\n42 /dev/y /mnt\n: /a /b /c\n";
        assert!(parse_list_output(output).unwrap().is_empty());
    }

    #[test]
    fn wrong_field_count_is_an_error() {
        let error = parse_list_output("1: /only/two /dev/disk4\n").unwrap_err();
        assert!(matches!(error, EngineError::MalformedListLine { .. }));
        assert!(error.to_string().contains("expected 3 fields, found 2"));
    }

    #[test]
    fn unbalanced_quote_is_an_error() {
        let error = parse_list_output("1: '/broken /dev/disk4 /mnt\n").unwrap_err();
        assert!(matches!(error, EngineError::MalformedListLine { .. }));
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let parsed = parse_list_output("1: /v /dev/d /m\r\n").unwrap();
        assert_eq!(parsed, vec![entry("/v", "/dev/d", "/m")]);
    }
}
