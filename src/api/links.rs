// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Hypermedia link targets.
//!
//! Volume names and file path segments are percent-encoded, so a file
//! called `a b#c` becomes `/volumes/v/files/a%20b%23c`.

use url::Url;

const BASE: &str = "http://localhost/";

fn href<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut url = Url::parse(BASE).expect("static base URL is valid");
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear()
            .extend(segments.into_iter().filter(|segment| !segment.is_empty()));
    }
    url.path().to_string()
}

pub fn root_href() -> String {
    "/".to_string()
}

pub fn volumes_href() -> String {
    href(["volumes"])
}

pub fn volume_href(name: &str) -> String {
    href(["volumes", name])
}

/// Browse URL for `path` (slash separated, relative to the mount root).
pub fn files_href(name: &str, path: &str) -> String {
    href(["volumes", name, "files"].into_iter().chain(path.split('/')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_collection_and_item_links() {
        assert_eq!(root_href(), "/");
        assert_eq!(volumes_href(), "/volumes");
        assert_eq!(volume_href("test"), "/volumes/test");
    }

    #[test]
    fn files_link_for_root_and_nested_paths() {
        assert_eq!(files_href("test", ""), "/volumes/test/files");
        assert_eq!(files_href("test", "docs/readme.md"), "/volumes/test/files/docs/readme.md");
        assert_eq!(files_href("test", "/docs/"), "/volumes/test/files/docs");
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(volume_href("my vol"), "/volumes/my%20vol");
        assert_eq!(files_href("v", "a b#c"), "/volumes/v/files/a%20b%23c");
        assert_eq!(files_href("v", "q?x"), "/volumes/v/files/q%3Fx");
    }
}
