//! Metadata block extraction and parsing.

use std::collections::BTreeMap;

/// Parsed `key: value` pairs from a content file's metadata block.
pub type Metadata = BTreeMap<String, String>;

const DELIMITER: &str = "---";

/// Errors that can occur when parsing a metadata block.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata block is missing its closing --- delimiter")]
    Unclosed,

    #[error("invalid metadata block: {0}")]
    Invalid(String),
}

/// Split the leading metadata block from a content file.
///
/// The block opens with a first line containing exactly `---` and closes at
/// the next such line; the pairs between them are parsed as YAML into a
/// string-to-string map. A file without a block yields an empty map and the
/// source untouched. An opened block that never closes is an error.
pub fn extract_metadata(source: &str) -> Result<(Metadata, &str), MetadataError> {
    let mut lines = source.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok((Metadata::new(), source));
    };
    if trim_line_ending(first) != DELIMITER {
        return Ok((Metadata::new(), source));
    }

    let block_start = first.len();
    let mut consumed = block_start;
    for line in lines {
        if trim_line_ending(line) == DELIMITER {
            let block = &source[block_start..consumed];
            let body = &source[consumed + line.len()..];
            return Ok((parse_pairs(block)?, body));
        }
        consumed += line.len();
    }

    Err(MetadataError::Unclosed)
}

fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}

fn parse_pairs(block: &str) -> Result<Metadata, MetadataError> {
    if block.trim().is_empty() {
        return Ok(Metadata::new());
    }
    serde_yaml::from_str(block).map_err(|e| MetadataError::Invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extracts_pairs_and_body() {
        let source = "---\ntitle: index\nauthor: someone\n---\n# Hello\n";

        let (metadata, body) = extract_metadata(source).unwrap();

        assert_eq!(metadata.get("title").map(String::as_str), Some("index"));
        assert_eq!(metadata.get("author").map(String::as_str), Some("someone"));
        assert_eq!(body, "# Hello\n");
    }

    #[test]
    fn no_block_yields_empty_metadata() {
        let source = "# Just markdown\n\nNo metadata here.";

        let (metadata, body) = extract_metadata(source).unwrap();

        assert!(metadata.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn dashes_midway_do_not_open_a_block() {
        let source = "# Heading\n---\ntitle: not metadata\n---\n";

        let (metadata, body) = extract_metadata(source).unwrap();

        assert!(metadata.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn errors_on_unclosed_block() {
        let source = "---\ntitle: index\n# never closed";

        let result = extract_metadata(source);

        assert!(matches!(result, Err(MetadataError::Unclosed)));
    }

    #[test]
    fn empty_block_is_allowed() {
        let source = "---\n---\nbody";

        let (metadata, body) = extract_metadata(source).unwrap();

        assert!(metadata.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let source = "---\r\ntitle: index\r\n---\r\nbody\r\n";

        let (metadata, body) = extract_metadata(source).unwrap();

        assert_eq!(metadata.get("title").map(String::as_str), Some("index"));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn errors_on_malformed_pairs() {
        let source = "---\ntitle: [broken\n---\nbody";

        let result = extract_metadata(source);

        assert!(matches!(result, Err(MetadataError::Invalid(_))));
    }

    #[test]
    fn longer_dash_runs_are_not_delimiters() {
        let source = "----\ntitle: nope\n----\nbody";

        let (metadata, body) = extract_metadata(source).unwrap();

        assert!(metadata.is_empty());
        assert_eq!(body, source);
    }
}
