//! Extraction of PEM blocks from free-form text.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::Error;

/// The start of a PEM pre-encapsulation boundary.
const BEGIN_BOUNDARY: &str = "-----BEGIN ";

/// The start of a PEM post-encapsulation boundary.
const END_BOUNDARY: &str = "-----END ";

/// The end of both PEM encapsulation boundaries.
const BOUNDARY_SUFFIX: &str = "-----";

/// A decoded PEM container.
///
/// Tracks the type label of the block (e.g. `PUBLIC KEY`) and its decoded (DER) payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PemBlock {
    label: String,
    contents: Vec<u8>,
}

impl PemBlock {
    /// Decodes the first PEM block found in `input`.
    ///
    /// Text before the first pre-encapsulation boundary and after its matching post-encapsulation
    /// boundary is ignored, as are any further PEM blocks.
    /// Encapsulation boundaries must start a line.
    /// The base64 body may be wrapped at any width and may contain spaces, tabs and header lines
    /// (e.g. `Proc-Type: 4,ENCRYPTED`), which are skipped.
    /// Candidate blocks that can not be decoded are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> testresult::TestResult {
    /// use sshid_spki::PemBlock;
    ///
    /// let block = PemBlock::from_pem(
    ///     "leading text\n-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n",
    /// )?;
    /// assert_eq!(block.label(), "CERTIFICATE");
    /// assert_eq!(block.contents(), &[0, 0, 0]);
    /// # Ok(()) }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPem`] if `input` contains no decodable PEM block.
    pub fn from_pem(input: &str) -> Result<Self, Error> {
        candidate_blocks(input)
            .find_map(|(label, body)| {
                decode_body(body).map(|contents| Self {
                    label: label.to_string(),
                    contents,
                })
            })
            .ok_or(Error::NotPem)
    }

    /// Returns the type label of the block.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the decoded payload of the block.
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

/// Splits off the first line of `input`, without its trailing whitespace.
fn split_line(input: &str) -> (&str, &str) {
    let (line, rest) = input.split_once('\n').unwrap_or((input, ""));
    (line.trim_end_matches([' ', '\t', '\r']), rest)
}

/// Returns the label and the undecoded body of every PEM block in `input`.
///
/// A block starts with a pre-encapsulation boundary at the start of a line and ends with the first
/// post-encapsulation boundary at the start of a later line, which must carry the same label and
/// may only be followed by whitespace.
fn candidate_blocks(input: &str) -> impl Iterator<Item = (&str, &str)> {
    std::iter::once(0)
        .chain(input.match_indices('\n').map(|(index, _)| index + 1))
        .filter_map(|start| {
            let rest = input[start..].strip_prefix(BEGIN_BOUNDARY)?;
            let (type_line, rest) = split_line(rest);
            let label = type_line.strip_suffix(BOUNDARY_SUFFIX)?;

            let mut end = 0;
            loop {
                let (line, next) = split_line(&rest[end..]);
                if let Some(trailer) = line.strip_prefix(END_BOUNDARY) {
                    return (trailer.strip_suffix(BOUNDARY_SUFFIX)? == label)
                        .then_some((label, &rest[..end]));
                }
                if next.is_empty() {
                    return None;
                }
                end = rest.len() - next.len();
            }
        })
}

/// Decodes the base64 body of a PEM block, skipping leading header lines and whitespace.
fn decode_body(body: &str) -> Option<Vec<u8>> {
    let data: String = body
        .lines()
        .skip_while(|line| line.contains(':'))
        .flat_map(str::chars)
        .filter(|symbol| !symbol.is_ascii_whitespace())
        .collect();
    STANDARD.decode(data).ok()
}
