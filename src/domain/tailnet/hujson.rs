//! HuJSON standardisation
//!
//! Policy files are HuJSON: JSON plus `//` and `/* */` comments and
//! trailing commas. [`standardize`] rewrites such a document into plain
//! JSON so `serde_json` can decode it. Byte offsets are preserved by
//! replacing stripped characters with spaces, so decode errors still point
//! at the right place.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HujsonError {
    pub offset: usize,
    pub message: &'static str,
}

impl fmt::Display for HujsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

impl std::error::Error for HujsonError {}

pub fn standardize(input: &str) -> Result<String, HujsonError> {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' => {
                let start = i;
                out.push(b);
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => {
                            return Err(HujsonError {
                                offset: start,
                                message: "unterminated string",
                            })
                        }
                        Some(b'\\') => {
                            out.push(b'\\');
                            if let Some(&next) = bytes.get(i + 1) {
                                out.push(next);
                            }
                            i += 2;
                        }
                        Some(b'"') => {
                            out.push(b'"');
                            i += 1;
                            break;
                        }
                        Some(&c) => {
                            out.push(c);
                            i += 1;
                        }
                    }
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out.push(b' ');
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i;
                out.extend_from_slice(b"  ");
                i += 2;
                loop {
                    match bytes.get(i) {
                        None => {
                            return Err(HujsonError {
                                offset: start,
                                message: "unterminated block comment",
                            })
                        }
                        Some(b'*') if bytes.get(i + 1) == Some(&b'/') => {
                            out.extend_from_slice(b"  ");
                            i += 2;
                            break;
                        }
                        Some(b'\n') => {
                            out.push(b'\n');
                            i += 1;
                        }
                        Some(_) => {
                            out.push(b' ');
                            i += 1;
                        }
                    }
                }
            }
            b']' | b'}' => {
                blank_trailing_comma(&mut out);
                out.push(b);
                i += 1;
            }
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }

    // Only ASCII bytes were replaced, so the buffer is still valid UTF-8.
    String::from_utf8(out).map_err(|_| HujsonError {
        offset: 0,
        message: "invalid UTF-8",
    })
}

/// Replace a comma that is followed only by whitespace with a space.
fn blank_trailing_comma(out: &mut [u8]) {
    for idx in (0..out.len()).rev() {
        match out[idx] {
            b' ' | b'\t' | b'\r' | b'\n' => continue,
            b',' => {
                out[idx] = b' ';
                return;
            }
            _ => return,
        }
    }
}
