//! `_headers` file parsing.
//!
//! ```text
//! /blog/*
//!   Cache-Control: public
//!   X-Frame-Options: DENY
//! ```
//! A line starting with `/` opens a path block; `Name: value` lines attach
//! headers to it. A repeated name within a block is joined with `, `, and a
//! path appearing twice continues its first block.

use crate::config::loader::SyntaxError;

/// Headers declared for one path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    pub path: String,
    pub values: Vec<(String, String)>,
}

impl HeaderBlock {
    fn add(&mut self, name: &str, value: &str) {
        match self.values.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, current)) => {
                current.push_str(", ");
                current.push_str(value);
            }
            None => self.values.push((name.to_string(), value.to_string())),
        }
    }
}

/// Parse the contents of a `_headers` file.
pub fn parse_headers(text: &str) -> Result<Vec<HeaderBlock>, SyntaxError> {
    let mut blocks: Vec<HeaderBlock> = Vec::new();
    let mut current: Option<usize> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('/') {
            let position = match blocks.iter().position(|b| b.path == line) {
                Some(position) => position,
                None => {
                    blocks.push(HeaderBlock {
                        path: line.to_string(),
                        values: Vec::new(),
                    });
                    blocks.len() - 1
                }
            };
            current = Some(position);
            continue;
        }

        let error = |message: String| SyntaxError {
            line: index + 1,
            message,
        };
        let block = current
            .and_then(|position| blocks.get_mut(position))
            .ok_or_else(|| error(format!("header outside of a path block: {}", line)))?;
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| error(format!("expected `Name: value`: {}", line)))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(error(format!("missing header name: {}", line)));
        }
        block.add(name, value.trim());
    }

    Ok(blocks)
}
