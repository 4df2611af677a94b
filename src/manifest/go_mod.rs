//! go.mod parser for Go projects
//!
//! Handles:
//! - module directive
//! - require statements (single and block) with `// indirect` markers
//! - replace directives (single and block), used to detect local overrides
//! - exclude/retract/tool/godebug blocks are skipped

use crate::domain::{Replacement, Requirement};
use crate::error::ManifestError;
use regex::Regex;
use std::sync::LazyLock;

// Canonical module version: v1.2.3, v1.2.3-pre.1, v0.0.0-2021...-abcdef, v2.0.0+incompatible
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.+-]+)?$").unwrap());

// `// indirect` or `// indirect; other notes`
static INDIRECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*indirect\s*(?:;|$)").unwrap());

/// Parsed contents of a go.mod file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoMod {
    /// The main module path
    pub module_path: Option<String>,
    /// Requirements in file order
    pub requirements: Vec<Requirement>,
    /// Replace directives in file order
    pub replacements: Vec<Replacement>,
}

impl GoMod {
    /// Direct (non-indirect) requirements in file order
    pub fn direct_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|r| !r.indirect)
    }

    /// Paths of modules replaced by a local directory
    pub fn local_replacement_paths(&self) -> Vec<&str> {
        self.replacements
            .iter()
            .filter(|r| r.is_local())
            .map(|r| r.old_path.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Require,
    Replace,
    Ignored,
}

/// Parser for go.mod files
pub struct GoModParser;

impl GoModParser {
    /// Parse go.mod content
    pub fn parse(&self, content: &str) -> Result<GoMod, ManifestError> {
        let mut go_mod = GoMod::default();
        let mut block = Block::None;
        let mut block_start = 0;

        for (index, raw_line) in content.lines().enumerate() {
            let line_no = index + 1;
            let (code, comment) = split_comment(raw_line);
            let tokens: Vec<String> = code.split_whitespace().map(unquote).collect();

            if tokens.is_empty() {
                continue;
            }

            if block != Block::None {
                if tokens.len() == 1 && tokens[0] == ")" {
                    block = Block::None;
                    continue;
                }
                match block {
                    Block::Require => {
                        go_mod
                            .requirements
                            .push(parse_require(&tokens, comment, line_no)?);
                    }
                    Block::Replace => {
                        go_mod.replacements.push(parse_replace(&tokens, line_no)?);
                    }
                    Block::Ignored | Block::None => {}
                }
                continue;
            }

            let verb = tokens[0].as_str();
            let args = &tokens[1..];
            let opens_block = args.len() == 1 && args[0] == "(";

            match verb {
                "module" => {
                    let path = args
                        .first()
                        .ok_or_else(|| ManifestError::parse_error(line_no, "missing module path"))?;
                    go_mod.module_path = Some(path.clone());
                }
                "require" if opens_block => {
                    block = Block::Require;
                    block_start = line_no;
                }
                "require" => {
                    go_mod
                        .requirements
                        .push(parse_require(args, comment, line_no)?);
                }
                "replace" if opens_block => {
                    block = Block::Replace;
                    block_start = line_no;
                }
                "replace" => {
                    go_mod.replacements.push(parse_replace(args, line_no)?);
                }
                _ if opens_block => {
                    block = Block::Ignored;
                    block_start = line_no;
                }
                // go, toolchain, exclude, retract, tool, godebug
                _ => {}
            }
        }

        if block != Block::None {
            return Err(ManifestError::parse_error(
                block_start,
                "block is never closed with ')'",
            ));
        }

        Ok(go_mod)
    }
}

/// Split a line into its code part and the text after `//`, if any
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find("//") {
        Some(pos) => (&line[..pos], Some(&line[pos + 2..])),
        None => (line, None),
    }
}

fn unquote(token: &str) -> String {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
        .to_string()
}

fn parse_require(
    tokens: &[String],
    comment: Option<&str>,
    line_no: usize,
) -> Result<Requirement, ManifestError> {
    let [path, version] = tokens else {
        return Err(ManifestError::parse_error(
            line_no,
            "expected `module/path vX.Y.Z` in require",
        ));
    };

    if !VERSION_RE.is_match(version) {
        return Err(ManifestError::parse_error(
            line_no,
            format!("invalid version '{}' for {}", version, path),
        ));
    }

    let indirect = comment.is_some_and(|c| INDIRECT_RE.is_match(c));
    Ok(if indirect {
        Requirement::indirect(path, version)
    } else {
        Requirement::direct(path, version)
    })
}

fn parse_replace(tokens: &[String], line_no: usize) -> Result<Replacement, ManifestError> {
    let arrow = tokens
        .iter()
        .position(|t| t == "=>")
        .ok_or_else(|| ManifestError::parse_error(line_no, "missing '=>' in replace"))?;

    let (old, new) = (&tokens[..arrow], &tokens[arrow + 1..]);

    let (old_path, old_version) = match old {
        [path] => (path.clone(), None),
        [path, version] => (path.clone(), Some(version.clone())),
        _ => {
            return Err(ManifestError::parse_error(
                line_no,
                "expected `module/path [version]` before '=>'",
            ))
        }
    };

    let (new_path, new_version) = match new {
        [path] => (path.clone(), None),
        [path, version] => (path.clone(), Some(version.clone())),
        _ => {
            return Err(ManifestError::parse_error(
                line_no,
                "expected `module/path [version]` or a directory after '=>'",
            ))
        }
    };

    Ok(Replacement {
        old_path,
        old_version,
        new_path,
        new_version,
    })
}
