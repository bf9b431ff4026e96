//! PFSCENE text format parsing (SPEC_FULL.md §6).
//!
//! Grounded on `original_source/src/scene.c`'s section dispatch
//! (`scene_load_section`'s `section "<name>"` header, `version M.m`/
//! `num_sections N` document preamble, and the five recognized sections:
//! `general`, `factions`, `entities`, `regions`, `cameras`). Per-attribute
//! value typing follows SPEC_FULL.md §6's `<key> <type> <value>` grammar
//! directly, since the source's own `attr.c` parser is not part of the
//! retrieved sources.

use crate::errors::{CoreError, CoreResult};
use crate::math::{Quat, Vec2, Vec3};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Str(String),
    Float(f32),
    Int(i64),
    Vec2(Vec2),
    Vec3(Vec3),
    Quat(Quat),
    Bool(bool),
}

pub type Attrs = HashMap<String, AttrValue>;

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub name: String,
    /// Raw `key -> value` attribute lines belonging directly to this
    /// section (SPEC_FULL.md §6); section-specific sub-structure (entity
    /// blocks, faction rows) is a layer a collaborator builds on top of this.
    pub attrs: Attrs,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub version: (u32, u32),
    pub sections: Vec<Section>,
}

const RECOGNIZED_SECTIONS: &[&str] = &["general", "factions", "entities", "regions", "cameras"];

struct LineCursor<'a> {
    lines: std::str::Lines<'a>,
    current: usize,
    peeked: Option<Option<&'a str>>,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { lines: text.lines(), current: 0, peeked: None }
    }

    fn raw_next(&mut self) -> Option<&'a str> {
        if let Some(p) = self.peeked.take() {
            return p;
        }
        self.lines.next()
    }

    fn raw_peek(&mut self) -> Option<&'a str> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lines.next());
        }
        self.peeked.unwrap()
    }

    fn next_nonblank(&mut self) -> CoreResult<(usize, &'a str)> {
        loop {
            self.current += 1;
            match self.raw_next() {
                Some(l) if l.trim().is_empty() => continue,
                Some(l) => return Ok((self.current, l)),
                None => {
                    return Err(CoreError::ParseFailed { line: self.current, reason: "unexpected end of input".into() })
                }
            }
        }
    }

    fn peek_nonblank_is_new_section_or_eof(&mut self) -> bool {
        loop {
            match self.raw_peek() {
                Some(l) if l.trim().is_empty() => {
                    self.peeked = None;
                    self.current += 1;
                }
                Some(l) => return l.trim_start().starts_with("section "),
                None => return true,
            }
        }
    }
}

fn parse_version(line: &str, line_no: usize) -> CoreResult<(u32, u32)> {
    let rest = line
        .trim()
        .strip_prefix("version ")
        .ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "expected 'version M.m'".into() })?;
    let (major, minor) = rest
        .split_once('.')
        .ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "version is not 'M.m'".into() })?;
    let major: u32 = major.parse().map_err(|_| CoreError::ParseFailed { line: line_no, reason: "bad major version".into() })?;
    let minor: u32 = minor.parse().map_err(|_| CoreError::ParseFailed { line: line_no, reason: "bad minor version".into() })?;
    Ok((major, minor))
}

fn parse_section_header(line: &str, line_no: usize) -> CoreResult<String> {
    let rest = line
        .trim()
        .strip_prefix("section ")
        .ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "expected 'section \"<name>\"'".into() })?;
    let rest = rest.trim();
    let name = rest
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "section name must be quoted".into() })?;
    Ok(name.to_string())
}

fn parse_attr_value(ty: &str, value: &str, line_no: usize) -> CoreResult<AttrValue> {
    let bad = |reason: &str| CoreError::ParseFailed { line: line_no, reason: reason.to_string() };
    Ok(match ty {
        "string" => AttrValue::Str(value.trim_matches('"').to_string()),
        "float" => AttrValue::Float(value.parse().map_err(|_| bad("bad float value"))?),
        "int" => AttrValue::Int(value.parse().map_err(|_| bad("bad int value"))?),
        "bool" => AttrValue::Bool(match value {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return Err(bad("bad bool value")),
        }),
        "vec2" => {
            let parts: Vec<&str> = value.split(',').map(str::trim).collect();
            if parts.len() != 2 {
                return Err(bad("vec2 needs 2 components"));
            }
            AttrValue::Vec2(Vec2::new(
                parts[0].parse().map_err(|_| bad("bad vec2.x"))?,
                parts[1].parse().map_err(|_| bad("bad vec2.y"))?,
            ))
        }
        "vec3" => {
            let parts: Vec<&str> = value.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(bad("vec3 needs 3 components"));
            }
            AttrValue::Vec3(Vec3::new(
                parts[0].parse().map_err(|_| bad("bad vec3.x"))?,
                parts[1].parse().map_err(|_| bad("bad vec3.y"))?,
                parts[2].parse().map_err(|_| bad("bad vec3.z"))?,
            ))
        }
        "quat" => {
            let parts: Vec<&str> = value.split(',').map(str::trim).collect();
            if parts.len() != 4 {
                return Err(bad("quat needs 4 components"));
            }
            AttrValue::Quat(Quat::from_xyzw(
                parts[0].parse().map_err(|_| bad("bad quat.x"))?,
                parts[1].parse().map_err(|_| bad("bad quat.y"))?,
                parts[2].parse().map_err(|_| bad("bad quat.z"))?,
                parts[3].parse().map_err(|_| bad("bad quat.w"))?,
            ))
        }
        other => return Err(bad(&format!("unknown attribute type '{other}'"))),
    })
}

fn parse_attr_line(line: &str, line_no: usize) -> CoreResult<(String, AttrValue)> {
    let mut parts = line.trim().splitn(3, char::is_whitespace);
    let key = parts.next().ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "empty attribute line".into() })?;
    let ty = parts
        .next()
        .ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "attribute line is missing a type".into() })?;
    let value = parts
        .next()
        .ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "attribute line is missing a value".into() })?
        .trim();
    Ok((key.to_string(), parse_attr_value(ty, value, line_no)?))
}

/// Parse a complete PFSCENE document (`Scene_Load`-equivalent entry point).
pub fn parse_pfscene(text: &str) -> CoreResult<Scene> {
    let mut cursor = LineCursor::new(text);

    let (line_no, version_line) = cursor.next_nonblank()?;
    let version = parse_version(version_line, line_no)?;

    let (line_no, num_sections_line) = cursor.next_nonblank()?;
    let rest = num_sections_line
        .trim()
        .strip_prefix("num_sections ")
        .ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "expected 'num_sections N'".into() })?;
    let num_sections: u32 =
        rest.parse().map_err(|_| CoreError::ParseFailed { line: line_no, reason: "num_sections is not an integer".into() })?;

    let mut sections = Vec::with_capacity(num_sections as usize);
    for _ in 0..num_sections {
        let (line_no, header_line) = cursor.next_nonblank()?;
        let name = parse_section_header(header_line, line_no)?;
        if !RECOGNIZED_SECTIONS.contains(&name.as_str()) {
            return Err(CoreError::ParseFailed { line: line_no, reason: format!("unrecognized section '{name}'") });
        }

        let mut attrs = Attrs::new();
        while !cursor.peek_nonblank_is_new_section_or_eof() {
            let (line_no, attr_line) = cursor.next_nonblank()?;
            let (key, value) = parse_attr_line(attr_line, line_no)?;
            attrs.insert(key, value);
        }
        sections.push(Section { name, attrs });
    }

    Ok(Scene { version, sections })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_general_section() {
        let doc = "version 1.1\nnum_sections 1\nsection \"general\"\nnum_entities int 0\n";
        let scene = parse_pfscene(doc).unwrap();
        assert_eq!(scene.version, (1, 1));
        assert_eq!(scene.sections.len(), 1);
        assert_eq!(scene.sections[0].name, "general");
        assert_eq!(scene.sections[0].attrs.get("num_entities"), Some(&AttrValue::Int(0)));
    }

    #[test]
    fn parses_vec3_and_bool_attrs() {
        let doc = "version 1.0\nnum_sections 1\nsection \"cameras\"\npos vec3 1.0, 2.0, 3.0\nactive bool true\n";
        let scene = parse_pfscene(doc).unwrap();
        assert_eq!(scene.sections[0].attrs.get("pos"), Some(&AttrValue::Vec3(Vec3::new(1.0, 2.0, 3.0))));
        assert_eq!(scene.sections[0].attrs.get("active"), Some(&AttrValue::Bool(true)));
    }

    #[test]
    fn rejects_unrecognized_section_name() {
        let doc = "version 1.0\nnum_sections 1\nsection \"bogus\"\n";
        assert!(parse_pfscene(doc).is_err());
    }

    #[test]
    fn multiple_sections_each_get_their_own_attrs() {
        let doc = "version 1.0\nnum_sections 2\nsection \"general\"\na int 1\nsection \"regions\"\nb int 2\n";
        let scene = parse_pfscene(doc).unwrap();
        assert_eq!(scene.sections.len(), 2);
        assert_eq!(scene.sections[0].attrs.get("a"), Some(&AttrValue::Int(1)));
        assert_eq!(scene.sections[1].attrs.get("b"), Some(&AttrValue::Int(2)));
    }
}
