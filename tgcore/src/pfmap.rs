//! PFMAP text format parsing (SPEC_FULL.md §6).
//!
//! Grounded on `original_source/src/map/map_asset_load.c`'s
//! `m_al_parse_tile`/`m_al_read_row`/`m_al_read_pfchunk`/`M_AL_InitMapFromStream`
//! and `M_AL_WritePFMap`, and the hex `tiletype` ordering in `map/public/tile.h`.

use crate::errors::{CoreError, CoreResult};
use crate::map::{Map, MapResolution};
use crate::tile::{BlendMode, Tile, TileType};
use glam::Vec3;

const TILE_TOKEN_LEN: usize = 24;

fn tile_type_from_code(code: u8, line: usize) -> CoreResult<TileType> {
    Ok(match code {
        0x0 => TileType::Flat,
        0x1 => TileType::RampSN,
        0x2 => TileType::RampNS,
        0x3 => TileType::RampEW,
        0x4 => TileType::RampWE,
        0x5 => TileType::CornerConcaveSW,
        0x6 => TileType::CornerConvexSW,
        0x7 => TileType::CornerConcaveSE,
        0x8 => TileType::CornerConvexSE,
        0x9 => TileType::CornerConcaveNW,
        0xa => TileType::CornerConvexNW,
        0xb => TileType::CornerConcaveNE,
        0xc => TileType::CornerConvexNE,
        other => {
            return Err(CoreError::ParseFailed { line, reason: format!("unknown tile type code {other:#x}") })
        }
    })
}

fn tile_type_to_code(t: TileType) -> u8 {
    match t {
        TileType::Flat => 0x0,
        TileType::RampSN => 0x1,
        TileType::RampNS => 0x2,
        TileType::RampEW => 0x3,
        TileType::RampWE => 0x4,
        TileType::CornerConcaveSW => 0x5,
        TileType::CornerConvexSW => 0x6,
        TileType::CornerConcaveSE => 0x7,
        TileType::CornerConvexSE => 0x8,
        TileType::CornerConcaveNW => 0x9,
        TileType::CornerConvexNW => 0xa,
        TileType::CornerConcaveNE => 0xb,
        TileType::CornerConvexNE => 0xc,
    }
}

fn digit(s: &[u8], i: usize, line: usize) -> CoreResult<u32> {
    let c = s[i] as char;
    c.to_digit(10).ok_or_else(|| CoreError::ParseFailed { line, reason: format!("expected decimal digit at column {i}") })
}

/// Parse one 24-character fixed-width tile token (SPEC_FULL.md §6's column
/// table). `line` is only used for error reporting.
fn parse_tile_token(token: &str, line: usize) -> CoreResult<Tile> {
    if token.len() != TILE_TOKEN_LEN {
        return Err(CoreError::ParseFailed {
            line,
            reason: format!("tile token is {} characters, expected {TILE_TOKEN_LEN}", token.len()),
        });
    }
    let b = token.as_bytes();

    let type_hex = (b[0] as char)
        .to_digit(16)
        .ok_or_else(|| CoreError::ParseFailed { line, reason: "bad hex digit for tile type".into() })? as u8;
    let tile_type = tile_type_from_code(type_hex, line)?;

    let sign = match b[1] as char {
        '+' => 1i32,
        '-' => -1i32,
        other => {
            return Err(CoreError::ParseFailed { line, reason: format!("expected '+'/'-' at column 1, got '{other}'") })
        }
    };
    let base_height = sign * (10 * digit(b, 2, line)? as i32 + digit(b, 3, line)? as i32);
    let ramp_height = (10 * digit(b, 4, line)? + digit(b, 5, line)?) as i32;
    let top_mat_idx = (100 * digit(b, 6, line)? + 10 * digit(b, 7, line)? + digit(b, 8, line)?) as u16;
    let sides_mat_idx = (100 * digit(b, 9, line)? + 10 * digit(b, 10, line)? + digit(b, 11, line)?) as u16;
    let pathable = digit(b, 12, line)? != 0;
    let blend_mode = match digit(b, 13, line)? {
        0 => BlendMode::None,
        1 => BlendMode::Blur,
        other => return Err(CoreError::ParseFailed { line, reason: format!("unknown blend mode {other}") }),
    };
    let blend_normals = digit(b, 14, line)? != 0;

    Ok(Tile { tile_type, base_height, ramp_height, top_mat_idx, sides_mat_idx, pathable, blend_mode, blend_normals })
}

fn write_tile_token(tile: &Tile) -> String {
    format!(
        "{:01X}{}{:02}{:02}{:03}{:03}{:01}{:01}{:01}000000000",
        tile_type_to_code(tile.tile_type),
        if tile.base_height >= 0 { '+' } else { '-' },
        tile.base_height.unsigned_abs(),
        tile.ramp_height,
        tile.top_mat_idx,
        tile.sides_mat_idx,
        tile.pathable as u8,
        matches!(tile.blend_mode, BlendMode::Blur) as u8,
        tile.blend_normals as u8,
    )
}

struct LineCursor<'a> {
    lines: std::str::Lines<'a>,
    current: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { lines: text.lines(), current: 0 }
    }

    fn next_nonblank(&mut self) -> CoreResult<(usize, &'a str)> {
        loop {
            self.current += 1;
            match self.lines.next() {
                Some(l) if l.trim().is_empty() => continue,
                Some(l) => return Ok((self.current, l)),
                None => {
                    return Err(CoreError::ParseFailed { line: self.current, reason: "unexpected end of input".into() })
                }
            }
        }
    }
}

fn expect_key_value<'a>(line: &'a str, key: &str, line_no: usize) -> CoreResult<&'a str> {
    let mut parts = line.split_whitespace();
    let found_key = parts
        .next()
        .ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "empty header line".into() })?;
    if found_key != key {
        return Err(CoreError::ParseFailed { line: line_no, reason: format!("expected '{key}', found '{found_key}'") });
    }
    parts.next().ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: format!("'{key}' line is missing a value") })
}

/// Parse a complete PFMAP document into a `Map` plus its material texture
/// names, at the given world-space origin (`M_AL_InitMapFromStream`).
pub fn parse_pfmap(text: &str, origin: Vec3, max_materials: u32) -> CoreResult<(Map, Vec<String>)> {
    let mut cursor = LineCursor::new(text);

    let (line_no, version_line) = cursor.next_nonblank()?;
    expect_key_value(version_line, "version", line_no)?;

    let (line_no, num_materials_line) = cursor.next_nonblank()?;
    let num_materials: u32 = expect_key_value(num_materials_line, "num_materials", line_no)?
        .parse()
        .map_err(|_| CoreError::ParseFailed { line: line_no, reason: "num_materials is not an integer".into() })?;
    if num_materials > max_materials {
        return Err(CoreError::TooManyMaterials { requested: num_materials, max: max_materials });
    }

    let (line_no, num_rows_line) = cursor.next_nonblank()?;
    let num_rows: u32 = expect_key_value(num_rows_line, "num_rows", line_no)?
        .parse()
        .map_err(|_| CoreError::ParseFailed { line: line_no, reason: "num_rows is not an integer".into() })?;

    let (line_no, num_cols_line) = cursor.next_nonblank()?;
    let num_cols: u32 = expect_key_value(num_cols_line, "num_cols", line_no)?
        .parse()
        .map_err(|_| CoreError::ParseFailed { line: line_no, reason: "num_cols is not an integer".into() })?;

    let mut materials = Vec::with_capacity(num_materials as usize);
    for _ in 0..num_materials {
        let (line_no, mat_line) = cursor.next_nonblank()?;
        let mut parts = mat_line.split_whitespace();
        let key = parts.next().ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "empty material line".into() })?;
        if key != "material" {
            return Err(CoreError::ParseFailed { line: line_no, reason: format!("expected 'material', found '{key}'") });
        }
        let _name = parts.next(); // the `__anonymous__` placeholder
        let texname = parts
            .next()
            .ok_or_else(|| CoreError::ParseFailed { line: line_no, reason: "material line is missing a filename".into() })?;
        materials.push(texname.to_string());
    }

    let resolution = MapResolution {
        chunk_w: num_cols,
        chunk_h: num_rows,
        tile_w: crate::constants::TILES_PER_CHUNK_WIDTH as u32,
        tile_h: crate::constants::TILES_PER_CHUNK_HEIGHT as u32,
    };
    let mut map = Map::new(resolution, origin);
    map.materials = materials.iter().map(|t| crate::map::Material { texture_name: t.clone() }).collect();

    // Tile tokens are whitespace-separated and wrap to a new physical line
    // every 4 tiles (SPEC_FULL.md §6); a tile row is not confined to one
    // line, so the remaining input is read as a flat token stream rather
    // than line-by-line.
    let body_line_no = cursor.current;
    let mut tokens = cursor.lines.flat_map(str::split_whitespace);

    for chunk_r in 0..num_rows {
        for chunk_c in 0..num_cols {
            for tile_r in 0..resolution.tile_h {
                let chunk = map.chunk_mut(chunk_r, chunk_c).ok_or(CoreError::OutOfMap)?;
                for tile_c in 0..resolution.tile_w {
                    let token = tokens.next().ok_or(CoreError::ParseFailed {
                        line: body_line_no,
                        reason: "unexpected end of input while reading tile data".into(),
                    })?;
                    let tile = parse_tile_token(token, body_line_no)?;
                    if tile.top_mat_idx as u32 >= num_materials || tile.sides_mat_idx as u32 >= num_materials {
                        return Err(CoreError::MaterialIndexOutOfRange {
                            index: tile.top_mat_idx.max(tile.sides_mat_idx) as u32,
                            num_materials,
                        });
                    }
                    *chunk.tile_mut(resolution.tile_w, tile_r, tile_c) = tile;
                }
            }
        }
    }

    Ok((map, materials))
}

/// Serialize a `Map` back to PFMAP text (`M_AL_WritePFMap`).
pub fn write_pfmap(map: &Map) -> String {
    let mut out = String::new();
    out.push_str("version 1.0\n");
    out.push_str(&format!("num_materials {}\n", map.materials.len()));
    out.push_str(&format!("num_rows {}\n", map.resolution.chunk_h));
    out.push_str(&format!("num_cols {}\n", map.resolution.chunk_w));
    for mat in &map.materials {
        out.push_str(&format!("material __anonymous__ {}\n", mat.texture_name));
    }

    for chunk_r in 0..map.resolution.chunk_h {
        for chunk_c in 0..map.resolution.chunk_w {
            let Some(chunk) = map.chunk(chunk_r, chunk_c) else { continue };
            for tile_r in 0..map.resolution.tile_h {
                for tile_c in 0..map.resolution.tile_w {
                    let tile = chunk.tile(map.resolution.tile_w, tile_r, tile_c);
                    out.push_str(&write_tile_token(tile));
                    out.push(if (tile_c + 1) % 4 == 0 { '\n' } else { ' ' });
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tile_row() -> String {
        // Four flat, pathable, unblended tiles at base_height 0, mat idx 0.
        std::iter::repeat_n("0+0000000000000000000000", 4).collect::<Vec<_>>().join(" ")
    }

    fn sample_pfmap() -> String {
        let mut doc = String::new();
        doc.push_str("version 1.0\n");
        doc.push_str("num_materials 1\n");
        doc.push_str("num_rows 1\n");
        doc.push_str("num_cols 1\n");
        doc.push_str("material __anonymous__ grass.dds\n");
        for _ in 0..crate::constants::TILES_PER_CHUNK_HEIGHT {
            for _ in 0..(crate::constants::TILES_PER_CHUNK_WIDTH / 4) {
                doc.push_str(&sample_tile_row());
                doc.push('\n');
            }
        }
        doc
    }

    #[test]
    fn parses_single_flat_chunk_map() {
        let doc = sample_pfmap();
        let (map, materials) = parse_pfmap(&doc, Vec3::ZERO, 64).unwrap();
        assert_eq!(materials, vec!["grass.dds".to_string()]);
        assert_eq!(map.resolution.chunk_w, 1);
        assert_eq!(map.resolution.chunk_h, 1);
        let tile = map.chunk(0, 0).unwrap().tile(map.resolution.tile_w, 0, 0);
        assert_eq!(tile.tile_type, TileType::Flat);
        assert_eq!(tile.base_height, 0);
    }

    #[test]
    fn rejects_material_count_over_the_build_limit() {
        let mut doc = String::new();
        doc.push_str("version 1.0\n");
        doc.push_str("num_materials 10\n");
        doc.push_str("num_rows 0\n");
        doc.push_str("num_cols 0\n");
        assert_eq!(parse_pfmap(&doc, Vec3::ZERO, 4), Err(CoreError::TooManyMaterials { requested: 10, max: 4 }));
    }

    #[test]
    fn rejects_malformed_tile_token_length() {
        let line_no = 42;
        assert!(parse_tile_token("00000", line_no).is_err());
    }

    #[test]
    fn round_trips_tile_token_through_write_and_parse() {
        let tile = Tile { tile_type: TileType::RampSN, base_height: -7, ramp_height: 3, top_mat_idx: 12, sides_mat_idx: 34, pathable: false, blend_mode: BlendMode::Blur, blend_normals: true };
        let token = write_tile_token(&tile);
        let parsed = parse_tile_token(&token, 0).unwrap();
        assert_eq!(parsed, tile);
    }
}
