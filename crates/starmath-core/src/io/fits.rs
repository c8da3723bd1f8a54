//! Minimal FITS codec: primary HDU, 2-D images, BITPIX 8/16/32/-32/-64.
//! Rows are stored in memory order (first row first).

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use ndarray::Array2;

use crate::error::Result;
use crate::frame::Image;

use super::{unreadable, write_failed};

const BLOCK_SIZE: usize = 2880;
const CARD_SIZE: usize = 80;

#[derive(Clone, Debug, Default)]
struct FitsHeader {
    bitpix: i64,
    axes: Vec<usize>,
    bzero: f64,
    bscale: f64,
    /// Offset of the data unit in bytes.
    data_offset: usize,
}

pub fn load_fits(path: &Path) -> Result<Image> {
    let bytes = std::fs::read(path).map_err(|e| unreadable(path, e))?;
    let header = parse_header(&bytes).map_err(|reason| unreadable(path, reason))?;

    let (w, h) = match header.axes.as_slice() {
        [w, h] | [w, h, 1] => (*w, *h),
        axes => return Err(unreadable(path, format!("unsupported axes {axes:?}"))),
    };
    let bytes_per_sample = match header.bitpix {
        8 | 16 | 32 | -32 | -64 => (header.bitpix.unsigned_abs() / 8) as usize,
        other => return Err(unreadable(path, format!("unsupported BITPIX {other}"))),
    };
    let pixels = w
        .checked_mul(h)
        .ok_or_else(|| unreadable(path, "image dimensions overflow"))?;
    let data_end = pixels
        .checked_mul(bytes_per_sample)
        .and_then(|len| len.checked_add(header.data_offset))
        .ok_or_else(|| unreadable(path, "image dimensions overflow"))?;
    let data = bytes
        .get(header.data_offset..data_end)
        .ok_or_else(|| unreadable(path, "truncated data unit"))?;

    let mut cursor = Cursor::new(data);
    let mut samples = Vec::with_capacity(pixels);
    for _ in 0..pixels {
        let raw = match header.bitpix {
            8 => cursor.read_u8().map(f64::from),
            16 => cursor.read_i16::<BigEndian>().map(f64::from),
            32 => cursor.read_i32::<BigEndian>().map(f64::from),
            -32 => cursor.read_f32::<BigEndian>().map(f64::from),
            _ => cursor.read_f64::<BigEndian>(),
        }
        .map_err(|e| unreadable(path, e))?;
        samples.push((header.bzero + header.bscale * raw) as f32);
    }

    let bit_depth = match header.bitpix {
        8 => 8,
        16 => 16,
        _ => 32,
    };
    let data = Array2::from_shape_vec((h, w), samples).map_err(|e| unreadable(path, e))?;
    Ok(Image::new(data, bit_depth))
}

fn parse_header(bytes: &[u8]) -> std::result::Result<FitsHeader, String> {
    let mut header = FitsHeader {
        bscale: 1.0,
        ..Default::default()
    };
    let mut naxis = 0usize;
    let mut offset = 0usize;
    let mut first = true;

    loop {
        let card = bytes
            .get(offset..offset + CARD_SIZE)
            .ok_or("header ended before END card")?;
        offset += CARD_SIZE;
        let card = String::from_utf8_lossy(card);
        let keyword = card.get(..8).unwrap_or("").trim_end();

        if first {
            if keyword != "SIMPLE" {
                return Err("not a FITS file (missing SIMPLE)".into());
            }
            first = false;
            continue;
        }
        if keyword == "END" {
            break;
        }
        let value = card_value(&card);
        match keyword {
            "BITPIX" => header.bitpix = parse_int(keyword, value)?,
            "NAXIS" => naxis = parse_int(keyword, value)? as usize,
            "BZERO" => header.bzero = parse_float(keyword, value)?,
            "BSCALE" => header.bscale = parse_float(keyword, value)?,
            k if k.starts_with("NAXIS") => {
                let n = parse_int(keyword, value)?;
                header.axes.push(n.max(0) as usize);
            }
            _ => {}
        }
    }

    if header.axes.len() != naxis {
        return Err(format!("NAXIS is {naxis} but {} axes given", header.axes.len()));
    }
    header.data_offset = offset.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
    Ok(header)
}

/// Value field of a card, without the trailing comment.
fn card_value(card: &str) -> &str {
    let value = card.get(10..).unwrap_or("");
    value.split('/').next().unwrap_or("").trim()
}

fn parse_int(keyword: &str, value: &str) -> std::result::Result<i64, String> {
    value
        .parse()
        .map_err(|_| format!("{keyword}: expected an integer, got {value:?}"))
}

fn parse_float(keyword: &str, value: &str) -> std::result::Result<f64, String> {
    value
        .replace('D', "E")
        .parse()
        .map_err(|_| format!("{keyword}: expected a number, got {value:?}"))
}

/// Write as FITS: 8-bit as BITPIX 8, 16-bit as BITPIX 16 with BZERO 32768,
/// everything else as BITPIX -32.
pub fn save_fits(image: &Image, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| write_failed(path, e))?;
    let mut writer = BufWriter::new(file);
    write_fits(&mut writer, image).map_err(|e| write_failed(path, e))?;
    writer.flush().map_err(|e| write_failed(path, e))
}

fn write_fits(w: &mut impl Write, image: &Image) -> std::io::Result<()> {
    let bitpix = match image.bit_depth {
        8 => 8,
        16 => 16,
        _ => -32,
    };

    let mut cards = vec![
        card("SIMPLE", "T"),
        card("BITPIX", &bitpix.to_string()),
        card("NAXIS", "2"),
        card("NAXIS1", &image.width().to_string()),
        card("NAXIS2", &image.height().to_string()),
    ];
    if bitpix == 16 {
        cards.push(card("BZERO", "32768"));
        cards.push(card("BSCALE", "1"));
    }
    cards.push(format!("{:<80}", "END"));

    let mut header = cards.concat().into_bytes();
    header.resize(header.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE, b' ');
    w.write_all(&header)?;

    let mut data: Vec<u8> = Vec::new();
    match bitpix {
        8 => data.extend(image.to_samples::<u8>()),
        16 => {
            for v in image.to_samples::<u16>() {
                data.write_i16::<BigEndian>((v as i32 - 32768) as i16)?;
            }
        }
        _ => {
            for &v in image.data.iter() {
                data.write_f32::<BigEndian>(v)?;
            }
        }
    }
    data.resize(data.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE, 0);
    w.write_all(&data)
}

/// Fixed-format header card: keyword, `= `, value right-aligned to column 30.
fn card(keyword: &str, value: &str) -> String {
    format!("{:<8}= {:>20}{:50}", keyword, value, "")
}
