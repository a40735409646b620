//! PNG rendering and embedded-chunk I/O for oracle cards.
//!
//! A card is an 800x600 solid-color PNG in the god's palette, with the
//! consultation JSON embedded as an iTXt chunk under the `GODSEED_DATA`
//! keyword. iTXt is used rather than tEXt so god sigils and any other
//! non-Latin-1 text in the snapshot survive unmangled.
//!
//! Import accepts both chunk flavors: a response card produced by another
//! tool may carry plain tEXt.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::Utc;
use godseed_types::GodName;
use tracing::info;

use crate::card::{ConsultationCard, GodResponse};
use crate::error::CardError;

/// Keyword of the chunk holding the exported consultation JSON.
pub const DATA_KEYWORD: &str = "GODSEED_DATA";

/// Keyword of the chunk holding an oracle's response JSON.
pub const RESPONSE_KEYWORD: &str = "GODSEED_RESPONSE";

const CARD_WIDTH: u32 = 800;
const CARD_HEIGHT: u32 = 600;
// 800 x 600 pixels, 3 bytes each.
const CARD_BYTES: usize = 1_440_000;

/// Background color per god, RGB.
const fn background(god: GodName) -> [u8; 3] {
    match god {
        GodName::Axiom => [25, 25, 40],
        GodName::Fray => [40, 20, 40],
        GodName::Echo => [20, 30, 25],
    }
}

/// Which keyword an imported chunk was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// A `GODSEED_RESPONSE` chunk: an oracle's answer.
    Response,
    /// A `GODSEED_DATA` chunk: an original consultation card.
    Data,
}

/// Write a consultation card as a PNG into `out_dir`.
///
/// The file is named `oracle_<god>_<unix-timestamp>.png` and the
/// directory is created if missing. Returns the path written.
///
/// # Errors
///
/// Returns [`CardError`] if the JSON cannot be serialized or the file
/// cannot be written.
pub fn write_card(card: &ConsultationCard, out_dir: &Path) -> Result<PathBuf, CardError> {
    std::fs::create_dir_all(out_dir).map_err(|source| CardError::Io {
        path: out_dir.to_owned(),
        source,
    })?;

    let json = serde_json::to_string_pretty(card)?;
    let filename = format!(
        "oracle_{}_{}.png",
        card.god.to_string().to_lowercase(),
        Utc::now().timestamp()
    );
    let path = out_dir.join(filename);

    let file = File::create(&path).map_err(|source| CardError::Io {
        path: path.clone(),
        source,
    })?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), CARD_WIDTH, CARD_HEIGHT);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.add_itxt_chunk(DATA_KEYWORD.to_owned(), json)?;

    let mut writer = encoder.write_header()?;
    let mut pixels = vec![0_u8; CARD_BYTES];
    let color = background(card.god);
    for pixel in pixels.chunks_exact_mut(3) {
        pixel.copy_from_slice(&color);
    }
    writer.write_image_data(&pixels)?;
    writer.finish()?;

    info!(path = %path.display(), god = %card.god, "oracle card written");
    Ok(path)
}

/// Extract the oracle JSON embedded in a PNG.
///
/// Prefers a `GODSEED_RESPONSE` chunk over `GODSEED_DATA`, and checks
/// iTXt chunks before plain tEXt for each keyword.
///
/// # Errors
///
/// Returns [`CardError::MissingChunk`] if neither keyword is present, or
/// a decode error if the file is not a readable PNG.
pub fn read_chunk(path: &Path) -> Result<(ChunkKind, String), CardError> {
    let file = File::open(path).map_err(|source| CardError::Io {
        path: path.to_owned(),
        source,
    })?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let reader = decoder.read_info()?;
    let info = reader.info();

    for (keyword, kind) in [
        (RESPONSE_KEYWORD, ChunkKind::Response),
        (DATA_KEYWORD, ChunkKind::Data),
    ] {
        for chunk in &info.utf8_text {
            if chunk.keyword == keyword {
                if let Ok(text) = chunk.get_text() {
                    return Ok((kind, text));
                }
            }
        }
        for chunk in &info.uncompressed_latin1_text {
            if chunk.keyword == keyword {
                return Ok((kind, chunk.text.clone()));
            }
        }
    }

    Err(CardError::MissingChunk {
        path: path.to_owned(),
    })
}

/// Read and parse an oracle response from a PNG.
///
/// # Errors
///
/// Returns [`CardError::MissingChunk`] if the file carries no response
/// chunk (an original consultation card is not a response), or a JSON
/// error if the chunk does not match the response schema.
pub fn read_response(path: &Path) -> Result<GodResponse, CardError> {
    let (kind, json) = read_chunk(path)?;
    if kind != ChunkKind::Response {
        return Err(CardError::MissingChunk {
            path: path.to_owned(),
        });
    }
    Ok(serde_json::from_str(&json)?)
}
