//! Writing finished frames to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use orrery_renderer::Frame;

/// Save a frame, picking the format from the file extension.
///
/// `.ppm` is written as plain-text P3; anything else goes through `image`.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<()> {
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_ppm(frame, &mut writer)?;
        writer.flush()?;
    } else {
        let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.as_bytes().to_vec())
            .context("frame buffer does not match its dimensions")?;
        image
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    log::info!("Saved {}x{} image to {}", frame.width, frame.height, path.display());
    Ok(())
}

/// Plain-text PPM, alpha dropped.
pub fn write_ppm(frame: &Frame, writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", frame.width, frame.height)?;
    writeln!(writer, "255")?;

    for px in frame.as_bytes().chunks_exact(4) {
        writeln!(writer, "{} {} {}", px[0], px[1], px[2])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_ppm() {
        let frame = Frame::new(2, 1);
        let mut out = Vec::new();
        write_ppm(&frame, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "P3\n2 1\n255\n0 0 0\n0 0 0\n");
    }
}
