//! Output encoders: PNG and PAM through the `image` codecs, plus a plain
//! ASCII PPM writer.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::codecs::png::PngEncoder;
use image::codecs::pnm::{PnmEncoder, PnmSubtype};
use image::{ExtendedColorType, ImageEncoder};

use super::PixelBuffer;
use crate::error::{Error, Result};

/// Encoding of the diff image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Pam,
    Ppm,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Pam => "pam",
            OutputFormat::Ppm => "ppm",
        }
    }

    /// Format selected by the extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.to_ascii_lowercase().parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "png" => Ok(OutputFormat::Png),
            "pam" => Ok(OutputFormat::Pam),
            "ppm" => Ok(OutputFormat::Ppm),
            other => Err(Error::UnknownOutputFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the encoded image goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Stdout => f.write_str("<stdout>"),
        }
    }
}

/// A resolved output argument: format plus destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub format: OutputFormat,
    pub destination: Destination,
}

impl OutputTarget {
    /// Resolve an output argument.
    ///
    /// `-png`, `-pam` and `-ppm` stream to standard output; anything else is
    /// a file path whose extension picks the format.
    pub fn parse(arg: &str) -> Result<Self> {
        if let Some(tag) = arg.strip_prefix('-') {
            if let Ok(format) = tag.parse::<OutputFormat>() {
                return Ok(Self { format, destination: Destination::Stdout });
            }
        }
        let path = PathBuf::from(arg);
        let format = OutputFormat::from_path(&path)
            .ok_or_else(|| Error::UnknownOutputFormat(arg.to_string()))?;
        Ok(Self { format, destination: Destination::File(path) })
    }

    /// Encode `buf` and write it to the destination, flushing before return.
    pub fn write(&self, buf: &PixelBuffer) -> Result<()> {
        let fail = |e: io::Error| Error::EncodeError {
            format: self.format.to_string(),
            destination: self.destination.to_string(),
            reason: e.to_string(),
        };
        match &self.destination {
            Destination::Stdout => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                encode(buf, self.format, &mut out).and_then(|_| out.flush()).map_err(fail)
            }
            Destination::File(path) => {
                let file = File::create(path).map_err(fail)?;
                let mut out = BufWriter::new(file);
                encode(buf, self.format, &mut out).and_then(|_| out.flush()).map_err(fail)
            }
        }?;
        log::debug!(
            "wrote {}x{} {} image to {}",
            buf.width(),
            buf.height(),
            self.format,
            self.destination
        );
        Ok(())
    }
}

/// Encode `buf` in `format` into any writer.
///
/// PNG and PAM cannot describe a zero-area image and fail with
/// `InvalidInput`; the ASCII PPM writer emits the header and empty rows.
pub fn encode<W: Write>(buf: &PixelBuffer, format: OutputFormat, out: &mut W) -> io::Result<()> {
    if buf.is_empty() && format != OutputFormat::Ppm {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot encode a {}x{} image as {}", buf.width(), buf.height(), format),
        ));
    }
    match format {
        OutputFormat::Png => {
            let color = color_type(buf.channels())?;
            PngEncoder::new(out)
                .write_image(&buf.packed_samples(), buf.width(), buf.height(), color)
                .map_err(io::Error::other)
        }
        OutputFormat::Pam => {
            let color = color_type(buf.channels())?;
            PnmEncoder::new(out)
                .with_subtype(PnmSubtype::ArbitraryMap)
                .write_image(&buf.packed_samples(), buf.width(), buf.height(), color)
                .map_err(io::Error::other)
        }
        OutputFormat::Ppm => write_ascii_ppm(buf, out),
    }
}

/// Plain PPM (`P3`): one text line per pixel row, alpha dropped.
pub fn write_ascii_ppm<W: Write>(buf: &PixelBuffer, out: &mut W) -> io::Result<()> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", buf.width(), buf.height())?;
    writeln!(out, "255")?;
    let n = buf.channels() as usize;
    let mut line = String::new();
    for y in 0..buf.height() {
        line.clear();
        for (x, px) in buf.row(y).chunks_exact(n).enumerate() {
            let (r, g, b) = if n >= 3 { (px[0], px[1], px[2]) } else { (px[0], px[0], px[0]) };
            if x > 0 {
                line.push(' ');
            }
            line.push_str(&format!("{} {} {}", r, g, b));
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn color_type(channels: u8) -> io::Result<ExtendedColorType> {
    match channels {
        1 => Ok(ExtendedColorType::L8),
        2 => Ok(ExtendedColorType::La8),
        3 => Ok(ExtendedColorType::Rgb8),
        4 => Ok(ExtendedColorType::Rgba8),
        n => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot encode {} channel samples", n),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_diff() -> PixelBuffer {
        PixelBuffer::packed(2, 1, 4, vec![0, 0, 0, 0, 0xFF, 0, 0, 0x99]).unwrap()
    }

    #[test]
    fn sentinel_selects_stdout() {
        let t = OutputTarget::parse("-pam").unwrap();
        assert_eq!(t.format, OutputFormat::Pam);
        assert_eq!(t.destination, Destination::Stdout);
        assert_eq!(OutputTarget::parse("-png").unwrap().format, OutputFormat::Png);
        assert_eq!(OutputTarget::parse("-ppm").unwrap().format, OutputFormat::Ppm);
    }

    #[test]
    fn extension_selects_format() {
        let t = OutputTarget::parse("out/diff.PNG").unwrap();
        assert_eq!(t.format, OutputFormat::Png);
        assert_eq!(t.destination, Destination::File(PathBuf::from("out/diff.PNG")));
        assert_eq!(OutputTarget::parse("a.b.ppm").unwrap().format, OutputFormat::Ppm);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        for arg in ["diff.jpg", "diff", ".png", "-gif"] {
            assert!(
                matches!(OutputTarget::parse(arg), Err(Error::UnknownOutputFormat(_))),
                "{} should be rejected",
                arg
            );
        }
    }

    #[test]
    fn ascii_ppm_layout() {
        let mut out = Vec::new();
        write_ascii_ppm(&sample_diff(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "P3\n2 1\n255\n0 0 0 255 0 0\n");
    }

    #[test]
    fn ascii_ppm_one_line_per_row() {
        let buf = PixelBuffer::packed(1, 2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let mut out = Vec::new();
        write_ascii_ppm(&buf, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "P3\n1 2\n255\n1 2 3\n4 5 6\n");
    }

    #[test]
    fn pam_header_describes_rgba() {
        let mut out = Vec::new();
        encode(&sample_diff(), OutputFormat::Pam, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("P7\n"));
        assert!(text.contains("WIDTH 2"));
        assert!(text.contains("DEPTH 4"));
        assert!(text.contains("TUPLTYPE RGB_ALPHA"));
        assert!(out.ends_with(&[0, 0, 0, 0, 0xFF, 0, 0, 0x99]));
    }

    #[test]
    fn png_has_signature() {
        let mut out = Vec::new();
        encode(&sample_diff(), OutputFormat::Png, &mut out).unwrap();
        assert_eq!(&out[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn unwritable_destination_names_operation_and_path() {
        let target = OutputTarget {
            format: OutputFormat::Png,
            destination: Destination::File(PathBuf::from("/nonexistent-dir/sub/diff.png")),
        };
        let err = target.write(&sample_diff()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("png"), "{}", msg);
        assert!(msg.contains("/nonexistent-dir/sub/diff.png"), "{}", msg);
    }
}
