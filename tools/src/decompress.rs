use aur_build_common::errors::*;
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::io::Read;
use xz2::read::XzDecoder;

#[derive(Debug, PartialEq, Eq)]
pub enum CompressedWith {
    // .gz
    Gzip,
    // .bz2
    Bzip2,
    // .xz
    Xz,
    // .zst
    Zstd,
    Unknown,
}

pub fn detect_compression(bytes: &[u8]) -> CompressedWith {
    let mime = tree_magic_mini::from_u8(bytes);
    debug!("Detected mimetype for possibly compressed data: {:?}", mime);

    match mime {
        "application/gzip" => CompressedWith::Gzip,
        "application/x-bzip" => CompressedWith::Bzip2,
        "application/x-bzip2" => CompressedWith::Bzip2,
        "application/x-xz" => CompressedWith::Xz,
        "application/zstd" => CompressedWith::Zstd,
        _ => CompressedWith::Unknown,
    }
}

pub fn stream<'a>(comp: CompressedWith, bytes: &'a [u8]) -> Result<Box<dyn Read + 'a>> {
    match comp {
        CompressedWith::Gzip => Ok(Box::new(GzDecoder::new(bytes))),
        CompressedWith::Bzip2 => Ok(Box::new(BzDecoder::new(bytes))),
        CompressedWith::Xz => Ok(Box::new(XzDecoder::new(bytes))),
        CompressedWith::Zstd => Ok(Box::new(zstd::Decoder::new(bytes)?)),
        CompressedWith::Unknown => Ok(Box::new(bytes)),
    }
}

/// Sniff the compression of `bytes` and inflate them into a string.
pub fn to_string(bytes: &[u8]) -> Result<String> {
    let comp = detect_compression(bytes);
    let mut buf = String::new();
    stream(comp, bytes)?
        .read_to_string(&mut buf)
        .context("Failed to decompress package list")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_encoding::BASE64;

    const PLAIN: &str = "# AUR package list\nyay\nparu\n";

    #[test]
    fn detect_no_compression() {
        let comp = detect_compression(b"yay\nparu\n");
        assert_eq!(comp, CompressedWith::Unknown);
    }

    #[test]
    fn decompress_no_compression() {
        let buf = to_string(PLAIN.as_bytes()).unwrap();
        assert_eq!(buf, PLAIN);
    }

    #[test]
    fn decompress_gzip_compression() {
        let bytes = BASE64
            .decode(b"H4sIAAAAAAACA1NWcAwNUihITM5OTE9VyMksLuGqTKzkKkgsKuUCAMIXo/AcAAAA")
            .unwrap();
        assert_eq!(detect_compression(&bytes), CompressedWith::Gzip);
        assert_eq!(to_string(&bytes).unwrap(), PLAIN);
    }

    #[test]
    fn decompress_bzip2_compression() {
        let bytes = BASE64
            .decode(b"QlpoOTFBWSZTWQsX5VAAAANXgAAQSAAgABIAKqxeICAAMUyYmQZGFNGgyDanqeJtrN8MwhH31BDSdQTVfi7kinChIBYvyqA=")
            .unwrap();
        assert_eq!(detect_compression(&bytes), CompressedWith::Bzip2);
        assert_eq!(to_string(&bytes).unwrap(), PLAIN);
    }

    #[test]
    fn decompress_xz_compression() {
        let bytes = BASE64.decode(b"/Td6WFoAAATm1rRGAgAhARYAAAB0L+WjAQAbIyBBVVIgcGFja2FnZSBsaXN0CnlheQpwYXJ1CgBb96rb9CdO8AABNByTGq2PH7bzfQEAAAAABFla").unwrap();
        assert_eq!(detect_compression(&bytes), CompressedWith::Xz);
        assert_eq!(to_string(&bytes).unwrap(), PLAIN);
    }

    #[test]
    fn decompress_zstd_compression() {
        let bytes = BASE64
            .decode(b"KLUv/QRY4QAAIyBBVVIgcGFja2FnZSBsaXN0CnlheQpwYXJ1CtLXDr0=")
            .unwrap();
        assert_eq!(detect_compression(&bytes), CompressedWith::Zstd);
        assert_eq!(to_string(&bytes).unwrap(), PLAIN);
    }
}
