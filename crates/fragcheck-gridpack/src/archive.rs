//! Tarball unpacking.
//!
//! Gridpacks are published as `.tar.xz`, older ones as `.tgz` or plain `.tar`.
//! The compression is detected from the leading bytes, not the file name.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const XZ_MAGIC: &[u8] = &[0xfd, b'7', b'z', b'X', b'Z', 0x00];
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Compression wrapped around a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar,
    Gzip,
    Bzip2,
    Xz,
}

impl ArchiveFormat {
    /// Detect the format from the first bytes of the file.
    pub fn detect(header: &[u8]) -> Self {
        if header.starts_with(XZ_MAGIC) {
            Self::Xz
        } else if header.starts_with(GZIP_MAGIC) {
            Self::Gzip
        } else if header.starts_with(BZIP2_MAGIC) {
            Self::Bzip2
        } else {
            Self::Tar
        }
    }
}

/// Unpack `archive` into `dest`, overwriting files that already exist.
///
/// Blocking; call it from `spawn_blocking` inside async code.
pub fn unpack(archive: &Path, dest: &Path) -> io::Result<ArchiveFormat> {
    let mut file = File::open(archive)?;
    let mut header = [0u8; 6];
    let read = file.read(&mut header)?;
    file.seek(SeekFrom::Start(0))?;

    let format = ArchiveFormat::detect(&header[..read]);
    let reader: Box<dyn Read> = match format {
        ArchiveFormat::Tar => Box::new(file),
        ArchiveFormat::Gzip => Box::new(GzDecoder::new(file)),
        ArchiveFormat::Bzip2 => Box::new(BzDecoder::new(file)),
        ArchiveFormat::Xz => Box::new(XzDecoder::new(file)),
    };

    std::fs::create_dir_all(dest)?;
    let mut tarball = tar::Archive::new(reader);
    tarball.set_overwrite(true);
    tarball.unpack(dest)?;
    Ok(format)
}
