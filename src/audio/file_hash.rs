// src/audio/file_hash.rs
//
// Content hash of a source file, used to recognise the same file twice.
// Unrelated to the acoustic landmark hashes.

use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

const BLOCK_SIZE: usize = 1 << 20;

/// Uppercase hex SHA-1 of the file's bytes, read in 1 MiB blocks
pub fn file_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; BLOCK_SIZE];

    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex::encode_upper(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        let dir = std::env::temp_dir().join(format!("audioprintr-hash-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let empty = dir.join("empty.bin");
        std::fs::write(&empty, b"").unwrap();
        assert_eq!(
            file_hash(&empty).unwrap(),
            "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709"
        );

        let abc = dir.join("abc.bin");
        std::fs::write(&abc, b"abc").unwrap();
        assert_eq!(
            file_hash(&abc).unwrap(),
            "A9993E364706816ABA3E25717850C26C9CD0D89D"
        );
    }

    #[test]
    fn test_large_file_spans_blocks() {
        let dir = std::env::temp_dir().join(format!("audioprintr-hash-big-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("big.bin");
        let data: Vec<u8> = (0..(BLOCK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let expected = hex::encode_upper(Sha1::digest(&data));
        assert_eq!(file_hash(&path).unwrap(), expected);
    }
}
