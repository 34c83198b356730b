use std::io::Read;

use anyhow::Result;

pub mod convert;
pub mod far;
pub mod info;

/// `-` means stdin.
pub fn read_binary_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut data = vec![];
        std::io::stdin().read_to_end(&mut data)?;
        Ok(data)
    } else {
        Ok(std::fs::read(path)?)
    }
}
