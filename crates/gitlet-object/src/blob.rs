use std::io::Read;

/// Opaque file content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Read all of `reader` into a blob.
    pub fn from_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self { data })
    }

    pub fn parse(content: &[u8]) -> Self {
        Self {
            data: content.to_vec(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.data
    }
}
