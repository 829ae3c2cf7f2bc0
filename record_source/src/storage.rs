#[cfg(feature = "mmap")]
use memmap2::MmapMut;

/// Bytes backing an image.
#[derive(Debug)]
pub(crate) enum Storage {
    /// Payload held in memory; a file image is written back on flush.
    InMemory(Vec<u8>),

    /// Whole file mapped read-write; the payload follows the header.
    #[cfg(feature = "mmap")]
    Mapped { map: MmapMut, payload_start: usize },
}

impl Storage {
    pub(crate) fn payload(&self) -> &[u8] {
        match self {
            Storage::InMemory(bytes) => bytes,

            #[cfg(feature = "mmap")]
            Storage::Mapped { map, payload_start } => &map[*payload_start..],
        }
    }

    pub(crate) fn payload_mut(&mut self) -> &mut [u8] {
        match self {
            Storage::InMemory(bytes) => bytes,

            #[cfg(feature = "mmap")]
            Storage::Mapped { map, payload_start } => &mut map[*payload_start..],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.payload().len()
    }
}
