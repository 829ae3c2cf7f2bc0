//! Byte-image backend: every record of a map laid out back to back, in
//! main-view order, each starting on a byte boundary.
//!
//! An image lives in memory, in a file written back on flush, or (feature
//! `mmap`) in a file mapped read-write. File images carry an [`ImageHeader`]
//! identifying the map they were written for and a digest of the payload.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use bit_span::{BitOrder, copy_bits};
use bytemuck_derive::{Pod, Zeroable};
use log::{debug, trace, warn};
use rand::RngCore;
use record_map::{Map, NotFound, Piece};

#[cfg(feature = "mmap")]
use memmap2::MmapMut;

use crate::digest::{CHUNK_SIZE, chunked_root};
use crate::error::{Result, SourceError};
use crate::source::{RecordSource, Source};
use crate::storage::Storage;

pub const MAGIC: [u8; 4] = *b"BREC";
pub const FORMAT_VERSION: u16 = 1;
pub const MEDIA_ID_LEN: usize = 16;
pub const HEADER_LEN: usize = std::mem::size_of::<ImageHeader>();

/// Fixed prefix of a file image.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct ImageHeader {
    pub magic: [u8; 4],
    pub format_version: u16,
    pub map_major: u16,
    pub map_minor: u16,
    pub map_release: u16,
    pub record_count: u32,
    pub payload_len: u64,
    /// First eight bytes of the blake3 hash of the map name, little-endian.
    pub map_hash: u64,
    pub media_id: [u8; MEDIA_ID_LEN],
    /// Chunked blake3 root of the payload.
    pub digest: [u8; 32],
}

impl ImageHeader {
    fn for_map(map: &Map, layout: &Layout, media_id: [u8; MEDIA_ID_LEN]) -> Self {
        let version = map.version();
        let mut hash = [0u8; 8];
        hash.copy_from_slice(&blake3::hash(map.name().as_bytes()).as_bytes()[..8]);
        Self {
            magic: MAGIC,
            format_version: FORMAT_VERSION,
            map_major: version.major,
            map_minor: version.minor,
            map_release: version.release,
            record_count: layout.slots.len() as u32,
            payload_len: layout.len as u64,
            map_hash: u64::from_le_bytes(hash),
            media_id,
            digest: [0; 32],
        }
    }

    /// Whether both headers describe the same map layout.
    fn same_layout(&self, other: &Self) -> bool {
        self.map_hash == other.map_hash
            && (self.map_major, self.map_minor, self.map_release)
                == (other.map_major, other.map_minor, other.map_release)
            && self.record_count == other.record_count
            && self.payload_len == other.payload_len
    }
}

#[derive(Debug, Clone)]
struct Slot {
    byte_offset: usize,
    byte_len: usize,
}

#[derive(Debug, Clone)]
struct Layout {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
    len: usize,
}

impl Layout {
    fn of(map: &Map) -> Self {
        let mut slots = Vec::with_capacity(map.records().len());
        let mut index = HashMap::with_capacity(map.records().len());
        let mut len = 0;
        for record in map.records() {
            index.insert(record.name().to_string(), slots.len());
            slots.push(Slot {
                byte_offset: len,
                byte_len: record.byte_len(),
            });
            len += record.byte_len();
        }
        Self { slots, index, len }
    }
}

#[derive(Debug)]
struct Image {
    storage: Storage,
    header: ImageHeader,
    path: Option<PathBuf>,
    active: bool,
    writable: bool,
    dirty: bool,
}

impl Image {
    fn ensure_active(&self) -> Result<()> {
        if self.active {
            Ok(())
        } else {
            Err(SourceError::Session("image is closed".to_string()))
        }
    }

    fn flush(&mut self, force: bool) -> Result<()> {
        self.ensure_active()?;
        if !(self.dirty || force) || !self.writable {
            return Ok(());
        }
        let Some(path) = &self.path else {
            self.dirty = false;
            return Ok(());
        };

        self.header.digest = *chunked_root(self.storage.payload(), CHUNK_SIZE).as_bytes();
        match &mut self.storage {
            Storage::InMemory(payload) => {
                let mut file = File::create(path)?;
                file.write_all(bytemuck::bytes_of(&self.header))?;
                file.write_all(payload)?;
                file.sync_all()?;
            }

            #[cfg(feature = "mmap")]
            Storage::Mapped { map, payload_start } => {
                map[..*payload_start].copy_from_slice(bytemuck::bytes_of(&self.header));
                map.flush()?;
            }
        }

        debug!("flushed {} payload bytes to {}", self.storage.len(), path.display());
        self.dirty = false;
        Ok(())
    }
}

fn random_media_id() -> [u8; MEDIA_ID_LEN] {
    let mut id = [0u8; MEDIA_ID_LEN];
    rand::rng().fill_bytes(&mut id);
    id
}

fn verify(found: &ImageHeader, expected: &ImageHeader, payload: &[u8], path: &Path) -> Result<()> {
    if found.magic != MAGIC {
        return Err(SourceError::Device(format!(
            "{}: not a record image",
            path.display()
        )));
    }
    if found.format_version != FORMAT_VERSION {
        return Err(SourceError::Device(format!(
            "{}: unsupported image format {}",
            path.display(),
            found.format_version
        )));
    }
    if !found.same_layout(expected) {
        return Err(SourceError::Setup(format!(
            "{}: image was written for another map layout",
            path.display()
        )));
    }
    if payload.len() as u64 != found.payload_len {
        return Err(SourceError::Device(format!(
            "{}: payload is {} bytes, header declares {}",
            path.display(),
            payload.len(),
            found.payload_len
        )));
    }
    if chunked_root(payload, CHUNK_SIZE).as_bytes() != &found.digest {
        warn!("{}: payload digest mismatch", path.display());
        return Err(SourceError::Device(format!(
            "{}: payload digest mismatch",
            path.display()
        )));
    }
    Ok(())
}

/// A [`Source`] over one contiguous byte image.
///
/// Record sources handed out by [`Source::record`] are windows sharing the
/// image, so writes through any of them are visible to all. Not `Send`.
///
/// ```
/// use bit_span::BitOrder;
/// use record_map::{FieldDef, MapBuilder, RecordDef};
/// use record_source::{ImageSource, Source};
///
/// let map = MapBuilder::new("Card")
///     .record(RecordDef::new("Header").field(FieldDef::integer("code", 12)))
///     .build()
///     .unwrap();
///
/// let source = ImageSource::in_memory(&map);
/// let mut header = source.record("Header").unwrap();
/// let piece = &map.field("Header", "code").unwrap().pieces()[0];
///
/// header.set_piece(piece, BitOrder::Msb0, &[0x0A, 0xBC], 4).unwrap();
/// assert_eq!(source.payload(), vec![0xAB, 0xC0]);
/// assert_eq!(header.describe(), "Header@0[2]");
/// ```
#[derive(Debug)]
pub struct ImageSource {
    map_name: String,
    layout: Layout,
    image: Rc<RefCell<Image>>,
}

impl ImageSource {
    fn assemble(
        map: &Map,
        layout: Layout,
        header: ImageHeader,
        storage: Storage,
        path: Option<PathBuf>,
        writable: bool,
    ) -> Self {
        Self {
            map_name: map.name().to_string(),
            layout,
            image: Rc::new(RefCell::new(Image {
                storage,
                header,
                path,
                active: true,
                writable,
                dirty: false,
            })),
        }
    }

    /// A zeroed image with a fresh random media id.
    pub fn in_memory(map: &Map) -> Self {
        let layout = Layout::of(map);
        let header = ImageHeader::for_map(map, &layout, random_media_id());
        let storage = Storage::InMemory(vec![0; layout.len]);
        Self::assemble(map, layout, header, storage, None, true)
    }

    /// An in-memory image over existing payload bytes.
    pub fn from_payload(map: &Map, media_id: [u8; MEDIA_ID_LEN], payload: Vec<u8>) -> Result<Self> {
        let layout = Layout::of(map);
        if payload.len() != layout.len {
            return Err(SourceError::Setup(format!(
                "map {:?} needs a {}-byte image, got {}",
                map.name(),
                layout.len,
                payload.len()
            )));
        }
        let header = ImageHeader::for_map(map, &layout, media_id);
        Ok(Self::assemble(map, layout, header, Storage::InMemory(payload), None, true))
    }

    /// Writes a zeroed image file and binds to it.
    pub fn create(path: impl AsRef<Path>, map: &Map) -> Result<Self> {
        let layout = Layout::of(map);
        let header = ImageHeader::for_map(map, &layout, random_media_id());
        let storage = Storage::InMemory(vec![0; layout.len]);
        let mut source = Self::assemble(
            map,
            layout,
            header,
            storage,
            Some(path.as_ref().to_path_buf()),
            true,
        );
        source.flush(true)?;
        Ok(source)
    }

    /// Loads and verifies an image file. Changes are written back on flush.
    pub fn open(path: impl AsRef<Path>, map: &Map) -> Result<Self> {
        Self::load(path.as_ref(), map, true)
    }

    /// Loads and verifies an image file that refuses every write.
    pub fn open_read_only(path: impl AsRef<Path>, map: &Map) -> Result<Self> {
        Self::load(path.as_ref(), map, false)
    }

    fn load(path: &Path, map: &Map, writable: bool) -> Result<Self> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        if bytes.len() < HEADER_LEN {
            return Err(SourceError::Device(format!(
                "{}: shorter than an image header",
                path.display()
            )));
        }

        let layout = Layout::of(map);
        let header: ImageHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_LEN]);
        let payload = bytes.split_off(HEADER_LEN);
        verify(
            &header,
            &ImageHeader::for_map(map, &layout, header.media_id),
            &payload,
            path,
        )?;

        Ok(Self::assemble(
            map,
            layout,
            header,
            Storage::InMemory(payload),
            Some(path.to_path_buf()),
            writable,
        ))
    }

    /// Maps an image file read-write; writes land directly in the mapping.
    #[cfg(feature = "mmap")]
    pub fn map(path: impl AsRef<Path>, map: &Map) -> Result<Self> {
        let path = path.as_ref();
        let file = File::options().read(true).write(true).open(path)?;
        // SAFETY: the file stays mapped for the lifetime of the source and is
        // not truncated through this process.
        let mapped = unsafe { MmapMut::map_mut(&file)? };
        if mapped.len() < HEADER_LEN {
            return Err(SourceError::Device(format!(
                "{}: shorter than an image header",
                path.display()
            )));
        }

        let layout = Layout::of(map);
        let header: ImageHeader = bytemuck::pod_read_unaligned(&mapped[..HEADER_LEN]);
        verify(
            &header,
            &ImageHeader::for_map(map, &layout, header.media_id),
            &mapped[HEADER_LEN..],
            path,
        )?;

        let storage = Storage::Mapped {
            map: mapped,
            payload_start: HEADER_LEN,
        };
        Ok(Self::assemble(
            map,
            layout,
            header,
            storage,
            Some(path.to_path_buf()),
            true,
        ))
    }

    /// Flushes pending writes, then deactivates the image.
    pub fn close(&mut self) -> Result<()> {
        let mut image = self.image.borrow_mut();
        image.flush(false)?;
        image.active = false;
        debug!("closed image of map {:?}", self.map_name);
        Ok(())
    }

    pub fn is_read_only(&self) -> bool {
        !self.image.borrow().writable
    }

    /// Copy of the whole payload.
    pub fn payload(&self) -> Vec<u8> {
        self.image.borrow().storage.payload().to_vec()
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.image.borrow().path.clone()
    }
}

impl Source for ImageSource {
    fn media_id(&self) -> Vec<u8> {
        self.image.borrow().header.media_id.to_vec()
    }

    fn is_active(&self) -> bool {
        self.image.borrow().active
    }

    fn clear_caches(&mut self) {}

    fn record(&self, name: &str) -> Result<Box<dyn RecordSource>> {
        self.image.borrow().ensure_active()?;
        let slot = self
            .layout
            .index
            .get(name)
            .map(|&i| &self.layout.slots[i])
            .ok_or_else(|| NotFound::new("record", name, &self.map_name))?;
        Ok(Box::new(RecordWindow {
            image: Rc::clone(&self.image),
            name: name.to_string(),
            byte_offset: slot.byte_offset,
            byte_len: slot.byte_len,
        }))
    }

    fn flush(&mut self, force: bool) -> Result<()> {
        self.image.borrow_mut().flush(force)
    }
}

/// One record's byte range within an [`ImageSource`].
#[derive(Debug)]
pub struct RecordWindow {
    image: Rc<RefCell<Image>>,
    name: String,
    byte_offset: usize,
    byte_len: usize,
}

impl RecordWindow {
    fn range(&self) -> std::ops::Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_len
    }
}

impl RecordSource for RecordWindow {
    fn get_piece(
        &self,
        piece: &Piece,
        order: BitOrder,
        dst: &mut [u8],
        dst_offset: usize,
    ) -> Result<()> {
        let image = self.image.borrow();
        image.ensure_active()?;
        let bytes = &image.storage.payload()[self.range()];
        copy_bits(order, bytes, piece.offset(), dst, dst_offset, piece.len())?;
        trace!("get {}+{} from {}", piece.offset(), piece.len(), self.describe());
        Ok(())
    }

    fn set_piece(
        &mut self,
        piece: &Piece,
        order: BitOrder,
        src: &[u8],
        src_offset: usize,
    ) -> Result<()> {
        let range = self.range();
        let mut image = self.image.borrow_mut();
        image.ensure_active()?;
        if !image.writable {
            return Err(SourceError::Access(format!(
                "{}: image is read-only",
                self.name
            )));
        }
        let bytes = &mut image.storage.payload_mut()[range];
        copy_bits(order, src, src_offset, bytes, piece.offset(), piece.len())?;
        image.dirty = true;
        trace!("set {}+{} in {}@{}", piece.offset(), piece.len(), self.name, self.byte_offset);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.image.borrow_mut().flush(false)
    }

    fn describe(&self) -> String {
        format!("{}@{}[{}]", self.name, self.byte_offset, self.byte_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_map::{FieldDef, MapBuilder, RecordDef};

    fn sample() -> Map {
        MapBuilder::new("Sample")
            .record(
                RecordDef::new("A")
                    .field(FieldDef::integer("x", 4))
                    .field(FieldDef::integer("y", 9)),
            )
            .record(RecordDef::new("B").field(FieldDef::byte_array("raw", 24)))
            .build()
            .unwrap()
    }

    #[test]
    fn header_has_no_padding() {
        assert_eq!(HEADER_LEN, 80);
    }

    #[test]
    fn records_are_byte_aligned_windows() {
        let map = sample();
        let source = ImageSource::in_memory(&map);
        assert_eq!(source.payload().len(), 5);
        assert_eq!(source.record("A").unwrap().describe(), "A@0[2]");
        assert_eq!(source.record("B").unwrap().describe(), "B@2[3]");
    }

    #[test]
    fn unknown_record_is_not_found() {
        let map = sample();
        let source = ImageSource::in_memory(&map);
        match source.record("C") {
            Err(SourceError::NotFound(e)) => assert_eq!(e.container, "Sample"),
            _ => panic!("expected a NotFound error"),
        }
    }

    #[test]
    fn windows_share_the_image() {
        let map = sample();
        let source = ImageSource::in_memory(&map);
        let mut writer = source.record("B").unwrap();
        let reader = source.record("B").unwrap();
        let piece = &map.field("B", "raw").unwrap().pieces()[0];

        writer
            .set_piece(piece, BitOrder::Msb0, &[1, 2, 3], 0)
            .unwrap();
        let mut out = [0u8; 3];
        reader.get_piece(piece, BitOrder::Msb0, &mut out, 0).unwrap();
        assert_eq!(out, [1, 2, 3]);
        assert_eq!(source.payload(), vec![0, 0, 1, 2, 3]);
    }

    #[test]
    fn piece_outside_window_is_a_range_error() {
        let map = sample();
        let source = ImageSource::in_memory(&map);
        let mut a = source.record("A").unwrap();
        let piece = &map.field("B", "raw").unwrap().pieces()[0];
        let result = a.set_piece(piece, BitOrder::Msb0, &[0xFF; 3], 0);
        assert!(matches!(result, Err(SourceError::Range(_))));
    }

    #[test]
    fn closed_image_rejects_transfers() {
        let map = sample();
        let mut source = ImageSource::in_memory(&map);
        let window = source.record("A").unwrap();
        source.close().unwrap();

        assert!(!source.is_active());
        let piece = &map.field("A", "x").unwrap().pieces()[0];
        let mut out = [0u8; 1];
        assert!(matches!(
            window.get_piece(piece, BitOrder::Msb0, &mut out, 0),
            Err(SourceError::Session(_))
        ));
        assert!(matches!(source.record("A"), Err(SourceError::Session(_))));
    }

    #[test]
    fn media_ids_are_random_copies() {
        let map = sample();
        let a = ImageSource::in_memory(&map);
        let b = ImageSource::in_memory(&map);
        assert_eq!(a.media_id().len(), MEDIA_ID_LEN);
        assert_ne!(a.media_id(), b.media_id());
    }

    #[test]
    fn payload_length_is_checked() {
        let map = sample();
        assert!(matches!(
            ImageSource::from_payload(&map, [0; MEDIA_ID_LEN], vec![0; 4]),
            Err(SourceError::Setup(_))
        ));
        let source = ImageSource::from_payload(&map, [7; MEDIA_ID_LEN], vec![9; 5]).unwrap();
        assert_eq!(source.media_id(), vec![7; MEDIA_ID_LEN]);
        assert_eq!(source.payload(), vec![9; 5]);
    }
}
