use ar2_types::product::VOLUME_BLOCK_SENTINEL;
use ar2_types::{
    BlockName, DataMoment, ElevationData, Product, Radial, RadialData, RadialHeader, VolumeData,
};
use ar2_wire::ByteReader;

use crate::error::DecodeError;

/// The data block pointer table of one Message 31.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerTable {
    /// Non-zero pointers in table order, extension pointers included.
    pub pointers: Vec<u32>,
    /// Words examined after the declared table, the sentinel probe
    /// included. A table with no extension pointers takes one probe.
    pub probes: usize,
}

/// Read the pointer table that follows a [`RadialHeader`].
///
/// `declared` is the header's `DataBlockCount`, the number of pointers
/// known to be present. Firmware upgrades appended pointers (CFP in build
/// 19) without raising that count, so after the declared words the table
/// is extended one word at a time until the next four bytes read `RVOL`,
/// the leading bytes of the Volume block that always comes first. The
/// cursor is left on the sentinel. Zero words are placeholders and are
/// dropped.
///
/// ```text
///   ┌────────┬──────┬──────┬─────┬──────┬────────┬──────────────────┐
///   │ header │ ptr₁ │ ptr₂ │ ... │ ptrₙ │ ext... │ R V O L ...      │
///   └────────┴──────┴──────┴─────┴──────┴────────┴──────────────────┘
///              └──── declared = n ────┘   └─ probes ─┘
/// ```
///
/// `message_offset` is only used for error context.
///
/// # Errors
///
/// - [`DecodeError::Truncated`] if the buffer ends inside the table.
/// - [`DecodeError::PointerTableOverflow`] if the sentinel is not found
///   within `max_probes` probes.
pub fn read_pointer_table(
    reader: &mut ByteReader<'_>,
    declared: u16,
    max_probes: usize,
    message_offset: usize,
) -> Result<PointerTable, DecodeError> {
    let mut pointers = Vec::with_capacity(usize::from(declared) + 1);
    for _ in 0..declared {
        let at = reader.position();
        let pointer = reader
            .read_u32()
            .map_err(DecodeError::truncated("data block pointer table", at))?;
        if pointer != 0 {
            pointers.push(pointer);
        }
    }

    for probe in 1..=max_probes {
        let at = reader.position();
        let word: [u8; 4] = reader
            .peek_array()
            .map_err(DecodeError::truncated("data block pointer table", at))?;
        if word == VOLUME_BLOCK_SENTINEL {
            log::trace!("pointer table of message at {message_offset} ends after {probe} probe(s)");
            return Ok(PointerTable {
                pointers,
                probes: probe,
            });
        }
        reader.skip(4);
        let pointer = u32::from_be_bytes(word);
        log::trace!("extension pointer {pointer} at offset {at}");
        if pointer != 0 {
            pointers.push(pointer);
        }
    }

    Err(DecodeError::PointerTableOverflow {
        probes: max_probes,
        offset: message_offset,
    })
}

/// Parse one Message 31 starting at the cursor (just past the 16-byte
/// message header).
///
/// Every pointer is an offset from the start of this message inside the
/// inflated LDM buffer, never from the start of the file. Blocks are
/// dispatched by their 3-byte name; the type byte is not checked. On
/// success the cursor sits at the furthest byte any block reached.
///
/// # Errors
///
/// - [`DecodeError::UnknownDataBlockName`] for a name outside VOL, ELV,
///   RAD and the seven moments.
/// - [`DecodeError::DuplicateDataBlock`] / [`DecodeError::MissingDataBlock`]
///   if the three descriptor blocks are not present exactly once, or a
///   moment repeats.
/// - [`DecodeError::PointerOutOfBounds`] for a pointer past the buffer.
/// - [`DecodeError::Type`] for a moment with an invalid word size.
/// - [`DecodeError::Truncated`] / [`DecodeError::PointerTableOverflow`]
///   from the header and pointer table.
pub fn parse_message31(
    reader: &mut ByteReader<'_>,
    max_probes: usize,
) -> Result<Radial, DecodeError> {
    let start = reader.position();
    let header = RadialHeader::read_from(reader)
        .map_err(DecodeError::truncated("Message 31 header", start))?;
    let table = read_pointer_table(reader, header.data_block_count, max_probes, start)?;

    let mut extent = reader.position();
    let mut volume = None;
    let mut elevation = None;
    let mut radial = None;
    let mut moments: Vec<DataMoment> = Vec::new();

    for &pointer in &table.pointers {
        let at = block_offset(reader, start, pointer)?;
        reader.seek_to(at)?;
        let preview: [u8; 4] = reader
            .peek_array()
            .map_err(DecodeError::truncated("data block", at))?;
        let Some(name) = BlockName::from_wire_name([preview[1], preview[2], preview[3]]) else {
            return Err(DecodeError::UnknownDataBlockName {
                name: String::from_utf8_lossy(&preview).into_owned(),
                offset: at,
            });
        };

        match name {
            BlockName::Volume => {
                let block = VolumeData::read_from(reader)
                    .map_err(DecodeError::truncated("VOL block", at))?;
                set_once(&mut volume, block, name, at)?;
            }
            BlockName::Elevation => {
                let block = ElevationData::read_from(reader)
                    .map_err(DecodeError::truncated("ELV block", at))?;
                set_once(&mut elevation, block, name, at)?;
            }
            BlockName::Radial => {
                let block = RadialData::read_from(reader)
                    .map_err(DecodeError::truncated("RAD block", at))?;
                set_once(&mut radial, block, name, at)?;
            }
            BlockName::Moment(product) => {
                if moments.iter().any(|m| m.product() == product) {
                    return Err(DecodeError::DuplicateDataBlock { name, offset: at });
                }
                moments.push(DataMoment::read_from(reader)?);
            }
        }
        extent = extent.max(reader.position());
    }

    let missing = |name| DecodeError::MissingDataBlock { name, offset: start };
    let mut decoded = Radial::new(
        header,
        volume.ok_or_else(|| missing(BlockName::Volume))?,
        elevation.ok_or_else(|| missing(BlockName::Elevation))?,
        radial.ok_or_else(|| missing(BlockName::Radial))?,
    );
    decoded.data_block_pointers = table.pointers;
    for moment in moments {
        decoded.insert_moment(moment);
    }

    let consumed = extent - start;
    if usize::from(decoded.header.radial_length) != consumed {
        log::warn!(
            "radial at offset {start} declares length {} but its blocks span {consumed} bytes",
            decoded.header.radial_length
        );
    }
    reader.seek_to(extent)?;
    Ok(decoded)
}

/// Absolute offset of a block, checked so that at least the 4-byte
/// type/name preview lies inside the buffer.
fn block_offset(reader: &ByteReader<'_>, start: usize, pointer: u32) -> Result<usize, DecodeError> {
    usize::try_from(pointer)
        .ok()
        .and_then(|p| start.checked_add(p))
        .filter(|at| at.saturating_add(4) <= reader.len())
        .ok_or(DecodeError::PointerOutOfBounds {
            pointer,
            offset: start,
            len: reader.len(),
        })
}

fn set_once<T>(
    slot: &mut Option<T>,
    block: T,
    name: BlockName,
    offset: usize,
) -> Result<(), DecodeError> {
    if slot.replace(block).is_some() {
        return Err(DecodeError::DuplicateDataBlock { name, offset });
    }
    Ok(())
}

/// Products present in a radial, for trace output.
pub(crate) fn product_list(radial: &Radial) -> String {
    radial
        .products()
        .into_iter()
        .map(Product::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
