use ar2_types::{BlockName, DataMoment, ElevationData, RadialData, RadialHeader, VolumeData};

/// Builder for one Message 31 body.
///
/// Blocks are laid out the way the radar writes them, VOL first so the
/// pointer table is always followed by the `RVOL` sentinel:
///
/// ```text
/// ┌──────────┬─────────────┬─────┬─────┬─────┬─────────┬──────────────┐
/// │ header   │ pointers    │ VOL │ ELV │ RAD │ moments │ extra blocks │
/// │ 32 bytes │ 4 bytes × n │ 44  │ 12  │ 28  │ 28 + NG │ raw bytes    │
/// └──────────┴─────────────┴─────┴─────┴─────┴─────────┴──────────────┘
/// ```
///
/// `DataBlockCount` and `RadialLength` are always filled in by
/// [`to_bytes`](Self::to_bytes); whatever the supplied header holds for
/// them is overwritten. The remaining knobs exist to produce the layouts
/// found in the field (pointers appended by a firmware upgrade without
/// raising the count) and malformed radials for error-path tests.
#[derive(Clone, Debug)]
pub struct RadialMessage {
    header: RadialHeader,
    volume: VolumeData,
    elevation: ElevationData,
    radial: RadialData,
    moments: Vec<DataMoment>,
    extra_blocks: Vec<Vec<u8>>,
    extra_pointers: Vec<u32>,
    omitted: Vec<BlockName>,
    hidden_pointers: usize,
}

impl RadialMessage {
    /// A radial with default descriptor blocks and no moments.
    #[must_use]
    pub fn new(header: RadialHeader) -> Self {
        Self {
            header,
            volume: VolumeData::default(),
            elevation: ElevationData::default(),
            radial: RadialData::default(),
            moments: Vec::new(),
            extra_blocks: Vec::new(),
            extra_pointers: Vec::new(),
            omitted: Vec::new(),
            hidden_pointers: 0,
        }
    }

    #[must_use]
    pub fn with_volume(mut self, volume: VolumeData) -> Self {
        self.volume = volume;
        self
    }

    #[must_use]
    pub fn with_elevation(mut self, elevation: ElevationData) -> Self {
        self.elevation = elevation;
        self
    }

    #[must_use]
    pub fn with_radial(mut self, radial: RadialData) -> Self {
        self.radial = radial;
        self
    }

    /// Append a moment block. Repeating a product is allowed, so duplicate
    /// blocks can be written.
    #[must_use]
    pub fn with_moment(mut self, moment: DataMoment) -> Self {
        self.moments.push(moment);
        self
    }

    /// Append a raw block after the moments, with a counted pointer.
    #[must_use]
    pub fn with_extra_block(mut self, block: Vec<u8>) -> Self {
        self.extra_blocks.push(block);
        self
    }

    /// Append a counted pointer that does not belong to any written block.
    #[must_use]
    pub fn with_extra_pointer(mut self, pointer: u32) -> Self {
        self.extra_pointers.push(pointer);
        self
    }

    /// Leave a descriptor block out, pointer included.
    #[must_use]
    pub fn without_block(mut self, name: BlockName) -> Self {
        self.omitted.push(name);
        self
    }

    /// Write the last `n` pointers without counting them in
    /// `DataBlockCount`.
    #[must_use]
    pub fn with_hidden_pointers(mut self, n: usize) -> Self {
        self.hidden_pointers = n;
        self
    }

    #[must_use]
    pub fn header(&self) -> &RadialHeader {
        &self.header
    }

    /// Serialize the message body, starting at the radial header.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut blocks: Vec<Vec<u8>> = Vec::new();
        if !self.omitted.contains(&BlockName::Volume) {
            let mut block = Vec::with_capacity(VolumeData::SIZE);
            self.volume.write_to(&mut block);
            blocks.push(block);
        }
        if !self.omitted.contains(&BlockName::Elevation) {
            let mut block = Vec::with_capacity(ElevationData::SIZE);
            self.elevation.write_to(&mut block);
            blocks.push(block);
        }
        if !self.omitted.contains(&BlockName::Radial) {
            let mut block = Vec::with_capacity(RadialData::SIZE);
            self.radial.write_to(&mut block);
            blocks.push(block);
        }
        for moment in &self.moments {
            let mut block = Vec::with_capacity(moment.encoded_len());
            moment.write_to(&mut block);
            blocks.push(block);
        }
        blocks.extend(self.extra_blocks.iter().cloned());

        let table_len = 4 * (blocks.len() + self.extra_pointers.len());
        let mut pointers = Vec::with_capacity(blocks.len() + self.extra_pointers.len());
        let mut at = RadialHeader::SIZE + table_len;
        for block in &blocks {
            pointers.push(u32::try_from(at).unwrap_or(u32::MAX));
            at += block.len();
        }
        pointers.extend_from_slice(&self.extra_pointers);

        let counted = pointers.len().saturating_sub(self.hidden_pointers);
        let header = RadialHeader {
            data_block_count: u16::try_from(counted).unwrap_or(u16::MAX),
            radial_length: u16::try_from(at).unwrap_or(u16::MAX),
            ..self.header.clone()
        };

        let mut buf = Vec::with_capacity(at);
        header.write_to(&mut buf);
        for pointer in pointers {
            buf.extend_from_slice(&pointer.to_be_bytes());
        }
        for block in blocks {
            buf.extend_from_slice(&block);
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use ar2_types::{MomentHeader, Product};
    use ar2_wire::ByteReader;

    use super::*;

    fn moment(product: Product, gates: usize) -> DataMoment {
        DataMoment::from_codes(MomentHeader::new(product, 0), &vec![7; gates]).unwrap()
    }

    fn pointers(bytes: &[u8], n: usize) -> Vec<u32> {
        let mut r = ByteReader::new(bytes);
        r.skip(RadialHeader::SIZE);
        (0..n).map(|_| r.read_u32().unwrap()).collect()
    }

    #[test]
    fn descriptor_blocks_follow_the_table() {
        let bytes = RadialMessage::new(RadialHeader::default()).to_bytes();
        let header = RadialHeader::read_from(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(header.data_block_count, 3);
        assert_eq!(usize::from(header.radial_length), bytes.len());
        assert_eq!(bytes.len(), 32 + 12 + 44 + 12 + 28);
        assert_eq!(pointers(&bytes, 3), vec![44, 88, 100]);
        assert_eq!(&bytes[44..48], b"RVOL");
        assert_eq!(&bytes[88..92], b"RELV");
        assert_eq!(&bytes[100..104], b"RRAD");
    }

    #[test]
    fn moments_are_appended_in_order() {
        let bytes = RadialMessage::new(RadialHeader::default())
            .with_moment(moment(Product::Reflectivity, 10))
            .with_moment(moment(Product::Velocity, 4))
            .to_bytes();
        let table = pointers(&bytes, 5);
        assert_eq!(&bytes[table[3] as usize..table[3] as usize + 4], b"DREF");
        assert_eq!(&bytes[table[4] as usize..table[4] as usize + 4], b"DVEL");
        assert_eq!(bytes.len(), table[4] as usize + 28 + 4);
    }

    #[test]
    fn hidden_pointers_are_not_counted() {
        let bytes = RadialMessage::new(RadialHeader::default())
            .with_moment(moment(Product::ClutterFilterPower, 3))
            .with_hidden_pointers(1)
            .to_bytes();
        let header = RadialHeader::read_from(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(header.data_block_count, 3);
        assert_eq!(&bytes[48..52], b"RVOL");
    }

    #[test]
    fn omitted_block_drops_its_pointer() {
        let bytes = RadialMessage::new(RadialHeader::default())
            .without_block(BlockName::Radial)
            .with_extra_pointer(9)
            .to_bytes();
        let header = RadialHeader::read_from(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(header.data_block_count, 3);
        assert_eq!(pointers(&bytes, 3), vec![44, 88, 9]);
        assert!(!bytes.windows(4).any(|w| w == b"RRAD"));
    }
}
