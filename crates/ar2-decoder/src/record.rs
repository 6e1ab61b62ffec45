use std::borrow::Cow;

use ar2_wire::{ByteReader, ControlWord};

use crate::decompression::{self, Compression};
use crate::error::DecodeError;

/// One LDM record as framed in the volume, before inflation.
#[derive(Clone, Debug)]
pub struct LdmRecord<'a> {
    /// Zero-based record index; record 0 is the metadata record.
    pub index: usize,
    pub control_word: ControlWord,
    /// Offset of the payload within the inflated volume.
    pub offset: usize,
    pub payload: &'a [u8],
}

impl<'a> LdmRecord<'a> {
    /// `true` for the control-word-less layout, where the whole remainder
    /// of the volume is one uncompressed message stream.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.control_word.is_legacy()
    }

    #[must_use]
    pub fn compression(&self) -> Compression {
        if self.is_legacy() {
            Compression::Uncompressed
        } else {
            Compression::detect(self.payload)
        }
    }

    /// The message bytes of this record, inflated if the payload is
    /// compressed.
    ///
    /// # Errors
    ///
    /// [`DecodeError::DecompressFailed`] or
    /// [`DecodeError::DecompressionBomb`].
    pub fn messages(&self, max_size: usize) -> Result<Cow<'a, [u8]>, DecodeError> {
        if self.is_legacy() {
            return Ok(Cow::Borrowed(self.payload));
        }
        decompression::inflate(self.payload, self.offset, max_size)
    }
}

/// Splits the bytes after the volume header into LDM records.
///
/// ```text
///   ┌────────────┬──────────────┬────────────┬──────────────┬─────
///   │ int32 C₀   │ |C₀| bytes   │ int32 C₁   │ |C₁| bytes   │ ...
///   └────────────┴──────────────┴────────────┴──────────────┴─────
/// ```
///
/// A negative word is read as its magnitude. A zero word, wherever it
/// appears, means the rest of the volume has no LDM framing: the four
/// bytes are rewound and everything from there on is handed out as a
/// single uncompressed record. Old files carry it in the first position.
pub struct RecordFramer<'a> {
    reader: ByteReader<'a>,
    index: usize,
    done: bool,
}

impl<'a> RecordFramer<'a> {
    /// `reader` must be positioned just past the volume header.
    #[must_use]
    pub fn new(reader: ByteReader<'a>) -> Self {
        Self {
            reader,
            index: 0,
            done: false,
        }
    }

    /// Frame the next record.
    ///
    /// Returns `Ok(None)` when the volume ends cleanly on a record
    /// boundary.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Truncated`] if the input ends inside a control word
    /// or inside the payload it announces.
    pub fn next_record(&mut self) -> Result<Option<LdmRecord<'a>>, DecodeError> {
        if self.done || self.reader.remaining() == 0 {
            self.done = true;
            return Ok(None);
        }

        let word_offset = self.reader.position();
        let control_word = ControlWord::read_from(&mut self.reader)
            .map_err(DecodeError::truncated("LDM control word", word_offset))?;

        let index = self.index;
        self.index += 1;

        if control_word.is_legacy() {
            self.reader.rewind(ControlWord::SIZE)?;
            self.done = true;
            return Ok(Some(LdmRecord {
                index,
                control_word,
                offset: word_offset,
                payload: self.reader.rest(),
            }));
        }

        let offset = self.reader.position();
        let payload = self
            .reader
            .read_bytes(control_word.record_len())
            .map_err(DecodeError::truncated("LDM record", offset))?;
        Ok(Some(LdmRecord {
            index,
            control_word,
            offset,
            payload,
        }))
    }
}

impl<'a> Iterator for RecordFramer<'a> {
    type Item = Result<LdmRecord<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next_record();
        if next.is_err() {
            self.done = true;
        }
        next.transpose()
    }
}
