/// Default cap on data block pointer probes past `DataBlockCount`.
pub const DEFAULT_MAX_POINTER_PROBES: usize = 20;

/// Smallest probe cap accepted: one probe to find a single extension
/// pointer, one to find the sentinel behind it.
pub const MIN_POINTER_PROBES: usize = 2;

/// Default inflated size limit for a single LDM record (64 MiB).
pub const DEFAULT_MAX_RECORD_SIZE: usize = 64 * 1024 * 1024;

/// Default size limit for the whole inflated volume (1 GiB).
pub const DEFAULT_MAX_VOLUME_SIZE: usize = 1024 * 1024 * 1024;

/// Tuning knobs for [`Archive2Decoder`](crate::Archive2Decoder).
///
/// ```text
/// ┌────────────────────┬─────────┬───────────────────────────────────────┐
/// │ Field              │ Default │ Purpose                               │
/// ├────────────────────┼─────────┼───────────────────────────────────────┤
/// │ metadata_record    │ Parse   │ Parse or drop LDM record 0            │
/// │ max_pointer_probes │ 20      │ Pointer table extension cap (min 2)   │
/// │ max_record_size    │ 64 MiB  │ Inflated size limit per LDM record    │
/// │ max_volume_size    │ 1 GiB   │ Limit for the gzip envelope / reader  │
/// └────────────────────┴─────────┴───────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    pub metadata_record: MetadataRecordPolicy,
    max_pointer_probes: usize,
    pub max_record_size: usize,
    pub max_volume_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            metadata_record: MetadataRecordPolicy::default(),
            max_pointer_probes: DEFAULT_MAX_POINTER_PROBES,
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            max_volume_size: DEFAULT_MAX_VOLUME_SIZE,
        }
    }
}

impl DecoderConfig {
    #[must_use]
    pub fn with_metadata_record(mut self, policy: MetadataRecordPolicy) -> Self {
        self.metadata_record = policy;
        self
    }

    /// Values below [`MIN_POINTER_PROBES`] are raised to it.
    #[must_use]
    pub fn with_max_pointer_probes(mut self, probes: usize) -> Self {
        self.max_pointer_probes = probes.max(MIN_POINTER_PROBES);
        self
    }

    #[must_use]
    pub fn with_max_record_size(mut self, bytes: usize) -> Self {
        self.max_record_size = bytes;
        self
    }

    #[must_use]
    pub fn with_max_volume_size(mut self, bytes: usize) -> Self {
        self.max_volume_size = bytes;
        self
    }

    #[must_use]
    pub fn max_pointer_probes(&self) -> usize {
        self.max_pointer_probes
    }
}

/// What to do with the first LDM record after the volume header.
///
/// The metadata record holds the 134 fixed-slot messages (types 15, 13,
/// 18, 3, 5, 2). Some producers only send Message 2 there, so skipping it
/// can leave the volume without a status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetadataRecordPolicy {
    /// Dispatch its messages like any other record.
    #[default]
    Parse,
    /// Drop the record without inflating it.
    Skip,
}
