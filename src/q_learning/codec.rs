//! Binary codec for state records and full table snapshots
//!
//! Layout (all multi-byte integers and floats big-endian):
//!
//! ```text
//! snapshot := magic "WQT" | version u8 | width u8 | height u8 | count u32 | record*
//! record   := flags u8 | x u8 | y u8 | tile u8 * (width * height) | value f64 * 7
//! ```
//!
//! Keys are not stored; they are rebuilt from each record's non-value fields.
//! The per-slot updated mask is not stored either: on decode a legal slot
//! counts as updated when its value differs from [`DEFAULT_VALUE`], so a slot
//! that learned exactly `0.0` reads as untried again after a round-trip.
//!
//! [`DEFAULT_VALUE`]: super::action::DEFAULT_VALUE

use super::{
    action::{ACTION_COUNT, ActionValues},
    state::{SpecialFlags, StateRecord, TileFlags},
};
use crate::{
    Error, Result,
    types::{GridSize, Position},
};

/// Leading bytes of every snapshot.
pub const MAGIC: &[u8; 3] = b"WQT";

/// Current snapshot layout version.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = MAGIC.len() + 3 + 4;
const VALUE_LEN: usize = 8;

/// Encoded size of one record on `grid`.
pub fn record_len(grid: GridSize) -> usize {
    3 + grid.cell_count() + ACTION_COUNT * VALUE_LEN
}

/// Append the encoding of `record` to `out`.
pub fn encode_record(record: &StateRecord, out: &mut Vec<u8>) {
    out.extend_from_slice(record.key().as_bytes());
    for value in record.values().raw() {
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Decode exactly one record of `grid` from `bytes`.
///
/// # Errors
///
/// Fails if the length is wrong, a flag byte carries unknown bits, or the
/// position is neither masked nor on the grid.
pub fn decode_record(grid: GridSize, bytes: &[u8]) -> Result<StateRecord> {
    let expected = record_len(grid);
    if bytes.len() != expected {
        return Err(Error::InvalidRecordLength {
            expected,
            got: bytes.len(),
        });
    }

    let flags = SpecialFlags::from_bits(bytes[0]).ok_or_else(|| Error::SerializationContext {
        operation: "decode state flags".to_string(),
        message: format!("unknown bits in {:#010b}", bytes[0]),
    })?;

    let position = Position::new(i32::from(bytes[1]), i32::from(bytes[2]));
    if position != Position::MASKED && !grid.contains(position) {
        return Err(Error::SerializationContext {
            operation: "decode state position".to_string(),
            message: format!("{position} is outside the {grid} grid"),
        });
    }

    let tile_end = 3 + grid.cell_count();
    let tiles = bytes[3..tile_end]
        .iter()
        .enumerate()
        .map(|(index, &bits)| {
            TileFlags::from_bits(bits).ok_or_else(|| Error::SerializationContext {
                operation: "decode tile flags".to_string(),
                message: format!("unknown bits {bits:#010b} on tile {index}"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut values = [0.0; ACTION_COUNT];
    for (slot, chunk) in values
        .iter_mut()
        .zip(bytes[tile_end..].chunks_exact(VALUE_LEN))
    {
        let mut raw = [0u8; VALUE_LEN];
        raw.copy_from_slice(chunk);
        *slot = f64::from_be_bytes(raw);
    }

    Ok(StateRecord::from_parts(
        flags,
        position,
        tiles,
        ActionValues::from_raw(values),
    ))
}

/// Encode a full table.
///
/// # Errors
///
/// Fails if there are more records than the count field can hold.
pub fn encode_table<'a>(
    grid: GridSize,
    records: impl ExactSizeIterator<Item = &'a StateRecord>,
) -> Result<Vec<u8>> {
    let count = u32::try_from(records.len()).map_err(|_| Error::SerializationContext {
        operation: "encode table snapshot".to_string(),
        message: format!("{} records exceed the u32 count field", records.len()),
    })?;

    let mut out = Vec::with_capacity(HEADER_LEN + records.len() * record_len(grid));
    out.extend_from_slice(MAGIC);
    out.push(FORMAT_VERSION);
    out.push(grid.width());
    out.push(grid.height());
    out.extend_from_slice(&count.to_be_bytes());
    for record in records {
        encode_record(record, &mut out);
    }
    Ok(out)
}

/// Decode a full table snapshot.
///
/// # Errors
///
/// Fails on a wrong magic, an unknown version, an empty grid, truncated or
/// trailing data, or any malformed record.
pub fn decode_table(bytes: &[u8]) -> Result<(GridSize, Vec<StateRecord>)> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::TruncatedSnapshot {
            expected: HEADER_LEN,
            got: bytes.len(),
        });
    }
    if &bytes[..MAGIC.len()] != MAGIC {
        return Err(Error::InvalidSnapshotMagic {
            found: bytes[..MAGIC.len()].to_vec(),
            expected: MAGIC.to_vec(),
        });
    }

    let version = bytes[3];
    if version != FORMAT_VERSION {
        return Err(Error::UnsupportedSnapshotVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let grid = GridSize::new(bytes[4], bytes[5])?;
    let count = u32::from_be_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
    let record_len = record_len(grid);
    let body = &bytes[HEADER_LEN..];
    let expected_body = count.checked_mul(record_len).ok_or(Error::TruncatedSnapshot {
        expected: usize::MAX,
        got: bytes.len(),
    })?;

    if body.len() < expected_body {
        return Err(Error::TruncatedSnapshot {
            expected: HEADER_LEN + expected_body,
            got: bytes.len(),
        });
    }
    if body.len() > expected_body {
        return Err(Error::TrailingSnapshotBytes {
            extra: body.len() - expected_body,
        });
    }

    let records = body
        .chunks_exact(record_len)
        .map(|chunk| decode_record(grid, chunk))
        .collect::<Result<Vec<_>>>()?;
    Ok((grid, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::action::{Action, DEFAULT_VALUE, ILLEGAL_VALUE};

    fn record_with_values(values: [f64; ACTION_COUNT]) -> StateRecord {
        let mut flags = SpecialFlags::empty();
        flags.set(SpecialFlags::HAS_ARROW, true);
        flags.set(SpecialFlags::RISK_MODE, true);
        let mut tiles = vec![TileFlags::empty(); 16];
        tiles[0] = TileFlags::EXPLORED;
        tiles[1] = TileFlags::from_bits(0x0f).unwrap();
        StateRecord::from_parts(
            flags,
            Position::new(2, 1),
            tiles,
            ActionValues::from_raw(values),
        )
    }

    #[test]
    fn test_record_roundtrip_is_bit_exact() {
        let record = record_with_values([
            0.1 + 0.2,
            DEFAULT_VALUE,
            ILLEGAL_VALUE,
            -0.0,
            f64::MIN_POSITIVE,
            -123.456_789,
            ILLEGAL_VALUE,
        ]);
        let mut bytes = Vec::new();
        encode_record(&record, &mut bytes);
        assert_eq!(bytes.len(), record_len(GridSize::STANDARD));

        let decoded = decode_record(GridSize::STANDARD, &bytes).unwrap();
        assert_eq!(decoded.key(), record.key());
        for (left, right) in decoded.values().raw().iter().zip(record.values().raw()) {
            assert_eq!(left.to_bits(), right.to_bits());
        }
    }

    #[test]
    fn test_values_are_big_endian() {
        let record = record_with_values([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let mut bytes = Vec::new();
        encode_record(&record, &mut bytes);
        assert_eq!(&bytes[19..27], &1.0f64.to_be_bytes());
    }

    #[test]
    fn test_table_roundtrip_preserves_order_and_updates() {
        let first = record_with_values([5.0, 0.0, ILLEGAL_VALUE, 0.0, 0.0, 0.0, 0.0]);
        let second = StateRecord::from_parts(
            SpecialFlags::ON_WUMPUS,
            Position::MASKED,
            vec![TileFlags::empty(); 16],
            ActionValues::from_raw([-1.0; ACTION_COUNT]),
        );
        let bytes = encode_table(GridSize::STANDARD, [&first, &second].into_iter()).unwrap();
        let (grid, records) = decode_table(&bytes).unwrap();

        assert_eq!(grid, GridSize::STANDARD);
        assert_eq!(records, vec![first, second]);
        assert!(records[0].is_updated(Action::MoveUp));
        assert!(!records[0].is_updated(Action::MoveRight));
    }

    #[test]
    fn test_learned_zero_reads_as_untried_after_roundtrip() {
        let mut record = record_with_values([0.0; ACTION_COUNT]);
        record.set_value(Action::MoveUp, 0.0);
        record.set_value(Action::MoveRight, 2.0);
        assert!(record.is_updated(Action::MoveUp));

        let mut bytes = Vec::new();
        encode_record(&record, &mut bytes);
        let decoded = decode_record(GridSize::STANDARD, &bytes).unwrap();

        assert_eq!(decoded.values().get(Action::MoveUp), 0.0);
        assert!(!decoded.is_updated(Action::MoveUp));
        assert!(decoded.is_updated(Action::MoveRight));
    }

    #[test]
    fn test_truncated_table_rejected() {
        let record = record_with_values([1.0; ACTION_COUNT]);
        let bytes = encode_table(GridSize::STANDARD, [&record].into_iter()).unwrap();
        let result = decode_table(&bytes[..bytes.len() - 1]);
        assert!(matches!(result, Err(Error::TruncatedSnapshot { .. })));
        assert!(matches!(
            decode_table(&bytes[..5]),
            Err(Error::TruncatedSnapshot { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = encode_table(GridSize::STANDARD, std::iter::empty()).unwrap();
        bytes.push(0);
        assert!(matches!(
            decode_table(&bytes),
            Err(Error::TrailingSnapshotBytes { extra: 1 })
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut bytes = encode_table(GridSize::STANDARD, std::iter::empty()).unwrap();
        bytes[3] = FORMAT_VERSION + 1;
        assert!(matches!(
            decode_table(&bytes),
            Err(Error::UnsupportedSnapshotVersion { .. })
        ));
        bytes[0] = b'X';
        assert!(matches!(
            decode_table(&bytes),
            Err(Error::InvalidSnapshotMagic { .. })
        ));
    }

    #[test]
    fn test_off_grid_position_rejected() {
        let record = record_with_values([0.0; ACTION_COUNT]);
        let mut bytes = Vec::new();
        encode_record(&record, &mut bytes);
        bytes[1] = 9;
        assert!(decode_record(GridSize::STANDARD, &bytes).is_err());
    }
}
