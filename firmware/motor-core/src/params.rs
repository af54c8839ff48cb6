//! Boost parameter tables measured against the mouth actuator.

use alloc::vec::Vec;
use minicbor::{Decode, Encode};

use crate::error::ConfigError;
use crate::DUTY_MAX;

/// Timing and magnitude of one charge/boost/settle transition.
///
/// Durations are milliseconds. A zero duration skips driving the phase but
/// the phase still waits one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct BoostParams {
    /// Applies to requested duties up to and including this value.
    #[n(0)]
    pub valid_up_to: u16,
    #[n(1)]
    pub charge_duration: u16,
    /// Signed duty held during the boost phase; negative reverses the motor.
    #[n(2)]
    pub boost_value: i16,
    #[n(3)]
    pub boost_duration: u16,
    #[n(4)]
    pub settle_duration: u16,
}

impl BoostParams {
    pub const fn new(
        valid_up_to: u16,
        charge_duration: u16,
        boost_value: i16,
        boost_duration: u16,
        settle_duration: u16,
    ) -> Self {
        Self {
            valid_up_to,
            charge_duration,
            boost_value,
            boost_duration,
            settle_duration,
        }
    }
}

// Strong oscillations remain around 903..923.
const DEFAULT_ASCENDING: [BoostParams; 5] = [
    BoostParams::new(603, 0, 1023, 10, 51),
    BoostParams::new(783, 0, 1023, 20, 41),
    BoostParams::new(903, 10, 1023, 50, 0),
    BoostParams::new(963, 10, 1023, 50, 0),
    BoostParams::new(1023, 15, 1023, 20, 25),
];

// Short full-scale reversal against coasting.
const DEFAULT_UNIVERSAL: BoostParams = BoostParams::new(1024, 0, -1023, 5, 56);

/// Which table a transition was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Ascending,
    Universal,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Ascending => "ascending",
            TableKind::Universal => "universal",
        }
    }
}

/// Result of a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: TableKind,
    /// Index into the ascending table; always 0 for the universal entry.
    pub index: usize,
    pub params: BoostParams,
}

/// The two boost tables: an ascending multi-entry table and one universal
/// entry. Validated on construction and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoostTables {
    ascending: Vec<BoostParams>,
    universal: BoostParams,
}

const RECORD_VERSION: u8 = 1;

#[derive(Encode, Decode)]
struct TableRecord {
    #[n(0)]
    version: u8,
    #[n(1)]
    ascending: Vec<BoostParams>,
    #[n(2)]
    universal: BoostParams,
}

impl BoostTables {
    /// Validate and build a table pair.
    pub fn new(ascending: Vec<BoostParams>, universal: BoostParams) -> Result<Self, ConfigError> {
        let last = ascending.last().ok_or(ConfigError::EmptyTable)?;
        if i32::from(last.valid_up_to) < i32::from(DUTY_MAX) {
            return Err(ConfigError::Incomplete {
                last: last.valid_up_to,
                max: DUTY_MAX,
            });
        }
        for (index, pair) in ascending.windows(2).enumerate() {
            if pair[1].valid_up_to <= pair[0].valid_up_to {
                return Err(ConfigError::Unsorted {
                    index: index + 1,
                    previous: pair[0].valid_up_to,
                    valid_up_to: pair[1].valid_up_to,
                });
            }
        }
        for params in ascending.iter().chain(core::iter::once(&universal)) {
            if !(-DUTY_MAX..=DUTY_MAX).contains(&params.boost_value) {
                return Err(ConfigError::BoostOutOfRange {
                    value: params.boost_value,
                    max: DUTY_MAX,
                });
            }
        }
        Ok(Self {
            ascending,
            universal,
        })
    }

    pub fn ascending(&self) -> &[BoostParams] {
        &self.ascending
    }

    pub fn universal(&self) -> &BoostParams {
        &self.universal
    }

    /// Pick the transition for moving from `previous` to `target`.
    ///
    /// A lowering request (`target < previous`) scans the ascending table for
    /// the first entry with `valid_up_to >= target`; every other request uses
    /// the universal entry.
    pub fn select(&self, previous: i16, target: i16) -> Selection {
        if target < previous {
            let index = self
                .ascending
                .iter()
                .position(|p| i32::from(p.valid_up_to) >= i32::from(target))
                // Validation guarantees the last entry covers DUTY_MAX.
                .unwrap_or(self.ascending.len() - 1);
            Selection {
                kind: TableKind::Ascending,
                index,
                params: self.ascending[index],
            }
        } else {
            Selection {
                kind: TableKind::Universal,
                index: 0,
                params: self.universal,
            }
        }
    }

    /// Encode as a versioned CBOR record for persistent storage.
    pub fn to_cbor(&self) -> Result<Vec<u8>, ConfigError> {
        let record = TableRecord {
            version: RECORD_VERSION,
            ascending: self.ascending.clone(),
            universal: self.universal,
        };
        match minicbor::to_vec(&record) {
            Ok(bytes) => Ok(bytes),
            Err(_) => Err(ConfigError::Unencodable),
        }
    }

    /// Decode and validate a stored record.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, ConfigError> {
        let record: TableRecord =
            minicbor::decode(bytes).map_err(|_| ConfigError::Malformed)?;
        if record.version != RECORD_VERSION {
            return Err(ConfigError::UnsupportedVersion(record.version));
        }
        Self::new(record.ascending, record.universal)
    }
}

impl Default for BoostTables {
    fn default() -> Self {
        Self {
            ascending: DEFAULT_ASCENDING.to_vec(),
            universal: DEFAULT_UNIVERSAL,
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use alloc::vec;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_are_valid() {
        let defaults = BoostTables::default();
        let rebuilt = BoostTables::new(DEFAULT_ASCENDING.to_vec(), DEFAULT_UNIVERSAL);
        assert_eq!(rebuilt, Ok(defaults));
    }

    #[test]
    fn test_every_duty_selects_exactly_one_entry() {
        let tables = BoostTables::default();
        for target in -DUTY_MAX..=DUTY_MAX {
            let matches = tables
                .ascending()
                .iter()
                .filter(|p| i32::from(p.valid_up_to) >= i32::from(target))
                .count();
            assert!(matches >= 1, "no entry covers {}", target);

            let lowering = tables.select(DUTY_MAX, target);
            let raising = tables.select(-DUTY_MAX, target);
            if target < DUTY_MAX {
                assert_eq!(lowering.kind, TableKind::Ascending);
                let first = tables.ascending()[lowering.index];
                assert!(i32::from(first.valid_up_to) >= i32::from(target));
                if lowering.index > 0 {
                    let before = tables.ascending()[lowering.index - 1];
                    assert!(i32::from(before.valid_up_to) < i32::from(target));
                }
            }
            assert_eq!(raising.kind, TableKind::Universal);
        }
    }

    #[test]
    fn test_lowering_to_500_picks_first_entry() {
        let sel = BoostTables::default().select(1023, 500);
        assert_eq!(sel.kind, TableKind::Ascending);
        assert_eq!(sel.index, 0);
        assert_eq!(sel.params, BoostParams::new(603, 0, 1023, 10, 51));
    }

    #[test]
    fn test_lowering_boundaries() {
        let tables = BoostTables::default();
        assert_eq!(tables.select(1023, 603).index, 0);
        assert_eq!(tables.select(1023, 604).index, 1);
        assert_eq!(tables.select(1023, 903).index, 2);
        assert_eq!(tables.select(1023, 904).index, 3);
        assert_eq!(tables.select(1023, 1022).index, 4);
        assert_eq!(tables.select(0, -1023).index, 0);
    }

    #[test]
    fn test_raising_and_equal_use_universal() {
        let tables = BoostTables::default();
        let sel = tables.select(400, 900);
        assert_eq!(sel.kind, TableKind::Universal);
        assert_eq!(sel.params.boost_value, -1023);
        assert_eq!(tables.select(700, 700).kind, TableKind::Universal);
    }

    #[test]
    fn test_rejects_empty_table() {
        assert_eq!(
            BoostTables::new(vec![], DEFAULT_UNIVERSAL),
            Err(ConfigError::EmptyTable)
        );
    }

    #[test]
    fn test_rejects_incomplete_table() {
        let err = BoostTables::new(vec![BoostParams::new(900, 0, 1023, 10, 10)], DEFAULT_UNIVERSAL);
        assert_eq!(err, Err(ConfigError::Incomplete { last: 900, max: 1023 }));
    }

    #[test]
    fn test_rejects_unsorted_table() {
        let err = BoostTables::new(
            vec![
                BoostParams::new(700, 0, 1023, 10, 10),
                BoostParams::new(700, 0, 1023, 10, 10),
                BoostParams::new(1023, 0, 1023, 10, 10),
            ],
            DEFAULT_UNIVERSAL,
        );
        assert_eq!(
            err,
            Err(ConfigError::Unsorted {
                index: 1,
                previous: 700,
                valid_up_to: 700
            })
        );
    }

    #[test]
    fn test_rejects_boost_out_of_range() {
        let err = BoostTables::new(
            DEFAULT_ASCENDING.to_vec(),
            BoostParams::new(1024, 0, -1024, 5, 56),
        );
        assert_eq!(
            err,
            Err(ConfigError::BoostOutOfRange { value: -1024, max: 1023 })
        );
    }

    #[test]
    fn test_cbor_record_restores_custom_tables() {
        let custom = BoostTables::new(
            vec![
                BoostParams::new(500, 5, 900, 15, 30),
                BoostParams::new(1023, 0, 1023, 20, 20),
            ],
            BoostParams::new(1023, 0, -800, 8, 40),
        )
        .unwrap();
        let bytes = custom.to_cbor().unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(BoostTables::from_cbor(&bytes), Ok(custom));
    }

    #[test]
    fn test_default_tables_encode_to_a_record() {
        let bytes = BoostTables::default().to_cbor().unwrap();
        assert_eq!(BoostTables::from_cbor(&bytes), Ok(BoostTables::default()));
    }

    #[test]
    fn test_cbor_garbage_is_malformed() {
        assert_eq!(
            BoostTables::from_cbor(&[0xff, 0x00, 0x13]),
            Err(ConfigError::Malformed)
        );
    }

    #[test]
    fn test_cbor_invalid_record_is_rejected() {
        let record = TableRecord {
            version: RECORD_VERSION,
            ascending: vec![BoostParams::new(800, 0, 1023, 10, 10)],
            universal: DEFAULT_UNIVERSAL,
        };
        let bytes = minicbor::to_vec(&record).unwrap();
        assert_eq!(
            BoostTables::from_cbor(&bytes),
            Err(ConfigError::Incomplete { last: 800, max: 1023 })
        );
    }

    #[test]
    fn test_cbor_future_version_is_rejected() {
        let record = TableRecord {
            version: 7,
            ascending: DEFAULT_ASCENDING.to_vec(),
            universal: DEFAULT_UNIVERSAL,
        };
        let bytes = minicbor::to_vec(&record).unwrap();
        assert_eq!(
            BoostTables::from_cbor(&bytes),
            Err(ConfigError::UnsupportedVersion(7))
        );
    }

    proptest! {
        #[test]
        fn prop_ascending_selection_is_monotonic(
            a in -1023i16..=1022,
            b in -1023i16..=1022,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let tables = BoostTables::default();
            let first = tables.select(DUTY_MAX, lo);
            let second = tables.select(DUTY_MAX, hi);
            prop_assert_eq!(first.kind, TableKind::Ascending);
            prop_assert_eq!(second.kind, TableKind::Ascending);
            prop_assert!(first.index <= second.index);
        }
    }
}
