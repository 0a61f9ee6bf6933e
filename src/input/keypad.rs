//! 4x4 Keypad Row Scanner
//!
//! One column is driven at a time; the four row inputs are sampled while
//! it is active. A full pass over the four columns is one scan cycle.
//!
//! ```text
//!          col1  col2  col3  col4
//! row1      1     2     3     A
//! row2      4     5     6     B
//! row3      7     8     9     C
//! row4      0     F     E     D
//! ```
//!
//! A key is reported once it has been seen for `threshold` consecutive
//! scan cycles, and not again until it is released.

use crate::types::KeyEvent;

/// Keypad column driven during a scan step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    /// Column 1 (1, 4, 7, 0)
    C1,
    /// Column 2 (2, 5, 8, F)
    C2,
    /// Column 3 (3, 6, 9, E)
    C3,
    /// Column 4 (A, B, C, D)
    C4,
}

impl Column {
    /// Zero-based column index
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::C1 => 0,
            Self::C2 => 1,
            Self::C3 => 2,
            Self::C4 => 3,
        }
    }

    /// Column scanned after this one
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::C1 => Self::C2,
            Self::C2 => Self::C3,
            Self::C3 => Self::C4,
            Self::C4 => Self::C1,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Column {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "COL{}", self.index() + 1);
    }
}

const KEY_CODES: [[u8; 4]; 4] = [
    [0x1, 0x4, 0x7, 0x0],
    [0x2, 0x5, 0x8, 0xF],
    [0x3, 0x6, 0x9, 0xE],
    [0xA, 0xB, 0xC, 0xD],
];

/// Raw key code for a column and a row sample
///
/// `rows` has bit 0 for row 1 through bit 3 for row 4. Only a single
/// asserted row maps to a code.
#[must_use]
pub const fn key_code(column: Column, rows: u8) -> Option<u8> {
    let row = match rows & 0x0F {
        0x01 => 0,
        0x02 => 1,
        0x04 => 2,
        0x08 => 3,
        _ => return None,
    };
    Some(KEY_CODES[column.index()][row])
}

/// Row scan state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Power-on, moves to column 1
    #[default]
    Init,
    /// Column being scanned
    Scan(Column),
}

/// Row scanner: walks the columns and collects one code per cycle
#[derive(Clone, Debug, Default)]
pub struct RowScanner {
    state: ScanState,
    /// Code seen so far in the current cycle
    seen: Option<u8>,
}

impl RowScanner {
    /// Create a scanner in the INIT state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ScanState::Init,
            seen: None,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ScanState {
        self.state
    }

    /// Column to drive before sampling the rows
    #[must_use]
    pub const fn active_column(&self) -> Option<Column> {
        match self.state {
            ScanState::Init => None,
            ScanState::Scan(column) => Some(column),
        }
    }

    /// Feed the row sample for the active column
    ///
    /// Returns `Some(code)` at the end of a cycle, where `code` is the
    /// last key seen during that cycle (`None` if nothing was pressed).
    pub fn step(&mut self, rows: u8) -> Option<Option<u8>> {
        match self.state {
            ScanState::Init => {
                self.state = ScanState::Scan(Column::C1);
                None
            }
            ScanState::Scan(column) => {
                if let Some(code) = key_code(column, rows) {
                    self.seen = Some(code);
                }
                self.state = ScanState::Scan(column.next());
                if column == Column::C4 {
                    Some(self.seen.take())
                } else {
                    None
                }
            }
        }
    }
}

/// Consecutive-cycle debouncer
#[derive(Clone, Debug)]
pub struct KeyDebouncer {
    threshold: u8,
    candidate: Option<u8>,
    count: u8,
    reported: bool,
}

impl KeyDebouncer {
    /// Create a debouncer requiring `threshold` stable cycles (at least 1)
    #[must_use]
    pub const fn new(threshold: u8) -> Self {
        Self {
            threshold: if threshold == 0 { 1 } else { threshold },
            candidate: None,
            count: 0,
            reported: false,
        }
    }

    /// Feed the code seen in one scan cycle
    ///
    /// Returns the code once when it has been stable for the threshold.
    pub fn update(&mut self, code: Option<u8>) -> Option<u8> {
        if code != self.candidate {
            self.candidate = code;
            self.count = 0;
            self.reported = false;
        }
        let code = code?;

        self.count = self.count.saturating_add(1);
        if !self.reported && self.count >= self.threshold {
            self.reported = true;
            Some(code)
        } else {
            None
        }
    }
}

/// Scanner and debouncer combined into a key event source
#[derive(Clone, Debug)]
pub struct Keypad {
    scanner: RowScanner,
    debouncer: KeyDebouncer,
}

impl Keypad {
    /// Create a keypad with the given debounce threshold in scan cycles
    #[must_use]
    pub const fn new(debounce_cycles: u8) -> Self {
        Self {
            scanner: RowScanner::new(),
            debouncer: KeyDebouncer::new(debounce_cycles),
        }
    }

    /// Column to drive before sampling the rows
    #[must_use]
    pub const fn active_column(&self) -> Option<Column> {
        self.scanner.active_column()
    }

    /// Feed the row sample for the active column
    ///
    /// Returns a key event once per debounced press. Keys without a
    /// controller action (D, E, F) are swallowed.
    pub fn poll(&mut self, rows: u8) -> Option<KeyEvent> {
        let code = self.scanner.step(rows)?;
        self.debouncer.update(code).and_then(KeyEvent::from_code)
    }
}
