//! Bulk GPIO output trait.

/// Bulk driver for the 8 logical LED lines.
///
/// Masks are in line order: bit `i` addresses line `i`. The sequencer
/// issues one set/clear pair per pattern transition; register writes are
/// assumed infallible, so the operations return nothing.
pub trait GpioOutput {
    /// Drive the lines in `mask` high.
    fn set_lines(&mut self, mask: u8);

    /// Drive the lines in `mask` low.
    fn clear_lines(&mut self, mask: u8);
}
