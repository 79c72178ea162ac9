/// Emit a progress event every this many records.
pub const PROGRESS_INTERVAL: usize = 10;

/// Whether record number `current` (1-based) out of `total` gets a progress line.
pub(crate) fn is_due(current: usize, total: usize) -> bool {
    current % PROGRESS_INTERVAL == 0 || current == total
}
