//! Fallible buffer allocation
//!
//! Sizes come from file headers, so allocations go through
//! `try_reserve_exact` and surface as `AllocationError` instead of aborting.

use crate::tiff::errors::{TiffError, TiffResult};

/// Allocates a vector of `len` default values
pub fn try_alloc<T: Clone + Default>(len: usize, what: &str) -> TiffResult<Vec<T>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|e| TiffError::AllocationError(format!(
        "could not allocate {} elements for {}: {}", len, what, e)))?;
    buffer.resize(len, T::default());
    Ok(buffer)
}

/// Multiplies sizes, failing with `AllocationError` on overflow
pub fn checked_size(a: u64, b: u64, what: &str) -> TiffResult<u64> {
    a.checked_mul(b).ok_or_else(|| TiffError::AllocationError(format!(
        "{} size {} x {} overflows", what, a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_zeroed() {
        let buffer: Vec<f32> = try_alloc(4, "test").unwrap();
        assert_eq!(buffer, vec![0.0; 4]);
    }

    #[test]
    fn reports_overflow() {
        assert!(checked_size(u64::MAX, 2, "strip buffer").is_err());
        assert_eq!(checked_size(3, 4, "strip buffer").unwrap(), 12);
    }

    #[test]
    fn reports_impossible_allocation() {
        assert!(matches!(try_alloc::<u64>(usize::MAX, "test"), Err(TiffError::AllocationError(_))));
    }
}
