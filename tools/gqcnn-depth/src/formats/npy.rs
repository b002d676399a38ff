//! NumPy `.npy` tensors (little-endian f32)
//!
//! # Layout
//! ```text
//! 0x00: magic "\x93NUMPY"
//! 0x06: major version u8, minor version u8
//! 0x08: header_len (little-endian)
//! 0x0A: header, a Python dict literal
//!       {'descr': '<f4', 'fortran_order': False, 'shape': (h, w, 1), }
//!       padded with spaces and ending in '\n'
//! var:  element data
//! ```

use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use ndarray_npy::{ReadNpyExt, WriteNpyError, WriteNpyExt};
use std::io::Write;

/// Write an f32 array of any dimensionality
pub fn write_npy_f32<W, S, D>(w: W, array: &ArrayBase<S, D>) -> Result<(), WriteNpyError>
where
    W: Write,
    S: Data<Elem = f32>,
    D: Dimension,
{
    array.write_npy(w)
}

/// Read an f32 `.npy` file of any shape
pub fn read_npy_f32(bytes: &[u8]) -> Result<ArrayD<f32>, String> {
    ArrayD::<f32>::read_npy(bytes).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array3};

    #[test]
    fn test_header_describes_depth_tensor() {
        let arr = Array3::<f32>::zeros((1000, 1000, 1));
        let mut out = Vec::new();
        write_npy_f32(&mut out, &arr).unwrap();

        assert_eq!(&out[..6], b"\x93NUMPY");
        let header_len = u16::from_le_bytes([out[8], out[9]]) as usize;
        let header = std::str::from_utf8(&out[10..10 + header_len]).unwrap();
        assert!(header.contains("'descr': '<f4'"));
        assert!(header.contains("'fortran_order': False"));
        assert!(header.contains("'shape': (1000, 1000, 1)"));
        assert!(header.ends_with('\n'));
        assert_eq!(out.len(), 10 + header_len + 1000 * 1000 * 4);
    }

    #[test]
    fn test_values_keep_logical_order() {
        let arr = Array3::from_shape_vec((2, 2, 1), vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
        // Transposed view must read back in its logical order
        let view = arr.view().permuted_axes([1, 0, 2]);
        let mut out = Vec::new();
        write_npy_f32(&mut out, &view).unwrap();

        let back = read_npy_f32(&out).unwrap();
        assert_eq!(back.shape(), &[2, 2, 1]);
        assert_eq!(back.iter().copied().collect::<Vec<_>>(), vec![1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn test_read_rejects_other_dtypes() {
        let mut out = Vec::new();
        Array1::<f64>::zeros(3).write_npy(&mut out).unwrap();
        assert!(read_npy_f32(&out).is_err());
    }

    #[test]
    fn test_read_rejects_truncated_data() {
        let mut out = Vec::new();
        write_npy_f32(&mut out, &Array1::<f32>::from(vec![1.0, 2.0])).unwrap();
        out.pop();
        assert!(read_npy_f32(&out).is_err());
    }
}
