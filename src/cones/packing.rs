#![allow(non_snake_case)]

use super::{ConeBlock, ConeDims};
use crate::algebra::*;

/// Writes the unpacked vector `src` into `dst[offset..offset + mnl + Npacked]`
/// in packed layout.
///
/// `src` must have length exactly `mnl + Nunpacked`.  The leading `mnl`
/// nonlinear entries and the orthant and second order blocks are copied
/// verbatim.  Each semidefinite block is read through its lower triangle.
/// Entries of `dst` outside the packed range are not touched.
pub fn pack<T>(
    src: &[T],
    dst: &mut [T],
    dims: &ConeDims,
    mnl: usize,
    offset: usize,
) -> Result<(), DimensionError>
where
    T: FloatT,
{
    let needed = mnl + dims.numel_packed();
    check_length("src", src, mnl + dims.numel_unpacked())?;
    check_offset("dst", dst, offset, needed)?;

    let dst = &mut dst[offset..offset + needed];
    let nlin = mnl + dims.numel_linear();
    dst[..nlin].copy_from_slice(&src[..nlin]);

    let (mut iu, mut ip) = (nlin, nlin);
    for block in dims.blocks() {
        if let ConeBlock::PSDTriangle(k) = block {
            let (nu, np) = (block.numel_unpacked(), block.numel_packed());
            pack_triangle(&src[iu..iu + nu], &mut dst[ip..ip + np], k);
            iu += nu;
            ip += np;
        }
    }
    Ok(())
}

/// Reads the packed vector `src[offset..offset + mnl + Npacked]` and writes
/// it to `dst` in unpacked layout.
///
/// `dst` must have length exactly `mnl + Nunpacked`.  Semidefinite blocks
/// are written in full, with the lower triangle mirrored to the upper.
pub fn unpack<T>(
    src: &[T],
    dst: &mut [T],
    dims: &ConeDims,
    mnl: usize,
    offset: usize,
) -> Result<(), DimensionError>
where
    T: FloatT,
{
    let needed = mnl + dims.numel_packed();
    check_offset("src", src, offset, needed)?;
    check_length("dst", dst, mnl + dims.numel_unpacked())?;

    let src = &src[offset..offset + needed];
    let nlin = mnl + dims.numel_linear();
    dst[..nlin].copy_from_slice(&src[..nlin]);

    let (mut iu, mut ip) = (nlin, nlin);
    for block in dims.blocks() {
        if let ConeBlock::PSDTriangle(k) = block {
            let (nu, np) = (block.numel_unpacked(), block.numel_packed());
            unpack_triangle(&src[ip..ip + np], &mut dst[iu..iu + nu], k);
            iu += nu;
            ip += np;
        }
    }
    Ok(())
}

/// Fills the symmetric matrix `M` from its packed representation `x`.
pub fn svec_to_mat<T>(M: &mut Matrix<T>, x: &[T])
where
    T: FloatT,
{
    let k = M.nrows();
    assert!(M.is_square() && x.len() == triangular_number(k));
    unpack_triangle(x, M.data_mut(), k);
}

/// Writes the packed representation of the symmetric matrix `M` to `x`.
/// Only the lower triangle of `M` is referenced.
pub fn mat_to_svec<T>(x: &mut [T], M: &Matrix<T>)
where
    T: FloatT,
{
    let k = M.nrows();
    assert!(M.is_square() && x.len() == triangular_number(k));
    pack_triangle(M.data(), x, k);
}

// column major k × k  ->  packed lower triangle
fn pack_triangle<T: FloatT>(src: &[T], dst: &mut [T], k: usize) {
    let sqrt2 = T::SQRT_2();
    let mut ip = 0;
    for col in 0..k {
        dst[ip] = src[col + col * k];
        for row in (col + 1)..k {
            ip += 1;
            dst[ip] = src[row + col * k] * sqrt2;
        }
        ip += 1;
    }
}

// packed lower triangle  ->  column major k × k, both triangles
fn unpack_triangle<T: FloatT>(src: &[T], dst: &mut [T], k: usize) {
    let isqrt2 = T::FRAC_1_SQRT_2();
    let mut ip = 0;
    for col in 0..k {
        dst[col + col * k] = src[ip];
        for row in (col + 1)..k {
            ip += 1;
            let v = src[ip] * isqrt2;
            dst[row + col * k] = v;
            dst[col + row * k] = v;
        }
        ip += 1;
    }
}

fn check_length<T>(name: &'static str, v: &[T], expected: usize) -> Result<(), DimensionError> {
    if v.len() != expected {
        return Err(DimensionError::VectorLength {
            name,
            expected,
            found: v.len(),
        });
    }
    Ok(())
}

fn check_offset<T>(
    name: &'static str,
    v: &[T],
    offset: usize,
    needed: usize,
) -> Result<(), DimensionError> {
    if offset + needed > v.len() {
        return Err(DimensionError::Offset {
            name,
            len: v.len(),
            offset,
            needed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_psd_block() {
        let dims = ConeDims::new(1, vec![], vec![2]).unwrap();

        // [7 | 1 2; 2 3], column major
        let x = vec![7., 1., 2., 2., 3.];
        let mut y = vec![0.; 4];
        pack(&x, &mut y, &dims, 0, 0).unwrap();
        let s2 = f64::sqrt(2.);
        assert_eq!(y, vec![7., 1., 2. * s2, 3.]);

        // packed inner product matches the Frobenius one
        let frob: f64 = x.iter().map(|v| v * v).sum();
        assert!((y.dot(&y) - frob).abs() < 1e-12);
    }

    #[test]
    fn test_pack_reads_lower_triangle() {
        let dims = ConeDims::new(0, vec![], vec![2]).unwrap();
        let x = vec![1., 2., f64::NAN, 3.];
        let mut y = vec![0.; 3];
        pack(&x, &mut y, &dims, 0, 0).unwrap();
        assert!(y.is_finite());

        let mut z = vec![0.; 4];
        unpack(&y, &mut z, &dims, 0, 0).unwrap();
        assert!(z.norm_inf_diff(&[1., 2., 2., 3.]) < 1e-15);
    }

    #[test]
    fn test_pack_offset() {
        let dims = ConeDims::new(1, vec![2], vec![]).unwrap();
        let mnl = 1;
        let x = vec![1., 2., 3., 4.];
        let mut y = vec![-1.; 7];
        pack(&x, &mut y, &dims, mnl, 2).unwrap();
        assert_eq!(y, vec![-1., -1., 1., 2., 3., 4., -1.]);

        let mut z = vec![0.; 4];
        unpack(&y, &mut z, &dims, mnl, 2).unwrap();
        assert_eq!(z, x);
    }

    #[test]
    fn test_pack_dimension_errors() {
        let dims = ConeDims::new(2, vec![], vec![2]).unwrap();
        let x = vec![0.; 6];
        let mut y = vec![0.; 5];

        assert!(pack(&x, &mut y, &dims, 0, 0).is_ok());
        assert_eq!(
            pack(&x[..5], &mut y, &dims, 0, 0),
            Err(DimensionError::VectorLength {
                name: "src",
                expected: 6,
                found: 5
            })
        );
        assert!(matches!(
            pack(&x, &mut y, &dims, 0, 1),
            Err(DimensionError::Offset { .. })
        ));

        let mut z = vec![0.; 7];
        assert!(matches!(
            unpack(&y, &mut z, &dims, 0, 0),
            Err(DimensionError::VectorLength { name: "dst", .. })
        ));
    }

    #[test]
    fn test_svec_mat() {
        #[rustfmt::skip]
        let M = Matrix::from(&[
            [1., 2., 4.],
            [2., 3., 5.],
            [4., 5., 6.],
        ]);
        let mut x = vec![0.; 6];
        mat_to_svec(&mut x, &M);

        let mut X = Matrix::<f64>::zeros((3, 3));
        svec_to_mat(&mut X, &x);
        assert!(X.data().norm_inf_diff(M.data()) < 1e-14);
        assert!(X.is_symmetric(0.));
    }
}
