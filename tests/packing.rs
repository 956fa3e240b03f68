#![allow(non_snake_case)]

mod common;
use common::*;

use conekkt::algebra::*;
use conekkt::cones::*;
use float_eq::assert_float_eq;

fn all_dims() -> Vec<ConeDims> {
    let mut out = vec![];
    for &l in &[0, 3] {
        for q in [vec![], vec![1], vec![2, 3]] {
            for s in [vec![], vec![1], vec![2]] {
                out.push(ConeDims::new(l, q.clone(), s).unwrap());
            }
        }
    }
    out
}

#[test]
fn test_pack_unpack_roundtrip() {
    let mut rng = rng(5);
    for dims in all_dims() {
        for &mnl in &[0, 2] {
            for &offset in &[0, 4] {
                let x = random_unpacked(&mut rng, &dims, mnl);
                let mut y = vec![f64::NAN; offset + mnl + dims.numel_packed() + 1];
                pack(&x, &mut y, &dims, mnl, offset).unwrap();

                // entries outside the packed range are untouched
                assert!(y[..offset].iter().all(|v| v.is_nan()));
                assert!(y.last().unwrap().is_nan());

                let mut z = vec![0.; x.len()];
                unpack(&y, &mut z, &dims, mnl, offset).unwrap();
                assert_float_eq!(z, x, abs_all <= 1e-14);
            }
        }
    }
}

#[test]
fn test_pack_preserves_inner_product() {
    let mut rng = rng(6);
    let dims = ConeDims::new(2, vec![3], vec![1, 2, 4]).unwrap();
    let x = random_unpacked(&mut rng, &dims, 1);
    let y = random_unpacked(&mut rng, &dims, 1);

    let np = 1 + dims.numel_packed();
    let (mut xp, mut yp) = (vec![0.; np], vec![0.; np]);
    pack(&x, &mut xp, &dims, 1, 0).unwrap();
    pack(&y, &mut yp, &dims, 1, 0).unwrap();

    assert_float_eq!(xp.dot(&yp), x.dot(&y), abs <= 1e-12);
}

#[test]
fn test_cone_block_order() {
    let dims = ConeDims::new(2, vec![3, 1], vec![2]).unwrap();
    let blocks: Vec<ConeBlock> = dims.blocks().collect();
    assert_eq!(
        blocks,
        vec![
            ConeBlock::Nonnegative(2),
            ConeBlock::SecondOrder(3),
            ConeBlock::SecondOrder(1),
            ConeBlock::PSDTriangle(2),
        ]
    );
    assert!(matches!(
        ConeDims::new(0, vec![0], vec![]),
        Err(DimensionError::BadCone(_))
    ));
}
