use anyhow::Result;

use crate::semirings::*;
use crate::KDELTA;

/// Checks the semiring laws on a list of sample values.
fn check_semiring_laws<W: Semiring>(samples: &[W]) -> Result<()> {
    for a in samples {
        assert!(a.plus(W::zero())?.approx_equal(a, KDELTA));
        assert!(W::zero().plus(a)?.approx_equal(a, KDELTA));
        assert!(a.times(W::one())?.approx_equal(a, KDELTA));
        assert!(W::one().times(a)?.approx_equal(a, KDELTA));
        assert!(a.times(W::zero())?.approx_equal(W::zero(), KDELTA));
        assert!(W::zero().times(a)?.approx_equal(W::zero(), KDELTA));

        if W::properties().contains(SemiringProperties::IDEMPOTENT) {
            assert!(a.plus(a)?.approx_equal(a, KDELTA));
        }
    }

    for a in samples {
        for b in samples {
            if W::properties().contains(SemiringProperties::COMMUTATIVE) {
                assert!(a.times(b)?.approx_equal(b.times(a)?, KDELTA));
            }
            assert!(a.plus(b)?.approx_equal(b.plus(a)?, KDELTA));

            for c in samples {
                // Associativity up to quantization.
                assert!(a
                    .plus(b)?
                    .plus(c)?
                    .approx_equal(a.plus(b.plus(c)?)?, KDELTA));
                assert!(a
                    .times(b)?
                    .times(c)?
                    .approx_equal(a.times(b.times(c)?)?, KDELTA));
            }
        }
    }
    Ok(())
}

fn float_samples<W: Semiring<Type = f32>>() -> Vec<W> {
    vec![W::zero(), W::one(), W::new(0.25), W::new(1.5), W::new(3.0)]
}

#[test]
fn test_laws_tropical() -> Result<()> {
    check_semiring_laws(&float_samples::<TropicalWeight>())
}

#[test]
fn test_laws_log() -> Result<()> {
    check_semiring_laws(&float_samples::<LogWeight>())
}

#[test]
fn test_laws_probability() -> Result<()> {
    check_semiring_laws(&float_samples::<ProbabilityWeight>())
}

#[test]
fn test_laws_minmax() -> Result<()> {
    check_semiring_laws(&float_samples::<MinMaxWeight>())
}

#[test]
fn test_laws_boolean() -> Result<()> {
    check_semiring_laws(&[
        BooleanWeight::zero(),
        BooleanWeight::one(),
        BooleanWeight::new(true),
        BooleanWeight::new(false),
    ])
}

#[test]
fn test_laws_integer() -> Result<()> {
    check_semiring_laws(&[
        IntegerWeight::zero(),
        IntegerWeight::one(),
        IntegerWeight::new(2),
        IntegerWeight::new(5),
    ])
}

#[test]
fn test_laws_product() -> Result<()> {
    type W = ProductWeight<TropicalWeight, LogWeight>;
    let samples: Vec<W> = vec![
        W::zero(),
        W::one(),
        W::new((TropicalWeight::new(1.0), LogWeight::new(2.0))),
        W::new((TropicalWeight::new(0.5), LogWeight::new(0.25))),
    ];
    check_semiring_laws(&samples)
}

#[test]
fn test_laws_signed_log() -> Result<()> {
    let samples = vec![
        SignedLogWeight::zero(),
        SignedLogWeight::one(),
        SignedLogWeight::new_signed(true, LogWeight::new(1.0)),
        SignedLogWeight::new_signed(false, LogWeight::new(2.0)),
    ];
    check_semiring_laws(&samples)
}

#[test]
fn test_laws_string_restrict() -> Result<()> {
    // Restricted ⊕ errors on distinct strings, so stick to compatible values.
    let samples = vec![
        StringWeightRestrict::zero(),
        StringWeightRestrict::from(vec![1, 2]),
    ];
    check_semiring_laws(&samples)
}

#[test]
fn test_laws_expectation() -> Result<()> {
    // Both components share the real encoding so the identities line up.
    type W = ExpectationWeight<ProbabilityWeight, ProbabilityWeight>;
    let samples = vec![
        W::zero(),
        W::one(),
        W::new((ProbabilityWeight::new(0.5), ProbabilityWeight::new(2.0))),
        W::new((ProbabilityWeight::new(0.25), ProbabilityWeight::new(0.1))),
    ];
    check_semiring_laws(&samples)
}

#[test]
fn test_weight_quantize_idempotent() -> Result<()> {
    let w = TropicalWeight::new(1.2345);
    let q1 = w.quantize(KDELTA)?;
    let q2 = q1.quantize(KDELTA)?;
    assert_eq!(*q1.value(), *q2.value());
    Ok(())
}
