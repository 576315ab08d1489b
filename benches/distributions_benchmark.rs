use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_tail_probabilities(c: &mut Criterion) {
    let ts: Vec<f64> = (0..10_000).map(|i| (i as f64) * 0.002 - 10.0).collect();

    c.bench_function("stdtr_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &t in &ts {
                acc += u_distfn::continuous::stdtr(7.0, t).unwrap();
            }
            black_box(acc)
        })
    });

    c.bench_function("zprob_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &z in &ts {
                acc += u_distfn::continuous::zprob(z).unwrap();
            }
            black_box(acc)
        })
    });

    let ks: Vec<f64> = (0..10_000).map(|i| (i % 50) as f64).collect();
    c.bench_function("bdtr_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &k in &ks {
                acc += u_distfn::discrete::bdtr(k, 60.0, 0.3).unwrap();
            }
            black_box(acc)
        })
    });

    c.bench_function("pdtr_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &k in &ks {
                acc += u_distfn::discrete::pdtr(k, 12.5).unwrap();
            }
            black_box(acc)
        })
    });
}

fn bench_inverses(c: &mut Criterion) {
    let ps: Vec<f64> = (0..1_000).map(|i| ((i as f64) + 0.5) / 1_000.0).collect();

    c.bench_function("stdtri_1k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &p in &ps {
                acc += u_distfn::inverse::stdtri(7.0, p).unwrap();
            }
            black_box(acc)
        })
    });

    c.bench_function("fdtri_1k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for &p in &ps {
                acc += u_distfn::inverse::fdtri(4.0, 12.0, p).unwrap();
            }
            black_box(acc)
        })
    });

    c.bench_function("theoretical_quantiles_normal_1k", |b| {
        b.iter(|| {
            let q = u_distfn::quantiles::theoretical_quantiles(
                1_000,
                u_distfn::quantiles::QuantileDistribution::Normal,
            )
            .unwrap();
            black_box(q)
        })
    });
}

criterion_group!(benches, bench_tail_probabilities, bench_inverses);
criterion_main!(benches);
