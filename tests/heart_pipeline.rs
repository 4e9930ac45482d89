use chaotic_heart::{PlotConfig, SequenceError, generate, render, save_image};

#[test]
fn test_every_term_within_bound() {
    for bound in [3usize, 4, 10, 999, 65_536] {
        let seqs = generate(bound).unwrap();
        assert_eq!(seqs.q_values().len(), bound);
        assert_eq!(seqs.a_values().len(), bound);

        let limit = bound as u32;
        for n in 1..=bound {
            assert!(seqs.q(n).unwrap() <= limit, "Q({n}) exceeds {bound}");
            assert!(seqs.a(n).unwrap() <= limit, "a({n}) exceeds {bound}");
        }
    }
}

#[test]
fn test_prefix_is_stable_across_bounds() {
    let short = generate(1_000).unwrap();
    let long = generate(10_000).unwrap();
    assert_eq!(short.q_values(), &long.q_values()[..1_000]);
    assert_eq!(short.a_values(), &long.a_values()[..1_000]);
}

#[test]
fn test_hundredth_terms() {
    let seqs = generate(1_000).unwrap();
    assert_eq!(seqs.q(100), Some(48));
    assert_eq!(seqs.a(100), Some(57));
    assert_eq!(seqs.q(1_000), Some(405));
    assert_eq!(seqs.a(1_000), Some(510));
    assert_eq!(seqs.q_values()[..100].iter().map(|&v| u64::from(v)).sum::<u64>(), 2701);
    assert_eq!(seqs.a_values()[..100].iter().map(|&v| u64::from(v)).sum::<u64>(), 2818);
}

#[test]
fn test_invalid_bound_surfaces_before_work() {
    let err = generate(2).unwrap_err();
    assert!(matches!(err, SequenceError::InvalidBound { bound: 2 }));
    assert!(err.to_string().contains("invalid bound 2"));
}

#[test]
fn test_render_and_save() {
    let config = PlotConfig {
        bound: 5_000,
        width: 400,
        height: 400,
        y_min: -500,
        y_max: 500,
        ..PlotConfig::default()
    };
    config.validate().unwrap();

    let seqs = generate(config.bound).unwrap();
    let canvas = render(&seqs, &config);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heart.png");
    save_image(&canvas, &path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (400, 400));
}
