use noding::{
    IntersectionAdder, McIndexNoder, Noder, NodingValidator, Point, ScaledNoder,
    SegmentString, SegmentStringDissolver, SimpleNoder,
};
use ordered_float::NotNan;
use proptest::{
    arbitrary::any,
    prelude::prop,
    prop_assert, prop_assert_eq, prop_oneof, proptest,
    strategy::{Just, Strategy},
};

type Float = NotNan<f64>;

#[derive(Clone, Copy, Debug)]
enum FloatPerturbation {
    /// Perturb by between -128 and 127 ulps.
    Ulp(i8),
    /// Perturb by a bounded additive amount.
    Eps(f64),
}

impl FloatPerturbation {
    fn apply(&self, f: Float) -> Float {
        match self {
            FloatPerturbation::Ulp(n) => {
                let same_sign = (*n > 0) == (f.into_inner() > 0.0);
                let sign_bit = 1 << 63;
                match f.classify() {
                    std::num::FpCategory::Nan => unreachable!(),
                    std::num::FpCategory::Infinite => f,
                    std::num::FpCategory::Zero => {
                        let mut bits = n.unsigned_abs() as u64;
                        if *n < 0 {
                            bits |= sign_bit;
                        }
                        Float::new(f64::from_bits(bits)).unwrap()
                    }
                    std::num::FpCategory::Subnormal => {
                        let bits = f.abs().to_bits();
                        let bits = if same_sign {
                            bits + n.unsigned_abs() as u64
                        } else {
                            bits.abs_diff(n.unsigned_abs() as u64)
                        };
                        Float::new(f.signum() * f64::from_bits(bits)).unwrap()
                    }
                    std::num::FpCategory::Normal => {
                        let delta = if same_sign {
                            (*n as i64).abs()
                        } else {
                            -(*n as i64).abs()
                        };
                        let bits = f.abs().to_bits().checked_add_signed(delta).unwrap();
                        Float::new(f.signum() * f64::from_bits(bits)).unwrap()
                    }
                }
            }
            FloatPerturbation::Eps(x) => f + x,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PointPerturbation {
    x: FloatPerturbation,
    y: FloatPerturbation,
}

impl PointPerturbation {
    fn apply(&self, p: Point) -> Point {
        Point {
            x: self.x.apply(p.x),
            y: self.y.apply(p.y),
            z: p.z,
        }
    }
}

#[derive(Clone, Debug)]
enum Perturbation {
    Base {
        idx: usize,
    },
    Point {
        perturbation: PointPerturbation,
        idx: usize,
        next: Box<Perturbation>,
    },
    Subdivision {
        // Strictly between 0.0 and 1.0, so that the new point is distinct
        // from its neighbors.
        t: f64,
        idx: usize,
        next: Box<Perturbation>,
    },
    Superimposition {
        left: Box<Perturbation>,
        right: Box<Perturbation>,
    },
}

fn float_perturbation(eps: f64) -> impl Strategy<Value = FloatPerturbation> {
    prop_oneof![
        any::<i8>().prop_map(FloatPerturbation::Ulp),
        (-eps..=eps).prop_map(FloatPerturbation::Eps)
    ]
}

fn point_perturbation(eps: f64) -> impl Strategy<Value = PointPerturbation> {
    (float_perturbation(eps), float_perturbation(eps)).prop_map(|(x, y)| PointPerturbation { x, y })
}

fn perturbation(eps: f64) -> impl Strategy<Value = Perturbation> {
    let leaf = any::<usize>().prop_map(|idx| Perturbation::Base { idx });
    leaf.prop_recursive(3, 16, 8, move |inner| {
        prop_oneof![
            (point_perturbation(eps), any::<usize>(), inner.clone()).prop_map(
                |(perturbation, idx, next)| {
                    Perturbation::Point {
                        perturbation,
                        idx,
                        next: Box::new(next),
                    }
                }
            ),
            (0.1..0.9, any::<usize>(), inner.clone()).prop_map(|(t, idx, next)| {
                Perturbation::Subdivision {
                    t,
                    idx,
                    next: Box::new(next),
                }
            }),
            (inner.clone(), inner.clone()).prop_map(|(left, right)| {
                Perturbation::Superimposition {
                    left: Box::new(left),
                    right: Box::new(right),
                }
            })
        ]
    })
}

fn index<T>(arr: &[T], idx: usize) -> &T {
    &arr[idx % arr.len()]
}

fn index_mut<T>(arr: &mut [T], idx: usize) -> &mut T {
    &mut arr[idx % arr.len()]
}

fn realize_perturbation(base_cases: &[Vec<Point>], pert: &Perturbation) -> Vec<Point> {
    match pert {
        Perturbation::Base { idx } => index(base_cases, *idx).to_owned(),
        Perturbation::Point {
            perturbation,
            idx,
            next,
        } => {
            let mut next = realize_perturbation(base_cases, next);
            let p = index_mut(&mut next, *idx);
            *p = perturbation.apply(*p);
            next
        }
        Perturbation::Subdivision { t, idx, next } => {
            let mut next = realize_perturbation(base_cases, next);
            let idx = *idx % next.len();
            let p0 = *index(&next, idx);
            let p1 = *index(&next, idx + 1);
            next.insert(idx + 1, p0.affine(&p1, *t).unwrap());
            next
        }
        Perturbation::Superimposition { left, right } => {
            let mut next = realize_perturbation(base_cases, left);
            next.extend(realize_perturbation(base_cases, right));
            next
        }
    }
}

fn pt(x: f64, y: f64) -> Point {
    Point::try_new(x, y).unwrap()
}

fn base_cases() -> Vec<Vec<Point>> {
    vec![
        vec![
            pt(0.0, 0.0),
            pt(1.0, 1.0),
            pt(1.0, -1.0),
            pt(2.0, 0.0),
            pt(1.0, 1.0),
            pt(1.0, -1.0),
        ],
        vec![pt(0.0, 0.0), pt(2.0, 0.0), pt(2.0, 2.0), pt(0.0, 2.0), pt(0.0, 0.0)],
        vec![pt(-1.0, 1.0), pt(3.0, 1.0)],
    ]
}

/// Turns polylines into segment strings, labelled by their position. Zero-length
/// segments are removed, and anything that collapses to a point is skipped.
fn segment_strings(lines: &[Vec<Point>]) -> Vec<SegmentString<usize>> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, pts)| {
            let mut pts = pts.clone();
            pts.dedup_by(|p, q| p.eq_2d(q));
            SegmentString::new(pts, i).ok()
        })
        .collect()
}

/// A canonical description of noded output, for comparing outputs as sets.
fn describe(strings: &[SegmentString<usize>]) -> Vec<String> {
    let mut ret: Vec<_> = strings
        .iter()
        .map(|s| format!("{} {:?}", s.data(), s.coordinates()))
        .collect();
    ret.sort();
    ret
}

fn simple_noder() -> SimpleNoder<usize, IntersectionAdder> {
    SimpleNoder::new(IntersectionAdder::new())
}

fn mc_noder() -> McIndexNoder<usize, IntersectionAdder> {
    McIndexNoder::new(IntersectionAdder::new())
}

const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Polylines on the integer grid whose segments are all horizontal, vertical or
/// diagonal. All of their intersections are exactly representable, so noding
/// them doesn't have to round anything.
fn grid_polyline() -> impl Strategy<Value = Vec<Point>> {
    (
        (-4i32..=4, -4i32..=4),
        prop::collection::vec((0usize..8, 1i32..=3), 1..5),
    )
        .prop_map(|((x, y), steps)| {
            let mut pts = vec![pt(x as f64, y as f64)];
            let (mut x, mut y) = (x, y);
            for (dir, len) in steps {
                let (dx, dy) = DIRECTIONS[dir];
                x += dx * len;
                y += dy * len;
                pts.push(pt(x as f64, y as f64));
            }
            pts
        })
}

/// Doesn't do anything, so that the scaling in a `ScaledNoder` can be checked by itself.
struct IdentityNoder<D> {
    strings: Vec<SegmentString<D>>,
}

impl<D> IdentityNoder<D> {
    fn new() -> Self {
        IdentityNoder {
            strings: Vec::new(),
        }
    }
}

impl<D> Noder<D> for IdentityNoder<D> {
    fn compute_nodes(&mut self, strings: Vec<SegmentString<D>>) -> noding::Result<()> {
        self.strings = strings;
        Ok(())
    }

    fn noded_substrings(&mut self) -> noding::Result<Vec<SegmentString<D>>> {
        Ok(std::mem::take(&mut self.strings))
    }
}

#[test]
fn crossing() {
    let input = vec![
        SegmentString::from_xy([(0.0, 0.0), (10.0, 10.0)], 0).unwrap(),
        SegmentString::from_xy([(0.0, 10.0), (10.0, 0.0)], 1).unwrap(),
    ];
    let expected = vec![
        "0 [(0.0, 0.0), (5.0, 5.0)]",
        "0 [(5.0, 5.0), (10.0, 10.0)]",
        "1 [(0.0, 10.0), (5.0, 5.0)]",
        "1 [(5.0, 5.0), (10.0, 0.0)]",
    ];

    let mut simple = simple_noder();
    assert_eq!(describe(&simple.node(input.clone()).unwrap()), expected);
    assert_eq!(simple.intersector().stats().num_proper_intersections, 2);

    let mut mc = mc_noder();
    assert_eq!(describe(&mc.node(input).unwrap()), expected);
    assert_eq!(mc.intersector().stats().num_proper_intersections, 1);
}

#[test]
fn spike() {
    let input = vec![SegmentString::from_xy(
        [(0.0, 0.0), (5.0, 0.0), (0.0, 0.0), (5.0, 0.0), (10.0, 0.0)],
        0,
    )
    .unwrap()];
    let out = mc_noder().node(input).unwrap();
    assert!(NodingValidator::new(&out).is_valid());
    assert_eq!(
        describe(&out),
        vec![
            "0 [(0.0, 0.0), (5.0, 0.0)]",
            "0 [(0.0, 0.0), (5.0, 0.0)]",
            "0 [(5.0, 0.0), (0.0, 0.0)]",
            "0 [(5.0, 0.0), (10.0, 0.0)]",
        ]
    );
}

#[test]
fn zero_length_strings() {
    let input = vec![
        SegmentString::from_xy([(1.0, 1.0), (1.0, 1.0)], 0).unwrap(),
        SegmentString::from_xy([(2.0, 0.0), (2.0, 0.0)], 1).unwrap(),
        SegmentString::from_xy([(0.0, 0.0), (5.0, 0.0)], 2).unwrap(),
    ];
    let expected = vec![
        "0 [(1.0, 1.0), (1.0, 1.0)]",
        "1 [(2.0, 0.0), (2.0, 0.0)]",
        "2 [(0.0, 0.0), (2.0, 0.0)]",
        "2 [(2.0, 0.0), (5.0, 0.0)]",
    ];
    assert_eq!(describe(&simple_noder().node(input.clone()).unwrap()), expected);
    assert_eq!(describe(&mc_noder().node(input).unwrap()), expected);
}

#[test]
fn repeated_first_vertex_survives() {
    let input = vec![SegmentString::from_xy([(0.0, 0.0), (0.0, 0.0), (5.0, 0.0)], 0).unwrap()];
    let out = mc_noder().node(input).unwrap();
    assert_eq!(describe(&out), vec!["0 [(0.0, 0.0), (0.0, 0.0), (5.0, 0.0)]"]);
}

#[test]
fn overlapping_lines_dissolve() {
    let input = vec![
        SegmentString::from_xy([(0.0, 0.0), (10.0, 0.0)], 0).unwrap(),
        SegmentString::from_xy([(15.0, 0.0), (5.0, 0.0)], 1).unwrap(),
    ];
    let out = mc_noder().node(input).unwrap();
    assert_eq!(out.len(), 4);

    let mut merges = Vec::new();
    let mut dissolver = SegmentStringDissolver::with_merger(|_, dup: &SegmentString<usize>, same| {
        merges.push((*dup.data(), same));
    });
    dissolver.dissolve(out);
    let dissolved = dissolver.into_result();
    assert_eq!(
        describe(&dissolved),
        vec![
            "0 [(0.0, 0.0), (5.0, 0.0)]",
            "0 [(5.0, 0.0), (10.0, 0.0)]",
            "1 [(15.0, 0.0), (10.0, 0.0)]",
        ]
    );
    assert_eq!(merges, vec![(1, false)]);
}

#[test]
fn dissolving_a_reversed_path() {
    let mut calls = Vec::new();
    let mut dissolver = SegmentStringDissolver::with_merger(|_, _, same| calls.push(same));
    dissolver.dissolve([
        SegmentString::from_xy([(0.0, 0.0), (1.0, 1.0)], ()).unwrap(),
        SegmentString::from_xy([(1.0, 1.0), (0.0, 0.0)], ()).unwrap(),
    ]);
    assert_eq!(dissolver.len(), 1);
    drop(dissolver);
    assert_eq!(calls, vec![false]);
}

#[test]
fn scaled_identity() {
    let input = segment_strings(&base_cases());
    let mut noder = ScaledNoder::new(IdentityNoder::<usize>::new(), 1.0).unwrap();
    let out = noder.node(input.clone()).unwrap();
    assert_eq!(describe(&out), describe(&input));
}

proptest! {
    #[test]
    fn simple_and_indexed_agree(perturbations in prop::collection::vec(perturbation(0.1), 1..5)) {
        let base = base_cases();
        let lines: Vec<_> = perturbations.iter().map(|p| realize_perturbation(&base, p)).collect();
        let input = segment_strings(&lines);

        let simple = simple_noder().node(input.clone()).unwrap();
        let mc = mc_noder().node(input).unwrap();
        prop_assert_eq!(describe(&simple), describe(&mc));
    }

    #[test]
    fn grid_output_is_fully_noded(lines in prop::collection::vec(grid_polyline(), 1..6)) {
        let input = segment_strings(&lines);
        for out in [
            simple_noder().node(input.clone()).unwrap(),
            mc_noder().node(input.clone()).unwrap(),
        ] {
            prop_assert_eq!(NodingValidator::new(&out).check_valid(), Ok(()));
        }
    }

    #[test]
    fn grid_noding_is_idempotent(lines in prop::collection::vec(grid_polyline(), 1..6)) {
        let once = mc_noder().node(segment_strings(&lines)).unwrap();
        let twice = mc_noder().node(once.clone()).unwrap();
        prop_assert_eq!(describe(&once), describe(&twice));
    }

    #[test]
    fn scaled_round_trip(
        pts in prop::collection::vec((0.05..0.95f64, -100.0..100.0f64), 2..10),
        scale in prop_oneof![Just(1000.0), Just(64.0)],
    ) {
        // The x coordinates are at least 0.1 apart, so no two points round together.
        let pts: Vec<_> = pts
            .iter()
            .enumerate()
            .map(|(i, &(dx, y))| pt(i as f64 + dx, y))
            .collect();
        let input = vec![SegmentString::new(pts.clone(), 0usize).unwrap()];
        let mut noder = ScaledNoder::new(IdentityNoder::<usize>::new(), scale).unwrap();
        let out = noder.node(input).unwrap();

        prop_assert_eq!(out.len(), 1);
        let tolerance = 0.5 / scale + 1e-9;
        for (p, q) in pts.iter().zip(out[0].coordinates()) {
            let (px, py) = p.xy();
            let (qx, qy) = q.xy();
            prop_assert!((px - qx).abs() <= tolerance, "{p:?} vs {q:?}");
            prop_assert!((py - qy).abs() <= tolerance, "{p:?} vs {q:?}");
        }
    }
}
