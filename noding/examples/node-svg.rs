use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kurbo::DEFAULT_ACCURACY;
use noding::{Envelope, NoderConfig, Point, SegmentString, SegmentStringDissolver};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Simple,
    McIndex,
}

#[derive(Parser)]
struct Args {
    input: PathBuf,
    output: PathBuf,

    #[arg(long, value_enum, default_value = "mc-index")]
    strategy: Strategy,

    /// Round coordinates to a grid with this many cells per unit before noding.
    #[arg(long)]
    scale: Option<f64>,

    /// Merge noded edges that have the same coordinates.
    #[arg(long)]
    dissolve: bool,
}

/// Which path (counting in document order) a string came from.
type PathIdx = usize;

fn svg_to_strings(tree: &usvg::Tree) -> anyhow::Result<Vec<SegmentString<PathIdx>>> {
    fn pt(p: usvg::tiny_skia_path::Point) -> kurbo::Point {
        kurbo::Point::new(p.x as f64, p.y as f64)
    }

    fn finish(
        points: &mut Vec<Point>,
        path_idx: PathIdx,
        ret: &mut Vec<SegmentString<PathIdx>>,
    ) -> anyhow::Result<()> {
        points.dedup_by(|p, q| p.eq_2d(q));
        if points.len() > 1 {
            ret.push(SegmentString::new(std::mem::take(points), path_idx)?);
        }
        points.clear();
        Ok(())
    }

    fn add_group(
        group: &usvg::Group,
        ret: &mut Vec<SegmentString<PathIdx>>,
        path_idx: &mut PathIdx,
    ) -> anyhow::Result<()> {
        for child in group.children() {
            match child {
                usvg::Node::Group(group) => add_group(group, ret, path_idx)?,
                usvg::Node::Path(path) => {
                    let kurbo_els = path.data().segments().map(|seg| match seg {
                        usvg::tiny_skia_path::PathSegment::MoveTo(p) => {
                            kurbo::PathEl::MoveTo(pt(p))
                        }
                        usvg::tiny_skia_path::PathSegment::LineTo(p) => {
                            kurbo::PathEl::LineTo(pt(p))
                        }
                        usvg::tiny_skia_path::PathSegment::QuadTo(p0, p1) => {
                            kurbo::PathEl::QuadTo(pt(p0), pt(p1))
                        }
                        usvg::tiny_skia_path::PathSegment::CubicTo(p0, p1, p2) => {
                            kurbo::PathEl::CurveTo(pt(p0), pt(p1), pt(p2))
                        }
                        usvg::tiny_skia_path::PathSegment::Close => kurbo::PathEl::ClosePath,
                    });

                    // `kurbo::flatten` takes an infallible callback, so the
                    // first error is stashed and reported afterwards.
                    let mut points = Vec::<Point>::new();
                    let mut result: anyhow::Result<()> = Ok(());
                    kurbo::flatten(kurbo_els, DEFAULT_ACCURACY, |el| {
                        if result.is_err() {
                            return;
                        }
                        result = match el {
                            kurbo::PathEl::MoveTo(p) => {
                                finish(&mut points, *path_idx, ret).and_then(|()| {
                                    points.push(Point::try_new(p.x, p.y)?);
                                    Ok(())
                                })
                            }
                            kurbo::PathEl::LineTo(p) => {
                                Point::try_new(p.x, p.y).map(|p| points.push(p)).map_err(Into::into)
                            }
                            kurbo::PathEl::ClosePath => {
                                if let Some(&first) = points.first() {
                                    points.push(first);
                                }
                                finish(&mut points, *path_idx, ret)
                            }
                            kurbo::PathEl::QuadTo(..) | kurbo::PathEl::CurveTo(..) => {
                                unreachable!()
                            }
                        };
                    });
                    result?;
                    finish(&mut points, *path_idx, ret)?;
                    *path_idx += 1;
                }
                _ => {}
            }
        }
        Ok(())
    }

    let mut ret = Vec::new();
    add_group(tree.root(), &mut ret, &mut 0)?;
    Ok(ret)
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let input = std::fs::read_to_string(&args.input)?;
    let tree = usvg::Tree::from_str(&input, &usvg::Options::default())?;
    let strings = svg_to_strings(&tree)?;

    let mut config = match args.strategy {
        Strategy::Simple => NoderConfig::Simple,
        Strategy::McIndex => NoderConfig::default(),
    };
    if let Some(scale) = args.scale {
        config = NoderConfig::Scaled {
            scale,
            offset_x: 0.0,
            offset_y: 0.0,
            inner: Box::new(config),
        };
    }

    let num_input = strings.len();
    let mut noder = config.build::<PathIdx>()?;
    let mut edges = noder.node(strings)?;
    if args.dissolve {
        let mut dissolver = SegmentStringDissolver::new();
        dissolver.dissolve(edges);
        edges = dissolver.into_result();
    }
    tracing::info!(input = num_input, edges = edges.len(), "noded");

    let all_points: Vec<Point> = edges
        .iter()
        .flat_map(|e| e.coordinates().iter().copied())
        .collect();
    let Some(bbox) = Envelope::of(&all_points) else {
        anyhow::bail!("no line segments in the input");
    };

    let pad = 1.0;
    let stroke_width = (bbox.max_y - bbox.min_y).max(bbox.max_x - bbox.min_x) / 1024.0;
    let dot_radius = stroke_width * 1.5;
    let mut document = svg::Document::new().set(
        "viewBox",
        (
            bbox.min_x - pad,
            bbox.min_y - pad,
            bbox.max_x - bbox.min_x + 2.0 * pad,
            bbox.max_y - bbox.min_y + 2.0 * pad,
        ),
    );

    let colors = ["#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e"];
    for (i, edge) in edges.iter().enumerate() {
        let pts = edge.coordinates();
        let mut data = svg::node::element::path::Data::new().move_to(pts[0].xy());
        for p in &pts[1..] {
            data = data.line_to(p.xy());
        }
        let path = svg::node::element::Path::new()
            .set("stroke", colors[i % colors.len()])
            .set("stroke-width", stroke_width)
            .set("fill", "none")
            .set("d", data);
        document = document.add(path);

        for end in [&pts[0], &pts[pts.len() - 1]] {
            let (x, y) = end.xy();
            let c = svg::node::element::Circle::new()
                .set("r", dot_radius)
                .set("cx", x)
                .set("cy", y)
                .set("opacity", 0.5)
                .set("fill", "black");
            document = document.add(c);
        }
    }

    svg::save(&args.output, &document)?;

    Ok(())
}
