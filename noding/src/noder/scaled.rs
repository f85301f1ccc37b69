use crate::error::{NodingError, Result};
use crate::geom::{finite, Point};
use crate::segment_string::SegmentString;

use super::Noder;

/// Wraps another noder, running it on coordinates that have been scaled and
/// rounded to integers.
///
/// Each coordinate `x` becomes `round((x - offset_x) * scale)` on the way in,
/// and each output coordinate `x` becomes `x / scale + offset_x` on the way
/// out. Rounding can make consecutive points equal; the repeats are removed,
/// and strings that shrink to a single point are dropped entirely.
///
/// A scale of exactly `1.0` turns the wrapper into a passthrough (the offsets
/// are ignored too).
#[derive(Clone, Debug)]
pub struct ScaledNoder<N> {
    inner: N,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl<N> ScaledNoder<N> {
    /// Returns [`NodingError::InvalidScale`] unless `scale` is finite and positive.
    ///
    /// Strings that round to a single point are left out of the output, and
    /// their `data` goes with them. Callers that need every input accounted
    /// for should compare the data in the output against the input.
    pub fn new(inner: N, scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(NodingError::InvalidScale(scale));
        }
        Ok(ScaledNoder {
            inner,
            scale,
            offset_x: 0.0,
            offset_y: 0.0,
        })
    }

    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_integer_precision(&self) -> bool {
        self.scale == 1.0
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }

    pub fn into_inner(self) -> N {
        self.inner
    }

    fn scale_point(&self, p: &Point) -> Result<Point> {
        let (x, y) = p.xy();
        Ok(Point {
            x: finite(((x - self.offset_x) * self.scale).round())?,
            y: finite(((y - self.offset_y) * self.scale).round())?,
            z: p.z,
        })
    }

    fn unscale_point(&self, p: &Point) -> Result<Point> {
        let (x, y) = p.xy();
        Ok(Point {
            x: finite(x / self.scale + self.offset_x)?,
            y: finite(y / self.scale + self.offset_y)?,
            z: p.z,
        })
    }

    fn scale_string<D>(&self, s: SegmentString<D>) -> Result<Option<SegmentString<D>>> {
        let (pts, data) = s.into_parts();
        let mut scaled: Vec<Point> = Vec::with_capacity(pts.len());
        for p in &pts {
            let q = self.scale_point(p)?;
            if scaled.last().map_or(true, |last| !last.eq_2d(&q)) {
                scaled.push(q);
            }
        }
        if scaled.len() < 2 {
            tracing::debug!(first = ?pts[0], "dropping string that collapsed under scaling");
            return Ok(None);
        }
        SegmentString::new(scaled, data).map(Some)
    }

    fn unscale_string<D>(&self, s: SegmentString<D>) -> Result<SegmentString<D>> {
        let (pts, data) = s.into_parts();
        let pts = pts
            .iter()
            .map(|p| self.unscale_point(p))
            .collect::<Result<Vec<_>>>()?;
        SegmentString::new(pts, data)
    }
}

impl<D, N: Noder<D>> Noder<D> for ScaledNoder<N> {
    fn compute_nodes(&mut self, strings: Vec<SegmentString<D>>) -> Result<()> {
        if self.is_integer_precision() {
            return self.inner.compute_nodes(strings);
        }

        let num_input = strings.len();
        let mut scaled = Vec::with_capacity(num_input);
        for s in strings {
            if let Some(s) = self.scale_string(s)? {
                scaled.push(s);
            }
        }
        tracing::debug!(
            scale = self.scale,
            strings = num_input,
            dropped = num_input - scaled.len(),
            "scaled strings for noding"
        );
        self.inner.compute_nodes(scaled)
    }

    fn noded_substrings(&mut self) -> Result<Vec<SegmentString<D>>> {
        let out = self.inner.noded_substrings()?;
        if self.is_integer_precision() {
            return Ok(out);
        }
        out.into_iter().map(|s| self.unscale_string(s)).collect()
    }
}
